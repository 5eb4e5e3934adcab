pub mod game_tester;
pub mod reports;
pub mod tester;

pub use game_tester::{Action, GameTester, PlaythroughPlan, PlaythroughSummary, TesterAssets};
pub use tester::*;
