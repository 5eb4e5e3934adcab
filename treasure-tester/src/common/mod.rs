pub mod scenario;
pub mod util;

pub use util::{iteration_store_dir, split_csv};
