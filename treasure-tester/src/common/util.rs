use chrono::Utc;
use std::path::{Path, PathBuf};

/// Timestamped store directory for one iteration of a scenario.
pub fn iteration_store_dir(base: &Path, scenario: &str, iteration: usize) -> PathBuf {
    let ts = Utc::now().format("%Y%m%dT%H%M%S%.3f");
    base.join(scenario).join(format!("iter-{iteration}-{ts}"))
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}
