use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::common::iteration_store_dir;
use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, PlaythroughPlan, PlaythroughSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    game_tester: GameTester,
    store_root: PathBuf,
    verbose: bool,
}

impl LogicTester {
    pub fn new(game_tester: GameTester, store_root: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            game_tester,
            store_root: store_root.into(),
            verbose,
        }
    }

    pub fn run_scenario(&self, scenario: &TestScenario, iterations: usize) -> ScenarioResult {
        if self.verbose {
            println!(
                "🧪 Testing scenario: {} ({} actions)",
                scenario.name.bright_white(),
                scenario.plan.actions.len()
            );
        }

        let (successes, failures, performance_data) =
            self.run_iterations(scenario, iterations);

        let avg_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.to_string(),
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration: avg_duration,
            performance_data,
        }
    }

    fn run_iterations(
        &self,
        scenario: &TestScenario,
        iterations: usize,
    ) -> (usize, Vec<String>, Vec<Duration>) {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let dir = iteration_store_dir(&self.store_root, scenario.name, i + 1);

            match self.run_once(&scenario.plan, &dir) {
                Err(err) => {
                    failures.push(format!("Iteration {} ({}): {err:#}", i + 1, dir.display()));
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            format!("{err:#}").red()
                        );
                    }
                }
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);

                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) score:{} found:{}/{} unlocks:{}",
                            i + 1,
                            iterations,
                            summary.progress.total_score(),
                            summary.overview.discovered,
                            summary.overview.total_treasures,
                            summary.unlock_log.len()
                        );
                    }
                }
            }
        }

        (successes, failures, performance_data)
    }

    fn run_once(&self, plan: &PlaythroughPlan, dir: &Path) -> anyhow::Result<PlaythroughSummary> {
        let summary = self.game_tester.run_plan(plan, dir)?;
        if let Some(err) = evaluate_expectations(plan, &summary) {
            anyhow::bail!("{err} | {}", describe_summary(&summary));
        }
        Ok(summary)
    }
}

fn evaluate_expectations(plan: &PlaythroughPlan, summary: &PlaythroughSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| err.to_string())
}

fn describe_summary(summary: &PlaythroughSummary) -> String {
    let unlocks = if summary.unlock_log.is_empty() {
        "none".to_string()
    } else {
        summary
            .unlock_log
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };
    format!(
        "steps {} score {} found {}/{} quizzes {} unlocks [{}] rejected {} degraded {}",
        summary.steps,
        summary.progress.total_score(),
        summary.overview.discovered,
        summary.overview.total_treasures,
        summary.progress.completed_quizzes().len(),
        unlocks,
        summary.rejected.len(),
        summary.storage_degraded
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}
