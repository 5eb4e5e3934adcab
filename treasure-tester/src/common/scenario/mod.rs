pub mod catalog;

use crate::logic::{PlaythroughPlan, TesterAssets};
use catalog::catalog_scenarios;

/// Named playthrough with the checks it must satisfy.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: &'static str,
    pub description: &'static str,
    pub plan: PlaythroughPlan,
}

impl TestScenario {
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, plan: PlaythroughPlan) -> Self {
        Self {
            name,
            description,
            plan,
        }
    }
}

/// Look up a scenario by name, building its plan against `assets`.
pub fn get_scenario(name: &str, assets: &TesterAssets) -> Option<TestScenario> {
    catalog_scenarios(assets)
        .into_iter()
        .find(|scenario| scenario.name == name)
}

/// Look up a scenario against the bundled assets.
#[cfg(test)]
pub fn find_scenario(name: &str) -> Option<TestScenario> {
    get_scenario(name, &TesterAssets::load_default())
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    catalog_scenarios(&TesterAssets::load_default())
        .into_iter()
        .map(|scenario| (scenario.name, scenario.description))
        .collect()
}

pub fn scenario_names() -> Vec<&'static str> {
    list_scenarios().into_iter().map(|(name, _)| name).collect()
}
