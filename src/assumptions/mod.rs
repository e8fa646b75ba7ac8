//! Projection assumptions: scenario stress factors and strategy profiles

mod scenario;
mod strategy;
pub mod loader;

pub use scenario::{factors_for, FactorOverrides, Scenario, ScenarioFactors, ScenarioTable};
pub use strategy::{StrategyProfile, StudioDefaults};

use crate::error::ForecastResult;
use std::path::Path;

/// Container for all projection assumptions
#[derive(Debug, Clone, Default)]
pub struct Assumptions {
    pub scenarios: ScenarioTable,
}

impl Assumptions {
    /// Built-in scenario table
    pub fn default_table() -> Self {
        Self::default()
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> ForecastResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory.
    /// Scenarios missing from the file keep their built-in factors.
    pub fn from_csv_path(path: &Path) -> ForecastResult<Self> {
        let loaded = loader::load_scenario_factors(path)?;
        Ok(Self {
            scenarios: ScenarioTable::from_loaded(loaded),
        })
    }

    /// Factors for `scenario` with optional user overrides layered on top
    pub fn factors(&self, scenario: Scenario, overrides: Option<&FactorOverrides>) -> ScenarioFactors {
        let base = self.scenarios.factors(scenario);
        match overrides {
            Some(o) => o.apply(base),
            None => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_dir() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join(loader::DEFAULT_ASSUMPTIONS_PATH)
    }

    #[test]
    fn test_shipped_table_matches_builtin() {
        let loaded = Assumptions::from_csv_path(&data_dir()).unwrap();
        let builtin = Assumptions::default_table();
        for scenario in Scenario::ALL {
            assert_eq!(loaded.factors(scenario, None), builtin.factors(scenario, None));
        }
    }

    #[test]
    fn test_overrides_layer_on_table() {
        let assumptions = Assumptions::default_table();
        let overrides = FactorOverrides {
            call_factor: Some(2.0),
            ..Default::default()
        };
        let f = assumptions.factors(Scenario::Recession, Some(&overrides));
        assert_eq!(f.call_factor, 2.0);
        assert_eq!(f.dist_factor, 0.5);
    }
}
