//! CSV-based assumption loader
//!
//! Loads replacement scenario factors from data/assumptions/

use super::{Scenario, ScenarioFactors};
use crate::error::{ForecastError, ForecastResult};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// Raw row of scenario_factors.csv
#[derive(Debug, serde::Deserialize)]
struct ScenarioRow {
    scenario: String,
    call_factor: f64,
    dist_factor: f64,
    /// Empty or absent leaves growth unchanged
    #[serde(default)]
    nav_growth_factor: Option<f64>,
}

impl ScenarioRow {
    fn to_factors(&self) -> ForecastResult<ScenarioFactors> {
        Ok(ScenarioFactors {
            call_factor: check_factor(&self.scenario, "call_factor", self.call_factor)?,
            dist_factor: check_factor(&self.scenario, "dist_factor", self.dist_factor)?,
            nav_growth_factor: match self.nav_growth_factor {
                Some(value) => check_factor(&self.scenario, "nav_growth_factor", value)?,
                None => 1.0,
            },
        })
    }
}

/// Load scenario factors from scenario_factors.csv
///
/// Columns: scenario, call_factor, dist_factor, nav_growth_factor.
pub fn load_scenario_factors(path: &Path) -> ForecastResult<HashMap<Scenario, ScenarioFactors>> {
    let file = File::open(path.join("scenario_factors.csv"))?;
    load_scenario_factors_from_reader(file)
}

pub fn load_scenario_factors_from_reader<R: std::io::Read>(
    reader: R,
) -> ForecastResult<HashMap<Scenario, ScenarioFactors>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut factors = HashMap::new();

    for result in reader.deserialize() {
        let row: ScenarioRow = result?;
        factors.insert(Scenario::from_name(&row.scenario), row.to_factors()?);
    }

    log::debug!("loaded factors for {} scenarios", factors.len());
    Ok(factors)
}

fn check_factor(scenario: &str, field: &str, value: f64) -> ForecastResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ForecastError::InvalidField {
            field: format!("{} ({})", field, scenario),
            value: value.to_string(),
        });
    }
    Ok(value)
}
