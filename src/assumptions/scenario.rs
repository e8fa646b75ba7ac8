//! Macro stress scenarios and their pacing/growth adjustment factors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named macro scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    Base,
    /// Stress / recession
    Recession,
    /// Slow exits under rising rates
    SlowExit,
    /// Fast exits under strong growth
    FastExit,
    LiquidityCrunch,
    Stagflation,
}

impl Scenario {
    pub const ALL: [Scenario; 6] = [
        Scenario::Base,
        Scenario::Recession,
        Scenario::SlowExit,
        Scenario::FastExit,
        Scenario::LiquidityCrunch,
        Scenario::Stagflation,
    ];

    /// Parse a scenario label. Unrecognized labels map to `Base`.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "base" | "basecase" => Scenario::Base,
            "recession" | "stress" | "stressrecession" => Scenario::Recession,
            "slowexit" | "risingrates" | "slowexitrisingrates" => Scenario::SlowExit,
            "fastexit" | "stronggrowth" | "fastexitstronggrowth" => Scenario::FastExit,
            "liquiditycrunch" => Scenario::LiquidityCrunch,
            "stagflation" => Scenario::Stagflation,
            _ => {
                log::warn!("unknown scenario '{}', using Base", name);
                Scenario::Base
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Base => "Base",
            Scenario::Recession => "Recession",
            Scenario::SlowExit => "SlowExit",
            Scenario::FastExit => "FastExit",
            Scenario::LiquidityCrunch => "LiquidityCrunch",
            Scenario::Stagflation => "Stagflation",
        }
    }

    /// Built-in adjustment factors for this scenario
    pub fn factors(&self) -> ScenarioFactors {
        // (call, dist, nav growth); a missing growth factor means unchanged
        let (call_factor, dist_factor, nav_growth) = match self {
            Scenario::Base => (1.0, 1.0, Some(1.0)),
            Scenario::Recession => (1.15, 0.5, Some(0.8)),
            Scenario::SlowExit => (0.9, 0.6, None),
            Scenario::FastExit => (1.2, 1.3, Some(1.15)),
            Scenario::LiquidityCrunch => (1.3, 0.3, Some(0.6)),
            Scenario::Stagflation => (1.05, 0.7, None),
        };
        ScenarioFactors {
            call_factor,
            dist_factor,
            nav_growth_factor: nav_growth.unwrap_or(1.0),
        }
    }
}

/// Multiplicative adjustments applied to forecast periods only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFactors {
    /// Scales capital call pacing
    pub call_factor: f64,
    /// Scales distribution pacing
    pub dist_factor: f64,
    /// Scales NAV growth during the active growth phase
    pub nav_growth_factor: f64,
}

impl ScenarioFactors {
    pub const NEUTRAL: ScenarioFactors = ScenarioFactors {
        call_factor: 1.0,
        dist_factor: 1.0,
        nav_growth_factor: 1.0,
    };
}

impl Default for ScenarioFactors {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Look up factors by scenario label, falling back to Base
pub fn factors_for(name: &str) -> ScenarioFactors {
    Scenario::from_name(name).factors()
}

/// User-supplied replacements for individual scenario factors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorOverrides {
    #[serde(default)]
    pub call_factor: Option<f64>,
    #[serde(default)]
    pub dist_factor: Option<f64>,
    #[serde(default)]
    pub nav_growth_factor: Option<f64>,
}

impl FactorOverrides {
    /// Layer the overrides over `base`. Non-positive or non-finite values are ignored.
    pub fn apply(&self, base: ScenarioFactors) -> ScenarioFactors {
        ScenarioFactors {
            call_factor: pick("call_factor", self.call_factor, base.call_factor),
            dist_factor: pick("dist_factor", self.dist_factor, base.dist_factor),
            nav_growth_factor: pick(
                "nav_growth_factor",
                self.nav_growth_factor,
                base.nav_growth_factor,
            ),
        }
    }
}

fn pick(name: &str, value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            log::warn!("ignoring {} override {}: factors must be positive", name, v);
            fallback
        }
        None => fallback,
    }
}

/// Scenario factor table, either the built-in one or loaded from CSV
#[derive(Debug, Clone)]
pub struct ScenarioTable {
    factors: HashMap<Scenario, ScenarioFactors>,
}

impl ScenarioTable {
    pub fn from_loaded(loaded: HashMap<Scenario, ScenarioFactors>) -> Self {
        let mut table = Self::default();
        table.factors.extend(loaded);
        table
    }

    pub fn factors(&self, scenario: Scenario) -> ScenarioFactors {
        self.factors
            .get(&scenario)
            .copied()
            .unwrap_or_else(|| scenario.factors())
    }
}

impl Default for ScenarioTable {
    fn default() -> Self {
        Self {
            factors: Scenario::ALL.iter().map(|s| (*s, s.factors())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_table() {
        assert_eq!(factors_for("Base"), ScenarioFactors::NEUTRAL);

        let recession = factors_for("Stress/Recession");
        assert_eq!(recession.call_factor, 1.15);
        assert_eq!(recession.dist_factor, 0.5);
        assert_eq!(recession.nav_growth_factor, 0.8);

        let crunch = factors_for("Liquidity Crunch");
        assert_eq!(crunch.call_factor, 1.3);
        assert_eq!(crunch.dist_factor, 0.3);
        assert_eq!(crunch.nav_growth_factor, 0.6);
    }

    #[test]
    fn test_absent_growth_factor_defaults_to_one() {
        assert_eq!(Scenario::SlowExit.factors().nav_growth_factor, 1.0);
        assert_eq!(Scenario::Stagflation.factors().nav_growth_factor, 1.0);
    }

    #[test]
    fn test_unknown_scenario_falls_back_to_base() {
        assert_eq!(Scenario::from_name("Zombie Apocalypse"), Scenario::Base);
        assert_eq!(factors_for(""), ScenarioFactors::NEUTRAL);
    }

    #[test]
    fn test_all_factors_positive() {
        for scenario in Scenario::ALL {
            let f = scenario.factors();
            assert!(f.call_factor > 0.0 && f.dist_factor > 0.0 && f.nav_growth_factor > 0.0);
        }
    }

    #[test]
    fn test_overrides() {
        let overrides = FactorOverrides {
            call_factor: Some(1.4),
            dist_factor: Some(-0.2),
            nav_growth_factor: None,
        };
        let applied = overrides.apply(Scenario::Recession.factors());
        assert_eq!(applied.call_factor, 1.4);
        // Negative override ignored
        assert_eq!(applied.dist_factor, 0.5);
        assert_eq!(applied.nav_growth_factor, 0.8);
    }
}
