//! Scenario runner for side-by-side stress comparisons
//!
//! Holds the engine and fund registry once, then projects the same selection
//! under as many scenarios as needed without reloading anything.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assumptions::{Assumptions, FactorOverrides, Scenario};
use crate::error::ForecastResult;
use crate::fund::{FundId, FundRegistry};
use crate::portfolio::{aggregate_portfolio, PortfolioProjection};
use crate::projection::{ProjectionConfig, ProjectionEngine};
use crate::summary::SummaryOutputs;

/// Pre-loaded runner for batch portfolio projections
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(FundRegistry::default_registry());
/// let results = runner.run_scenarios(&Scenario::ALL, &ids, as_of);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
    registry: FundRegistry,
}

/// Headline numbers for one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario: Scenario,
    pub summary: SummaryOutputs,
    pub forecast_distributions: f64,
    pub forecast_calls: f64,
    pub peak_funding_gap: f64,
    pub liquidity_runway: Option<usize>,
}

impl ScenarioRunner {
    /// Runner with the built-in scenario table and default config
    pub fn new(registry: FundRegistry) -> Self {
        Self::with_engine(ProjectionEngine::default(), registry)
    }

    /// Runner whose scenario table is loaded from `scenario_factors.csv` in `path`
    pub fn from_csv_path(path: &std::path::Path, registry: FundRegistry) -> ForecastResult<Self> {
        let assumptions = Assumptions::from_csv_path(path)?;
        Ok(Self::with_engine(
            ProjectionEngine::new(assumptions, ProjectionConfig::default()),
            registry,
        ))
    }

    pub fn with_engine(engine: ProjectionEngine, registry: FundRegistry) -> Self {
        Self { engine, registry }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn registry(&self) -> &FundRegistry {
        &self.registry
    }

    /// Mutable registry access for adding custom funds between runs
    pub fn registry_mut(&mut self) -> &mut FundRegistry {
        &mut self.registry
    }

    /// Project `fund_ids` under one scenario
    pub fn run(&self, scenario: Scenario, fund_ids: &[FundId], as_of: NaiveDate) -> PortfolioProjection {
        aggregate_portfolio(&self.engine, &self.registry, fund_ids, scenario, as_of, None)
    }

    /// As [`run`](Self::run) with user factor overrides layered on the scenario
    pub fn run_with_overrides(
        &self,
        scenario: Scenario,
        fund_ids: &[FundId],
        as_of: NaiveDate,
        overrides: &FactorOverrides,
    ) -> PortfolioProjection {
        aggregate_portfolio(&self.engine, &self.registry, fund_ids, scenario, as_of, Some(overrides))
    }

    /// Run several scenarios in parallel; results follow the order of `scenarios`
    pub fn run_scenarios(
        &self,
        scenarios: &[Scenario],
        fund_ids: &[FundId],
        as_of: NaiveDate,
    ) -> Vec<(Scenario, PortfolioProjection)> {
        scenarios
            .par_iter()
            .map(|&scenario| (scenario, self.run(scenario, fund_ids, as_of)))
            .collect()
    }

    /// One headline row per scenario
    pub fn compare(&self, scenarios: &[Scenario], fund_ids: &[FundId], as_of: NaiveDate) -> Vec<ScenarioComparison> {
        self.run_scenarios(scenarios, fund_ids, as_of)
            .into_iter()
            .map(|(scenario, portfolio)| {
                let forecast = portfolio.records.iter().filter(|r| !r.is_actual);
                let (forecast_calls, forecast_distributions) = forecast
                    .fold((0.0, 0.0), |(c, d), r| (c + r.capital_call, d + r.distribution));
                ScenarioComparison {
                    scenario,
                    summary: portfolio.summary(),
                    forecast_distributions,
                    forecast_calls,
                    peak_funding_gap: portfolio.peak_funding_gap(),
                    liquidity_runway: portfolio.liquidity_runway(),
                }
            })
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(FundRegistry::default_registry())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_run_scenarios_keeps_order() {
        let runner = ScenarioRunner::default();
        let ids = runner.registry().ids();
        let results = runner.run_scenarios(&Scenario::ALL, &ids, as_of());

        let order: Vec<_> = results.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, Scenario::ALL.to_vec());
        assert!(results.iter().all(|(_, p)| p.records.len() == 32));
    }

    #[test]
    fn test_stress_lowers_forecast_distributions() {
        let runner = ScenarioRunner::default();
        let ids = runner.registry().ids();
        let rows = runner.compare(&[Scenario::Base, Scenario::Recession, Scenario::LiquidityCrunch], &ids, as_of());

        assert!(rows[1].forecast_distributions < rows[0].forecast_distributions);
        assert!(rows[2].forecast_distributions < rows[1].forecast_distributions);
        // Faster calls never call less in total
        assert!(rows[1].forecast_calls >= rows[0].forecast_calls - 1e-6);
    }

    #[test]
    fn test_actual_periods_identical_across_scenarios() {
        let runner = ScenarioRunner::default();
        let ids = runner.registry().ids();
        let base = runner.run(Scenario::Base, &ids, as_of());
        let stress = runner.run(Scenario::Recession, &ids, as_of());

        for (b, s) in base.records.iter().zip(&stress.records).take(8) {
            assert_eq!(b, s);
        }
    }

    #[test]
    fn test_overrides_apply() {
        let runner = ScenarioRunner::default();
        let ids = runner.registry().ids();
        let base = runner.run(Scenario::Base, &ids, as_of());
        let overrides = FactorOverrides {
            dist_factor: Some(0.0001),
            ..Default::default()
        };
        let muted = runner.run_with_overrides(Scenario::Base, &ids, as_of(), &overrides);

        let total = |p: &PortfolioProjection| p.records.iter().map(|r| r.distribution).sum::<f64>();
        assert!(total(&muted) < total(&base));
    }

    #[test]
    fn test_custom_fund_visible_to_runs() {
        use crate::fund::{NewFund, Region, Strategy};

        let mut runner = ScenarioRunner::default();
        let id = runner.registry_mut().add_custom_fund(NewFund {
            name: "Late Credit I".to_string(),
            strategy: Strategy::Other,
            region: Region::Europe,
            vintage: 2024,
            commitment: 10_000_000.0,
            investment_period: 4,
            fund_life: 8,
            latest_nav: None,
        });
        let portfolio = runner.run(Scenario::Base, &[id], as_of());
        assert_eq!(portfolio.fund_count(), 1);
        assert!(portfolio.records.iter().map(|r| r.capital_call).sum::<f64>() > 0.0);
    }
}
