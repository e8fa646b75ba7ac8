//! Core projection engine for quarterly fund cashflow and NAV projections

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::calendar::{quarter_label, Calendar};
use super::cashflows::{roll_nav, FundProjection, PeriodRecord};
use super::state::FundState;
use crate::assumptions::{Assumptions, FactorOverrides, Scenario, ScenarioFactors, StrategyProfile};
use crate::error::ForecastResult;
use crate::summary::OpeningPosition;
use crate::fund::Fund;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Closed quarters shown before the forecast boundary
    pub periods_actual: u32,

    /// Forecast quarters after the boundary
    pub periods_forecast: u32,

    /// Fraction of NAV distributed per quarter once distributions start
    pub base_distribution_rate: f64,

    /// Quarters over which growth tapers from the early to the late rate
    pub taper_quarters: u32,

    /// Starting balance for the portfolio liquidity walk
    pub seed_liquidity: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            periods_actual: 8,
            periods_forecast: 24,
            base_distribution_rate: 0.05,
            taper_quarters: 8,
            seed_liquidity: 25_000_000.0,
        }
    }
}

impl ProjectionConfig {
    /// Load a config from JSON; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> ForecastResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> ForecastResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    assumptions: Assumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: Assumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Master date list for a run as of `as_of`
    pub fn calendar(&self, as_of: NaiveDate) -> Calendar {
        Calendar::quarterly(as_of, self.config.periods_actual, self.config.periods_forecast)
    }

    /// Factors for a named scenario with optional overrides
    pub fn factors(&self, scenario: Scenario, overrides: Option<&FactorOverrides>) -> ScenarioFactors {
        self.assumptions.factors(scenario, overrides)
    }

    /// Project one fund under a named scenario as of a date
    pub fn project(&self, fund: &Fund, scenario: Scenario, as_of: NaiveDate) -> FundProjection {
        let factors = self.factors(scenario, None);
        self.project_fund(fund, &factors, &self.calendar(as_of))
    }

    /// Run the quarterly projection for a single fund over `calendar`.
    ///
    /// Scenario factors only touch forecast periods; actual periods always use
    /// neutral factors.
    pub fn project_fund(&self, fund: &Fund, factors: &ScenarioFactors, calendar: &Calendar) -> FundProjection {
        let profile = StrategyProfile::for_strategy(fund.strategy);

        let Some(first_date) = calendar.first() else {
            return FundProjection::new(fund.id, fund.commitment, fund.fund_life, OpeningPosition::default());
        };

        let mut state = FundState::opening(fund, first_date);
        let opening = OpeningPosition {
            called: state.called_before_start,
            nav: state.nav,
        };
        let mut result = FundProjection::new(fund.id, fund.commitment, fund.fund_life, opening);

        for (index, &date) in calendar.dates().iter().enumerate() {
            let is_actual = calendar.is_actual(index);
            let period_factors = if is_actual { ScenarioFactors::NEUTRAL } else { *factors };

            let row = self.calculate_period(fund, &profile, &period_factors, &mut state, index, date, is_actual);
            result.add_record(row);

            state.advance();
        }

        log::debug!(
            "projected fund {} over {} periods: called {:.0} of {:.0}",
            fund.id,
            result.records.len(),
            result.total_called(),
            fund.commitment
        );

        result
    }

    /// Calculate cashflows for a single quarter
    fn calculate_period(
        &self,
        fund: &Fund,
        profile: &StrategyProfile,
        factors: &ScenarioFactors,
        state: &mut FundState,
        index: usize,
        date: NaiveDate,
        is_actual: bool,
    ) -> PeriodRecord {
        let mut row = PeriodRecord::new(index, quarter_label(date), Some(date), is_actual);

        // Capital call, capped by what is left of the commitment
        let call = if state.is_invested() && state.unfunded > 0.0 {
            (fund.base_call_per_period() * factors.call_factor).min(state.unfunded)
        } else {
            0.0
        };
        state.unfunded -= call;

        // Distribution as a share of opening NAV
        let distribution = if profile.distributes_at(state.age) && state.nav > 0.0 {
            (state.nav * self.config.base_distribution_rate * factors.dist_factor).min(state.nav)
        } else {
            0.0
        };

        let growth_rate = profile.growth_rate(state.age, factors.nav_growth_factor, self.config.taper_quarters);
        let (nav, distribution) = roll_nav(state.nav, state.nav * growth_rate, call, distribution);

        row.set_flows(call, distribution, nav, state.cumulative_net);

        state.nav = nav;
        state.cumulative_net = row.cumulative_net;

        row
    }
}
