//! Portfolio roll-up of single-fund projections

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::liquidity::{liquidity_runway, liquidity_walk, LiquidityPoint};
use crate::assumptions::{FactorOverrides, Scenario};
use crate::fund::{FundId, FundRegistry};
use crate::projection::{quarter_label, Calendar, Frequency, FundProjection, PeriodRecord, ProjectionEngine};
use crate::summary::{summarize_from, OpeningPosition, SummaryOutputs};

/// Aggregate projection across a set of funds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioProjection {
    /// Summed calls, distributions, net cashflow and NAV per period
    pub records: Vec<PeriodRecord>,

    /// Liquidity buffer per period, aligned with `records`
    pub liquidity: Vec<LiquidityPoint>,

    /// Commitment still uncalled as of the forecast boundary
    pub remaining_unfunded: f64,

    pub total_commitment: f64,

    /// Capital called by the included funds before the first period
    pub called_before_start: f64,

    /// Summed NAV the included funds carry into the first period
    pub opening_nav: f64,

    /// Commitment-weighted fund term in years
    pub weighted_fund_life: f64,

    pub seed_liquidity: f64,

    /// Per-fund series that were summed, in selection order
    pub funds: Vec<FundProjection>,
}

impl PortfolioProjection {
    pub fn fund_count(&self) -> usize {
        self.funds.len()
    }

    /// Forecast periods covered before the liquidity buffer first runs short
    pub fn liquidity_runway(&self) -> Option<usize> {
        liquidity_runway(&self.liquidity)
    }

    pub fn peak_funding_gap(&self) -> f64 {
        self.liquidity.iter().map(|p| p.funding_gap).fold(0.0, f64::max)
    }

    pub fn summary(&self) -> SummaryOutputs {
        let opening = OpeningPosition {
            called: self.called_before_start,
            nav: self.opening_nav,
        };
        summarize_from(
            &self.records,
            opening,
            self.total_commitment,
            self.weighted_fund_life,
            Frequency::Quarterly,
        )
    }
}

/// Sum fund projections generated off `calendar`.
///
/// Every projection must come from the same calendar; a series whose length
/// differs is skipped rather than resampled. An empty input yields a
/// zero-filled series of the calendar's length.
pub fn aggregate(projections: Vec<FundProjection>, calendar: &Calendar, seed_liquidity: f64) -> PortfolioProjection {
    let mut records: Vec<PeriodRecord> = calendar
        .dates()
        .iter()
        .enumerate()
        .map(|(i, &date)| PeriodRecord::new(i, quarter_label(date), Some(date), calendar.is_actual(i)))
        .collect();

    let (aligned, misaligned): (Vec<_>, Vec<_>) = projections
        .into_iter()
        .partition(|p| p.records.len() == calendar.len());
    for p in &misaligned {
        log::warn!(
            "fund {} has {} periods, calendar has {}; excluded from aggregate",
            p.fund_id,
            p.records.len(),
            calendar.len()
        );
    }

    let mut cumulative = 0.0;
    for (i, record) in records.iter_mut().enumerate() {
        let (call, dist, nav) = aligned.iter().fold((0.0, 0.0, 0.0), |(c, d, n), p| {
            let r = &p.records[i];
            (c + r.capital_call, d + r.distribution, n + r.nav)
        });
        record.set_flows(call, dist, nav, cumulative);
        cumulative = record.cumulative_net;
    }

    let total_commitment: f64 = aligned.iter().map(|p| p.commitment).sum();
    let weighted_fund_life = if total_commitment > 0.0 {
        aligned
            .iter()
            .map(|p| p.commitment * p.fund_life as f64)
            .sum::<f64>()
            / total_commitment
    } else {
        0.0
    };

    PortfolioProjection {
        liquidity: liquidity_walk(&records, seed_liquidity),
        records,
        remaining_unfunded: aligned.iter().map(|p| p.unfunded_at_boundary()).sum(),
        total_commitment,
        called_before_start: aligned.iter().map(|p| p.called_before_start).sum(),
        opening_nav: aligned.iter().map(|p| p.opening_nav).sum(),
        weighted_fund_life,
        seed_liquidity,
        funds: aligned,
    }
}

/// Project the selected funds under `scenario` and roll them up.
///
/// Funds are projected in parallel; each projection is independent and results
/// are kept in selection order. Unknown ids are skipped.
pub fn aggregate_portfolio(
    engine: &ProjectionEngine,
    registry: &FundRegistry,
    fund_ids: &[FundId],
    scenario: Scenario,
    as_of: NaiveDate,
    overrides: Option<&FactorOverrides>,
) -> PortfolioProjection {
    let calendar = engine.calendar(as_of);
    let factors = engine.factors(scenario, overrides);
    let selected = registry.select(fund_ids);

    let projections: Vec<FundProjection> = selected
        .par_iter()
        .map(|fund| engine.project_fund(fund, &factors, &calendar))
        .collect();

    log::debug!(
        "aggregating {} funds under {} as of {}",
        projections.len(),
        scenario.as_str(),
        as_of
    );

    aggregate(projections, &calendar, engine.config().seed_liquidity)
}
