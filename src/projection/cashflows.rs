//! Period-level output records shared by both projection paths

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fund::FundId;
use crate::summary::{summarize_from, OpeningPosition, SummaryOutputs};

/// Step size of a projected series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Quarterly,
    Annual,
}

impl Frequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Quarterly => 4,
            Frequency::Annual => 1,
        }
    }
}

/// Comparison IRR curves for display next to the modeled IRR.
/// Derived by fixed offsets; they carry no financial meaning of their own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkIrr {
    pub upper_quartile: f64,
    pub median: f64,
    pub lower_quartile: f64,
}

/// One simulation time step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// Position in the series (0-based)
    pub index: usize,

    /// "2024-Q3" for quarterly series, "Year 3" for annual curves
    pub label: String,

    /// Quarter-end date; annual synthetic curves have none
    pub date: Option<NaiveDate>,

    /// Closed period (true) or forecast (false)
    pub is_actual: bool,

    pub capital_call: f64,
    pub distribution: f64,

    /// End-of-period NAV, never negative
    pub nav: f64,

    /// distribution - capital_call
    pub net_cashflow: f64,

    /// Running sum of net_cashflow through this period
    pub cumulative_net: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmarks: Option<BenchmarkIrr>,
}

impl PeriodRecord {
    /// Create an empty record with zero cashflows
    pub fn new(index: usize, label: impl Into<String>, date: Option<NaiveDate>, is_actual: bool) -> Self {
        Self {
            index,
            label: label.into(),
            date,
            is_actual,
            capital_call: 0.0,
            distribution: 0.0,
            nav: 0.0,
            net_cashflow: 0.0,
            cumulative_net: 0.0,
            irr: None,
            benchmarks: None,
        }
    }

    /// Set the period cashflows and derive the net and running totals
    pub fn set_flows(&mut self, capital_call: f64, distribution: f64, nav: f64, prior_cumulative: f64) {
        self.capital_call = capital_call;
        self.distribution = distribution;
        self.nav = nav;
        self.net_cashflow = distribution - capital_call;
        self.cumulative_net = prior_cumulative + self.net_cashflow;
    }
}

/// Roll NAV forward and absorb any negative result.
///
/// A shortfall is first taken out of the period's distribution (down to zero);
/// whatever remains is written off. Returns `(nav, distribution)`.
pub fn roll_nav(opening_nav: f64, growth: f64, call: f64, distribution: f64) -> (f64, f64) {
    let nav = opening_nav + growth + call - distribution;
    if nav >= 0.0 {
        return (nav, distribution);
    }
    let distribution = (distribution + nav).max(0.0);
    (0.0, distribution)
}

/// Quarterly projection for one fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundProjection {
    pub fund_id: FundId,

    pub commitment: f64,

    /// Fund term in years
    pub fund_life: u32,

    /// Capital called before the first calendar period
    pub called_before_start: f64,

    /// NAV carried into the first calendar period
    pub opening_nav: f64,

    pub records: Vec<PeriodRecord>,
}

impl FundProjection {
    pub fn new(fund_id: FundId, commitment: f64, fund_life: u32, opening: OpeningPosition) -> Self {
        Self {
            fund_id,
            commitment,
            fund_life,
            called_before_start: opening.called,
            opening_nav: opening.nav,
            records: Vec::new(),
        }
    }

    pub fn add_record(&mut self, record: PeriodRecord) {
        self.records.push(record);
    }

    /// Total capital called over the fund's life up to the end of the series
    pub fn total_called(&self) -> f64 {
        self.called_before_start + self.records.iter().map(|r| r.capital_call).sum::<f64>()
    }

    /// Capital called strictly before the first forecast period
    pub fn called_through_actuals(&self) -> f64 {
        self.called_before_start
            + self
                .records
                .iter()
                .filter(|r| r.is_actual)
                .map(|r| r.capital_call)
                .sum::<f64>()
    }

    /// Commitment not yet called as of the forecast boundary
    pub fn unfunded_at_boundary(&self) -> f64 {
        (self.commitment - self.called_through_actuals()).max(0.0)
    }

    pub fn forecast(&self) -> impl Iterator<Item = &PeriodRecord> {
        self.records.iter().filter(|r| !r.is_actual)
    }

    pub fn opening(&self) -> OpeningPosition {
        OpeningPosition {
            called: self.called_before_start,
            nav: self.opening_nav,
        }
    }

    /// KPIs over the projected window, counting pre-window calls as paid-in
    pub fn summary(&self) -> SummaryOutputs {
        summarize_from(
            &self.records,
            self.opening(),
            self.commitment,
            self.fund_life as f64,
            Frequency::Quarterly,
        )
    }
}
