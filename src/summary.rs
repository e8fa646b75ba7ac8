//! KPI derivation from a completed projection series
//!
//! Pure reductions over `PeriodRecord`s. Every ratio is guarded so a series with
//! no capital called yields zeros rather than NaN or infinity.

use serde::{Deserialize, Serialize};

use crate::projection::{series_irr, Frequency, PeriodRecord};

/// A value located at a specific period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakPoint {
    pub value: f64,
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryOutputs {
    pub total_capital_called: f64,
    pub total_distributions: f64,
    pub ending_nav: f64,
    pub tvpi: f64,
    /// Reported equal to TVPI
    pub moic: f64,
    pub dpi: f64,
    pub rvpi: f64,
    /// Since-inception return proxy: max(0, (tvpi - 1) / (fund_life / 2)).
    /// Not a dated IRR; see `cashflow_irr` for that.
    pub itd_irr: f64,
    pub peak_nav: PeakPoint,
    /// Deepest cumulative net outflow (J-curve trough), as a positive amount
    pub peak_outflow: PeakPoint,
    /// First period at which cumulative net cashflow recovers to zero after the trough
    pub breakeven_index: Option<usize>,
    pub remaining_unfunded: f64,
    /// Dated IRR of net cashflows, opening NAV in and terminal NAV out
    pub cashflow_irr: Option<f64>,
}

/// Position a series opens with when it starts after inception
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpeningPosition {
    /// Capital called before the first period; counts toward paid-in
    pub called: f64,
    /// NAV held going into the first period; bought in at the window start for the dated IRR
    pub nav: f64,
}

/// Summarize a series against its commitment.
pub fn summarize(
    series: &[PeriodRecord],
    commitment: f64,
    fund_life_years: f64,
    frequency: Frequency,
) -> SummaryOutputs {
    summarize_from(series, OpeningPosition::default(), commitment, fund_life_years, frequency)
}

/// As [`summarize`] for a series that opens mid-life.
///
/// Prior calls count toward paid-in capital. The dated IRR covers the window
/// only, with the opening NAV as the first outflow.
pub fn summarize_from(
    series: &[PeriodRecord],
    opening: OpeningPosition,
    commitment: f64,
    fund_life_years: f64,
    frequency: Frequency,
) -> SummaryOutputs {
    let total_capital_called = opening.called + series.iter().map(|r| r.capital_call).sum::<f64>();
    let total_distributions: f64 = series.iter().map(|r| r.distribution).sum();
    let ending_nav = series.last().map(|r| r.nav).unwrap_or(0.0);

    let ratio = |numerator: f64| {
        if total_capital_called > 0.0 {
            numerator / total_capital_called
        } else {
            0.0
        }
    };
    let tvpi = ratio(total_distributions + ending_nav);
    let dpi = ratio(total_distributions);
    let rvpi = ratio(ending_nav);

    let itd_irr = if fund_life_years > 0.0 {
        ((tvpi - 1.0) / (fund_life_years / 2.0)).max(0.0)
    } else {
        0.0
    };

    let (peak_outflow, breakeven_index) = trough_and_breakeven(series);

    SummaryOutputs {
        total_capital_called,
        total_distributions,
        ending_nav,
        tvpi,
        moic: tvpi,
        dpi,
        rvpi,
        itd_irr,
        peak_nav: peak_nav(series),
        peak_outflow,
        breakeven_index,
        remaining_unfunded: (commitment - total_capital_called).max(0.0),
        cashflow_irr: series_irr(series, opening.nav, frequency.periods_per_year()),
    }
}

fn peak_nav(series: &[PeriodRecord]) -> PeakPoint {
    let mut peak = PeakPoint::default();
    for (i, record) in series.iter().enumerate() {
        if i == 0 || record.nav > peak.value {
            peak = PeakPoint {
                value: record.nav,
                index: i,
                label: record.label.clone(),
            };
        }
    }
    peak
}

fn trough_and_breakeven(series: &[PeriodRecord]) -> (PeakPoint, Option<usize>) {
    let mut cumulative = 0.0;
    let mut trough = PeakPoint::default();
    let mut breakeven = None;

    for (i, record) in series.iter().enumerate() {
        cumulative += record.net_cashflow;
        if -cumulative > trough.value {
            trough = PeakPoint {
                value: -cumulative,
                index: i,
                label: record.label.clone(),
            };
            breakeven = None;
        } else if breakeven.is_none() && trough.value > 0.0 && cumulative >= 0.0 {
            breakeven = Some(i);
        }
    }

    (trough, breakeven)
}
