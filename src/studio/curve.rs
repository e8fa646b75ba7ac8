//! Annual J-curve generated from what-if parameters

use serde::{Deserialize, Serialize};

use super::benchmark::benchmark_bands;
use super::params::AssumptionParams;
use crate::projection::{roll_nav, Frequency, PeriodRecord};
use crate::summary::{summarize, SummaryOutputs};

/// Year at which the IRR curve bottoms out
const IRR_BOTTOM_YEAR: u32 = 2;
const IRR_RECOVERY_EXPONENT: f64 = 0.6;

/// Years subject to the J-curve markdown
const DIP_YEARS: u32 = 2;
/// Share of fund life treated as the value-creation phase
const MID_LIFE_SHARE: f64 = 0.6;
const MID_LIFE_GROWTH: f64 = 0.14;
const LATE_LIFE_GROWTH: f64 = 0.04;

/// Reference multiples the growth and distribution rates are scaled against
const REFERENCE_TVPI: f64 = 2.0;
const REFERENCE_DPI: f64 = 1.5;
const REFERENCE_RVPI: f64 = 0.5;
const REFERENCE_TERMINAL_IRR: f64 = 0.12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionCurve {
    /// One record per year, `0..=fund_life`
    pub series: Vec<PeriodRecord>,
    pub summary: SummaryOutputs,
    pub distribution_start_year: u32,
}

/// Modeled IRR for `year` on a curve of `fund_life` years
pub fn irr_at(params: &AssumptionParams, year: u32) -> f64 {
    let bottom = params.depth.bottom_irr();
    let life = params.curve_life();
    let bottom_year = IRR_BOTTOM_YEAR.min(life);
    if year <= bottom_year {
        if bottom_year == 0 {
            return bottom;
        }
        return bottom * year as f64 / bottom_year as f64;
    }
    let terminal = REFERENCE_TERMINAL_IRR * params.targets.tvpi / REFERENCE_TVPI;
    let span = life.saturating_sub(bottom_year).max(1) as f64;
    let progress = ((year - bottom_year) as f64 / span).min(1.0);
    bottom + (terminal - bottom) * progress.powf(IRR_RECOVERY_EXPONENT)
}

/// Build the annual call / distribution / NAV trajectory for `params`.
///
/// Calls follow the pacing profile over the investment period, NAV dips for the
/// first two years then grows at rates scaled by the TVPI and RVPI targets, and
/// distributions return a share of NAV from the start year on. The fund life is
/// capped at `MAX_FUND_LIFE_YEARS` and the investment period at the fund life.
pub fn generate_assumption_curve(params: &AssumptionParams) -> AssumptionCurve {
    let commitment = params.commitment.max(0.0);
    let life = params.curve_life();
    let ip = params.investment_period.min(life);
    let targets = params.targets;

    let total_to_call = commitment * params.pacing.target_call_pct();
    let base_call = if ip > 0 { total_to_call / ip as f64 } else { 0.0 };
    let dist_start = params.distribution_start_year();
    let dist_rate = params.distribution_speed.rate() * targets.dpi / REFERENCE_DPI;
    let mid_life_end = life as f64 * MID_LIFE_SHARE;

    let mut remaining = total_to_call;
    let mut nav = 0.0;
    let mut cumulative = 0.0;
    let mut series = Vec::with_capacity(life as usize + 1);

    for year in 0..=life {
        let call = if year < ip {
            (base_call * params.pacing.multiplier(year, ip)).min(remaining)
        } else {
            0.0
        };
        remaining -= call;

        let growth = if year < DIP_YEARS {
            -nav * params.depth.depth_factor()
        } else if year as f64 <= mid_life_end {
            nav * MID_LIFE_GROWTH * targets.tvpi / REFERENCE_TVPI
        } else {
            nav * LATE_LIFE_GROWTH * targets.rvpi / REFERENCE_RVPI
        };

        let distribution = if year >= dist_start && nav > 0.0 {
            (nav * dist_rate).min(nav)
        } else {
            0.0
        };

        let (closing_nav, distribution) = roll_nav(nav, growth, call, distribution);
        nav = closing_nav;

        let mut record = PeriodRecord::new(year as usize, format!("Year {}", year), None, false);
        record.set_flows(call, distribution, nav, cumulative);
        cumulative = record.cumulative_net;

        let irr = irr_at(params, year);
        record.irr = Some(irr);
        if params.include_benchmarks {
            record.benchmarks = Some(benchmark_bands(year, irr));
        }
        series.push(record);
    }

    let summary = summarize(&series, commitment, life as f64, Frequency::Annual);
    log::debug!(
        "assumption curve: {} years, called {:.2}, tvpi {:.2}",
        series.len(),
        summary.total_capital_called,
        summary.tvpi
    );

    AssumptionCurve {
        series,
        summary,
        distribution_start_year: dist_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::studio::params::{DeploymentPacing, JCurveDepth, Timing};
    use crate::studio::reconcile::MultipleTargets;
    use approx::assert_relative_eq;

    fn params() -> AssumptionParams {
        AssumptionParams::default()
    }

    #[test]
    fn test_series_covers_fund_life_inclusive() {
        let curve = generate_assumption_curve(&params());
        assert_eq!(curve.series.len(), 11);
        assert_eq!(curve.series[0].label, "Year 0");
        assert!(curve.series.iter().all(|r| r.date.is_none() && !r.is_actual));
    }

    #[test]
    fn test_calls_total_target_pct() {
        for (pacing, pct) in [
            (DeploymentPacing::FrontLoaded, 0.88),
            (DeploymentPacing::Balanced, 0.86),
            (DeploymentPacing::BackLoaded, 0.84),
        ] {
            let mut p = params();
            p.pacing = pacing;
            let curve = generate_assumption_curve(&p);
            assert_relative_eq!(curve.summary.total_capital_called, 100.0 * pct, max_relative = 1e-9);
            // Nothing called after the investment period
            assert!(curve.series[5..].iter().all(|r| r.capital_call == 0.0));
        }
    }

    #[test]
    fn test_early_years_dip() {
        let curve = generate_assumption_curve(&params());
        // Year 1 NAV is year-0 calls marked down 6% plus year-1 calls
        assert_relative_eq!(curve.series[1].nav, 17.2 * 0.94 + 17.2, max_relative = 1e-9);
        assert!(curve.series[1].nav < 34.4);
    }

    #[test]
    fn test_distributions_start_on_schedule() {
        let mut p = params();
        p.distribution_start = Timing::Late;
        let curve = generate_assumption_curve(&p);

        assert_eq!(curve.distribution_start_year, 7);
        assert!(curve.series[..7].iter().all(|r| r.distribution == 0.0));
        assert!(curve.series[7].distribution > 0.0);
    }

    #[test]
    fn test_higher_dpi_returns_more_cash() {
        let low = generate_assumption_curve(&params());
        let mut p = params();
        p.targets = MultipleTargets::from_components(2.0, 0.5);
        let high = generate_assumption_curve(&p);
        assert!(high.summary.total_distributions > low.summary.total_distributions);
    }

    #[test]
    fn test_nav_never_negative() {
        let mut p = params();
        p.depth = JCurveDepth::Deep;
        p.targets = MultipleTargets::from_components(6.0, 0.0);
        let curve = generate_assumption_curve(&p);
        assert!(curve.series.iter().all(|r| r.nav >= 0.0 && r.distribution >= 0.0));
    }

    #[test]
    fn test_irr_shape() {
        let p = params();
        let curve = generate_assumption_curve(&p);
        let irr: Vec<f64> = curve.series.iter().map(|r| r.irr.unwrap()).collect();

        assert_eq!(irr[0], 0.0);
        assert_relative_eq!(irr[2], -0.15);
        assert_relative_eq!(irr[10], 0.12 * 1.9 / 2.0, max_relative = 1e-12);
        assert!(irr[3..].windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_benchmarks_are_opt_in() {
        let curve = generate_assumption_curve(&params());
        assert!(curve.series.iter().all(|r| r.benchmarks.is_none()));

        let mut p = params();
        p.include_benchmarks = true;
        let curve = generate_assumption_curve(&p);
        assert!(curve.series.iter().all(|r| r.benchmarks.is_some()));
    }

    #[test]
    fn test_zero_investment_period_calls_nothing() {
        let mut p = params();
        p.investment_period = 0;
        let curve = generate_assumption_curve(&p);
        assert_eq!(curve.summary.total_capital_called, 0.0);
        assert_eq!(curve.summary.tvpi, 0.0);
        assert_eq!(curve.summary.remaining_unfunded, 100.0);
    }

    #[test]
    fn test_zero_life_single_year() {
        let mut p = params();
        p.fund_life = 0;
        let curve = generate_assumption_curve(&p);
        assert_eq!(curve.series.len(), 1);
        assert_eq!(curve.summary.itd_irr, 0.0);
    }
}
