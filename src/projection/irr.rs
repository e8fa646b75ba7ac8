//! Dated internal rate of return on projected fund cashflows
//!
//! Reported next to the since-inception IRR proxy in the summary; it does not
//! replace it.

use super::cashflows::PeriodRecord;

const TOLERANCE: f64 = 1e-10;
const MAX_ITERATIONS: usize = 1000;
const MIN_RATE: f64 = -0.99;
const MAX_RATE: f64 = 10.0;

/// Annualized IRR of a periodic cashflow vector (positive = inflow to the investor).
///
/// Newton-Raphson on the periodic rate with a bisection fallback. Returns `None`
/// when there is no sign change or no root is bracketed.
pub fn calculate_irr(cashflows: &[f64], periods_per_year: u32) -> Option<f64> {
    if cashflows.is_empty() || periods_per_year == 0 {
        return None;
    }
    if cashflows.iter().all(|cf| cf.abs() < TOLERANCE) {
        return Some(0.0);
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > TOLERANCE);
    let has_outflow = cashflows.iter().any(|&cf| cf < -TOLERANCE);
    if !has_inflow || !has_outflow {
        return None;
    }

    let annualize = |periodic: f64| (1.0 + periodic).powi(periods_per_year as i32) - 1.0;

    let mut rate = 0.10 / periods_per_year as f64;
    for _ in 0..MAX_ITERATIONS {
        let (npv, slope) = npv_and_slope(cashflows, rate);
        if slope.abs() < 1e-20 {
            break;
        }

        let next = (rate - npv / slope).clamp(MIN_RATE, MAX_RATE);
        if (next - rate).abs() < TOLERANCE {
            return Some(annualize(next)).filter(|r| r.is_finite());
        }
        rate = next;
    }

    bisect(cashflows).map(annualize).filter(|r| r.is_finite())
}

/// IRR of a projected series: each period's net cashflow, with `opening_nav`
/// as an outflow in the first period and the closing NAV as a terminal inflow
/// in the last. Pass zero for a series that starts at inception.
pub fn series_irr(records: &[PeriodRecord], opening_nav: f64, periods_per_year: u32) -> Option<f64> {
    let mut flows: Vec<f64> = records.iter().map(|r| r.net_cashflow).collect();
    if let Some(first_flow) = flows.first_mut() {
        *first_flow -= opening_nav.max(0.0);
    }
    if let (Some(last_flow), Some(last)) = (flows.last_mut(), records.last()) {
        *last_flow += last.nav;
    }
    calculate_irr(&flows, periods_per_year)
}

fn npv_and_slope(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    cashflows
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(npv, slope), (t, &cf)| {
            let discount = base.powi(t as i32);
            (npv + cf / discount, slope - t as f64 * cf / (discount * base))
        })
}

fn npv_at(cashflows: &[f64], rate: f64) -> f64 {
    npv_and_slope(cashflows, rate).0
}

fn bisect(cashflows: &[f64]) -> Option<f64> {
    let mut low = MIN_RATE;
    let mut high = MAX_RATE;
    let mut npv_low = npv_at(cashflows, low);

    if npv_low * npv_at(cashflows, high) > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at(cashflows, mid);

        if npv_mid.abs() < TOLERANCE || (high - low) / 2.0 < TOLERANCE {
            return Some(mid);
        }
        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_annual_irr() {
        // 100 in, 121 back after two years
        let irr = calculate_irr(&[-100.0, 0.0, 121.0], 1).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_quarterly_irr_annualized() {
        // 1000 in, 1100 back after four quarters = 10% annual
        let irr = calculate_irr(&[-1000.0, 0.0, 0.0, 0.0, 1100.0], 4).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_no_sign_change() {
        assert!(calculate_irr(&[-10.0, -5.0], 4).is_none());
        assert!(calculate_irr(&[], 4).is_none());
        assert_eq!(calculate_irr(&[0.0, 0.0], 4), Some(0.0));
    }

    #[test]
    fn test_series_irr_includes_terminal_nav() {
        let mut first = PeriodRecord::new(0, "Year 0", None, false);
        first.set_flows(100.0, 0.0, 100.0, 0.0);
        let mut second = PeriodRecord::new(1, "Year 1", None, false);
        second.set_flows(0.0, 0.0, 110.0, -100.0);

        let irr = series_irr(&[first, second], 0.0, 1).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_series_irr_buys_in_opening_nav() {
        // Opens holding 200, nothing moves, 220 a year later
        let mut first = PeriodRecord::new(0, "Year 0", None, false);
        first.set_flows(0.0, 0.0, 200.0, 0.0);
        let mut second = PeriodRecord::new(1, "Year 1", None, false);
        second.set_flows(0.0, 0.0, 220.0, 0.0);
        let records = [first, second];

        assert!(series_irr(&records, 0.0, 1).is_none());
        let irr = series_irr(&records, 200.0, 1).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);
    }
}
