//! Projection state tracking for a single fund

use chrono::NaiveDate;

use crate::fund::Fund;

/// State of a fund between two projection periods
#[derive(Debug, Clone)]
pub struct FundState {
    /// Age in quarters of the upcoming period (negative before the vintage year)
    pub age: i32,

    /// Commitment not yet called
    pub unfunded: f64,

    /// End-of-period NAV of the last processed period
    pub nav: f64,

    /// Running sum of net cashflow over emitted periods
    pub cumulative_net: f64,

    /// Capital called before the first projected period
    pub called_before_start: f64,
}

impl FundState {
    /// Initialize state at the first calendar period.
    ///
    /// Quarters the fund has already lived through before `first_date` are
    /// assumed to have called capital at the straight-line pace, so the
    /// unfunded balance reflects them. NAV opens at the fund's latest mark.
    pub fn opening(fund: &Fund, first_date: NaiveDate) -> Self {
        let age = fund.age_at(first_date);
        let elapsed = age.max(0) as f64;
        let called_before_start = (fund.base_call_per_period() * elapsed).min(fund.commitment);
        let nav = if age > 0 { fund.opening_nav() } else { 0.0 };

        Self {
            age,
            unfunded: fund.commitment - called_before_start,
            nav,
            cumulative_net: 0.0,
            called_before_start,
        }
    }

    /// Advance to the next quarter
    pub fn advance(&mut self) {
        self.age += 1;
    }

    pub fn is_invested(&self) -> bool {
        self.age >= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fund::{Region, Strategy};

    fn fund(vintage: i32) -> Fund {
        Fund::new(1, "F", Strategy::BuyoutGrowth, Region::Global, vintage, 100_000_000.0, 5, 10)
    }

    #[test]
    fn test_opening_before_vintage() {
        let state = FundState::opening(&fund(2026), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(state.age, -8);
        assert_eq!(state.unfunded, 100_000_000.0);
        assert_eq!(state.nav, 0.0);
        assert!(!state.is_invested());
    }

    #[test]
    fn test_opening_seasoned_fund() {
        // Eight quarters in: 8 x 5M already called, NAV from default mark
        let state = FundState::opening(&fund(2022), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(state.age, 8);
        assert_eq!(state.called_before_start, 40_000_000.0);
        assert_eq!(state.unfunded, 60_000_000.0);
        assert_eq!(state.nav, 50_000_000.0);
    }

    #[test]
    fn test_opening_fully_called_fund() {
        let state = FundState::opening(&fund(2010), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(state.called_before_start, 100_000_000.0);
        assert_eq!(state.unfunded, 0.0);
    }
}
