//! Fund reference data

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::projection::PERIODS_PER_YEAR;

/// Registry identifier for a fund
pub type FundId = u32;

/// Fraction of commitment used as the opening mark when no NAV is known
pub const DEFAULT_NAV_FRACTION: f64 = 0.5;

/// Strategy class of a fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Buyout / growth private equity
    BuyoutGrowth,
    VentureCapital,
    Infrastructure,
    Secondaries,
    Other,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::BuyoutGrowth,
        Strategy::VentureCapital,
        Strategy::Infrastructure,
        Strategy::Secondaries,
        Strategy::Other,
    ];

    /// Parse a strategy label as shown in the dashboard.
    /// Unrecognized labels map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "buyout/growth pe" | "buyout" | "growth" | "growth pe" | "pe" | "private equity"
            | "buyoutgrowth" => Strategy::BuyoutGrowth,
            "venture capital" | "venture" | "vc" | "venturecapital" => Strategy::VentureCapital,
            "infrastructure" | "infra" => Strategy::Infrastructure,
            "secondaries" | "secondary" => Strategy::Secondaries,
            "other" => Strategy::Other,
            other => {
                log::warn!("unknown strategy '{}', using Other", other);
                Strategy::Other
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::BuyoutGrowth => "Buyout/Growth PE",
            Strategy::VentureCapital => "Venture Capital",
            Strategy::Infrastructure => "Infrastructure",
            Strategy::Secondaries => "Secondaries",
            Strategy::Other => "Other",
        }
    }
}

/// Geographic focus of a fund
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    NorthAmerica,
    Europe,
    Asia,
    Global,
    Other,
}

impl Region {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "north america" | "na" | "us" | "northamerica" => Region::NorthAmerica,
            "europe" | "eu" => Region::Europe,
            "asia" | "apac" => Region::Asia,
            "global" => Region::Global,
            _ => Region::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::Europe => "Europe",
            Region::Asia => "Asia",
            Region::Global => "Global",
            Region::Other => "Other",
        }
    }
}

/// A single fund commitment in the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fund {
    /// Registry identifier
    pub id: FundId,

    /// Display name
    pub name: String,

    /// Strategy class, drives distribution timing and growth curve
    pub strategy: Strategy,

    /// Geographic focus
    pub region: Region,

    /// Vintage year (first capital call year)
    pub vintage: i32,

    /// Committed capital
    pub commitment: f64,

    /// Investment period in years
    pub investment_period: u32,

    /// Fund term in years
    pub fund_life: u32,

    /// Latest reported NAV, if known
    #[serde(default)]
    pub latest_nav: Option<f64>,

    /// Created by the user during the session rather than loaded
    #[serde(default)]
    pub custom: bool,
}

impl Fund {
    pub fn new(
        id: FundId,
        name: impl Into<String>,
        strategy: Strategy,
        region: Region,
        vintage: i32,
        commitment: f64,
        investment_period: u32,
        fund_life: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            strategy,
            region,
            vintage,
            commitment: commitment.max(0.0),
            investment_period,
            fund_life,
            latest_nav: None,
            custom: false,
        }
    }

    pub fn with_latest_nav(mut self, nav: f64) -> Self {
        self.latest_nav = Some(nav.max(0.0));
        self
    }

    /// Age in quarters at the given date; negative before the vintage year
    pub fn age_at(&self, date: NaiveDate) -> i32 {
        (date.year() - self.vintage) * PERIODS_PER_YEAR as i32 + date.month0() as i32 / 3
    }

    /// Straight-line call per quarter before any scenario factor
    pub fn base_call_per_period(&self) -> f64 {
        if self.investment_period == 0 {
            return 0.0;
        }
        self.commitment / (self.investment_period * PERIODS_PER_YEAR) as f64
    }

    /// NAV mark used when the projection starts after the fund has begun investing
    pub fn opening_nav(&self) -> f64 {
        self.latest_nav.unwrap_or(self.commitment * DEFAULT_NAV_FRACTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_fund() -> Fund {
        Fund::new(
            1,
            "Test Buyout Fund",
            Strategy::BuyoutGrowth,
            Region::NorthAmerica,
            2020,
            100_000_000.0,
            5,
            10,
        )
    }

    #[test]
    fn test_strategy_from_name() {
        assert_eq!(Strategy::from_name("Buyout/Growth PE"), Strategy::BuyoutGrowth);
        assert_eq!(Strategy::from_name("PE"), Strategy::BuyoutGrowth);
        assert_eq!(Strategy::from_name("VC"), Strategy::VentureCapital);
        assert_eq!(Strategy::from_name(" infrastructure "), Strategy::Infrastructure);
        assert_eq!(Strategy::from_name("Hedge Fund"), Strategy::Other);
    }

    #[test]
    fn test_fund_age() {
        let fund = test_fund();

        // Q1 of vintage year is age 0
        assert_eq!(fund.age_at(NaiveDate::from_ymd_opt(2020, 3, 31).unwrap()), 0);
        assert_eq!(fund.age_at(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()), 3);
        assert_eq!(fund.age_at(NaiveDate::from_ymd_opt(2022, 6, 30).unwrap()), 9);
        assert_eq!(fund.age_at(NaiveDate::from_ymd_opt(2019, 12, 31).unwrap()), -1);
    }

    #[test]
    fn test_base_call_per_period() {
        let fund = test_fund();
        assert_eq!(fund.base_call_per_period(), 5_000_000.0);

        let mut no_period = test_fund();
        no_period.investment_period = 0;
        assert_eq!(no_period.base_call_per_period(), 0.0);
    }

    #[test]
    fn test_opening_nav_defaults_to_fraction_of_commitment() {
        let fund = test_fund();
        assert_eq!(fund.opening_nav(), 50_000_000.0);
        assert_eq!(fund.with_latest_nav(72_000_000.0).opening_nav(), 72_000_000.0);
    }
}
