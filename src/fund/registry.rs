//! Session fund registry
//!
//! Holds the reference funds a projection run can select from. Funds can be
//! appended by the "add fund" action but are never removed during a session.

use super::{loader, Fund, FundId, Region, Strategy};
use crate::error::{ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters for a user-created fund
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFund {
    pub name: String,
    pub strategy: Strategy,
    pub region: Region,
    pub vintage: i32,
    pub commitment: f64,
    pub investment_period: u32,
    pub fund_life: u32,
    #[serde(default)]
    pub latest_nav: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct FundRegistry {
    funds: Vec<Fund>,
}

impl FundRegistry {
    pub fn from_funds(funds: Vec<Fund>) -> Self {
        Self { funds }
    }

    /// Registry loaded from a fund CSV export
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> ForecastResult<Self> {
        Ok(Self::from_funds(loader::load_funds(path)?))
    }

    /// Built-in sample portfolio used by the dashboard when nothing is loaded
    pub fn default_registry() -> Self {
        let funds = vec![
            Fund::new(1, "Summit Buyout Partners IV", Strategy::BuyoutGrowth, Region::NorthAmerica, 2019, 50_000_000.0, 5, 10)
                .with_latest_nav(46_500_000.0),
            Fund::new(2, "Horizon Growth Equity II", Strategy::BuyoutGrowth, Region::Europe, 2021, 30_000_000.0, 5, 10)
                .with_latest_nav(18_200_000.0),
            Fund::new(3, "Catalyst Ventures VII", Strategy::VentureCapital, Region::NorthAmerica, 2020, 20_000_000.0, 4, 12)
                .with_latest_nav(17_800_000.0),
            Fund::new(4, "Meridian Infrastructure III", Strategy::Infrastructure, Region::Global, 2018, 40_000_000.0, 5, 15)
                .with_latest_nav(39_000_000.0),
            Fund::new(5, "Keystone Secondaries V", Strategy::Secondaries, Region::Global, 2022, 25_000_000.0, 3, 8)
                .with_latest_nav(12_600_000.0),
            Fund::new(6, "Pacific Rim Opportunities", Strategy::Other, Region::Asia, 2023, 15_000_000.0, 4, 10),
        ];
        Self::from_funds(funds)
    }

    pub fn funds(&self) -> &[Fund] {
        &self.funds
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    pub fn ids(&self) -> Vec<FundId> {
        self.funds.iter().map(|f| f.id).collect()
    }

    pub fn get(&self, id: FundId) -> Option<&Fund> {
        self.funds.iter().find(|f| f.id == id)
    }

    /// Look up a fund that must exist
    pub fn require(&self, id: FundId) -> ForecastResult<&Fund> {
        self.get(id).ok_or(ForecastError::UnknownFund(id))
    }

    /// Resolve a selection in the order given. Unknown ids are skipped.
    pub fn select(&self, ids: &[FundId]) -> Vec<&Fund> {
        ids.iter()
            .filter_map(|&id| {
                let fund = self.get(id);
                if fund.is_none() {
                    log::warn!("fund {} not in registry, skipping", id);
                }
                fund
            })
            .collect()
    }

    pub fn total_commitment(&self, ids: &[FundId]) -> f64 {
        self.select(ids).iter().map(|f| f.commitment).sum()
    }

    /// Append a user-created fund and return its new id
    pub fn add_custom_fund(&mut self, new_fund: NewFund) -> FundId {
        let id = self.funds.iter().map(|f| f.id).max().unwrap_or(0) + 1;

        let mut fund = Fund::new(
            id,
            new_fund.name,
            new_fund.strategy,
            new_fund.region,
            new_fund.vintage,
            new_fund.commitment,
            new_fund.investment_period,
            new_fund.fund_life,
        );
        fund.latest_nav = new_fund.latest_nav.map(|nav| nav.max(0.0));
        fund.custom = true;

        log::debug!("added custom fund {} ({})", id, fund.name);
        self.funds.push(fund);
        id
    }

    /// Replace the latest NAV mark of an existing fund
    pub fn set_latest_nav(&mut self, id: FundId, nav: f64) -> ForecastResult<()> {
        let fund = self
            .funds
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(ForecastError::UnknownFund(id))?;
        fund.latest_nav = Some(nav.max(0.0));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_fund() -> NewFund {
        NewFund {
            name: "Custom Credit I".to_string(),
            strategy: Strategy::Other,
            region: Region::Europe,
            vintage: 2024,
            commitment: 10_000_000.0,
            investment_period: 3,
            fund_life: 7,
            latest_nav: None,
        }
    }

    #[test]
    fn test_default_registry() {
        let registry = FundRegistry::default_registry();
        assert_eq!(registry.len(), 6);
        assert!(registry.funds().iter().all(|f| !f.custom));
        assert_eq!(registry.get(3).unwrap().strategy, Strategy::VentureCapital);
    }

    #[test]
    fn test_add_custom_fund_appends() {
        let mut registry = FundRegistry::default_registry();
        let id = registry.add_custom_fund(new_fund());

        assert_eq!(id, 7);
        assert_eq!(registry.len(), 7);
        let fund = registry.get(id).unwrap();
        assert!(fund.custom);
        assert_eq!(fund.commitment, 10_000_000.0);
    }

    #[test]
    fn test_select_skips_unknown_ids() {
        let registry = FundRegistry::default_registry();
        let selected = registry.select(&[4, 99, 1]);
        let ids: Vec<_> = selected.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[test]
    fn test_set_latest_nav_unknown_fund() {
        let mut registry = FundRegistry::default_registry();
        assert!(registry.set_latest_nav(1, 47_000_000.0).is_ok());
        assert_eq!(registry.get(1).unwrap().latest_nav, Some(47_000_000.0));
        assert!(matches!(
            registry.set_latest_nav(42, 1.0),
            Err(ForecastError::UnknownFund(42))
        ));
    }

    #[test]
    fn test_shipped_csv_matches_default_registry() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/funds.csv");
        let loaded = FundRegistry::from_csv_path(path).unwrap();
        assert_eq!(loaded.funds(), FundRegistry::default_registry().funds());
    }
}
