//! Strategy allocation weights for the studio

use serde::{Deserialize, Serialize};

use crate::fund::Strategy;

/// Totals within this many percentage points of 100 are left alone
const ALLOCATION_TOLERANCE_PCT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationWeight {
    pub strategy: Strategy,
    /// Percent of total commitment
    pub pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyAllocation {
    pub weights: Vec<AllocationWeight>,
}

impl StrategyAllocation {
    pub fn new(weights: &[(Strategy, f64)]) -> Self {
        Self {
            weights: weights
                .iter()
                .map(|&(strategy, pct)| AllocationWeight { strategy, pct })
                .collect(),
        }
    }

    pub fn total_pct(&self) -> f64 {
        self.weights.iter().map(|w| w.pct.max(0.0)).sum()
    }

    /// Rescale weights to total 100%.
    ///
    /// Negative weights count as zero. Returns the rescaled allocation and, when
    /// the input did not total 100%, a warning for the caller to surface. An
    /// all-zero allocation is returned unchanged.
    pub fn normalized(&self) -> (StrategyAllocation, Option<String>) {
        let total = self.total_pct();
        if (total - 100.0).abs() <= ALLOCATION_TOLERANCE_PCT {
            return (self.clone(), None);
        }

        let warning = format!("allocation totals {:.1}%, recommend rebalancing", total);
        log::warn!("{}", warning);

        if total <= 0.0 {
            return (self.clone(), Some(warning));
        }
        let weights = self
            .weights
            .iter()
            .map(|w| AllocationWeight {
                strategy: w.strategy,
                pct: w.pct.max(0.0) / total * 100.0,
            })
            .collect();
        (StrategyAllocation { weights }, Some(warning))
    }

    /// Commitment per strategy for a total commitment
    pub fn commitments(&self, total_commitment: f64) -> Vec<(Strategy, f64)> {
        self.weights
            .iter()
            .map(|w| (w.strategy, total_commitment * w.pct.max(0.0) / 100.0))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_balanced_allocation_untouched() {
        let a = StrategyAllocation::new(&[(Strategy::BuyoutGrowth, 60.0), (Strategy::VentureCapital, 40.0)]);
        let (n, warning) = a.normalized();
        assert_eq!(n, a);
        assert!(warning.is_none());
    }

    #[test]
    fn test_over_allocation_rescaled_with_warning() {
        let a = StrategyAllocation::new(&[(Strategy::BuyoutGrowth, 80.0), (Strategy::Infrastructure, 40.0)]);
        let (n, warning) = a.normalized();

        assert_eq!(warning.as_deref(), Some("allocation totals 120.0%, recommend rebalancing"));
        assert_relative_eq!(n.total_pct(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(n.weights[0].pct, 200.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_allocation_warns_without_nan() {
        let (n, warning) = StrategyAllocation::default().normalized();
        assert!(warning.is_some());
        assert!(n.weights.is_empty());
    }

    #[test]
    fn test_commitments_split() {
        let a = StrategyAllocation::new(&[(Strategy::Secondaries, 25.0), (Strategy::Other, 75.0)]);
        let split = a.commitments(200.0);
        assert_eq!(split, vec![(Strategy::Secondaries, 50.0), (Strategy::Other, 150.0)]);
    }
}
