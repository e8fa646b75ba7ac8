//! Liquidity buffer walk over forecast periods

use serde::{Deserialize, Serialize};

use crate::projection::PeriodRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LiquidityPoint {
    pub index: usize,
    /// Running buffer balance; `None` on actual periods, which the walk skips
    pub balance: Option<f64>,
    /// Balance floored at zero
    pub available_liquidity: f64,
    /// Shortfall below zero, as a positive amount
    pub funding_gap: f64,
}

/// Run `seed` forward through the forecast periods of `records`, adding each
/// period's net cashflow.
pub fn liquidity_walk(records: &[PeriodRecord], seed: f64) -> Vec<LiquidityPoint> {
    let mut balance = seed;
    records
        .iter()
        .map(|record| {
            if record.is_actual {
                return LiquidityPoint {
                    index: record.index,
                    ..Default::default()
                };
            }
            balance += record.net_cashflow;
            LiquidityPoint {
                index: record.index,
                balance: Some(balance),
                available_liquidity: balance.max(0.0),
                funding_gap: (-balance).max(0.0),
            }
        })
        .collect()
}

/// Forecast periods covered before the first funding gap; `None` if the buffer
/// never runs dry.
pub fn liquidity_runway(points: &[LiquidityPoint]) -> Option<usize> {
    points
        .iter()
        .filter(|p| p.balance.is_some())
        .position(|p| p.funding_gap > 0.0)
}
