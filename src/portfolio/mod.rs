//! Portfolio aggregation and liquidity analysis

mod aggregate;
mod liquidity;

pub use aggregate::{aggregate, aggregate_portfolio, PortfolioProjection};
pub use liquidity::{liquidity_runway, liquidity_walk, LiquidityPoint};
