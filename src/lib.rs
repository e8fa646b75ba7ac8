//! Private-markets portfolio forecasting engine
//!
//! This library provides:
//! - Quarterly capital call, distribution and NAV projections per fund
//! - Portfolio roll-up with a liquidity-buffer walk
//! - Named stress scenarios and side-by-side scenario comparison
//! - An assumption studio that builds annual J-curves from target multiples
//! - TVPI / DPI / RVPI / IRR summaries for any projected series

pub mod assumptions;
pub mod error;
pub mod extraction;
pub mod fund;
pub mod portfolio;
pub mod projection;
pub mod scenario;
pub mod studio;
pub mod summary;

// Re-export commonly used types
pub use assumptions::{Assumptions, FactorOverrides, Scenario, ScenarioFactors};
pub use error::{ForecastError, ForecastResult};
pub use extraction::{ExtractedField, ExtractedMetric, ExtractionResult};
pub use fund::{Fund, FundId, FundRegistry, NewFund, Region, Strategy};
pub use portfolio::{aggregate, aggregate_portfolio, PortfolioProjection};
pub use projection::{Calendar, FundProjection, PeriodRecord, ProjectionConfig, ProjectionEngine};
pub use scenario::ScenarioRunner;
pub use studio::{generate_assumption_curve, recompute, AssumptionParams, MultipleTargets, StudioEdit, StudioState};
pub use summary::{summarize, summarize_from, OpeningPosition, SummaryOutputs};
