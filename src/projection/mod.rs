//! Quarterly fund projection: calendar, state, engine and output records

mod calendar;
mod cashflows;
mod engine;
mod irr;
mod state;

/// Quarterly stepping for fund-driven projections
pub const PERIODS_PER_YEAR: u32 = 4;

pub use calendar::{quarter_label, Calendar};
pub use cashflows::{roll_nav, BenchmarkIrr, Frequency, FundProjection, PeriodRecord};
pub use engine::{ProjectionConfig, ProjectionEngine};
pub use irr::{calculate_irr, series_irr};
pub use state::FundState;
