//! Assumption studio: what-if J-curves from target multiples
//!
//! Separate from the fund-driven quarterly engine in [`crate::projection`]. The
//! studio builds an annual synthetic curve from strategy-level parameters and
//! target TVPI / DPI / RVPI, and keeps those targets consistent as they are
//! edited.

mod allocation;
mod benchmark;
mod comparison;
mod curve;
mod params;
mod pipeline;
mod reconcile;

pub use allocation::{AllocationWeight, StrategyAllocation};
pub use benchmark::benchmark_bands;
pub use comparison::{
    risk_descriptors, AssumptionSet, ComparisonRow, ComparisonStore, SetMetadata, SetSource, SetStatus,
};
pub use curve::{generate_assumption_curve, irr_at, AssumptionCurve};
pub use params::{AssumptionParams, DeploymentPacing, DistributionSpeed, JCurveDepth, Timing, MAX_FUND_LIFE_YEARS};
pub use pipeline::{recompute, StudioEdit, StudioState};
pub use reconcile::{format_multiple, EditOutcome, MultipleEdit, MultipleTargets, Reconciler, MULTIPLE_TOLERANCE};
