//! Fund reference data, registry and CSV loading

mod data;
pub mod loader;
mod registry;

pub use data::{Fund, FundId, Region, Strategy, DEFAULT_NAV_FRACTION};
pub use loader::{load_funds, load_funds_from_reader};
pub use registry::{FundRegistry, NewFund};
