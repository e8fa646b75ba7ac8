//! Strategy-specific timing thresholds and NAV growth curves

use crate::fund::Strategy;

/// Fixed timing and growth profile for a strategy class.
/// Ages are in quarters since the vintage start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyProfile {
    /// Distributions begin once age exceeds this
    pub dist_start_age: i32,
    /// End of the elevated growth phase
    pub nav_peak_age: i32,
    /// Quarterly growth rate during the active phase
    pub early_growth: f64,
    /// Quarterly growth rate after tapering
    pub late_growth: f64,
    /// Defaults loaded into the assumption studio when this strategy is selected
    pub studio: StudioDefaults,
}

/// Strategy defaults for the what-if studio (years and target multiples)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudioDefaults {
    pub investment_period: u32,
    pub fund_life: u32,
    pub dpi: f64,
    pub rvpi: f64,
}

impl StrategyProfile {
    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::BuyoutGrowth => Self {
                dist_start_age: 12,
                nav_peak_age: 20,
                early_growth: 0.035,
                late_growth: 0.010,
                studio: StudioDefaults { investment_period: 5, fund_life: 10, dpi: 1.4, rvpi: 0.5 },
            },
            Strategy::VentureCapital => Self {
                dist_start_age: 20,
                nav_peak_age: 28,
                early_growth: 0.045,
                late_growth: 0.008,
                studio: StudioDefaults { investment_period: 4, fund_life: 12, dpi: 1.6, rvpi: 0.9 },
            },
            Strategy::Infrastructure => Self {
                dist_start_age: 8,
                nav_peak_age: 24,
                early_growth: 0.020,
                late_growth: 0.012,
                studio: StudioDefaults { investment_period: 5, fund_life: 15, dpi: 1.1, rvpi: 0.5 },
            },
            Strategy::Secondaries => Self {
                dist_start_age: 4,
                nav_peak_age: 12,
                early_growth: 0.030,
                late_growth: 0.010,
                studio: StudioDefaults { investment_period: 3, fund_life: 8, dpi: 1.3, rvpi: 0.3 },
            },
            Strategy::Other => Self {
                dist_start_age: 12,
                nav_peak_age: 20,
                early_growth: 0.025,
                late_growth: 0.010,
                studio: StudioDefaults { investment_period: 5, fund_life: 10, dpi: 1.2, rvpi: 0.4 },
            },
        }
    }

    /// Quarterly NAV growth rate at `age`.
    ///
    /// Zero before the fund starts. The early rate, scaled by `nav_growth_factor`,
    /// applies up to the NAV-peak age; afterwards it tapers linearly to the late
    /// rate over `taper_quarters`. The factor never touches the taper or late phase.
    pub fn growth_rate(&self, age: i32, nav_growth_factor: f64, taper_quarters: u32) -> f64 {
        if age < 0 {
            return 0.0;
        }
        if age <= self.nav_peak_age {
            return self.early_growth * nav_growth_factor;
        }

        let since_peak = (age - self.nav_peak_age) as f64;
        let remaining = if taper_quarters == 0 {
            0.0
        } else {
            (1.0 - since_peak / taper_quarters as f64).max(0.0)
        };
        self.late_growth + (self.early_growth - self.late_growth) * remaining
    }

    pub fn distributes_at(&self, age: i32) -> bool {
        age > self.dist_start_age
    }
}
