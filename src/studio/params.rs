//! What-if parameters for the assumption studio

use serde::{Deserialize, Serialize};

use super::reconcile::MultipleTargets;
use crate::assumptions::StrategyProfile;
use crate::fund::Strategy;

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// How capital deployment is weighted across the investment period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentPacing {
    FrontLoaded,
    #[default]
    Balanced,
    BackLoaded,
}

impl DeploymentPacing {
    pub fn from_name(name: &str) -> Self {
        match normalize(name).as_str() {
            "frontloaded" | "front" | "fast" => DeploymentPacing::FrontLoaded,
            "balanced" | "even" | "base" => DeploymentPacing::Balanced,
            "backloaded" | "back" | "slow" => DeploymentPacing::BackLoaded,
            _ => {
                log::warn!("unknown deployment pacing '{}', using Balanced", name);
                DeploymentPacing::Balanced
            }
        }
    }

    /// Share of commitment expected to be called over the fund's life
    pub fn target_call_pct(&self) -> f64 {
        match self {
            DeploymentPacing::FrontLoaded => 0.88,
            DeploymentPacing::Balanced => 0.86,
            DeploymentPacing::BackLoaded => 0.84,
        }
    }

    /// Weight of `year` (0-based) within an investment period of `investment_period` years.
    /// Weights average to 1 across the period.
    pub fn multiplier(&self, year: u32, investment_period: u32) -> f64 {
        let position = if investment_period <= 1 {
            0.5
        } else {
            year as f64 / (investment_period - 1) as f64
        };
        match self {
            DeploymentPacing::FrontLoaded => 1.4 - 0.8 * position,
            DeploymentPacing::Balanced => 1.0,
            DeploymentPacing::BackLoaded => 0.6 + 0.8 * position,
        }
    }
}

/// Depth of the early J-curve dip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JCurveDepth {
    Shallow,
    #[default]
    Moderate,
    Deep,
}

impl JCurveDepth {
    pub fn from_name(name: &str) -> Self {
        match normalize(name).as_str() {
            "shallow" | "mild" => JCurveDepth::Shallow,
            "moderate" | "medium" | "base" => JCurveDepth::Moderate,
            "deep" | "severe" => JCurveDepth::Deep,
            _ => {
                log::warn!("unknown J-curve depth '{}', using Moderate", name);
                JCurveDepth::Moderate
            }
        }
    }

    /// Annual NAV markdown during the first two years
    pub fn depth_factor(&self) -> f64 {
        match self {
            JCurveDepth::Shallow => 0.03,
            JCurveDepth::Moderate => 0.06,
            JCurveDepth::Deep => 0.10,
        }
    }

    /// IRR at the bottom of the curve
    pub fn bottom_irr(&self) -> f64 {
        match self {
            JCurveDepth::Shallow => -0.08,
            JCurveDepth::Moderate => -0.15,
            JCurveDepth::Deep => -0.25,
        }
    }
}

/// Early / on-plan / late shift used for breakeven and distribution start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timing {
    Early,
    #[default]
    Base,
    Late,
}

impl Timing {
    pub fn from_name(name: &str) -> Self {
        match normalize(name).as_str() {
            "early" | "earlier" => Timing::Early,
            "base" | "onplan" | "normal" | "expected" => Timing::Base,
            "late" | "later" | "delayed" => Timing::Late,
            _ => {
                log::warn!("unknown timing '{}', using Base", name);
                Timing::Base
            }
        }
    }

    pub fn adjustment(&self) -> i32 {
        match self {
            Timing::Early => -1,
            Timing::Base => 0,
            Timing::Late => 1,
        }
    }
}

/// Pace at which NAV is returned once distributions start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionSpeed {
    Slow,
    #[default]
    Moderate,
    Fast,
}

impl DistributionSpeed {
    pub fn from_name(name: &str) -> Self {
        match normalize(name).as_str() {
            "slow" => DistributionSpeed::Slow,
            "moderate" | "medium" | "base" => DistributionSpeed::Moderate,
            "fast" | "quick" => DistributionSpeed::Fast,
            _ => {
                log::warn!("unknown distribution speed '{}', using Moderate", name);
                DistributionSpeed::Moderate
            }
        }
    }

    /// Share of NAV distributed per year
    pub fn rate(&self) -> f64 {
        match self {
            DistributionSpeed::Slow => 0.15,
            DistributionSpeed::Moderate => 0.22,
            DistributionSpeed::Fast => 0.30,
        }
    }
}

/// Longest fund life a curve is generated for
pub const MAX_FUND_LIFE_YEARS: u32 = 50;

/// Full parameter set for one what-if curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionParams {
    pub commitment: f64,
    pub investment_period: u32,
    pub fund_life: u32,
    pub strategy: Strategy,
    pub vintage: i32,
    pub pacing: DeploymentPacing,
    pub depth: JCurveDepth,
    pub breakeven: Timing,
    pub distribution_start: Timing,
    pub distribution_speed: DistributionSpeed,
    pub targets: MultipleTargets,
    /// Attach decorative benchmark IRR curves to the series
    #[serde(default)]
    pub include_benchmarks: bool,
}

impl AssumptionParams {
    /// Parameters seeded from a strategy's studio defaults
    pub fn for_strategy(strategy: Strategy, commitment: f64, vintage: i32) -> Self {
        let defaults = StrategyProfile::for_strategy(strategy).studio;
        Self {
            commitment,
            investment_period: defaults.investment_period,
            fund_life: defaults.fund_life,
            strategy,
            vintage,
            pacing: DeploymentPacing::default(),
            depth: JCurveDepth::default(),
            breakeven: Timing::default(),
            distribution_start: Timing::default(),
            distribution_speed: DistributionSpeed::default(),
            targets: MultipleTargets::from_components(defaults.dpi, defaults.rvpi),
            include_benchmarks: false,
        }
    }

    /// Fund life the curve actually spans
    pub fn curve_life(&self) -> u32 {
        self.fund_life.min(MAX_FUND_LIFE_YEARS)
    }

    /// First year in which distributions are paid
    pub fn distribution_start_year(&self) -> u32 {
        (6 + self.breakeven.adjustment() + self.distribution_start.adjustment()).max(3) as u32
    }
}

impl Default for AssumptionParams {
    fn default() -> Self {
        Self::for_strategy(Strategy::BuyoutGrowth, 100.0, 2024)
    }
}
