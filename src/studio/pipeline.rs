//! Single-entry recompute for the assumption studio
//!
//! Every user edit goes through [`recompute`], which runs the stages in a fixed
//! order: strategy defaults, multiple reconciliation, curve generation and
//! summary. Each stage runs once per edit and the input state is never mutated.

use serde::{Deserialize, Serialize};

use super::allocation::StrategyAllocation;
use super::curve::{generate_assumption_curve, AssumptionCurve};
use super::params::{AssumptionParams, DeploymentPacing, DistributionSpeed, JCurveDepth, Timing, MAX_FUND_LIFE_YEARS};
use super::reconcile::{MultipleEdit, Reconciler};
use crate::assumptions::StrategyProfile;
use crate::fund::Strategy;
use crate::summary::SummaryOutputs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StudioEdit {
    /// Switch strategy and reset term and targets to its defaults
    SelectStrategy(Strategy),
    SetCommitment(f64),
    SetVintage(i32),
    SetInvestmentPeriod(u32),
    SetFundLife(u32),
    SetPacing(DeploymentPacing),
    SetDepth(JCurveDepth),
    SetBreakeven(Timing),
    SetDistributionStart(Timing),
    SetDistributionSpeed(DistributionSpeed),
    SetMultiple(MultipleEdit),
    SetAllocation(StrategyAllocation),
    ShowBenchmarks(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioState {
    pub params: AssumptionParams,

    /// Allocation as entered
    pub allocation: StrategyAllocation,

    /// Allocation rescaled to 100%
    pub normalized_allocation: StrategyAllocation,

    pub curve: AssumptionCurve,

    /// Non-blocking notices for the current inputs
    pub warnings: Vec<String>,
}

impl StudioState {
    pub fn new(params: AssumptionParams) -> Self {
        build(params, StrategyAllocation::default())
    }

    pub fn with_allocation(params: AssumptionParams, allocation: StrategyAllocation) -> Self {
        build(params, allocation)
    }

    pub fn summary(&self) -> &SummaryOutputs {
        &self.curve.summary
    }
}

impl Default for StudioState {
    fn default() -> Self {
        Self::new(AssumptionParams::default())
    }
}

/// Apply one edit and regenerate everything downstream of it
pub fn recompute(state: &StudioState, edit: StudioEdit) -> StudioState {
    let mut params = state.params.clone();
    let mut allocation = state.allocation.clone();

    match edit {
        StudioEdit::SelectStrategy(strategy) => apply_strategy_defaults(&mut params, strategy),
        StudioEdit::SetCommitment(v) => {
            if v.is_finite() {
                params.commitment = v.max(0.0);
            } else {
                log::warn!("ignoring non-finite commitment {}", v);
            }
        }
        StudioEdit::SetVintage(v) => params.vintage = v,
        StudioEdit::SetInvestmentPeriod(v) => params.investment_period = v,
        StudioEdit::SetFundLife(v) => params.fund_life = v,
        StudioEdit::SetPacing(v) => params.pacing = v,
        StudioEdit::SetDepth(v) => params.depth = v,
        StudioEdit::SetBreakeven(v) => params.breakeven = v,
        StudioEdit::SetDistributionStart(v) => params.distribution_start = v,
        StudioEdit::SetDistributionSpeed(v) => params.distribution_speed = v,
        StudioEdit::SetMultiple(multiple) => {
            let mut reconciler = Reconciler::new(params.targets);
            reconciler.apply(multiple);
            params.targets = reconciler.targets();
        }
        StudioEdit::SetAllocation(v) => allocation = v,
        StudioEdit::ShowBenchmarks(v) => params.include_benchmarks = v,
    }

    build(params, allocation)
}

fn apply_strategy_defaults(params: &mut AssumptionParams, strategy: Strategy) {
    let defaults = StrategyProfile::for_strategy(strategy).studio;
    params.strategy = strategy;
    params.investment_period = defaults.investment_period;
    params.fund_life = defaults.fund_life;

    let mut reconciler = Reconciler::new(params.targets);
    reconciler.apply(MultipleEdit::Dpi(defaults.dpi));
    reconciler.apply(MultipleEdit::Rvpi(defaults.rvpi));
    params.targets = reconciler.targets();
}

fn build(params: AssumptionParams, allocation: StrategyAllocation) -> StudioState {
    let mut warnings = Vec::new();

    if params.investment_period > params.fund_life {
        warnings.push(format!(
            "investment period of {} years exceeds fund life of {} years; calls capped at fund life",
            params.investment_period, params.fund_life
        ));
    }
    if params.fund_life > MAX_FUND_LIFE_YEARS {
        warnings.push(format!(
            "fund life of {} years exceeds the {}-year maximum; curve truncated",
            params.fund_life, MAX_FUND_LIFE_YEARS
        ));
    }
    if params.commitment <= 0.0 {
        warnings.push("commitment is zero; curve is empty".to_string());
    }

    let (normalized_allocation, allocation_warning) = if allocation.weights.is_empty() {
        (allocation.clone(), None)
    } else {
        allocation.normalized()
    };
    warnings.extend(allocation_warning);

    let curve = generate_assumption_curve(&params);

    StudioState {
        params,
        allocation,
        normalized_allocation,
        curve,
        warnings,
    }
}
