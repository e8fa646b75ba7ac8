//! Saved assumption sets and side-by-side comparison
//!
//! The store lives for the session only. Sets keep the parameters they were
//! saved from so that comparison rows are regenerated rather than cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::curve::generate_assumption_curve;
use super::params::{AssumptionParams, DeploymentPacing, DistributionSpeed, JCurveDepth, Timing};
use super::pipeline::StudioState;
use crate::fund::Strategy;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetStatus {
    #[default]
    Draft,
    InReview,
    Approved,
}

/// Where a saved set's numbers came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetSource {
    #[default]
    Studio,
    JCurveEditor,
    DocumentExtraction,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetMetadata {
    pub strategy: Strategy,
    pub vintage: i32,
    pub commitment: f64,
    pub updated_by: String,
    pub updated: DateTime<Utc>,
    pub status: SetStatus,
    pub source: SetSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssumptionSet {
    pub id: u32,
    pub name: String,

    // J-curve shape
    pub depth: JCurveDepth,
    pub breakeven: Timing,
    pub distribution_start: Timing,
    pub pacing: DeploymentPacing,
    pub distribution_speed: DistributionSpeed,

    /// Display strings, e.g. "2.20x"
    pub tvpi: String,
    pub dpi: String,
    pub rvpi: String,

    pub risks: Vec<String>,
    pub rationale: String,
    pub notes: String,
    pub metadata: SetMetadata,

    pub params: AssumptionParams,
}

/// Risk tags implied by a parameter choice
pub fn risk_descriptors(params: &AssumptionParams) -> Vec<String> {
    let mut risks = Vec::new();
    if params.depth == JCurveDepth::Deep {
        risks.push("Deep early NAV drawdown".to_string());
    }
    if params.distribution_start == Timing::Late || params.breakeven == Timing::Late {
        risks.push("Delayed liquidity".to_string());
    }
    if params.distribution_speed == DistributionSpeed::Slow {
        risks.push("Extended holding periods".to_string());
    }
    if params.pacing == DeploymentPacing::FrontLoaded {
        risks.push("Concentrated vintage exposure".to_string());
    }
    if params.targets.tvpi > 0.0 && params.targets.rvpi / params.targets.tvpi > 0.5 {
        risks.push("Returns weighted to unrealized value".to_string());
    }
    risks
}

/// One line of a side-by-side comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub id: u32,
    pub name: String,
    pub tvpi: String,
    pub dpi: String,
    pub rvpi: String,
    pub itd_irr: f64,
    pub peak_outflow: f64,
    pub breakeven_year: Option<usize>,
    pub total_distributions: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ComparisonStore {
    sets: Vec<AssumptionSet>,
    next_id: u32,
}

impl ComparisonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the studio state under `name` and return the new set's id
    pub fn save(
        &mut self,
        name: impl Into<String>,
        state: &StudioState,
        updated_by: impl Into<String>,
        source: SetSource,
        rationale: impl Into<String>,
    ) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        let params = state.params.clone();
        let (tvpi, dpi, rvpi) = params.targets.display();

        let set = AssumptionSet {
            id,
            name: name.into(),
            depth: params.depth,
            breakeven: params.breakeven,
            distribution_start: params.distribution_start,
            pacing: params.pacing,
            distribution_speed: params.distribution_speed,
            tvpi,
            dpi,
            rvpi,
            risks: risk_descriptors(&params),
            rationale: rationale.into(),
            notes: String::new(),
            metadata: SetMetadata {
                strategy: params.strategy,
                vintage: params.vintage,
                commitment: params.commitment,
                updated_by: updated_by.into(),
                updated: Utc::now(),
                status: SetStatus::Draft,
                source,
            },
            params,
        };
        log::debug!("saved assumption set {} '{}'", id, set.name);
        self.sets.push(set);
        id
    }

    pub fn list(&self) -> &[AssumptionSet] {
        &self.sets
    }

    pub fn get(&self, id: u32) -> Option<&AssumptionSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    pub fn remove(&mut self, id: u32) -> Option<AssumptionSet> {
        let pos = self.sets.iter().position(|s| s.id == id)?;
        Some(self.sets.remove(pos))
    }

    /// Update status and notes of a saved set; returns false for unknown ids
    pub fn annotate(&mut self, id: u32, status: SetStatus, notes: impl Into<String>) -> bool {
        match self.sets.iter_mut().find(|s| s.id == id) {
            Some(set) => {
                set.metadata.status = status;
                set.notes = notes.into();
                set.metadata.updated = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Comparison rows for `ids` in the order given; unknown ids are skipped
    pub fn compare(&self, ids: &[u32]) -> Vec<ComparisonRow> {
        ids.iter()
            .filter_map(|&id| self.get(id))
            .map(|set| {
                let summary = generate_assumption_curve(&set.params).summary;
                ComparisonRow {
                    id: set.id,
                    name: set.name.clone(),
                    tvpi: set.tvpi.clone(),
                    dpi: set.dpi.clone(),
                    rvpi: set.rvpi.clone(),
                    itd_irr: summary.itd_irr,
                    peak_outflow: summary.peak_outflow.value,
                    breakeven_year: summary.breakeven_index,
                    total_distributions: summary.total_distributions,
                }
            })
            .collect()
    }
}
