//! User-approved document extraction results used as override input
//!
//! Field values arrive from an external extraction step after a user has
//! approved them. Confidence scores and source pages travel with the values for
//! display but never influence a calculation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ForecastResult;
use crate::fund::{FundId, FundRegistry};
use crate::studio::MultipleTargets;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractedMetric {
    CapitalCalls,
    Distributions,
    Nav,
    Fees,
    Dpi,
    Tvpi,
    Irr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedField {
    pub metric: ExtractedMetric,
    pub value: f64,
    /// Opaque score from the extractor, 0..1
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub source_page: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub fund_name: Option<String>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    pub fields: Vec<ExtractedField>,
}

impl ExtractionResult {
    pub fn from_json_str(json: &str) -> ForecastResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// First finite value reported for `metric`
    pub fn value(&self, metric: ExtractedMetric) -> Option<f64> {
        self.fields
            .iter()
            .filter(|f| f.metric == metric)
            .map(|f| f.value)
            .find(|v| v.is_finite())
    }
}

impl FundRegistry {
    /// Apply an approved extraction to fund `id`.
    ///
    /// Only the NAV mark feeds the projection; returns whether anything changed.
    pub fn apply_extraction(&mut self, id: FundId, extraction: &ExtractionResult) -> ForecastResult<bool> {
        let fund = self.require(id)?;
        let Some(nav) = extraction.value(ExtractedMetric::Nav) else {
            log::debug!("extraction for fund {} carries no NAV", fund.id);
            return Ok(false);
        };
        self.set_latest_nav(id, nav)?;
        log::debug!("fund {} NAV set to {:.0} from extraction", id, nav);
        Ok(true)
    }
}

impl MultipleTargets {
    /// Targets from extracted TVPI and DPI, with RVPI as the remainder.
    ///
    /// Needs at least one of the two; a lone TVPI is split 70/30.
    pub fn from_extraction(extraction: &ExtractionResult) -> Option<MultipleTargets> {
        let tvpi = extraction.value(ExtractedMetric::Tvpi);
        let dpi = extraction.value(ExtractedMetric::Dpi);
        match (tvpi, dpi) {
            (Some(tvpi), Some(dpi)) => {
                let dpi = dpi.max(0.0).min(tvpi.max(0.0));
                Some(MultipleTargets::from_components(dpi, tvpi.max(0.0) - dpi))
            }
            (Some(tvpi), None) => {
                let zero = MultipleTargets::from_components(0.0, 0.0);
                Some(zero.reconciled(crate::studio::MultipleEdit::Tvpi(tvpi)))
            }
            (None, Some(dpi)) => Some(MultipleTargets::from_components(dpi, 0.0)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field(metric: ExtractedMetric, value: f64, confidence: f64) -> ExtractedField {
        ExtractedField {
            metric,
            value,
            confidence: Some(confidence),
            source_page: Some(3),
        }
    }

    #[test]
    fn test_nav_override_updates_registry() {
        let mut registry = FundRegistry::default_registry();
        let extraction = ExtractionResult {
            fields: vec![field(ExtractedMetric::Nav, 51_000_000.0, 0.42)],
            ..Default::default()
        };

        assert!(registry.apply_extraction(1, &extraction).unwrap());
        assert_eq!(registry.get(1).unwrap().latest_nav, Some(51_000_000.0));
    }

    #[test]
    fn test_unknown_fund_is_error() {
        let mut registry = FundRegistry::default_registry();
        assert!(registry.apply_extraction(77, &ExtractionResult::default()).is_err());
    }

    #[test]
    fn test_confidence_does_not_change_result() {
        let low = ExtractionResult {
            fields: vec![field(ExtractedMetric::Tvpi, 2.0, 0.1), field(ExtractedMetric::Dpi, 1.2, 0.1)],
            ..Default::default()
        };
        let high = ExtractionResult {
            fields: vec![field(ExtractedMetric::Tvpi, 2.0, 0.99), field(ExtractedMetric::Dpi, 1.2, 0.99)],
            ..Default::default()
        };
        let a = MultipleTargets::from_extraction(&low).unwrap();
        assert_eq!(Some(a), MultipleTargets::from_extraction(&high));
        assert_relative_eq!(a.rvpi, 0.8, epsilon = 1e-12);
        assert!(a.is_consistent());
    }

    #[test]
    fn test_lone_tvpi_split() {
        let extraction = ExtractionResult {
            fields: vec![field(ExtractedMetric::Tvpi, 1.0, 0.5)],
            ..Default::default()
        };
        let targets = MultipleTargets::from_extraction(&extraction).unwrap();
        assert_relative_eq!(targets.dpi, 0.7, epsilon = 1e-12);
        assert!(MultipleTargets::from_extraction(&ExtractionResult::default()).is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "fund_name": "Summit Buyout Partners IV",
            "as_of": "2024-06-30",
            "fields": [
                {"metric": "Nav", "value": 47000000.0, "confidence": 0.93, "source_page": 4},
                {"metric": "Fees", "value": 250000.0}
            ]
        }"#;
        let extraction = ExtractionResult::from_json_str(json).unwrap();
        assert_eq!(extraction.fields.len(), 2);
        assert_eq!(extraction.value(ExtractedMetric::Nav), Some(47_000_000.0));
        assert_eq!(extraction.value(ExtractedMetric::Irr), None);
    }
}
