//! Load fund registries from CSV

use super::{Fund, Region, Strategy};
use crate::error::{ForecastError, ForecastResult};
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the fund registry export columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "FundID")]
    fund_id: u32,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Strategy")]
    strategy: String,
    #[serde(rename = "Region")]
    region: String,
    #[serde(rename = "Vintage")]
    vintage: i32,
    #[serde(rename = "Commitment")]
    commitment: f64,
    #[serde(rename = "InvestmentPeriod")]
    investment_period: u32,
    #[serde(rename = "FundLife")]
    fund_life: u32,
    #[serde(rename = "LatestNAV", default)]
    latest_nav: Option<f64>,
}

impl CsvRow {
    fn to_fund(self) -> ForecastResult<Fund> {
        if !self.commitment.is_finite() || self.commitment < 0.0 {
            return Err(ForecastError::InvalidField {
                field: format!("Commitment (fund {})", self.fund_id),
                value: self.commitment.to_string(),
            });
        }

        let mut fund = Fund::new(
            self.fund_id,
            self.name,
            Strategy::from_name(&self.strategy),
            Region::from_name(&self.region),
            self.vintage,
            self.commitment,
            self.investment_period,
            self.fund_life,
        );
        if let Some(nav) = self.latest_nav {
            fund = fund.with_latest_nav(nav);
        }
        Ok(fund)
    }
}

/// Load all funds from a CSV file
pub fn load_funds<P: AsRef<Path>>(path: P) -> ForecastResult<Vec<Fund>> {
    let reader = Reader::from_path(path)?;
    read_funds(reader)
}

/// Load funds from any reader (e.g., string buffer, uploaded file)
pub fn load_funds_from_reader<R: std::io::Read>(reader: R) -> ForecastResult<Vec<Fund>> {
    read_funds(Reader::from_reader(reader))
}

fn read_funds<R: std::io::Read>(mut reader: Reader<R>) -> ForecastResult<Vec<Fund>> {
    let mut funds = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        funds.push(row.to_fund()?);
    }

    log::debug!("loaded {} funds", funds.len());
    Ok(funds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
FundID,Name,Strategy,Region,Vintage,Commitment,InvestmentPeriod,FundLife,LatestNAV
1,Atlas Buyout IV,Buyout/Growth PE,North America,2019,50000000,5,10,41000000
2,Northwind Ventures II,Venture Capital,Europe,2021,20000000,4,12,
3,Mystery Fund,Crypto,Mars,2022,10000000,3,8,
";

    #[test]
    fn test_load_funds_from_reader() {
        let funds = load_funds_from_reader(SAMPLE.as_bytes()).expect("Failed to load funds");
        assert_eq!(funds.len(), 3);

        assert_eq!(funds[0].id, 1);
        assert_eq!(funds[0].strategy, Strategy::BuyoutGrowth);
        assert_eq!(funds[0].latest_nav, Some(41_000_000.0));

        assert_eq!(funds[1].strategy, Strategy::VentureCapital);
        assert_eq!(funds[1].region, Region::Europe);
        assert_eq!(funds[1].latest_nav, None);

        // Unknown labels fall back rather than failing the load
        assert_eq!(funds[2].strategy, Strategy::Other);
        assert_eq!(funds[2].region, Region::Other);
    }

    #[test]
    fn test_negative_commitment_rejected() {
        let csv = "\
FundID,Name,Strategy,Region,Vintage,Commitment,InvestmentPeriod,FundLife,LatestNAV
9,Bad Fund,PE,Global,2020,-5,5,10,
";
        let err = load_funds_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidField { .. }));
    }
}
