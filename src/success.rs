use serde::Serialize;

use crate::reference::{ClusterDefinition, SuccessFactor};
use crate::swing::{MeasureField, SwingMeasurement};

/// Target band half-width as a share of the median.
const BAND_RATIO: f64 = 0.10;
/// The band never gets narrower than this share of the median.
const MIN_BAND_RATIO: f64 = 0.01;

/// One success factor compared against the swing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorComparison {
    pub feature: MeasureField,
    pub unit: &'static str,
    pub importance: f64,
    pub median: f64,
    pub actual: Option<f64>,
    pub delta: Option<f64>,
    pub band_min: f64,
    pub band_max: f64,
    pub within_band: bool,
}

/// `median ± max(|median| · 10%, |median| · 1%)`.
pub fn target_band(median: f64) -> (f64, f64) {
    let half = (median * BAND_RATIO).abs().max(median.abs() * MIN_BAND_RATIO);
    (median - half, median + half)
}

fn compare(factor: &SuccessFactor, swing: &SwingMeasurement) -> FactorComparison {
    let actual = swing.get(factor.feature);
    let (band_min, band_max) = target_band(factor.median);
    FactorComparison {
        feature: factor.feature,
        unit: factor.feature.unit(),
        importance: factor.importance,
        median: factor.median,
        actual,
        delta: actual.map(|a| a - factor.median),
        band_min,
        band_max,
        within_band: actual.is_some_and(|a| a >= band_min && a <= band_max),
    }
}

/// Success factors of a cluster, most important first.
///
/// `limit` keeps only the top entries.
pub fn compare_success_factors(
    cluster: &ClusterDefinition,
    swing: &SwingMeasurement,
    limit: Option<usize>,
) -> Vec<FactorComparison> {
    let mut rows: Vec<FactorComparison> = cluster
        .success_factors
        .iter()
        .map(|f| compare(f, swing))
        .collect();
    rows.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    if let Some(n) = limit {
        rows.truncate(n);
    }
    rows
}
