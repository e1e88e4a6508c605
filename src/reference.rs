//! Static reference tables: cluster thresholds, six-axis anchors and
//! success-swing baselines.
//!
//! Loaded once and passed by reference into the classifier and scorers.
//! Nothing here is mutated after [`ReferenceData::validate`] succeeds.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::UNKNOWN_CLUSTER;
use crate::error::{AnalysisError, Result};
use crate::face_model::{FaceBaseline, FaceModelCoefficients};
use crate::six_axis::SixAxisStats;
use crate::swing::{ClubType, MeasureField};

const BUILTIN_REFERENCE: &str = include_str!("../data/reference.json");

/// Inclusive `[min, max]` range. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

impl From<[f64; 2]> for ValueRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<ValueRange> for [f64; 2] {
    fn from(range: ValueRange) -> Self {
        [range.min, range.max]
    }
}

/// A feature that distinguishes successful swings within a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessFactor {
    pub feature: MeasureField,
    /// Share of the success model explained by this feature (0-1).
    pub importance: f64,
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDefinition {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    pub club_type: ClubType,
    pub ranges: BTreeMap<MeasureField, ValueRange>,
    #[serde(default)]
    pub success_factors: Vec<SuccessFactor>,
    /// Cluster-specific success baseline; the club-level one is used when absent.
    #[serde(default)]
    pub face_baseline: Option<FaceBaseline>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubBaselines {
    #[serde(rename = "D", default)]
    pub driver: Option<FaceBaseline>,
    #[serde(rename = "I", default)]
    pub iron: Option<FaceBaseline>,
}

impl ClubBaselines {
    pub fn for_club(&self, club: ClubType) -> Option<&FaceBaseline> {
        match club {
            ClubType::Driver => self.driver.as_ref(),
            ClubType::Iron => self.iron.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceData {
    pub clusters: Vec<ClusterDefinition>,
    #[serde(default)]
    pub six_axis: SixAxisStats,
    #[serde(default)]
    pub baselines: ClubBaselines,
    #[serde(default)]
    pub face_model: FaceModelCoefficients,
}

impl ReferenceData {
    /// Tables compiled into the binary from `data/reference.json`.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_REFERENCE)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| AnalysisError::ReferenceIo {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("[REFERENCE] Loading tables from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let data: ReferenceData = serde_json::from_str(text)?;
        data.validate()?;
        log::debug!(
            "[REFERENCE] {} clusters, {} driver axes, {} iron axes",
            data.clusters.len(),
            data.six_axis.driver.len(),
            data.six_axis.iron.len()
        );
        Ok(data)
    }

    /// Reject tables the classifier could silently misread.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for cluster in &self.clusters {
            if cluster.id == UNKNOWN_CLUSTER {
                return Err(AnalysisError::InvalidReference(format!(
                    "cluster '{}' uses the reserved id {}",
                    cluster.name, UNKNOWN_CLUSTER
                )));
            }
            if !seen.insert(cluster.id) {
                return Err(AnalysisError::InvalidReference(format!(
                    "duplicate cluster id {}",
                    cluster.id
                )));
            }
            // An empty range set would match every swing exactly
            if cluster.ranges.is_empty() {
                return Err(AnalysisError::InvalidReference(format!(
                    "cluster {} ('{}') has no feature ranges",
                    cluster.id, cluster.name
                )));
            }
            for (field, range) in &cluster.ranges {
                if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
                    return Err(AnalysisError::InvalidReference(format!(
                        "cluster {} has an invalid range for {}: [{}, {}]",
                        cluster.id,
                        field.key(),
                        range.min,
                        range.max
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn cluster(&self, id: i32) -> Option<&ClusterDefinition> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Success baseline for a swing: the cluster's own if it has one,
    /// otherwise the club-level baseline.
    pub fn face_baseline(&self, cluster_id: i32, club: ClubType) -> Option<&FaceBaseline> {
        self.cluster(cluster_id)
            .and_then(|c| c.face_baseline.as_ref())
            .or_else(|| self.baselines.for_club(club))
    }
}
