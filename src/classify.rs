use serde::Serialize;

use crate::reference::ClusterDefinition;
use crate::swing::SwingMeasurement;

/// Cluster id reported when no definition could be evaluated.
pub const UNKNOWN_CLUSTER: i32 = -1;

/// Outcome of matching a swing against the cluster table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "match", rename_all = "camelCase")]
pub enum Classification {
    /// Every feature fell inside the cluster's ranges.
    Exact { id: i32 },
    /// Best partial match: most features in range, then smallest summed
    /// distance from the range midpoints.
    Nearest { id: i32, in_range: usize, distance: f64 },
    /// No cluster had all of its features present.
    Unknown,
}

impl Classification {
    pub fn cluster_id(&self) -> i32 {
        match *self {
            Classification::Exact { id } | Classification::Nearest { id, .. } => id,
            Classification::Unknown => UNKNOWN_CLUSTER,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Classification::Exact { .. })
    }
}

/// Map a swing to a cluster.
///
/// The first definition whose every range contains the swing wins outright.
/// A definition with a missing feature is skipped entirely. Distances are
/// summed in raw units without normalization.
pub fn classify(swing: &SwingMeasurement, clusters: &[ClusterDefinition]) -> Classification {
    let mut best: Option<(i32, usize, f64)> = None;

    'clusters: for cluster in clusters {
        let mut inside = 0usize;
        let mut distance = 0.0;

        for (field, range) in &cluster.ranges {
            let Some(value) = swing.get(*field) else {
                log::trace!(
                    "[CLUSTER] Skipping cluster {}: {} missing",
                    cluster.id,
                    field.key()
                );
                continue 'clusters;
            };
            if range.contains(value) {
                inside += 1;
            }
            distance += (value - range.midpoint()).abs();
        }

        if inside == cluster.ranges.len() {
            log::debug!("[CLUSTER] Exact match: cluster {} ({})", cluster.id, cluster.name);
            return Classification::Exact { id: cluster.id };
        }

        let better = match best {
            None => true,
            Some((_, best_inside, best_distance)) => {
                inside > best_inside || (inside == best_inside && distance < best_distance)
            }
        };
        if better {
            best = Some((cluster.id, inside, distance));
        }
    }

    match best {
        Some((id, in_range, distance)) => {
            log::debug!(
                "[CLUSTER] Nearest match: cluster {} ({} features in range, distance {:.2})",
                id,
                in_range,
                distance
            );
            Classification::Nearest { id, in_range, distance }
        }
        None => {
            log::debug!("[CLUSTER] No cluster could be evaluated");
            Classification::Unknown
        }
    }
}
