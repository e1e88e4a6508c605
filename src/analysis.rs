//! End-to-end analysis of one swing.
//!
//! Classification, scoring and face attribution degrade gracefully when a
//! swing or the reference tables are incomplete. The flight does not: an
//! invalid trajectory fails the whole analysis so nothing corrupt is shown.

use serde::Serialize;

use crate::bounce::{self, BounceConfig};
use crate::classify::{classify, Classification};
use crate::error::Result;
use crate::face_model::{
    compute_baseline_deltas, compute_cumulative_contributions, measured_phase_waterfall,
    predict_face_angle, FacePhases, FaceWaterfall, MeasuredStep, PhaseDelta,
};
use crate::impact::LaunchConditions;
use crate::reference::ReferenceData;
use crate::six_axis::AxisScore;
use crate::success::{compare_success_factors, FactorComparison};
use crate::swing::{ClubType, MeasureField, SwingMeasurement};
use crate::trajectory::{self, FlightPath, TrajectoryConfig, TrajectoryPoint};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub id: i32,
    pub name: String,
    pub overview: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceAttribution {
    pub predicted_face_angle: f64,
    pub actual_face_angle: f64,
    pub baseline_deltas: Vec<PhaseDelta>,
    pub waterfall: FaceWaterfall,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingReport {
    pub analyzed_at: chrono::DateTime<chrono::Utc>,
    pub swing_date: Option<chrono::NaiveDate>,
    pub club_type: ClubType,
    pub classification: Classification,
    pub cluster: Option<ClusterSummary>,
    pub six_axis: Vec<AxisScore>,
    pub face: Option<FaceAttribution>,
    pub measured_waterfall: Option<Vec<MeasuredStep>>,
    pub success_factors: Vec<FactorComparison>,
    pub flight: FlightPath,
    /// Flight plus bounce-and-roll, when enabled.
    pub full_path: Option<Vec<TrajectoryPoint>>,
}

impl SwingReport {
    /// The point sequence the renderer should draw.
    pub fn render_points(&self) -> &[TrajectoryPoint] {
        self.full_path.as_deref().unwrap_or(&self.flight.points)
    }
}

/// Analysis options beyond the reference tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    pub trajectory: TrajectoryConfig,
    pub bounce: Option<BounceConfig>,
    /// Success factors kept in the report.
    pub max_success_factors: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            trajectory: TrajectoryConfig::default(),
            bounce: None,
            max_success_factors: Some(3),
        }
    }
}

pub struct SwingAnalyzer {
    reference: ReferenceData,
    config: AnalyzerConfig,
}

impl SwingAnalyzer {
    pub fn new(reference: ReferenceData, config: AnalyzerConfig) -> Self {
        Self { reference, config }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, swing: &SwingMeasurement) -> Result<SwingReport> {
        let classification = classify(swing, &self.reference.clusters);
        let cluster_id = classification.cluster_id();
        let cluster = self.reference.cluster(cluster_id);

        log::info!(
            "[CLUSTER] {} -> {}",
            swing.club_type.code(),
            cluster
                .map(|c| format!("#{} {}", c.id, c.name))
                .unwrap_or_else(|| "unknown".to_string())
        );

        let six_axis = self.reference.six_axis.score_all(swing);
        let face = self.face_attribution(swing, cluster_id);
        let measured_waterfall = match measured_phase_waterfall(swing) {
            Ok(steps) => Some(steps),
            Err(e) => {
                log::debug!("[FACE] Measured waterfall unavailable: {}", e);
                None
            }
        };

        let success_factors = match cluster {
            Some(c) => compare_success_factors(c, swing, self.config.max_success_factors),
            None => {
                log::warn!("[SUCCESS] No success factors for cluster {}", cluster_id);
                Vec::new()
            }
        };

        let conditions = LaunchConditions::from_measurement(swing)?;
        let flight = trajectory::simulate(&conditions, &self.config.trajectory)?;
        log::info!(
            "[TRAJECTORY] {:?}: launch {:.1}°, carry {:.1} yd, apex {:.1} yd, {} points",
            flight.adjustment.condition,
            flight.adjustment.launch_deg,
            flight.adjustment.carry_yd,
            flight.apex(),
            flight.points.len()
        );

        let full_path = match &self.config.bounce {
            Some(bounce_config) => Some(bounce::extend_with_bounce_and_roll(
                &flight.points,
                flight.adjustment.carry_yd,
                conditions.attack_deg,
                bounce_config,
            )?),
            None => None,
        };

        Ok(SwingReport {
            analyzed_at: chrono::Utc::now(),
            swing_date: swing.swing_date,
            club_type: swing.club_type,
            classification,
            cluster: cluster.map(|c| ClusterSummary {
                id: c.id,
                name: c.name.clone(),
                overview: c.overview.clone(),
            }),
            six_axis,
            face,
            measured_waterfall,
            success_factors,
            flight,
            full_path,
        })
    }

    fn face_attribution(&self, swing: &SwingMeasurement, cluster_id: i32) -> Option<FaceAttribution> {
        let phases = match FacePhases::from_measurement(swing) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[FACE] Skipping attribution: {}", e);
                return None;
            }
        };
        let Some(actual) = swing.get(MeasureField::ImpactFaceAngle) else {
            log::warn!("[FACE] Skipping attribution: impact face angle missing");
            return None;
        };
        let Some(baseline) = self.reference.face_baseline(cluster_id, swing.club_type) else {
            log::warn!(
                "[FACE] No success baseline for cluster {} ({})",
                cluster_id,
                swing.club_type.code()
            );
            return None;
        };

        let coef = &self.reference.face_model;
        Some(FaceAttribution {
            predicted_face_angle: predict_face_angle(coef, &phases),
            actual_face_angle: actual,
            baseline_deltas: compute_baseline_deltas(coef, &phases, &baseline.phases),
            waterfall: compute_cumulative_contributions(coef, &phases, actual, baseline),
        })
    }
}
