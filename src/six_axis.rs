use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::swing::{ClubType, MeasureField, SwingMeasurement};

/// Score given to an axis that has no reference entry.
pub const NEUTRAL_SCORE: f64 = 50.0;
/// Score assigned to a value equal to the successful-swing anchor.
pub const ANCHOR_SCORE: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SixAxis {
    #[serde(rename = "halfwaybackFaceAngleToVertical")]
    HalfwayBackFace,
    #[serde(rename = "halfwaydownFaceAngleToVertical")]
    HalfwayDownFace,
    #[serde(rename = "impactHandFirst")]
    HandFirst,
    #[serde(rename = "LieDelta")]
    LieDelta,
    #[serde(rename = "SRDelta")]
    ShaftRotationDelta,
    #[serde(rename = "ClosureAngle")]
    ClosureAngle,
}

impl SixAxis {
    pub const ALL: [SixAxis; 6] = [
        SixAxis::HalfwayBackFace,
        SixAxis::HalfwayDownFace,
        SixAxis::HandFirst,
        SixAxis::LieDelta,
        SixAxis::ShaftRotationDelta,
        SixAxis::ClosureAngle,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SixAxis::HalfwayBackFace => "Halfway-back face",
            SixAxis::HalfwayDownFace => "Halfway-down face",
            SixAxis::HandFirst => "Hand first",
            SixAxis::LieDelta => "Lie delta",
            SixAxis::ShaftRotationDelta => "Shaft rotation",
            SixAxis::ClosureAngle => "Closure angle",
        }
    }

    /// Raw axis value derived from a measurement, if its inputs are present.
    pub fn value_of(&self, swing: &SwingMeasurement) -> Option<f64> {
        match self {
            SixAxis::HalfwayBackFace => swing.get(MeasureField::HalfwaybackFaceAngleToVertical),
            SixAxis::HalfwayDownFace => swing.get(MeasureField::HalfwaydownFaceAngleToVertical),
            SixAxis::HandFirst => swing.get(MeasureField::ImpactHandFirst),
            SixAxis::LieDelta => swing.lie_delta(),
            SixAxis::ShaftRotationDelta => swing.shaft_rotation_delta(),
            SixAxis::ClosureAngle => swing.closure_angle(),
        }
    }
}

/// Reference point for one axis: `mu80` maps to a score of 80.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisStat {
    pub mu80: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SixAxisStats {
    #[serde(default)]
    pub driver: HashMap<SixAxis, AxisStat>,
    #[serde(default)]
    pub iron: HashMap<SixAxis, AxisStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisScore {
    pub axis: SixAxis,
    pub value: f64,
    pub score: f64,
}

impl SixAxisStats {
    pub fn stat(&self, axis: SixAxis, club: ClubType) -> Option<&AxisStat> {
        match club {
            ClubType::Driver => self.driver.get(&axis),
            ClubType::Iron => self.iron.get(&axis),
        }
    }

    /// Deviation score in `[0, 100]`, rounded to one decimal.
    pub fn score(&self, axis: SixAxis, value: f64, club: ClubType) -> f64 {
        let Some(stat) = self.stat(axis, club) else {
            log::warn!(
                "[SIX-AXIS] No reference for {:?} ({}), using neutral score",
                axis,
                club.code()
            );
            return NEUTRAL_SCORE;
        };

        if value.is_nan() || !stat.sigma.is_finite() || stat.sigma <= 0.0 || !stat.mu80.is_finite()
        {
            log::warn!(
                "[SIX-AXIS] Unusable input for {:?}: value={}, mu80={}, sigma={}",
                axis,
                value,
                stat.mu80,
                stat.sigma
            );
            return NEUTRAL_SCORE;
        }

        let score = ANCHOR_SCORE + 10.0 * (value - stat.mu80) / stat.sigma;
        let score = score.clamp(0.0, 100.0);
        (score * 10.0).round() / 10.0
    }

    /// Score every axis whose inputs are present on the swing.
    pub fn score_all(&self, swing: &SwingMeasurement) -> Vec<AxisScore> {
        SixAxis::ALL
            .iter()
            .filter_map(|&axis| {
                let Some(value) = axis.value_of(swing) else {
                    log::debug!("[SIX-AXIS] {:?} unavailable on this swing", axis);
                    return None;
                };
                Some(AxisScore {
                    axis,
                    value,
                    score: self.score(axis, value, swing.club_type),
                })
            })
            .collect()
    }
}
