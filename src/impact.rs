//! Launch-condition correction for mishits.
//!
//! The sensor reports an estimated carry that assumes a clean strike. Contact
//! low on the face, a heavy downward strike or a high-face flyer change the
//! launch window, so the launch angle and carry are adjusted before the flight
//! is integrated.

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::swing::{ClubType, MeasureField, SwingMeasurement};

/// Impact point at or below this height (cm) counts as a low strike.
pub const TOP_THRESHOLD_CM: f64 = -1.63;
/// Impact point at or above this height (cm) counts as a high-face strike.
pub const FLUSH_THRESHOLD_CM: f64 = 2.17;
/// Attack angle at or below this (deg) is a heavy downward strike.
pub const DUFF_ATTACK_DEG: f64 = -7.0;
/// A duff needs contact above this height (cm); lower contact is a thin strike.
const DUFF_MIN_IMPACT_CM: f64 = -0.5;

pub const MIN_LAUNCH_DEG: f64 = 2.0;
pub const MAX_LAUNCH_DEG: f64 = 45.0;
pub const MAX_CARRY_YD: f64 = 450.0;

const DRIVER_DEFAULT_LAUNCH_DEG: f64 = 12.0;
const IRON_DEFAULT_LAUNCH_DEG: f64 = 20.0;

/// Everything the flight model needs from one swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConditions {
    pub carry_yd: f64,
    pub attack_deg: f64,
    pub face_deg: f64,
    pub path_deg: f64,
    pub club: ClubType,
    pub loft_deg: Option<f64>,
    /// Horizontal impact offset (cm, + toe).
    pub impact_x_cm: Option<f64>,
    /// Vertical impact offset (cm, + high).
    pub impact_y_cm: Option<f64>,
}

impl LaunchConditions {
    pub fn from_measurement(swing: &SwingMeasurement) -> Result<Self> {
        Ok(Self {
            carry_yd: swing.require(MeasureField::EstimateCarry)?,
            attack_deg: swing.require(MeasureField::ImpactAttackAngle)?,
            face_deg: swing.require(MeasureField::ImpactFaceAngle)?,
            path_deg: swing.require(MeasureField::ImpactClubPath)?,
            club: swing.club_type,
            loft_deg: swing.get(MeasureField::ImpactLoftAngle),
            impact_x_cm: swing.get(MeasureField::ImpactPointX),
            impact_y_cm: swing.get(MeasureField::ImpactPointY),
        })
    }

    /// Reject inputs that would produce a meaningless flight.
    pub fn validate(&self) -> Result<()> {
        if !self.carry_yd.is_finite() || self.carry_yd <= 0.0 {
            return Err(AnalysisError::invalid(
                "estimateCarry",
                format!("carry must be a positive number, got {}", self.carry_yd),
            ));
        }
        if self.carry_yd > MAX_CARRY_YD {
            return Err(AnalysisError::invalid(
                "estimateCarry",
                format!("carry {:.1} yd exceeds {:.0} yd", self.carry_yd, MAX_CARRY_YD),
            ));
        }
        for (field, value) in [
            ("impactAttackAngle", self.attack_deg),
            ("impactFaceAngle", self.face_deg),
            ("impactClubPath", self.path_deg),
        ] {
            if !value.is_finite() {
                return Err(AnalysisError::invalid(field, format!("angle is not finite: {value}")));
            }
        }
        Ok(())
    }

    /// Loft, when the sensor reported a usable one.
    fn valid_loft(&self) -> Option<f64> {
        self.loft_deg.filter(|l| l.is_finite())
    }
}

/// Which correction rule fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrikeCondition {
    Clean,
    /// Very low loft reading on a long driver carry: treated as a line drive.
    LowLineDriver,
    /// Ascending blow caught low on the face.
    Top,
    /// Slightly ascending blow caught low on the face.
    ThinTop,
    /// Steep descending blow with the ground taken first.
    Duff,
    /// Contact high on the face.
    Flyer,
}

impl StrikeCondition {
    fn launch_delta(&self) -> f64 {
        match self {
            StrikeCondition::Top => -5.0,
            StrikeCondition::ThinTop => -4.0,
            StrikeCondition::Duff => -2.0,
            StrikeCondition::Flyer => 3.0,
            StrikeCondition::Clean | StrikeCondition::LowLineDriver => 0.0,
        }
    }

    fn carry_factor(&self) -> f64 {
        match self {
            StrikeCondition::Top => 0.90,
            StrikeCondition::ThinTop => 0.95,
            StrikeCondition::Duff => 0.70,
            StrikeCondition::Flyer => 1.05,
            StrikeCondition::Clean | StrikeCondition::LowLineDriver => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactAdjustment {
    pub launch_deg: f64,
    pub carry_yd: f64,
    pub condition: StrikeCondition,
}

/// Launch angle before any mishit correction.
///
/// Dynamic loft plus 20° when the sensor has it, a club default otherwise,
/// then flattened by 30% with 40% of the attack angle mixed in.
pub fn base_launch_angle(cond: &LaunchConditions) -> f64 {
    let launch = match cond.valid_loft() {
        Some(loft) => loft + 20.0,
        None => match cond.club {
            ClubType::Driver => DRIVER_DEFAULT_LAUNCH_DEG,
            ClubType::Iron => IRON_DEFAULT_LAUNCH_DEG,
        },
    };
    launch * 0.7 + cond.attack_deg * 0.4
}

/// Classify the strike from attack angle and impact height.
///
/// Rules are checked in order and the first match wins. Without an impact
/// height only the low-line driver rule can apply.
pub fn strike_condition(cond: &LaunchConditions) -> StrikeCondition {
    let low_line = cond.club == ClubType::Driver
        && cond.valid_loft().is_some_and(|loft| loft <= -20.0)
        && cond.carry_yd >= 180.0;
    if low_line {
        return StrikeCondition::LowLineDriver;
    }

    let Some(y) = cond.impact_y_cm.filter(|y| y.is_finite()) else {
        return StrikeCondition::Clean;
    };

    if cond.attack_deg >= 5.0 && y <= TOP_THRESHOLD_CM {
        StrikeCondition::Top
    } else if cond.attack_deg > 0.0 && y <= TOP_THRESHOLD_CM {
        StrikeCondition::ThinTop
    } else if cond.attack_deg <= DUFF_ATTACK_DEG && y > DUFF_MIN_IMPACT_CM {
        StrikeCondition::Duff
    } else if y >= FLUSH_THRESHOLD_CM {
        StrikeCondition::Flyer
    } else {
        StrikeCondition::Clean
    }
}

/// Adjusted launch angle and carry for the flight model.
pub fn correct(cond: &LaunchConditions) -> Result<ImpactAdjustment> {
    cond.validate()?;

    let condition = strike_condition(cond);
    let (launch, carry) = match condition {
        StrikeCondition::LowLineDriver => {
            log::warn!(
                "[IMPACT] Low-line driver correction: loft={:?}, carry={:.1}",
                cond.loft_deg,
                cond.carry_yd
            );
            (8.0, (cond.carry_yd * 0.6).min(140.0))
        }
        other => (
            base_launch_angle(cond) + other.launch_delta(),
            cond.carry_yd * other.carry_factor(),
        ),
    };

    let launch_deg = launch.clamp(MIN_LAUNCH_DEG, MAX_LAUNCH_DEG);
    if condition != StrikeCondition::Clean {
        log::debug!(
            "[IMPACT] {:?}: launch {:.1}° carry {:.1} yd (raw carry {:.1})",
            condition,
            launch_deg,
            carry,
            cond.carry_yd
        );
    }

    Ok(ImpactAdjustment { launch_deg, carry_yd: carry, condition })
}
