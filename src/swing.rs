use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Two-valued club grouping used by every reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum ClubType {
    #[default]
    #[serde(rename = "D")]
    Driver,
    #[serde(rename = "I")]
    Iron,
}

impl ClubType {
    /// Normalize a raw club label from the sensor.
    ///
    /// Woods 1W-5W, utilities and hybrids fly like drivers; irons, wedges and
    /// anything unrecognised fall into the iron group. An empty label is
    /// treated as a driver.
    pub fn from_label(raw: &str) -> Self {
        let label = raw.trim().to_uppercase();
        if label.is_empty() {
            return ClubType::Driver;
        }

        let is_wood = label.len() == 2
            && label.ends_with('W')
            && matches!(label.as_bytes()[0], b'1'..=b'5');
        if is_wood || label.ends_with("UT") || label.ends_with("HY") {
            return ClubType::Driver;
        }

        // Already-normalized short codes
        if label == "D" {
            return ClubType::Driver;
        }

        ClubType::Iron
    }

    pub fn code(&self) -> &'static str {
        match self {
            ClubType::Driver => "D",
            ClubType::Iron => "I",
        }
    }
}

impl From<String> for ClubType {
    fn from(raw: String) -> Self {
        ClubType::from_label(&raw)
    }
}

/// Every numeric field of a [`SwingMeasurement`], keyed by its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureField {
    EstimateCarry,
    ImpactHeadSpeed,
    ImpactGripSpeed,
    ImpactFaceAngle,
    ImpactAttackAngle,
    ImpactLoftAngle,
    ImpactClubPath,
    ImpactRelativeFaceAngle,
    ImpactPointX,
    ImpactPointY,
    AddressHandFirst,
    AddressLieAngle,
    HalfwaybackFaceAngleToVertical,
    TopFaceAngleToHorizontal,
    HalfwaydownFaceAngleToVertical,
    DownSwingShaftRotationMax,
    DownSwingShaftRotationMin,
    ImpactHandFirst,
    ImpactLieAngle,
}

impl MeasureField {
    pub fn key(&self) -> &'static str {
        match self {
            MeasureField::EstimateCarry => "estimateCarry",
            MeasureField::ImpactHeadSpeed => "impactHeadSpeed",
            MeasureField::ImpactGripSpeed => "impactGripSpeed",
            MeasureField::ImpactFaceAngle => "impactFaceAngle",
            MeasureField::ImpactAttackAngle => "impactAttackAngle",
            MeasureField::ImpactLoftAngle => "impactLoftAngle",
            MeasureField::ImpactClubPath => "impactClubPath",
            MeasureField::ImpactRelativeFaceAngle => "impactRelativeFaceAngle",
            MeasureField::ImpactPointX => "impactPointX",
            MeasureField::ImpactPointY => "impactPointY",
            MeasureField::AddressHandFirst => "addressHandFirst",
            MeasureField::AddressLieAngle => "addressLieAngle",
            MeasureField::HalfwaybackFaceAngleToVertical => "halfwaybackFaceAngleToVertical",
            MeasureField::TopFaceAngleToHorizontal => "topFaceAngleToHorizontal",
            MeasureField::HalfwaydownFaceAngleToVertical => "halfwaydownFaceAngleToVertical",
            MeasureField::DownSwingShaftRotationMax => "downSwingShaftRotationMax",
            MeasureField::DownSwingShaftRotationMin => "downSwingShaftRotationMin",
            MeasureField::ImpactHandFirst => "impactHandFirst",
            MeasureField::ImpactLieAngle => "impactLieAngle",
        }
    }

    /// Display unit used in reports.
    pub fn unit(&self) -> &'static str {
        match self {
            MeasureField::EstimateCarry => "yd",
            MeasureField::ImpactHeadSpeed | MeasureField::ImpactGripSpeed => "m/s",
            MeasureField::ImpactPointX | MeasureField::ImpactPointY => "cm",
            MeasureField::DownSwingShaftRotationMax | MeasureField::DownSwingShaftRotationMin => {
                "deg/s"
            }
            MeasureField::AddressHandFirst => "",
            _ => "°",
        }
    }
}

/// One swing as captured by the measurement source.
///
/// All numeric fields are optional because the sensor drops values on
/// partial captures. NaN is read back as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwingMeasurement {
    #[serde(default)]
    pub club_type: ClubType,
    #[serde(default)]
    pub swing_date: Option<chrono::NaiveDate>,

    pub estimate_carry: Option<f64>,       // yards
    pub impact_head_speed: Option<f64>,    // m/s
    pub impact_grip_speed: Option<f64>,    // m/s
    pub impact_face_angle: Option<f64>,    // deg
    pub impact_attack_angle: Option<f64>,  // deg, + ascending
    pub impact_loft_angle: Option<f64>,    // deg
    pub impact_club_path: Option<f64>,     // deg
    pub impact_relative_face_angle: Option<f64>, // face-to-path, deg
    pub impact_point_x: Option<f64>,       // cm, + toe
    pub impact_point_y: Option<f64>,       // cm, + high on the face

    pub address_hand_first: Option<f64>,
    pub address_lie_angle: Option<f64>,
    pub halfwayback_face_angle_to_vertical: Option<f64>,
    pub top_face_angle_to_horizontal: Option<f64>,
    pub halfwaydown_face_angle_to_vertical: Option<f64>,
    pub down_swing_shaft_rotation_max: Option<f64>,
    pub down_swing_shaft_rotation_min: Option<f64>,
    pub impact_hand_first: Option<f64>,
    pub impact_lie_angle: Option<f64>,
}

impl SwingMeasurement {
    /// Value of a field, or `None` when missing or NaN.
    pub fn get(&self, field: MeasureField) -> Option<f64> {
        let raw = match field {
            MeasureField::EstimateCarry => self.estimate_carry,
            MeasureField::ImpactHeadSpeed => self.impact_head_speed,
            MeasureField::ImpactGripSpeed => self.impact_grip_speed,
            MeasureField::ImpactFaceAngle => self.impact_face_angle,
            MeasureField::ImpactAttackAngle => self.impact_attack_angle,
            MeasureField::ImpactLoftAngle => self.impact_loft_angle,
            MeasureField::ImpactClubPath => self.impact_club_path,
            MeasureField::ImpactRelativeFaceAngle => self.impact_relative_face_angle,
            MeasureField::ImpactPointX => self.impact_point_x,
            MeasureField::ImpactPointY => self.impact_point_y,
            MeasureField::AddressHandFirst => self.address_hand_first,
            MeasureField::AddressLieAngle => self.address_lie_angle,
            MeasureField::HalfwaybackFaceAngleToVertical => self.halfwayback_face_angle_to_vertical,
            MeasureField::TopFaceAngleToHorizontal => self.top_face_angle_to_horizontal,
            MeasureField::HalfwaydownFaceAngleToVertical => self.halfwaydown_face_angle_to_vertical,
            MeasureField::DownSwingShaftRotationMax => self.down_swing_shaft_rotation_max,
            MeasureField::DownSwingShaftRotationMin => self.down_swing_shaft_rotation_min,
            MeasureField::ImpactHandFirst => self.impact_hand_first,
            MeasureField::ImpactLieAngle => self.impact_lie_angle,
        };
        raw.filter(|v| !v.is_nan())
    }

    /// Like [`get`](Self::get) but fails with `MissingField`.
    pub fn require(&self, field: MeasureField) -> Result<f64> {
        self.get(field)
            .ok_or(AnalysisError::MissingField { field: field.key() })
    }

    /// Face rotation from the top of the swing to halfway down.
    pub fn closure_angle(&self) -> Option<f64> {
        Some(
            self.get(MeasureField::TopFaceAngleToHorizontal)?
                - self.get(MeasureField::HalfwaydownFaceAngleToVertical)?,
        )
    }

    /// Shaft rotation range during the downswing (max - min).
    pub fn shaft_rotation_delta(&self) -> Option<f64> {
        Some(
            self.get(MeasureField::DownSwingShaftRotationMax)?
                - self.get(MeasureField::DownSwingShaftRotationMin)?,
        )
    }

    /// Lie angle change from address to impact.
    pub fn lie_delta(&self) -> Option<f64> {
        Some(self.get(MeasureField::ImpactLieAngle)? - self.get(MeasureField::AddressLieAngle)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn club_labels_normalize() {
        assert_eq!(ClubType::from_label("1W"), ClubType::Driver);
        assert_eq!(ClubType::from_label(" 3w "), ClubType::Driver);
        assert_eq!(ClubType::from_label("5W"), ClubType::Driver);
        assert_eq!(ClubType::from_label("4UT"), ClubType::Driver);
        assert_eq!(ClubType::from_label("HY"), ClubType::Driver);
        assert_eq!(ClubType::from_label(""), ClubType::Driver);
        assert_eq!(ClubType::from_label("7W"), ClubType::Iron);
        assert_eq!(ClubType::from_label("7I"), ClubType::Iron);
        assert_eq!(ClubType::from_label("PW"), ClubType::Iron);
        assert_eq!(ClubType::from_label("PT"), ClubType::Iron);
    }

    #[test]
    fn deserializes_camel_case_with_gaps() {
        let json = r#"{
            "clubType": "1W",
            "swingDate": "2025-05-13",
            "estimateCarry": 220.0,
            "impactFaceAngle": 1.2,
            "topFaceAngleToHorizontal": 40.0,
            "halfwaydownFaceAngleToVertical": 12.5
        }"#;
        let swing: SwingMeasurement = serde_json::from_str(json).unwrap();
        assert_eq!(swing.club_type, ClubType::Driver);
        assert_eq!(swing.get(MeasureField::EstimateCarry), Some(220.0));
        assert_eq!(swing.get(MeasureField::ImpactHeadSpeed), None);
        assert_eq!(swing.closure_angle(), Some(27.5));
        assert_eq!(swing.lie_delta(), None);
        assert_eq!(
            swing.swing_date,
            chrono::NaiveDate::from_ymd_opt(2025, 5, 13)
        );
    }

    #[test]
    fn missing_club_type_defaults_to_driver() {
        let swing: SwingMeasurement = serde_json::from_str("{}").unwrap();
        assert_eq!(swing.club_type, ClubType::Driver);
    }

    #[test]
    fn nan_reads_as_missing() {
        let swing = SwingMeasurement {
            impact_face_angle: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(swing.get(MeasureField::ImpactFaceAngle), None);
        assert!(matches!(
            swing.require(MeasureField::ImpactFaceAngle),
            Err(AnalysisError::MissingField { field: "impactFaceAngle" })
        ));
    }

    #[test]
    fn field_keys_match_wire_names() {
        let json = serde_json::to_string(&MeasureField::HalfwaydownFaceAngleToVertical).unwrap();
        assert_eq!(json, format!("\"{}\"", MeasureField::HalfwaydownFaceAngleToVertical.key()));
    }
}
