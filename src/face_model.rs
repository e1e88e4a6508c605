//! Linear attribution of the impact face angle to swing phases.
//!
//! The model is a fixed-coefficient regression:
//!
//! ```text
//! FA ≈ intercept + c_closure·closure + c_sr·srΔ + c_hd·HD + c_hf·handFirst + c_lie·lieΔ
//! ```
//!
//! It is used only for the *shape* of the waterfall. The last cumulative point
//! is always the real measured (or baseline-recorded) face angle.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::swing::{MeasureField, SwingMeasurement};

/// Regression coefficients, in degrees of face angle per unit of input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FaceModelCoefficients {
    pub intercept: f64,
    pub closure: f64,
    pub shaft_rotation: f64,
    pub halfway_down: f64,
    pub hand_first: f64,
    pub lie_delta: f64,
}

impl Default for FaceModelCoefficients {
    fn default() -> Self {
        // MAE ≈ 3.96°, R² ≈ 0.742 on successful driver and iron swings
        Self {
            intercept: 1.5413,
            closure: 0.0069,
            shaft_rotation: -0.0021,
            halfway_down: 0.13,
            hand_first: -0.6471,
            lie_delta: 0.4352,
        }
    }
}

impl FaceModelCoefficients {
    fn for_phase(&self, phase: FacePhase) -> f64 {
        match phase {
            FacePhase::Address => 0.0,
            FacePhase::Closure => self.closure,
            FacePhase::ShaftRotation => self.shaft_rotation,
            FacePhase::HalfwayDown => self.halfway_down,
            FacePhase::HandFirst => self.hand_first,
            FacePhase::LieDelta => self.lie_delta,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FacePhase {
    Address,
    Closure,
    ShaftRotation,
    HalfwayDown,
    HandFirst,
    LieDelta,
}

impl FacePhase {
    /// Waterfall order.
    pub const ORDER: [FacePhase; 6] = [
        FacePhase::Address,
        FacePhase::Closure,
        FacePhase::ShaftRotation,
        FacePhase::HalfwayDown,
        FacePhase::HandFirst,
        FacePhase::LieDelta,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FacePhase::Address => "Address",
            FacePhase::Closure => "Closure",
            FacePhase::ShaftRotation => "SRΔ",
            FacePhase::HalfwayDown => "HD",
            FacePhase::HandFirst => "HandFirst",
            FacePhase::LieDelta => "LieΔ",
        }
    }
}

/// The five derived quantities the model consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacePhases {
    pub closure_angle: f64,
    pub shaft_rotation_delta: f64,
    pub halfway_down_face: f64,
    pub hand_first: f64,
    pub lie_delta: f64,
}

impl FacePhases {
    pub fn from_measurement(swing: &SwingMeasurement) -> Result<Self> {
        let top = swing.require(MeasureField::TopFaceAngleToHorizontal)?;
        let hd = swing.require(MeasureField::HalfwaydownFaceAngleToVertical)?;
        let sr_max = swing.require(MeasureField::DownSwingShaftRotationMax)?;
        let sr_min = swing.require(MeasureField::DownSwingShaftRotationMin)?;
        let hand_first = swing.require(MeasureField::ImpactHandFirst)?;
        let lie_impact = swing.require(MeasureField::ImpactLieAngle)?;
        let lie_address = swing.require(MeasureField::AddressLieAngle)?;

        Ok(Self {
            closure_angle: top - hd,
            shaft_rotation_delta: sr_max - sr_min,
            halfway_down_face: hd,
            hand_first,
            lie_delta: lie_impact - lie_address,
        })
    }

    fn value(&self, phase: FacePhase) -> f64 {
        match phase {
            FacePhase::Address => 0.0,
            FacePhase::Closure => self.closure_angle,
            FacePhase::ShaftRotation => self.shaft_rotation_delta,
            FacePhase::HalfwayDown => self.halfway_down_face,
            FacePhase::HandFirst => self.hand_first,
            FacePhase::LieDelta => self.lie_delta,
        }
    }
}

/// Success-swing medians for the phase inputs plus the recorded face angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceBaseline {
    #[serde(flatten)]
    pub phases: FacePhases,
    pub impact_face_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseDelta {
    pub phase: FacePhase,
    pub delta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceAngleContribution {
    pub phase: FacePhase,
    pub delta: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceWaterfall {
    pub yours: Vec<FaceAngleContribution>,
    pub model: Vec<FaceAngleContribution>,
}

/// Differential bars: how far each phase pushes the face compared with the
/// success baseline, `c · (yours − baseline)`.
pub fn compute_baseline_deltas(
    coef: &FaceModelCoefficients,
    yours: &FacePhases,
    baseline: &FacePhases,
) -> Vec<PhaseDelta> {
    FacePhase::ORDER
        .iter()
        .map(|&phase| PhaseDelta {
            phase,
            delta: coef.for_phase(phase) * (yours.value(phase) - baseline.value(phase)),
        })
        .collect()
}

/// Cumulative lines for the swing and the success model.
///
/// Both start at the intercept and end exactly at their ground-truth face
/// angle.
pub fn compute_cumulative_contributions(
    coef: &FaceModelCoefficients,
    yours: &FacePhases,
    actual_face_angle: f64,
    baseline: &FaceBaseline,
) -> FaceWaterfall {
    FaceWaterfall {
        yours: cumulative_line(coef, yours, actual_face_angle),
        model: cumulative_line(coef, &baseline.phases, baseline.impact_face_angle),
    }
}

fn cumulative_line(
    coef: &FaceModelCoefficients,
    phases: &FacePhases,
    ground_truth: f64,
) -> Vec<FaceAngleContribution> {
    let mut cumulative = coef.intercept;
    let mut line: Vec<FaceAngleContribution> = FacePhase::ORDER
        .iter()
        .map(|&phase| {
            let delta = coef.for_phase(phase) * phases.value(phase);
            cumulative += delta;
            FaceAngleContribution { phase, delta, cumulative }
        })
        .collect();

    if let Some(last) = line.last_mut() {
        last.cumulative = ground_truth;
    }
    line
}

/// Regression estimate of the impact face angle.
pub fn predict_face_angle(coef: &FaceModelCoefficients, phases: &FacePhases) -> f64 {
    FacePhase::ORDER
        .iter()
        .fold(coef.intercept, |acc, &phase| {
            acc + coef.for_phase(phase) * phases.value(phase)
        })
}

/// Measured face-angle checkpoints, in swing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MeasuredPhase {
    Address,
    HalfwayBack,
    Top,
    HalfwayDown,
    Path,
    Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MeasuredStep {
    pub phase: MeasuredPhase,
    pub delta: f64,
    pub cumulative: f64,
}

/// Coefficient-free waterfall of the measured phase face angles.
///
/// Missing checkpoints inherit the previous one (halfway-back defaults to 0),
/// so the corresponding step is flat. The impact step absorbs whatever the
/// path and halfway-down angles do not explain, so the last cumulative value
/// is the measured impact face angle.
pub fn measured_phase_waterfall(swing: &SwingMeasurement) -> Result<Vec<MeasuredStep>> {
    let face = swing.require(MeasureField::ImpactFaceAngle)?;
    let path = swing.require(MeasureField::ImpactClubPath)?;

    let hb = swing
        .get(MeasureField::HalfwaybackFaceAngleToVertical)
        .unwrap_or(0.0);
    let top = swing.get(MeasureField::TopFaceAngleToHorizontal).unwrap_or(hb);
    let hd = swing
        .get(MeasureField::HalfwaydownFaceAngleToVertical)
        .unwrap_or(top);

    let deltas = [
        (MeasuredPhase::Address, 0.0),
        (MeasuredPhase::HalfwayBack, hb),
        (MeasuredPhase::Top, top - hb),
        (MeasuredPhase::HalfwayDown, hd - top),
        (MeasuredPhase::Path, path),
        (MeasuredPhase::Impact, face - (hd + path)),
    ];

    let mut cumulative = 0.0;
    let mut steps: Vec<MeasuredStep> = deltas
        .iter()
        .map(|&(phase, delta)| {
            cumulative += delta;
            MeasuredStep { phase, delta, cumulative }
        })
        .collect();
    // Summation drift must not leak into the endpoint.
    if let Some(last) = steps.last_mut() {
        last.cumulative = face;
    }
    Ok(steps)
}
