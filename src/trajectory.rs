//! D-plane ball-flight model with a Magnus-style side force.
//!
//! Coordinates are in yards: `x` lateral (+ left of the target line), `y`
//! height, `z` toward the target. The flight has no drag; the launch speed is
//! back-solved from the corrected carry with the vacuum range equation and the
//! curve comes from a constant lateral acceleration.

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::impact::{self, ImpactAdjustment, LaunchConditions};
use crate::swing::ClubType;

/// Standard gravity expressed in yards per second squared.
pub const GRAVITY_YD: f64 = 9.8 / 0.9144;

/// Smallest accepted integration step (s); keeps the point count bounded.
pub const MIN_DT: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectoryPoint {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TrajectoryPoint {
    pub const ORIGIN: TrajectoryPoint = TrajectoryPoint { t: 0.0, x: 0.0, y: 0.0, z: 0.0 };

    fn is_finite(&self) -> bool {
        self.t.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Tunables of the flight model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryConfig {
    /// yd/s²
    pub gravity: f64,
    /// Integration step (s).
    pub dt: f64,
    /// Launch speed cap (yd/s). 120 yd/s ≈ 246 mph.
    pub max_v0: f64,
    /// Share of the face angle in the start direction; the path gets the rest.
    pub face_weight: f64,
    /// Start direction limit (deg, either side).
    pub max_start_dir_deg: f64,
    /// Fraction of face-to-path that becomes spin-axis tilt.
    pub spin_axis_scale: f64,
    pub magnus_base: f64,
    /// Multiplier for strongly curving shots.
    pub magnus_boost: f64,
    /// |face − path| (deg) from which the boost applies.
    pub magnus_boost_threshold_deg: f64,
    /// Spin-axis tilt per cm of horizontal impact offset (drivers only).
    pub gear_effect_deg_per_cm: f64,
    /// Flight time after which integration gives up (s).
    pub max_flight_time: f64,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY_YD,
            dt: 0.02,
            max_v0: 120.0,
            face_weight: 0.75,
            max_start_dir_deg: 60.0,
            spin_axis_scale: 0.7,
            magnus_base: 0.005,
            magnus_boost: 1.4,
            magnus_boost_threshold_deg: 8.0,
            gear_effect_deg_per_cm: 3.0,
            max_flight_time: 20.0,
        }
    }
}

/// A computed flight and the launch parameters that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightPath {
    pub adjustment: ImpactAdjustment,
    pub launch_speed: f64,
    pub start_direction_deg: f64,
    pub spin_axis_deg: f64,
    pub side_acceleration: f64,
    pub points: Vec<TrajectoryPoint>,
}

impl FlightPath {
    pub fn landing(&self) -> &TrajectoryPoint {
        // construction guarantees at least three points
        &self.points[self.points.len() - 1]
    }

    pub fn apex(&self) -> f64 {
        self.points.iter().map(|p| p.y).fold(0.0, f64::max)
    }

    pub fn flight_time(&self) -> f64 {
        self.landing().t
    }
}

/// Launch speed for a vacuum carry: `v0 = sqrt(carry · g / sin 2θ)`.
///
/// Finite speeds above `max_v0` are clamped; a non-finite result is an error.
pub fn initial_velocity(carry_yd: f64, launch_deg: f64, config: &TrajectoryConfig) -> Result<f64> {
    let sin2 = (2.0 * launch_deg.to_radians()).sin();
    let v0 = (carry_yd * config.gravity / sin2).sqrt();

    if !v0.is_finite() {
        return Err(AnalysisError::degenerate(format!(
            "launch speed is not finite (carry {carry_yd} yd, launch {launch_deg}°)"
        )));
    }
    if v0 > config.max_v0 {
        log::warn!("[TRAJECTORY] v0 clamped: {:.1} -> {:.1} yd/s", v0, config.max_v0);
        return Ok(config.max_v0);
    }
    Ok(v0)
}

/// Horizontal start direction (deg): a face/path blend.
pub fn start_direction(face_deg: f64, path_deg: f64, config: &TrajectoryConfig) -> f64 {
    let blend = face_deg * config.face_weight + path_deg * (1.0 - config.face_weight);
    blend.clamp(-config.max_start_dir_deg, config.max_start_dir_deg)
}

/// Spin-axis tilt (deg, + curves right) from face-to-path and, for drivers,
/// gear effect: toe contact curves the ball left, heel contact right.
///
/// Same sign as the face and path angles, so an open face on an out-to-in
/// path starts right and keeps curving right.
pub fn spin_axis(cond: &LaunchConditions, launch_deg: f64, config: &TrajectoryConfig) -> f64 {
    let mut axis =
        config.spin_axis_scale * (cond.face_deg - cond.path_deg) * launch_deg.to_radians().cos();
    if cond.club == ClubType::Driver {
        if let Some(x) = cond.impact_x_cm.filter(|x| x.is_finite()) {
            axis -= config.gear_effect_deg_per_cm * x;
        }
    }
    axis
}

/// Correct the launch for the strike quality and integrate the flight.
pub fn simulate(cond: &LaunchConditions, config: &TrajectoryConfig) -> Result<FlightPath> {
    let adjustment = impact::correct(cond)?;
    integrate(cond, adjustment, config)
}

/// Explicit Euler integration from the origin until the ball comes back down.
pub fn integrate(
    cond: &LaunchConditions,
    adjustment: ImpactAdjustment,
    config: &TrajectoryConfig,
) -> Result<FlightPath> {
    cond.validate()?;
    if !adjustment.carry_yd.is_finite() || adjustment.carry_yd <= 0.0 {
        return Err(AnalysisError::invalid(
            "estimateCarry",
            format!("corrected carry must be positive, got {}", adjustment.carry_yd),
        ));
    }
    if !(config.dt.is_finite() && config.dt >= MIN_DT) {
        return Err(AnalysisError::invalid(
            "dt",
            format!("time step must be at least {MIN_DT} s, got {}", config.dt),
        ));
    }

    let launch_rad = adjustment.launch_deg.to_radians();
    let v0 = initial_velocity(adjustment.carry_yd, adjustment.launch_deg, config)?;

    let start_dir = start_direction(cond.face_deg, cond.path_deg, config);
    let start_rad = start_dir.to_radians();

    let v0h = v0 * launch_rad.cos();
    let mut vx = -v0h * start_rad.sin();
    let vz = v0h * start_rad.cos();
    let mut vy = v0 * launch_rad.sin();

    let tilt = cond.face_deg - cond.path_deg;
    let axis = spin_axis(cond, adjustment.launch_deg, config);
    let k_magnus = if tilt.abs() >= config.magnus_boost_threshold_deg {
        config.magnus_base * config.magnus_boost
    } else {
        config.magnus_base
    };
    let a_side = k_magnus * v0 * v0 * axis.to_radians().sin();

    log::debug!(
        "[TRAJECTORY] launch {:.1}° v0 {:.1} yd/s dir {:.1}° axis {:.2}° side {:.3} yd/s²",
        adjustment.launch_deg,
        v0,
        start_dir,
        axis,
        a_side
    );

    let dt = config.dt;
    let max_steps = (config.max_flight_time / dt).ceil() as usize;
    let mut points = Vec::with_capacity(256);
    points.push(TrajectoryPoint::ORIGIN);

    let mut airborne = false;
    let mut landed = false;
    for step in 1..=max_steps {
        // a_side is rightward, +x is left
        vx -= a_side * dt;
        vy -= config.gravity * dt;

        let last = points[points.len() - 1];
        let next = TrajectoryPoint {
            t: step as f64 * dt,
            x: last.x + vx * dt,
            y: (last.y + vy * dt).max(0.0),
            z: last.z + vz * dt,
        };
        if !next.is_finite() {
            return Err(AnalysisError::degenerate(format!(
                "non-finite position at t={:.2}s",
                next.t
            )));
        }
        points.push(next);

        if next.y > 0.0 {
            airborne = true;
        } else {
            landed = true;
            break;
        }
    }

    if !airborne {
        return Err(AnalysisError::degenerate("ball never left the ground"));
    }
    if !landed {
        return Err(AnalysisError::degenerate(format!(
            "ball still in flight after {:.1}s",
            config.max_flight_time
        )));
    }
    if points.len() < 3 {
        return Err(AnalysisError::degenerate(format!(
            "trajectory collapsed to {} points",
            points.len()
        )));
    }

    Ok(FlightPath {
        adjustment,
        launch_speed: v0,
        start_direction_deg: start_dir,
        spin_axis_deg: axis,
        side_acceleration: a_side,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impact::StrikeCondition;

    fn conditions(carry: f64, face: f64, path: f64) -> LaunchConditions {
        LaunchConditions {
            carry_yd: carry,
            attack_deg: 3.0,
            face_deg: face,
            path_deg: path,
            club: ClubType::Driver,
            loft_deg: Some(-6.0),
            impact_x_cm: None,
            impact_y_cm: None,
        }
    }

    fn clean(launch_deg: f64, carry_yd: f64) -> ImpactAdjustment {
        ImpactAdjustment { launch_deg, carry_yd, condition: StrikeCondition::Clean }
    }

    #[test]
    fn straight_shot_lands_near_carry() {
        let config = TrajectoryConfig::default();
        let flight = simulate(&conditions(220.0, 0.0, 0.0), &config).unwrap();

        let first = flight.points[0];
        assert_eq!(first, TrajectoryPoint::ORIGIN);

        let landing = flight.landing();
        assert_eq!(landing.y, 0.0);
        assert!(landing.x.abs() < 1e-9);
        // Euler with dt = 0.02 stays within a few yards of the vacuum range
        assert!((landing.z - 220.0).abs() < 6.0, "landed at {}", landing.z);
        assert!(flight.apex() > 5.0);
    }

    #[test]
    fn heights_non_negative_and_time_increasing() {
        let config = TrajectoryConfig::default();
        for carry in [5.0, 60.0, 150.0, 300.0, 450.0] {
            for (face, path) in [(0.0, 0.0), (6.0, -4.0), (-15.0, 10.0), (40.0, -40.0)] {
                let flight = simulate(&conditions(carry, face, path), &config).unwrap();
                assert!(flight.points.len() >= 3);
                assert!(flight.points.iter().all(|p| p.y >= 0.0));
                assert!(flight.points.windows(2).all(|w| w[1].t > w[0].t));
            }
        }
    }

    #[test]
    fn negative_carry_is_invalid_input() {
        let err = simulate(&conditions(-5.0, 0.0, 0.0), &TrajectoryConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput { field: "estimateCarry", .. }));
    }

    #[test]
    fn rejects_non_finite_angles_and_huge_carry() {
        let config = TrajectoryConfig::default();
        assert!(matches!(
            simulate(&conditions(200.0, f64::NAN, 0.0), &config),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            simulate(&conditions(200.0, 0.0, f64::INFINITY), &config),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            simulate(&conditions(500.0, 0.0, 0.0), &config),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn launch_speed_grows_with_carry_until_cap() {
        let config = TrajectoryConfig::default();
        let mut previous = 0.0;
        let mut reached_cap = false;
        for carry in (1..=450).map(f64::from) {
            let v0 = initial_velocity(carry, 4.0, &config).unwrap();
            assert!(v0 <= config.max_v0);
            if reached_cap {
                assert_eq!(v0, config.max_v0);
            } else {
                assert!(v0 > previous, "carry {carry}: {v0} <= {previous}");
            }
            reached_cap = v0 == config.max_v0;
            previous = v0;
        }
        assert!(reached_cap);
    }

    #[test]
    fn range_equation_value() {
        let config = TrajectoryConfig::default();
        let v0 = initial_velocity(200.0, 15.0, &config).unwrap();
        // sin(30°) = 0.5
        assert!((v0 - (200.0 * GRAVITY_YD / 0.5).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn non_finite_speed_is_degenerate() {
        let config = TrajectoryConfig::default();
        assert!(matches!(
            initial_velocity(200.0, 0.0, &config),
            Err(AnalysisError::DegenerateResult { .. })
        ));
    }

    #[test]
    fn tiny_carry_never_leaves_the_ground() {
        let config = TrajectoryConfig::default();
        let err = integrate(&conditions(0.05, 0.0, 0.0), clean(2.0, 0.05), &config).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateResult { .. }));
    }

    #[test]
    fn start_direction_blends_face_and_path() {
        let config = TrajectoryConfig::default();
        assert!((start_direction(4.0, -4.0, &config) - 2.0).abs() < 1e-12);
        assert_eq!(start_direction(200.0, 0.0, &config), 60.0);

        let iron_blend = TrajectoryConfig { face_weight: 0.85, ..config };
        assert!((start_direction(10.0, 0.0, &iron_blend) - 8.5).abs() < 1e-12);
    }

    #[test]
    fn face_to_path_curves_the_ball() {
        let config = TrajectoryConfig::default();
        let straight = integrate(&conditions(200.0, 0.0, 0.0), clean(14.0, 200.0), &config).unwrap();
        let curved = integrate(&conditions(200.0, 3.0, -3.0), clean(14.0, 200.0), &config).unwrap();
        let boosted = integrate(&conditions(200.0, 4.0, -4.0), clean(14.0, 200.0), &config).unwrap();

        assert_eq!(straight.side_acceleration, 0.0);
        assert!(curved.side_acceleration > 0.0);
        assert!(curved.landing().x < straight.landing().x);
        // |face - path| = 8 crosses the boost threshold
        let ratio = boosted.side_acceleration / curved.side_acceleration;
        assert!(ratio > 1.4 * 1.3 && ratio < 1.4 * 1.4, "ratio {ratio}");
    }

    #[test]
    fn gear_effect_only_for_drivers() {
        let config = TrajectoryConfig::default();
        let mut toe = conditions(200.0, 0.0, 0.0);
        toe.impact_x_cm = Some(1.0);
        assert!((spin_axis(&toe, 10.0, &config) + 3.0).abs() < 1e-12);

        let heel = LaunchConditions { impact_x_cm: Some(-1.0), ..toe };
        assert!(spin_axis(&heel, 10.0, &config) > 0.0);

        // toe contact draws the ball left of where it started
        let toe_flight = integrate(&toe, clean(14.0, 200.0), &config).unwrap();
        assert!(toe_flight.landing().x > 0.0);

        let iron = LaunchConditions { club: ClubType::Iron, ..toe };
        assert_eq!(spin_axis(&iron, 10.0, &config), 0.0);
    }

    #[test]
    fn open_face_out_to_in_path_slices_right() {
        let config = TrajectoryConfig::default();
        let flight = simulate(&conditions(200.0, 6.0, -4.0), &config).unwrap();

        assert!(flight.start_direction_deg > 0.0);
        assert!(flight.spin_axis_deg > 0.0);
        // right of the target line from the first step and further right at landing
        assert!(flight.points[1].x < 0.0);
        assert!(flight.landing().x < flight.points[flight.points.len() / 2].x);
        assert!(flight.landing().x < 0.0);
    }

    #[test]
    fn closed_face_in_to_out_path_hooks_left() {
        let config = TrajectoryConfig::default();
        let flight = simulate(&conditions(200.0, -6.0, 4.0), &config).unwrap();
        assert!(flight.spin_axis_deg < 0.0);
        assert!(flight.landing().x > 0.0);
    }

    #[test]
    fn rejects_vanishing_time_step() {
        let cond = conditions(200.0, 0.0, 0.0);
        for dt in [0.0, 1e-12, MIN_DT / 2.0, f64::NAN] {
            let config = TrajectoryConfig { dt, ..Default::default() };
            assert!(
                matches!(simulate(&cond, &config), Err(AnalysisError::InvalidInput { field: "dt", .. })),
                "dt {dt}"
            );
        }
        let config = TrajectoryConfig { dt: MIN_DT, ..Default::default() };
        assert!(simulate(&cond, &config).is_ok());
    }

    #[test]
    fn deterministic() {
        let config = TrajectoryConfig::default();
        let cond = conditions(240.0, 2.5, -1.5);
        assert_eq!(simulate(&cond, &config).unwrap(), simulate(&cond, &config).unwrap());
    }
}
