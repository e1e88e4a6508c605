//! Two bounces and a roll appended to a finished flight.
//!
//! Ground travel follows the flight's terminal tangent projected onto the
//! ground plane. Bounce and roll distances are fixed fractions of carry and
//! together add at most 15% of carry.

use crate::error::{AnalysisError, Result};
use crate::trajectory::TrajectoryPoint;

const EXTRA_RATIO: f64 = 0.15;
const HEIGHT_RATIO: f64 = 0.25;
const FIRST_BOUNCE_RATIO: f64 = 0.06;
const SECOND_BOUNCE_RATIO: f64 = 0.04;
/// Floor for the first bounce when the attack angle is flat or descending.
pub const MIN_BOUNCE_HEIGHT: f64 = 0.3;

const FIRST_BOUNCE_SEGMENTS: usize = 20;
const SECOND_BOUNCE_SEGMENTS: usize = 15;
const ROLL_SEGMENTS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceConfig {
    /// Time between synthesized points (s).
    pub dt: f64,
}

impl Default for BounceConfig {
    fn default() -> Self {
        Self { dt: 0.02 }
    }
}

/// First bounce height: `tan(attack) · carry · 0.25`, floored at 0.3.
pub fn first_bounce_height(attack_deg: f64, carry_yd: f64) -> f64 {
    let h = attack_deg.to_radians().tan() * carry_yd * HEIGHT_RATIO;
    if h.is_finite() {
        h.max(MIN_BOUNCE_HEIGHT)
    } else {
        MIN_BOUNCE_HEIGHT
    }
}

/// Unit ground direction `(x, z)` of the flight's final segment.
///
/// Falls back to straight down the target line when the last segment has no
/// horizontal component.
pub fn terminal_direction(flight: &[TrajectoryPoint]) -> (f64, f64) {
    let [.., before, last] = flight else {
        return (0.0, 1.0);
    };
    let dx = last.x - before.x;
    let dz = last.z - before.z;
    let len = dx.hypot(dz);
    if len > f64::EPSILON && len.is_finite() {
        (dx / len, dz / len)
    } else {
        (0.0, 1.0)
    }
}

/// Flight points followed by the bounce-and-roll tail.
pub fn extend_with_bounce_and_roll(
    flight: &[TrajectoryPoint],
    carry_yd: f64,
    attack_deg: f64,
    config: &BounceConfig,
) -> Result<Vec<TrajectoryPoint>> {
    if flight.len() < 2 {
        return Err(AnalysisError::invalid(
            "trajectory",
            format!("need at least 2 flight points, got {}", flight.len()),
        ));
    }
    if !carry_yd.is_finite() || carry_yd <= 0.0 {
        return Err(AnalysisError::invalid("estimateCarry", format!("carry must be positive, got {carry_yd}")));
    }
    if !attack_deg.is_finite() {
        return Err(AnalysisError::invalid("impactAttackAngle", "attack angle is not finite"));
    }

    let (dir_x, dir_z) = terminal_direction(flight);
    let landing = flight[flight.len() - 1];

    let h1 = first_bounce_height(attack_deg, carry_yd);
    let h2 = h1 * 0.5;
    let d1 = carry_yd * FIRST_BOUNCE_RATIO;
    let d2 = carry_yd * SECOND_BOUNCE_RATIO;
    let roll = carry_yd * EXTRA_RATIO - d1 - d2;

    let along = |from: &TrajectoryPoint, dist: f64, height: f64| TrajectoryPoint {
        t: from.t,
        x: from.x + dir_x * dist,
        y: (from.y + height).max(0.0),
        z: from.z + dir_z * dist,
    };

    let mut out = Vec::with_capacity(
        flight.len() + FIRST_BOUNCE_SEGMENTS + SECOND_BOUNCE_SEGMENTS + ROLL_SEGMENTS,
    );
    out.extend_from_slice(flight);

    let start1 = TrajectoryPoint { y: 0.0, ..landing };
    let end1 = along(&start1, d1, 0.0);
    let peak1 = along(&start1, d1 * 0.5, h1);
    append_bezier(&mut out, start1, peak1, end1, FIRST_BOUNCE_SEGMENTS, config.dt);

    let end2 = along(&end1, d2, 0.0);
    let peak2 = along(&end1, d2 * 0.5, h2);
    append_bezier(&mut out, end1, peak2, end2, SECOND_BOUNCE_SEGMENTS, config.dt);

    let rest = along(&end2, roll, 0.0);
    let mut t = out[out.len() - 1].t;
    for i in 1..=ROLL_SEGMENTS {
        let s = i as f64 / ROLL_SEGMENTS as f64;
        let progress = 1.0 - (1.0 - s) * (1.0 - s);
        t += config.dt;
        out.push(TrajectoryPoint {
            t,
            x: end2.x + (rest.x - end2.x) * progress,
            y: 0.0,
            z: end2.z + (rest.z - end2.z) * progress,
        });
    }

    log::debug!(
        "[BOUNCE] bounces {:.2}/{:.2} yd high, {:.1} yd extra, {} points",
        h1,
        h2,
        d1 + d2 + roll,
        out.len() - flight.len()
    );
    Ok(out)
}

/// Quadratic Bézier samples after `p0` (which is already in `out`).
fn append_bezier(
    out: &mut Vec<TrajectoryPoint>,
    p0: TrajectoryPoint,
    p1: TrajectoryPoint,
    p2: TrajectoryPoint,
    segments: usize,
    dt: f64,
) {
    let mut t = out[out.len() - 1].t;
    for i in 1..=segments {
        let s = i as f64 / segments as f64;
        let a = (1.0 - s) * (1.0 - s);
        let b = 2.0 * (1.0 - s) * s;
        let c = s * s;
        t += dt;
        out.push(TrajectoryPoint {
            t,
            x: a * p0.x + b * p1.x + c * p2.x,
            y: (a * p0.y + b * p1.y + c * p2.y).max(0.0),
            z: a * p0.z + b * p1.z + c * p2.z,
        });
    }
}
