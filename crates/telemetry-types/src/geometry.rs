//! Vector geometry on the unit sphere and in Euclidean space

use std::f64::consts::PI;

pub use glam::{DVec2, DVec3};

/// Squared length under which a vector has no usable direction
pub const DEGENERATE_LENGTH_SQ: f64 = 1e-18;

/// Angle (radians) under which slerp degrades to a normalised lerp
const SLERP_LINEAR_THRESHOLD: f64 = 1e-6;

/// Unit vector pointing along `v`, or `None` when `v` is zero-length or non-finite
pub fn direction(v: DVec3) -> Option<DVec3> {
    let len_sq = v.length_squared();
    if !len_sq.is_finite() || len_sq < DEGENERATE_LENGTH_SQ {
        None
    } else {
        Some(v / len_sq.sqrt())
    }
}

/// Angle in radians between two vectors; 0 if either has no direction
pub fn angle_between(a: DVec3, b: DVec3) -> f64 {
    turning_angle(a, b).unwrap_or(0.0)
}

/// Angle in radians between two vectors, `None` if either has no direction
pub fn turning_angle(a: DVec3, b: DVec3) -> Option<f64> {
    let (a, b) = (direction(a)?, direction(b)?);
    let angle = a.dot(b).clamp(-1.0, 1.0).acos();
    angle.is_finite().then_some(angle)
}

/// Great-circle arc length between two directions on a sphere of `radius`
pub fn arc_length(a: DVec3, b: DVec3, radius: f64) -> f64 {
    radius * angle_between(a, b)
}

/// Spherical interpolation between two directions.
///
/// Returns a unit vector moving at constant angular speed from `from` (t = 0)
/// to `to` (t = 1). Antiparallel inputs rotate through an arbitrary
/// perpendicular axis.
pub fn slerp(from: DVec3, to: DVec3, t: f64) -> DVec3 {
    let (a, b) = match (direction(from), direction(to)) {
        (Some(a), Some(b)) => (a, b),
        _ => return from.lerp(to, t),
    };

    let theta = a.dot(b).clamp(-1.0, 1.0).acos();
    if theta < SLERP_LINEAR_THRESHOLD {
        return direction(a.lerp(b, t)).unwrap_or(a);
    }

    if PI - theta < SLERP_LINEAR_THRESHOLD {
        let axis = a.any_orthonormal_vector();
        let angle = theta * t;
        return a * angle.cos() + axis * angle.sin();
    }

    let sin_theta = theta.sin();
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    direction(a * wa + b * wb).unwrap_or(a)
}

/// Unit direction for a yaw/pitch pair in degrees (yaw about +Y, pitch positive looks down)
pub fn direction_from_yaw_pitch(yaw_deg: f64, pitch_deg: f64) -> DVec3 {
    let (yaw, pitch) = (yaw_deg.to_radians(), pitch_deg.to_radians());
    DVec3::new(
        yaw.sin() * pitch.cos(),
        -pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}
