//! Vector and quaternion routines used by the flight model and the renderer.
//!
//! Vectors are [`glam::DVec3`] and quaternions [`glam::DQuat`] (`[x, y, z, w]`),
//! both in f64. Plain vector arithmetic (add, sub, scale, dot, cross) uses the
//! glam operators directly; this module adds the few operations whose exact
//! formula matters to the simulation.
//!
//! None of these functions fail. Degenerate input (a zero-length quaternion)
//! is guarded instead of producing NaN.

use glam::{DQuat, DVec3};

pub type Vec3 = DVec3;
pub type Quat = DQuat;

/// World up axis.
pub const UP: Vec3 = DVec3::Y;
/// Drone-local forward axis.
pub const FORWARD: Vec3 = DVec3::Z;

/// Euclidean length computed as a hypot chain, so large components do not overflow.
pub fn len(v: Vec3) -> f64 {
    v.x.hypot(v.y).hypot(v.z)
}

/// `max(lo, min(hi, v))`.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

pub fn identity() -> Quat {
    DQuat::from_xyzw(0.0, 0.0, 0.0, 1.0)
}

/// Hamilton product. `mul(a, b)` is the rotation `a` applied after `b`.
pub fn mul(a: Quat, b: Quat) -> Quat {
    let (ax, ay, az, aw) = (a.x, a.y, a.z, a.w);
    let (bx, by, bz, bw) = (b.x, b.y, b.z, b.w);
    DQuat::from_xyzw(
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    )
}

/// Divide by the 4-norm. A zero or non-finite norm is treated as 1.
pub fn norm(q: Quat) -> Quat {
    let l = q.x.hypot(q.y).hypot(q.z).hypot(q.w);
    let l = if l == 0.0 || !l.is_finite() { 1.0 } else { l };
    DQuat::from_xyzw(q.x / l, q.y / l, q.z / l, q.w / l)
}

/// Rotate `p` by the unit quaternion `q = (v, w)`:
/// `p + 2w(v × p) + 2(v × (v × p))`.
pub fn rotate_vec3(q: Quat, p: Vec3) -> Vec3 {
    let v = DVec3::new(q.x, q.y, q.z);
    let uv = v.cross(p);
    let uuv = v.cross(uv);
    p + (uv * (2.0 * q.w) + uuv * 2.0)
}

/// Equivalent 3x3 rotation matrix, column-major, flattened.
pub fn to_mat3(q: Quat) -> [f64; 9] {
    let (x, y, z, w) = (q.x, q.y, q.z, q.w);
    let (xx, yy, zz) = (x * x, y * y, z * z);
    let (xy, xz, yz) = (x * y, x * z, y * z);
    let (wx, wy, wz) = (w * x, w * y, w * z);
    [
        1.0 - 2.0 * (yy + zz),
        2.0 * (xy + wz),
        2.0 * (xz - wy),
        2.0 * (xy - wz),
        1.0 - 2.0 * (xx + zz),
        2.0 * (yz + wx),
        2.0 * (xz + wy),
        2.0 * (yz - wx),
        1.0 - 2.0 * (xx + yy),
    ]
}

/// Inverse rotation of a unit quaternion.
pub fn conjugate(q: Quat) -> Quat {
    DQuat::from_xyzw(-q.x, -q.y, -q.z, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-12
    }

    #[test]
    fn len_matches_pythagoras() {
        assert_eq!(len(DVec3::new(3.0, 4.0, 0.0)), 5.0);
        assert_eq!(len(DVec3::new(0.0, 0.0, -2.0)), 2.0);
    }

    #[test]
    fn len_survives_huge_components() {
        let v = DVec3::new(1e300, 1e300, 0.0);
        assert!(len(v).is_finite());
    }

    #[test]
    fn clamp_orders_bounds() {
        assert_eq!(clamp(2.0, -1.0, 1.0), 1.0);
        assert_eq!(clamp(-3.0, -1.0, 1.0), -1.0);
        assert_eq!(clamp(0.25, -1.0, 1.0), 0.25);
    }

    #[test]
    fn identity_is_neutral_for_mul() {
        let q = norm(DQuat::from_xyzw(0.1, 0.2, 0.3, 0.9));
        assert_eq!(mul(identity(), q), q);
        assert_eq!(mul(q, identity()), q);
    }

    #[test]
    fn mul_matches_glam_hamilton_product() {
        let a = norm(DQuat::from_xyzw(0.3, -0.1, 0.5, 0.8));
        let b = norm(DQuat::from_xyzw(-0.2, 0.4, 0.1, 0.7));
        let ours = mul(a, b);
        let theirs = a * b;
        assert!((ours.x - theirs.x).abs() < 1e-12);
        assert!((ours.y - theirs.y).abs() < 1e-12);
        assert!((ours.z - theirs.z).abs() < 1e-12);
        assert!((ours.w - theirs.w).abs() < 1e-12);
    }

    #[test]
    fn mul_is_not_commutative() {
        let a = DQuat::from_rotation_x(0.7);
        let b = DQuat::from_rotation_y(0.4);
        assert_ne!(mul(a, b), mul(b, a));
    }

    #[test]
    fn norm_guards_zero_quaternion() {
        let q = norm(DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(q, DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert!(!q.x.is_nan());
    }

    #[test]
    fn norm_is_idempotent() {
        let once = norm(DQuat::from_xyzw(1.0, 2.0, 3.0, 4.0));
        let twice = norm(once);
        assert!((once.x - twice.x).abs() < 1e-15);
        assert!((once.w - twice.w).abs() < 1e-15);
        let l = once.x.hypot(once.y).hypot(once.z).hypot(once.w);
        assert!((l - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotate_quarter_turn_about_y() {
        let q = DQuat::from_rotation_y(std::f64::consts::FRAC_PI_2);
        let r = rotate_vec3(q, FORWARD);
        assert!(approx(r, DVec3::X));
    }

    #[test]
    fn rotate_agrees_with_glam() {
        let q = norm(DQuat::from_xyzw(0.2, 0.5, -0.3, 0.6));
        let p = DVec3::new(1.5, -2.0, 0.25);
        assert!(approx(rotate_vec3(q, p), q * p));
    }

    #[test]
    fn mat3_columns_are_rotated_axes() {
        let q = norm(DQuat::from_xyzw(0.1, -0.4, 0.2, 0.85));
        let m = to_mat3(q);
        let x = rotate_vec3(q, DVec3::X);
        let y = rotate_vec3(q, DVec3::Y);
        let z = rotate_vec3(q, DVec3::Z);
        assert!(approx(DVec3::new(m[0], m[1], m[2]), x));
        assert!(approx(DVec3::new(m[3], m[4], m[5]), y));
        assert!(approx(DVec3::new(m[6], m[7], m[8]), z));
    }

    #[test]
    fn conjugate_undoes_rotation() {
        let q = DQuat::from_rotation_z(1.1);
        let p = DVec3::new(0.3, 0.7, -1.2);
        assert!(approx(rotate_vec3(conjugate(q), rotate_vec3(q, p)), p));
    }
}
