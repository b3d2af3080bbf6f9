use glam::{DQuat, DVec3, Mat3, Mat4, Vec4};
use strikewing_common::math;

pub const FOV_Y_DEGREES: f32 = 90.0;
pub const NEAR: f32 = 0.05;
pub const FAR: f32 = 320.0;

pub fn projection(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect.max(1e-3), NEAR, FAR)
}

/// World-to-camera transform for a camera riding the drone.
///
/// The camera looks down the drone's local +Z, which is also the direction
/// weapons fire. Right-handed clip space looks down -Z, hence the half turn
/// about Y after undoing the drone's rotation.
pub fn view(pos: DVec3, rot: DQuat) -> Mat4 {
    let inverse = math::to_mat3(math::conjugate(rot)).map(|v| v as f32);
    let rotation = Mat4::from_mat3(Mat3::from_cols_array(&inverse));
    let half_turn = Mat4::from_diagonal(Vec4::new(-1.0, 1.0, -1.0, 1.0));
    half_turn * rotation * Mat4::from_translation(-pos.as_vec3())
}

pub fn view_projection(pos: DVec3, rot: DQuat, aspect: f32) -> Mat4 {
    projection(aspect) * view(pos, rot)
}
