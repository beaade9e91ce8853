//! Pose construction helpers.
//!
//! Convention: roll, pitch and yaw are applied about the fixed X, Y and Z
//! axes in that order, so `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.

use crate::{Pose3, Quat, Vec3, na};

/// Build a pose from a position and roll/pitch/yaw angles in radians.
pub fn pose_from_xyz_rpy(x: f64, y: f64, z: f64, roll: f64, pitch: f64, yaw: f64) -> Pose3 {
    Pose3::from_parts(
        na::Translation3::new(x, y, z),
        Quat::from_euler_angles(roll, pitch, yaw),
    )
}

/// Position part of a pose.
#[inline]
pub fn position(pose: &Pose3) -> Vec3 {
    pose.translation.vector
}
