//! Rotation utilities for inertia tensors.
//!
//! A tensor `I` expressed in body axes is expressed in reference axes as
//! `R I Rᵀ`, where `R` maps body vectors into the reference frame.

use crate::{Mat3, Quat, Vec3, na};

/// Express a body-frame tensor in the frame that `rot` maps into: `R I Rᵀ`.
#[inline]
pub fn rotate_tensor(rot: &Quat, tensor: &Mat3) -> Mat3 {
    let r = rot.to_rotation_matrix().into_inner();
    r * tensor * r.transpose()
}

/// Inverse of [`rotate_tensor`]: `Rᵀ I R`.
#[inline]
pub fn unrotate_tensor(rot: &Quat, tensor: &Mat3) -> Mat3 {
    let r = rot.to_rotation_matrix().into_inner();
    r.transpose() * tensor * r
}

/// Rotation whose matrix has the given columns.
///
/// The columns must form a right-handed orthonormal basis.
pub fn from_axes(x: &Vec3, y: &Vec3, z: &Vec3) -> Quat {
    let m = Mat3::from_columns(&[*x, *y, *z]);
    Quat::from_rotation_matrix(&na::Rotation3::from_matrix_unchecked(m))
}
