//! Rigid-body mass properties for phyz.
//!
//! A [`MassMatrix3`] holds a body's mass and its inertia tensor about the
//! center of mass. An [`Inertial`] places a mass matrix in a reference frame
//! and composes with other inertials into a single composite body.
//!
//! Vector, matrix, quaternion and pose arithmetic comes from nalgebra.

pub mod error;
pub mod inertial;
pub mod mass_matrix;
pub mod pose;
pub mod quaternion;
pub mod tolerance;

pub use error::{InertiaError, Result};
pub use inertial::Inertial;
pub use mass_matrix::MassMatrix3;
pub use pose::pose_from_xyz_rpy;
pub use tolerance::Tolerances;

pub use nalgebra as na;

/// 3D vector alias.
pub type Vec3 = na::Vector3<f64>;
/// 3x3 matrix alias.
pub type Mat3 = na::Matrix3<f64>;
/// Unit quaternion rotation alias.
pub type Quat = na::UnitQuaternion<f64>;
/// Rigid pose: position plus orientation.
pub type Pose3 = na::Isometry3<f64>;
