//! A mass matrix placed in a reference frame, and composition of bodies.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use approx::{AbsDiffEq, RelativeEq};
use tracing::debug;

use crate::pose::position;
use crate::quaternion;
use crate::{InertiaError, MassMatrix3, Mat3, Pose3, Quat, Result, Tolerances, Vec3, na};

/// Mass properties of a rigid body expressed in some reference frame.
///
/// `pose` locates the center of mass and orients the axes the mass matrix
/// is expressed in. Two inertials can only be added when their poses are
/// relative to the same reference frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inertial {
    mass_matrix: MassMatrix3,
    pose: Pose3,
}

impl Default for Inertial {
    fn default() -> Self {
        Self {
            mass_matrix: MassMatrix3::ZERO,
            pose: Pose3::identity(),
        }
    }
}

impl Inertial {
    /// Create from a mass matrix and its pose. No validation is performed.
    pub fn new(mass_matrix: MassMatrix3, pose: Pose3) -> Self {
        Self { mass_matrix, pose }
    }

    #[inline]
    pub fn mass_matrix(&self) -> &MassMatrix3 {
        &self.mass_matrix
    }

    #[inline]
    pub fn pose(&self) -> &Pose3 {
        &self.pose
    }

    /// Replace the mass matrix.
    ///
    /// An invalid mass matrix is rejected and the previous one is kept.
    pub fn set_mass_matrix(&mut self, mass_matrix: MassMatrix3) -> Result<()> {
        if !mass_matrix.is_valid() {
            debug!(?mass_matrix, "rejected invalid mass matrix");
            return Err(InertiaError::InvalidMassMatrix);
        }
        self.mass_matrix = mass_matrix;
        Ok(())
    }

    /// Replace the pose.
    ///
    /// The pose is always stored. The error reports that the current mass
    /// matrix is not valid, so the inertial as a whole is not usable yet.
    pub fn set_pose(&mut self, pose: Pose3) -> Result<()> {
        self.pose = pose;
        if self.mass_matrix.is_valid() {
            Ok(())
        } else {
            debug!("pose set on inertial without a valid mass matrix");
            Err(InertiaError::InvalidMassMatrix)
        }
    }

    /// Inertia tensor about the center of mass, in reference frame axes.
    pub fn moi(&self) -> Mat3 {
        quaternion::rotate_tensor(&self.pose.rotation, &self.mass_matrix.moi())
    }

    /// Reorient the inertial frame without changing the body.
    ///
    /// The pose rotation becomes `rot` and the mass matrix is re-expressed
    /// in the new axes, so [`Self::moi`] is unchanged. The pose rotation is
    /// updated even when the re-expressed mass matrix is reported invalid.
    pub fn set_inertial_rotation(&mut self, rot: Quat) -> Result<()> {
        let moi = self.moi();
        self.pose.rotation = rot;
        self.mass_matrix.set_moi(&quaternion::unrotate_tensor(&rot, &moi))
    }

    /// Re-express the body so the mass matrix's principal axes sit at `rot`
    /// relative to the inertial frame.
    ///
    /// `rot = identity` diagonalizes the mass matrix. [`Self::moi`] is
    /// unchanged. The pose rotation is updated even when the re-expressed
    /// mass matrix is reported invalid.
    pub fn set_mass_matrix_rotation(&mut self, rot: Quat) -> Result<()> {
        self.set_mass_matrix_rotation_with(rot, &Tolerances::default())
    }

    pub fn set_mass_matrix_rotation_with(&mut self, rot: Quat, tol: &Tolerances) -> Result<()> {
        let principal = self.mass_matrix.principal_axes_offset_with(tol);
        let moments = self.mass_matrix.principal_moments_with(tol);
        self.pose.rotation = self.pose.rotation * principal * rot.inverse();
        let diag = Mat3::from_diagonal(&moments);
        self.mass_matrix
            .set_moi_with(&quaternion::rotate_tensor(&rot, &diag), tol)
    }
}

/// Parallel axis shift for a point mass at `d` from the pivot:
/// `m (|d|² E - d dᵀ)`.
fn parallel_axis(mass: f64, d: &Vec3) -> Mat3 {
    (Mat3::identity() * d.norm_squared() - d * d.transpose()) * mass
}

/// Bodies with non-positive mass contribute nothing to a sum.
#[inline]
fn contributes(inertial: &Inertial) -> bool {
    inertial.mass_matrix.mass() > 0.0
}

impl AddAssign for Inertial {
    /// Combine two bodies posed in the same reference frame.
    ///
    /// The result sits at the combined center of mass with reference frame
    /// axes. A body with non-positive mass is absorbed: if `rhs` has none,
    /// `self` is unchanged; otherwise if `self` has none, it becomes `rhs`.
    fn add_assign(&mut self, rhs: Inertial) {
        if !contributes(&rhs) {
            return;
        }
        if !contributes(self) {
            *self = rhs;
            return;
        }

        let m1 = self.mass_matrix.mass();
        let m2 = rhs.mass_matrix.mass();
        let mass = m1 + m2;

        let p1 = position(&self.pose);
        let p2 = position(&rhs.pose);
        let com = (p1 * m1 + p2 * m2) / mass;

        let moi = self.moi()
            + parallel_axis(m1, &(p1 - com))
            + rhs.moi()
            + parallel_axis(m2, &(p2 - com));

        self.mass_matrix = MassMatrix3::from_mass_and_moi(mass, &moi);
        self.pose = Pose3::from_parts(na::Translation3::from(com), Quat::identity());
    }
}

impl Add for Inertial {
    type Output = Inertial;

    fn add(mut self, rhs: Inertial) -> Inertial {
        self += rhs;
        self
    }
}

impl Sum for Inertial {
    fn sum<I: Iterator<Item = Inertial>>(iter: I) -> Inertial {
        iter.reduce(Add::add).unwrap_or_default()
    }
}

impl<'a> Sum<&'a Inertial> for Inertial {
    fn sum<I: Iterator<Item = &'a Inertial>>(iter: I) -> Inertial {
        iter.copied().sum()
    }
}

impl AbsDiffEq for Inertial {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.pose.abs_diff_eq(&other.pose, epsilon)
            && self.mass_matrix.abs_diff_eq(&other.mass_matrix, epsilon)
    }
}

impl RelativeEq for Inertial {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.pose.relative_eq(&other.pose, epsilon, max_relative)
            && self
                .mass_matrix
                .relative_eq(&other.mass_matrix, epsilon, max_relative)
    }
}
