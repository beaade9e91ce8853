//! Mass and rotational inertia of a rigid body about its center of mass.
//!
//! The inertia tensor is stored as its six independent entries:
//!
//! ```text
//!     | Ixx Ixy Ixz |
//! I = | Ixy Iyy Iyz |
//!     | Ixz Iyz Izz |
//! ```
//!
//! expressed in body-fixed axes through the center of mass, which need not
//! be principal axes. Any combination of values can be stored; physical
//! validity is a query ([`MassMatrix3::is_valid`]), not an invariant.

use std::f64::consts::PI;

use approx::{AbsDiffEq, RelativeEq};
use tracing::{debug, trace};

use crate::quaternion;
use crate::{InertiaError, Mat3, Quat, Result, Tolerances, Vec3};

/// Threshold below which a unit-vector component is ignored when choosing
/// an eigenvector's sign.
const SIGN_EPS: f64 = 1e-9;

/// Mass plus symmetric inertia tensor about the center of mass.
///
/// Equality through `==` is exact. Use the `approx` traits to compare
/// matrices that went through different floating point paths.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MassMatrix3 {
    mass: f64,
    ixx: f64,
    iyy: f64,
    izz: f64,
    ixy: f64,
    ixz: f64,
    iyz: f64,
}

impl Default for MassMatrix3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl MassMatrix3 {
    /// Zero mass and zero inertia.
    pub const ZERO: Self = Self::splat(0.0);

    /// Every entry NaN, for marking uninitialized values.
    pub const NAN: Self = Self::splat(f64::NAN);

    const fn splat(v: f64) -> Self {
        Self {
            mass: v,
            ixx: v,
            iyy: v,
            izz: v,
            ixy: v,
            ixz: v,
            iyz: v,
        }
    }

    /// Create from mass, diagonal moments `(Ixx, Iyy, Izz)` and off-diagonal
    /// products `(Ixy, Ixz, Iyz)`. No validation is performed.
    pub fn new(mass: f64, diagonal: Vec3, off_diagonal: Vec3) -> Self {
        Self {
            mass,
            ixx: diagonal.x,
            iyy: diagonal.y,
            izz: diagonal.z,
            ixy: off_diagonal.x,
            ixz: off_diagonal.y,
            iyz: off_diagonal.z,
        }
    }

    /// Create from mass and a full inertia matrix, averaging the off-diagonal
    /// pairs. No validation is performed.
    pub fn from_mass_and_moi(mass: f64, moi: &Mat3) -> Self {
        let mut m = Self::ZERO;
        m.mass = mass;
        m.store_moi(moi);
        m
    }

    /// Uniform solid box of the given mass and edge lengths.
    pub fn from_box(mass: f64, size: Vec3) -> Result<Self> {
        let mut m = Self::ZERO;
        m.set_from_box(mass, size)?;
        Ok(m)
    }

    /// Replace with a uniform solid box centered on the center of mass and
    /// aligned with the body axes.
    ///
    /// Leaves `self` untouched if the mass or any edge is not positive.
    pub fn set_from_box(&mut self, mass: f64, size: Vec3) -> Result<()> {
        check_mass(mass)?;
        for &d in size.iter() {
            check_dimension(d)?;
        }
        let sq = size.component_mul(&size);
        let k = mass / 12.0;
        *self = Self::new(
            mass,
            Vec3::new(k * (sq.y + sq.z), k * (sq.z + sq.x), k * (sq.x + sq.y)),
            Vec3::zeros(),
        );
        Ok(())
    }

    /// Replace with a uniform solid sphere.
    pub fn set_from_sphere(&mut self, mass: f64, radius: f64) -> Result<()> {
        check_mass(mass)?;
        check_dimension(radius)?;
        let i = 0.4 * mass * radius * radius;
        *self = Self::new(mass, Vec3::new(i, i, i), Vec3::zeros());
        Ok(())
    }

    /// Replace with a uniform solid cylinder whose axis is the body Z axis.
    pub fn set_from_cylinder_z(&mut self, mass: f64, length: f64, radius: f64) -> Result<()> {
        check_mass(mass)?;
        check_dimension(length)?;
        check_dimension(radius)?;
        let r2 = radius * radius;
        let ixx = mass / 12.0 * (3.0 * r2 + length * length);
        let izz = 0.5 * mass * r2;
        *self = Self::new(mass, Vec3::new(ixx, ixx, izz), Vec3::zeros());
        Ok(())
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass
    }

    #[inline]
    pub fn ixx(&self) -> f64 {
        self.ixx
    }

    #[inline]
    pub fn iyy(&self) -> f64 {
        self.iyy
    }

    #[inline]
    pub fn izz(&self) -> f64 {
        self.izz
    }

    #[inline]
    pub fn ixy(&self) -> f64 {
        self.ixy
    }

    #[inline]
    pub fn ixz(&self) -> f64 {
        self.ixz
    }

    #[inline]
    pub fn iyz(&self) -> f64 {
        self.iyz
    }

    /// `(Ixx, Iyy, Izz)`.
    #[inline]
    pub fn diagonal_moments(&self) -> Vec3 {
        Vec3::new(self.ixx, self.iyy, self.izz)
    }

    /// `(Ixy, Ixz, Iyz)`.
    #[inline]
    pub fn off_diagonal_moments(&self) -> Vec3 {
        Vec3::new(self.ixy, self.ixz, self.iyz)
    }

    /// The inertia tensor as a symmetric 3x3 matrix.
    pub fn moi(&self) -> Mat3 {
        Mat3::new(
            self.ixx, self.ixy, self.ixz, //
            self.ixy, self.iyy, self.iyz, //
            self.ixz, self.iyz, self.izz,
        )
    }

    /// Set the mass.
    ///
    /// The mass is stored even when the result is not valid, so a matrix can
    /// be assembled one field at a time; the error only reports validity.
    pub fn set_mass(&mut self, mass: f64) -> Result<()> {
        self.mass = mass;
        self.validate(&Tolerances::default())
    }

    /// Set `(Ixx, Iyy, Izz)`. Stored regardless of validity, like [`Self::set_mass`].
    pub fn set_diagonal_moments(&mut self, diagonal: Vec3) -> Result<()> {
        self.ixx = diagonal.x;
        self.iyy = diagonal.y;
        self.izz = diagonal.z;
        self.validate(&Tolerances::default())
    }

    /// Set `(Ixy, Ixz, Iyz)`. Stored regardless of validity, like [`Self::set_mass`].
    pub fn set_off_diagonal_moments(&mut self, off_diagonal: Vec3) -> Result<()> {
        self.ixy = off_diagonal.x;
        self.ixz = off_diagonal.y;
        self.iyz = off_diagonal.z;
        self.validate(&Tolerances::default())
    }

    /// Set the inertia tensor from a full matrix.
    pub fn set_moi(&mut self, moi: &Mat3) -> Result<()> {
        self.set_moi_with(moi, &Tolerances::default())
    }

    /// Set the inertia tensor from a full matrix.
    ///
    /// A matrix that is not symmetric within tolerance is rejected and
    /// `self` is left untouched. Otherwise the symmetrized entries are
    /// stored and the result reports validity like [`Self::set_mass`].
    pub fn set_moi_with(&mut self, moi: &Mat3, tol: &Tolerances) -> Result<()> {
        let asymmetry = (moi - moi.transpose()).amax();
        if asymmetry > tol.absolute(moi.diagonal().amax()) {
            debug!(asymmetry, "rejected non-symmetric moment of inertia");
            return Err(InertiaError::NotSymmetric);
        }
        self.store_moi(moi);
        self.validate(tol)
    }

    fn store_moi(&mut self, moi: &Mat3) {
        self.ixx = moi[(0, 0)];
        self.iyy = moi[(1, 1)];
        self.izz = moi[(2, 2)];
        self.ixy = 0.5 * (moi[(0, 1)] + moi[(1, 0)]);
        self.ixz = 0.5 * (moi[(0, 2)] + moi[(2, 0)]);
        self.iyz = 0.5 * (moi[(1, 2)] + moi[(2, 1)]);
    }

    fn validate(&self, tol: &Tolerances) -> Result<()> {
        if self.is_valid_with(tol) {
            Ok(())
        } else {
            debug!(mass_matrix = ?self, "mass matrix is not valid");
            Err(InertiaError::InvalidMassMatrix)
        }
    }

    /// Positive mass and a positive-definite inertia tensor.
    ///
    /// Checked with Sylvester's criterion: every leading principal minor of
    /// the tensor is strictly positive, which implies positive diagonal
    /// moments.
    pub fn is_positive(&self) -> bool {
        self.mass > 0.0
            && self.ixx > 0.0
            && self.ixx * self.iyy - self.ixy * self.ixy > 0.0
            && self.moi().determinant() > 0.0
    }

    /// Physically realizable: positive, and the principal moments satisfy
    /// the triangle inequality.
    pub fn is_valid(&self) -> bool {
        self.is_valid_with(&Tolerances::default())
    }

    pub fn is_valid_with(&self, tol: &Tolerances) -> bool {
        self.is_positive() && Self::valid_moments_with(&self.principal_moments_with(tol), tol)
    }

    /// Whether principal moments could belong to a physical body.
    pub fn valid_moments(moments: &Vec3) -> bool {
        Self::valid_moments_with(moments, &Tolerances::default())
    }

    /// Every moment is non-negative and no moment exceeds the sum of the
    /// other two, up to a few ulps of the largest possible moment.
    pub fn valid_moments_with(moments: &Vec3, tol: &Tolerances) -> bool {
        let eps = tol.moment_epsilon(moments);
        let (a, b, c) = (moments.x, moments.y, moments.z);
        a + eps >= 0.0
            && b + eps >= 0.0
            && c + eps >= 0.0
            && a <= b + c + eps
            && b <= c + a + eps
            && c <= a + b + eps
    }

    /// Eigenvalues of the inertia tensor.
    pub fn principal_moments(&self) -> Vec3 {
        self.principal_moments_with(&Tolerances::default())
    }

    /// Eigenvalues of the inertia tensor.
    ///
    /// A tensor whose off-diagonal terms are zero within tolerance is
    /// already diagonal and its moments are returned in stored order.
    /// Otherwise the characteristic cubic is solved in closed form
    /// (Kronenburg, arXiv:1306.6291) and the roots are sorted ascending.
    pub fn principal_moments_with(&self, tol: &Tolerances) -> Vec3 {
        let diag = self.diagonal_moments();
        let off = self.off_diagonal_moments();
        let t = tol.absolute(diag.max());
        if off.iter().all(|v| v.abs() <= t) {
            return diag;
        }

        let (ixx, iyy, izz) = (self.ixx, self.iyy, self.izz);
        let (ixy, ixz, iyz) = (self.ixy, self.ixz, self.iyz);

        // characteristic polynomial λ³ - bλ² + cλ + d
        let b = ixx + iyy + izz;
        let c = ixx * iyy - ixy * ixy + ixx * izz - ixz * ixz + iyy * izz - iyz * iyz;
        let d = ixx * iyz * iyz + iyy * ixz * ixz + izz * ixy * ixy
            - ixx * iyy * izz
            - 2.0 * ixy * ixz * iyz;

        // p is a sum of squares, zero only for a multiple of the identity
        let p = b * b - 3.0 * c;
        if p < t * t {
            trace!(p, "triple principal moment");
            return Vec3::repeat(b / 3.0);
        }

        let q = 2.0 * b * b * b - 9.0 * b * c - 27.0 * d;
        let delta = (0.5 * q / p.powf(1.5)).clamp(-1.0, 1.0).acos();
        let r = 2.0 * p.sqrt();

        let mut moments = [
            (b + r * (delta / 3.0).cos()) / 3.0,
            (b + r * ((delta + 2.0 * PI) / 3.0).cos()) / 3.0,
            (b + r * ((delta - 2.0 * PI) / 3.0).cos()) / 3.0,
        ];
        moments.sort_by(f64::total_cmp);
        Vec3::from(moments)
    }

    /// Rotation from the body axes to the principal axes.
    pub fn principal_axes_offset(&self) -> Quat {
        self.principal_axes_offset_with(&Tolerances::default())
    }

    /// Rotation whose matrix columns are unit eigenvectors of the inertia
    /// tensor, in the order of [`Self::principal_moments_with`], so that
    /// `Rᵀ I R` is diagonal.
    ///
    /// Repeated moments leave a plane (or all of space) of valid principal
    /// axes. The answer is made canonical: identity when all moments
    /// coincide or the tensor is already diagonal; otherwise the plane is
    /// spanned by Gram-Schmidt from the coordinate axis least aligned with
    /// the distinct axis. Eigenvector signs are chosen so the first
    /// significant component is positive and the basis is right-handed.
    pub fn principal_axes_offset_with(&self, tol: &Tolerances) -> Quat {
        let moments = self.principal_moments_with(tol);
        let t = tol.absolute(self.diagonal_moments().max());
        let close = |a: f64, b: f64| (a - b).abs() <= t;

        // products of inertia move the moments only to second order, so
        // diagonality is decided on the off-diagonal terms themselves
        if self.off_diagonal_moments().iter().all(|v| v.abs() <= t)
            || (close(moments.x, moments.y) && close(moments.y, moments.z))
        {
            return Quat::identity();
        }

        let moi = self.moi();
        let (x, y, z) = if close(moments.x, moments.y) {
            trace!("repeated lower principal moments");
            let axis = eigenvector(&moi, moments.z);
            let (a, b) = complete_basis(&axis);
            (a, b, axis)
        } else if close(moments.y, moments.z) {
            trace!("repeated upper principal moments");
            let axis = eigenvector(&moi, moments.x);
            let (a, b) = complete_basis(&axis);
            (axis, a, b)
        } else {
            let x = eigenvector(&moi, moments.x);
            let y = eigenvector(&moi, moments.y);
            let y = canonical_sign((y - x * x.dot(&y)).normalize());
            (x, y, x.cross(&y))
        };
        quaternion::from_axes(&x, &y, &z)
    }

    /// Edge lengths and orientation of the uniform solid box with this mass
    /// matrix.
    pub fn equivalent_box(&self) -> Result<(Vec3, Quat)> {
        self.equivalent_box_with(&Tolerances::default())
    }

    /// Edge lengths and orientation of the uniform solid box with this mass
    /// matrix.
    ///
    /// The box edges are ordered like [`Self::principal_moments_with`] and
    /// the rotation is [`Self::principal_axes_offset_with`]. Fails when the
    /// matrix is not positive or the principal moments violate the triangle
    /// inequality, in which case no box with real edges exists.
    pub fn equivalent_box_with(&self, tol: &Tolerances) -> Result<(Vec3, Quat)> {
        if !self.is_positive() {
            debug!(mass_matrix = ?self, "no equivalent box for non-positive mass matrix");
            return Err(InertiaError::InvalidMassMatrix);
        }
        let m = self.principal_moments_with(tol);
        if !Self::valid_moments_with(&m, tol) {
            debug!(moments = ?m, "no equivalent box for principal moments");
            return Err(InertiaError::TriangleInequality([m.x, m.y, m.z]));
        }

        // Ixx = mass / 12 (y² + z²) and cyclic, solved for the edges; the
        // max guards against roundoff below zero for flat boxes.
        let k = 6.0 / self.mass;
        let size = Vec3::new(
            (k * (m.y + m.z - m.x)).max(0.0).sqrt(),
            (k * (m.z + m.x - m.y)).max(0.0).sqrt(),
            (k * (m.x + m.y - m.z)).max(0.0).sqrt(),
        );
        Ok((size, self.principal_axes_offset_with(tol)))
    }

    fn entries(&self) -> [f64; 7] {
        [
            self.mass, self.ixx, self.iyy, self.izz, self.ixy, self.ixz, self.iyz,
        ]
    }
}

fn check_mass(mass: f64) -> Result<()> {
    if mass > 0.0 {
        Ok(())
    } else {
        debug!(mass, "rejected non-positive mass");
        Err(InertiaError::NonPositiveMass(mass))
    }
}

fn check_dimension(d: f64) -> Result<()> {
    if d > 0.0 {
        Ok(())
    } else {
        debug!(dimension = d, "rejected non-positive dimension");
        Err(InertiaError::NonPositiveDimension(d))
    }
}

/// Unit eigenvector of a symmetric matrix for a simple eigenvalue.
///
/// The rows of `A - λE` span a plane whose normal is the eigenvector; the
/// largest cross product of two rows is the best conditioned estimate.
fn eigenvector(moi: &Mat3, lambda: f64) -> Vec3 {
    let m = moi - Mat3::identity() * lambda;
    let r0 = m.row(0).transpose();
    let r1 = m.row(1).transpose();
    let r2 = m.row(2).transpose();

    let mut best = r0.cross(&r1);
    for candidate in [r0.cross(&r2), r1.cross(&r2)] {
        if candidate.norm_squared() > best.norm_squared() {
            best = candidate;
        }
    }
    match best.try_normalize(0.0) {
        Some(v) => canonical_sign(v),
        None => {
            trace!(lambda, "degenerate eigenvector, falling back to X");
            Vec3::x()
        }
    }
}

/// Two unit vectors completing `axis` to a right-handed orthonormal basis
/// `(axis, a, b)`.
fn complete_basis(axis: &Vec3) -> (Vec3, Vec3) {
    let mut e = Vec3::zeros();
    e[axis.iamin()] = 1.0;
    let a = canonical_sign((e - axis * axis.dot(&e)).normalize());
    (a, axis.cross(&a))
}

fn canonical_sign(v: Vec3) -> Vec3 {
    match v.iter().find(|c| c.abs() > SIGN_EPS) {
        Some(&c) if c < 0.0 => -v,
        _ => v,
    }
}

impl AbsDiffEq for MassMatrix3 {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.entries()
            .iter()
            .zip(other.entries().iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for MassMatrix3 {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.entries()
            .iter()
            .zip(other.entries().iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}
