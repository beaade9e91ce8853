//! Numeric tolerances for mass-matrix queries.

/// Tolerances used by validity checks and principal-axis decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Relative tolerance, scaled by the largest diagonal moment.
    ///
    /// Decides when off-diagonal terms count as zero, when two principal
    /// moments coincide, and when a matrix counts as symmetric.
    pub relative: f64,
    /// Multiple of machine epsilon applied to the largest possible moment
    /// when checking non-negativity and the triangle inequality.
    pub epsilon_factor: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            relative: 1e-6,
            epsilon_factor: 10.0,
        }
    }
}

impl Tolerances {
    /// Absolute tolerance for a matrix whose largest diagonal moment is `scale`.
    #[inline]
    pub fn absolute(&self, scale: f64) -> f64 {
        (self.relative * scale).abs()
    }

    /// Near-zero threshold for the given principal (or diagonal) moments.
    ///
    /// `2|m0| + |m1| + |m2|` bounds the largest moment any physical body
    /// with these moments can have.
    #[inline]
    pub fn moment_epsilon(&self, moments: &crate::Vec3) -> f64 {
        let max_possible = 2.0 * moments.x.abs() + moments.y.abs() + moments.z.abs();
        self.epsilon_factor * f64::EPSILON * max_possible
    }
}
