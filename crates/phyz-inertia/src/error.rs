//! Error types for phyz-inertia.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InertiaError {
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("dimension must be positive, got {0}")]
    NonPositiveDimension(f64),

    #[error("moment of inertia matrix is not symmetric")]
    NotSymmetric,

    #[error("mass matrix is not physically valid")]
    InvalidMassMatrix,

    #[error("principal moments {0:?} violate the triangle inequality")]
    TriangleInequality([f64; 3]),
}

pub type Result<T> = std::result::Result<T, InertiaError>;
