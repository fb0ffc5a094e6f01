//! Error types for tesseroid field evaluation.
//!
//! Every evaluation call aborts on the first error it meets. Callers that sum
//! many tesseroids decide whether a failed cell aborts the whole survey or is
//! skipped; the helper predicates below group the variants for that decision.

use thiserror::Error;

/// Errors that can occur while evaluating tesseroid fields.
#[derive(Debug, Error)]
pub enum TesseroidError {
    /// Tesseroid bounds violate `west < east`, `south < north`, `top > bottom`
    /// or are not finite.
    #[error(
        "invalid tesseroid bounds: west={west}, east={east}, south={south}, north={north}, top={top}, bottom={bottom}"
    )]
    InvalidBounds {
        /// Western longitude bound (degrees)
        west: f64,
        /// Eastern longitude bound (degrees)
        east: f64,
        /// Southern latitude bound (degrees)
        south: f64,
        /// Northern latitude bound (degrees)
        north: f64,
        /// Top radial bound (m)
        top: f64,
        /// Bottom radial bound (m)
        bottom: f64,
    },

    /// Observation point coincides with the centre of a (sub-)tesseroid.
    #[error("degenerate geometry: point {point} is {distance_sqr:e} m^2 from a cell centre")]
    DegenerateGeometry {
        /// Index of the observation point
        point: usize,
        /// Squared distance to the cell centre (m^2)
        distance_sqr: f64,
    },

    /// Adaptive refinement needed more outstanding cells than the work list holds.
    #[error("refinement overflow at point {point}: work list capacity {capacity} exceeded")]
    RefinementOverflow {
        /// Index of the observation point
        point: usize,
        /// Capacity of the work list
        capacity: usize,
    },

    /// Parallel arrays have different lengths.
    #[error("length mismatch: expected {expected} entries, got {got}")]
    LengthMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Field name not recognised.
    #[error("unknown field component: {0}")]
    UnknownField(String),

    /// IO error while reading or writing a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for tesseroid operations.
pub type Result<T> = std::result::Result<T, TesseroidError>;

impl TesseroidError {
    /// Returns `true` if the error comes from the source or point geometry.
    ///
    /// This includes `InvalidBounds` and `DegenerateGeometry`.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            TesseroidError::InvalidBounds { .. } | TesseroidError::DegenerateGeometry { .. }
        )
    }

    /// Returns `true` if adaptive refinement ran out of work list capacity.
    pub fn is_refinement_error(&self) -> bool {
        matches!(self, TesseroidError::RefinementOverflow { .. })
    }

    /// Returns `true` if this is a configuration-related error.
    ///
    /// This includes `InvalidConfig`, `UnknownField`, `Io` and `Json`.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TesseroidError::InvalidConfig(_)
                | TesseroidError::UnknownField(_)
                | TesseroidError::Io(_)
                | TesseroidError::Json(_)
        )
    }
}
