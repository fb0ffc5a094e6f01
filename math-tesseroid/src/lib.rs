//! # Tesseroid gravity fields
//!
//! Gravitational potential, gravity vector and gravity gradient tensor of
//! tesseroids (spherical prisms) computed with two-point Gauss-Legendre
//! quadrature and adaptive refinement near the source.
//!
//! ## Features
//!
//! - Ten field components sharing one 2×2×2 quadrature loop
//! - Batch distance screening ([`too_close`]) to evaluate far points in one pass
//! - Iterative refinement with a bounded work list for close points
//! - Failures leave the caller's result array untouched
//! - JSON configuration for every tunable
//!
//! ## Example
//!
//! ```
//! use math_tesseroid::{Field, FailurePolicy, ModelCell, ObservationPoints, Tesseroid,
//!     TesseroidConfig, compute_field};
//!
//! let config = TesseroidConfig::default();
//! let cell = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
//! let points = ObservationPoints::from_geographic(
//!     &[0.0, 0.2], &[0.0, 0.1], &[10_000.0, 10_000.0], config.mean_radius,
//! ).unwrap();
//!
//! let survey = compute_field(
//!     Field::Gz, &points, &[ModelCell::new(cell, 2670.0)], &config, FailurePolicy::Abort,
//! ).unwrap();
//! assert!(survey.values[0] > 0.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::too_many_arguments)] // Scientific code often has many parameters

pub mod config;
pub mod constants;
pub mod error;
pub mod kernels;
pub mod proximity;
pub mod quadrature;
pub mod refinement;
pub mod survey;
pub mod tesseroid;

pub use config::{RatioConfig, TesseroidConfig};
pub use error::{Result, TesseroidError};
pub use kernels::{Field, FieldKind, evaluate_direct};
pub use proximity::{CellExtent, distance_and_extent, too_close};
pub use quadrature::{QuadratureNodes, scale_nodes};
pub use refinement::{RefinementStats, evaluate, evaluate_adaptive};
pub use survey::{FailurePolicy, ModelCell, Survey, compute_field};
pub use tesseroid::{ObservationPoint, ObservationPoints, Split, Tesseroid};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
