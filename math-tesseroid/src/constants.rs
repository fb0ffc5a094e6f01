//! Physical and integration constants
//!
//! Defaults for every tunable in [`crate::TesseroidConfig`].

use std::f64::consts::PI;

/// Mean Earth radius (m), the reference the tesseroid heights are measured from
pub const MEAN_EARTH_RADIUS: f64 = 6_378_137.0;

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const GRAVITATIONAL_CONSTANT: f64 = 0.00000000006674;

/// Conversion from m/s² to mGal
pub const SI2MGAL: f64 = 100_000.0;

/// Conversion from 1/s² to Eötvös
pub const SI2EOTVOS: f64 = 1_000_000_000.0;

/// Degrees to radians
pub const D2R: f64 = PI / 180.0;

/// Two-point Gauss-Legendre abscissas on [-1, 1] (±1/√3)
pub const GAUSS_LEGENDRE_2: [f64; 2] = [-0.5773502691896257, 0.5773502691896257];

/// Default capacity of the adaptive refinement work list
pub const DEFAULT_STACK_CAPACITY: usize = 10_000;

/// Default closeness ratio for the potential
pub const RATIO_POTENTIAL: f64 = 1.0;

/// Default closeness ratio for the gravity vector
pub const RATIO_GRAVITY: f64 = 1.6;

/// Default closeness ratio for the gravity gradient tensor
pub const RATIO_GRADIENT: f64 = 8.0;

/// Squared distance (m²) below which a point sits on a cell centre
pub const DEGENERATE_DISTANCE_SQR: f64 = 1.0e-10;
