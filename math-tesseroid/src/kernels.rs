//! Field kernels over the 2×2×2 quadrature grid
//!
//! All ten field components share one sample loop ([`integrate`]); they only
//! differ in the closed-form tail applied to each sample. The local frame at
//! the observation point has x pointing north, y east and z down, so gz and gzz
//! are positive directly above a positive mass.
//!
//! Values are returned without the gravitational constant and in SI units;
//! see [`Field::si_factor`] for the conventional output units.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::TesseroidConfig;
use crate::constants::{RATIO_GRADIENT, RATIO_GRAVITY, RATIO_POTENTIAL, SI2EOTVOS, SI2MGAL};
use crate::error::{Result, TesseroidError};
use crate::quadrature::{QuadratureNodes, scale_nodes};
use crate::tesseroid::{ObservationPoint, ObservationPoints, Tesseroid};

/// A field component produced by a tesseroid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// Gravitational potential
    Potential,
    /// North component of gravity
    Gx,
    /// East component of gravity
    Gy,
    /// Down component of gravity
    Gz,
    /// Gradient tensor, north-north
    Gxx,
    /// Gradient tensor, north-east
    Gxy,
    /// Gradient tensor, north-down
    Gxz,
    /// Gradient tensor, east-east
    Gyy,
    /// Gradient tensor, east-down
    Gyz,
    /// Gradient tensor, down-down
    Gzz,
}

/// Field family, which sets the default ratio and output units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Potential
    Potential,
    /// Gravity vector
    Gravity,
    /// Gravity gradient tensor
    Gradient,
}

/// Separation between the observation point and one quadrature sample
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    /// rc²·cos(φc), the volume element folded with the quadrature weight
    pub kappa: f64,
    /// Squared distance ℓ²
    pub l_sqr: f64,
    /// North separation
    pub dx: f64,
    /// East separation
    pub dy: f64,
    /// Down separation
    pub dz: f64,
}

/// Sum `tail` over the 2×2×2 samples of `nodes` as seen from `point`
#[inline(always)]
pub fn integrate<F>(point: &ObservationPoint, nodes: &QuadratureNodes, tail: F) -> f64
where
    F: Fn(&Sample) -> f64,
{
    let r = point.radius;
    let mut sum = 0.0;
    for i in 0..2 {
        let (sin_dlon, cos_dlon) = (nodes.lon[i] - point.lon).sin_cos();
        for j in 0..2 {
            let cospsi = point.sin_lat * nodes.sin_lat[j]
                + point.cos_lat * nodes.cos_lat[j] * cos_dlon;
            let kphi = point.cos_lat * nodes.sin_lat[j]
                - point.sin_lat * nodes.cos_lat[j] * cos_dlon;
            for k in 0..2 {
                let rc = nodes.radius[k];
                let dx = rc * kphi;
                let dy = rc * nodes.cos_lat[j] * sin_dlon;
                let dz = r - rc * cospsi;
                // Equal to r² + rc² - 2·r·rc·cosψ without the cancellation.
                let sample = Sample {
                    kappa: rc * rc * nodes.cos_lat[j],
                    l_sqr: dx * dx + dy * dy + dz * dz,
                    dx,
                    dy,
                    dz,
                };
                sum += tail(&sample);
            }
        }
    }
    sum
}

#[inline(always)]
fn diagonal(s: &Sample, d: f64) -> f64 {
    s.kappa * (3.0 * d * d - s.l_sqr) / s.l_sqr.powf(2.5)
}

#[inline(always)]
fn off_diagonal(s: &Sample, d1: f64, d2: f64) -> f64 {
    s.kappa * 3.0 * d1 * d2 / s.l_sqr.powf(2.5)
}

impl Field {
    /// All ten components
    pub const ALL: [Field; 10] = [
        Field::Potential,
        Field::Gx,
        Field::Gy,
        Field::Gz,
        Field::Gxx,
        Field::Gxy,
        Field::Gxz,
        Field::Gyy,
        Field::Gyz,
        Field::Gzz,
    ];

    /// Field family
    pub fn kind(self) -> FieldKind {
        match self {
            Field::Potential => FieldKind::Potential,
            Field::Gx | Field::Gy | Field::Gz => FieldKind::Gravity,
            _ => FieldKind::Gradient,
        }
    }

    /// Lowercase name ("potential", "gx", ...)
    pub fn name(self) -> &'static str {
        match self {
            Field::Potential => "potential",
            Field::Gx => "gx",
            Field::Gy => "gy",
            Field::Gz => "gz",
            Field::Gxx => "gxx",
            Field::Gxy => "gxy",
            Field::Gxz => "gxz",
            Field::Gyy => "gyy",
            Field::Gyz => "gyz",
            Field::Gzz => "gzz",
        }
    }

    /// Default closeness ratio
    pub fn default_ratio(self) -> f64 {
        match self.kind() {
            FieldKind::Potential => RATIO_POTENTIAL,
            FieldKind::Gravity => RATIO_GRAVITY,
            FieldKind::Gradient => RATIO_GRADIENT,
        }
    }

    /// Factor from SI to the conventional unit (m²/s², mGal, Eötvös)
    pub fn si_factor(self) -> f64 {
        match self.kind() {
            FieldKind::Potential => 1.0,
            FieldKind::Gravity => SI2MGAL,
            FieldKind::Gradient => SI2EOTVOS,
        }
    }

    /// Quadrature of this component over one cell, Jacobian included
    pub fn integrate(self, point: &ObservationPoint, nodes: &QuadratureNodes) -> f64 {
        let sum = match self {
            Field::Potential => integrate(point, nodes, |s| s.kappa / s.l_sqr.sqrt()),
            Field::Gx => integrate(point, nodes, |s| s.kappa * s.dx / s.l_sqr.powf(1.5)),
            Field::Gy => integrate(point, nodes, |s| s.kappa * s.dy / s.l_sqr.powf(1.5)),
            Field::Gz => integrate(point, nodes, |s| s.kappa * s.dz / s.l_sqr.powf(1.5)),
            Field::Gxx => integrate(point, nodes, |s| diagonal(s, s.dx)),
            Field::Gxy => integrate(point, nodes, |s| off_diagonal(s, s.dx, s.dy)),
            Field::Gxz => integrate(point, nodes, |s| off_diagonal(s, s.dx, s.dz)),
            Field::Gyy => integrate(point, nodes, |s| diagonal(s, s.dy)),
            Field::Gyz => integrate(point, nodes, |s| off_diagonal(s, s.dy, s.dz)),
            Field::Gzz => integrate(point, nodes, |s| diagonal(s, s.dz)),
        };
        nodes.jacobian * sum
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = TesseroidError;

    fn from_str(s: &str) -> Result<Self> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TesseroidError::UnknownField(s.to_string()))
    }
}

/// Evaluate `field` directly for the pre-screened points in `indices`
///
/// One node set is shared by every point, so callers should only pass points
/// that [`crate::too_close`] classified as far. Contributions are added to
/// `result`.
///
/// # Panics
/// Panics if an entry of `indices` is out of bounds for `points`.
pub fn evaluate_direct(
    tesseroid: &Tesseroid,
    density: f64,
    points: &ObservationPoints,
    indices: &[usize],
    field: Field,
    config: &TesseroidConfig,
    result: &mut Array1<f64>,
) -> Result<()> {
    points.check_result_len(result)?;
    let nodes = scale_nodes(tesseroid, &config.abscissas, config.mean_radius);
    for &i in indices {
        result[i] += density * field.integrate(&points.point(i), &nodes);
    }
    Ok(())
}
