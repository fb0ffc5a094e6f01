//! Two-point Gauss-Legendre nodes scaled to a tesseroid
//!
//! The reference rule on [-1, 1] is mapped independently onto the longitude,
//! latitude and radial extent of a cell. The tensor product of the three axes
//! gives the 2×2×2 sample grid used by every kernel.

use crate::constants::D2R;
use crate::tesseroid::Tesseroid;

/// Quadrature nodes of one (sub-)tesseroid in physical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadratureNodes {
    /// Node longitudes (radians)
    pub lon: [f64; 2],
    /// Sine of the node latitudes
    pub sin_lat: [f64; 2],
    /// Cosine of the node latitudes
    pub cos_lat: [f64; 2],
    /// Node radii (m)
    pub radius: [f64; 2],
    /// Jacobian of the map from [-1, 1]³, Δλ·Δφ·Δr/8 with angles in radians
    pub jacobian: f64,
}

/// Map the reference abscissas onto the extent of `tesseroid`
///
/// Radii include `mean_radius`, so they are geocentric.
pub fn scale_nodes(tesseroid: &Tesseroid, abscissas: &[f64; 2], mean_radius: f64) -> QuadratureNodes {
    let dlon = tesseroid.east() - tesseroid.west();
    let dlat = tesseroid.north() - tesseroid.south();
    let dr = tesseroid.top() - tesseroid.bottom();
    let (mlon, mlat, mh) = tesseroid.center();
    let mr = mh + mean_radius;

    let mut nodes = QuadratureNodes {
        lon: [0.0; 2],
        sin_lat: [0.0; 2],
        cos_lat: [0.0; 2],
        radius: [0.0; 2],
        jacobian: D2R * dlon * D2R * dlat * dr * 0.125,
    };
    for (i, &x) in abscissas.iter().enumerate() {
        nodes.lon[i] = D2R * (0.5 * dlon * x + mlon);
        let lat = D2R * (0.5 * dlat * x + mlat);
        nodes.sin_lat[i] = lat.sin();
        nodes.cos_lat[i] = lat.cos();
        nodes.radius[i] = 0.5 * dr * x + mr;
    }
    nodes
}
