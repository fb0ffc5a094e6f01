//! Distance screening between observation points and tesseroids
//!
//! Two tools decide when the fixed 2×2×2 rule stops being accurate:
//!
//! - [`too_close`] partitions a whole batch against one cell using a single
//!   size measure, so far points can be evaluated directly in one pass.
//! - [`distance_and_extent`] measures one point against one cell per axis, so
//!   the refinement engine knows which axes to split.

use crate::constants::{D2R, DEGENERATE_DISTANCE_SQR};
use crate::error::{Result, TesseroidError};
use crate::tesseroid::{ObservationPoint, ObservationPoints, Tesseroid};

/// Distance from a point to a cell centre, plus the cell's physical extents (m)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellExtent {
    /// Straight-line distance to the cell centre
    pub distance: f64,
    /// Great-circle width along the parallel through the cell centre
    pub lon: f64,
    /// Great-circle length along the meridian through the cell centre
    pub lat: f64,
    /// Radial thickness
    pub radial: f64,
}

/// Squared straight-line distance from `point` to the centre of `tesseroid`
///
/// Evaluated as `(r - rt)² + 2·r·rt·(1 - cos ψ)` with `1 - cos ψ` built from
/// half-angle terms, so the result keeps its relative precision down to
/// sub-millimetre separations on an Earth-sized sphere.
#[inline]
pub(crate) fn center_distance_sqr(
    tesseroid: &Tesseroid,
    point: &ObservationPoint,
    mean_radius: f64,
) -> f64 {
    let (lon_c, lat_c, h_c) = tesseroid.center();
    let rt = h_c + mean_radius;
    let (sin_lat_c, cos_lat_c) = (D2R * lat_c).sin_cos();

    let sin_dlat = point.sin_lat * cos_lat_c - point.cos_lat * sin_lat_c;
    let cos_dlat = point.cos_lat * cos_lat_c + point.sin_lat * sin_lat_c;
    let versin_dlat = if cos_dlat > 0.0 {
        sin_dlat * sin_dlat / (1.0 + cos_dlat)
    } else {
        1.0 - cos_dlat
    };
    let half_dlon = 0.5 * (point.lon - D2R * lon_c);
    let versin_dlon = 2.0 * half_dlon.sin().powi(2);
    let versin_psi = versin_dlat + point.cos_lat * cos_lat_c * versin_dlon;

    let dr = point.radius - rt;
    dr * dr + 2.0 * point.radius * rt * versin_psi
}

/// Angular distance between two points on a sphere (Vincenty formula)
fn great_circle(lat1: f64, lat2: f64, dlon: f64) -> f64 {
    let (s1, c1) = lat1.sin_cos();
    let (s2, c2) = lat2.sin_cos();
    let (sd, cd) = dlon.sin_cos();
    let num = ((c2 * sd).powi(2) + (c1 * s2 - s1 * c2 * cd).powi(2)).sqrt();
    let den = s1 * s2 + c1 * c2 * cd;
    num.atan2(den)
}

/// Partition `indices` into points far enough from `tesseroid` for direct
/// quadrature (prefix) and points that need refinement (suffix).
///
/// A point is close when its squared distance to the cell centre is below
/// `(ratio·size)²`, where size is the largest of the two arc lengths on the top
/// surface and the radial thickness. Returns the index of the first close
/// entry. Order inside each part is unspecified.
pub fn too_close(
    tesseroid: &Tesseroid,
    points: &ObservationPoints,
    indices: &mut [usize],
    ratio: f64,
    mean_radius: f64,
) -> Result<usize> {
    let r_top = mean_radius + tesseroid.top();
    let size = (r_top * D2R * (tesseroid.east() - tesseroid.west()))
        .max(r_top * D2R * (tesseroid.north() - tesseroid.south()))
        .max(tesseroid.top() - tesseroid.bottom());
    let threshold = (size * ratio).powi(2);

    let mut i = 0;
    let mut j = indices.len();
    while i < j {
        let point = indices[i];
        let distance_sqr = center_distance_sqr(tesseroid, &points.point(point), mean_radius);
        if distance_sqr < DEGENERATE_DISTANCE_SQR {
            return Err(TesseroidError::DegenerateGeometry {
                point,
                distance_sqr,
            });
        }
        if distance_sqr >= threshold {
            i += 1;
        } else {
            j -= 1;
            indices.swap(i, j);
        }
    }
    log::trace!(
        "too_close: {} far, {} close (threshold {:.6e} m^2)",
        i,
        indices.len() - i,
        threshold
    );
    Ok(i)
}

/// Distance from `point` to the centre of `tesseroid` and the cell's extents
///
/// Horizontal extents are great-circle arcs on the top surface through the cell
/// centre, which stay accurate near the poles and for wide cells.
pub fn distance_and_extent(
    tesseroid: &Tesseroid,
    point: &ObservationPoint,
    mean_radius: f64,
) -> CellExtent {
    let distance = center_distance_sqr(tesseroid, point, mean_radius).sqrt();
    let r_top = mean_radius + tesseroid.top();
    let lat_mid = D2R * 0.5 * (tesseroid.south() + tesseroid.north());
    let half_dlon = D2R * 0.5 * (tesseroid.east() - tesseroid.west());

    // Measured as twice the half width so cells up to 360° wide stay monotonic.
    let lon = 2.0 * r_top * great_circle(lat_mid, lat_mid, half_dlon);
    let lat = r_top * great_circle(D2R * tesseroid.south(), D2R * tesseroid.north(), 0.0);

    CellExtent {
        distance,
        lon,
        lat,
        radial: tesseroid.top() - tesseroid.bottom(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MEAN_EARTH_RADIUS;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn grid_points() -> ObservationPoints {
        let mut lon = Vec::new();
        let mut lat = Vec::new();
        let mut height = Vec::new();
        for i in 0..15 {
            for j in 0..11 {
                lon.push(-7.0 + i as f64);
                lat.push(-5.0 + j as f64);
                height.push(if (i + j) % 3 == 0 { 1000.0 } else { 250_000.0 });
            }
        }
        ObservationPoints::from_geographic(&lon, &lat, &height, MEAN_EARTH_RADIUS).unwrap()
    }

    #[test]
    fn test_too_close_partitions_exactly() {
        let t = Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, -20_000.0).unwrap();
        let points = grid_points();
        let mut indices: Vec<usize> = (0..points.len()).collect();
        let ratio = 2.0;

        let split = too_close(&t, &points, &mut indices, ratio, MEAN_EARTH_RADIUS).unwrap();
        assert!(split > 0 && split < indices.len());

        let r_top = MEAN_EARTH_RADIUS;
        let size = (r_top * 2.0 * D2R).max(20_000.0);
        let threshold = (size * ratio).powi(2);
        for &i in &indices[..split] {
            let d2 = center_distance_sqr(&t, &points.point(i), MEAN_EARTH_RADIUS);
            assert!(d2 >= threshold);
        }
        for &i in &indices[split..] {
            let d2 = center_distance_sqr(&t, &points.point(i), MEAN_EARTH_RADIUS);
            assert!(d2 < threshold);
        }

        let unique: HashSet<usize> = indices.iter().copied().collect();
        assert_eq!(unique.len(), points.len());
        assert!(unique.iter().all(|&i| i < points.len()));
    }

    #[test]
    fn test_too_close_subset() {
        let t = Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, -20_000.0).unwrap();
        let points = grid_points();
        let mut indices = vec![0, 5, 17, 80, 164];
        too_close(&t, &points, &mut indices, 1.0, MEAN_EARTH_RADIUS).unwrap();

        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 5, 17, 80, 164]);
    }

    #[test]
    fn test_too_close_degenerate() {
        let t = Tesseroid::new(-1.0, 1.0, -1.0, 1.0, 0.0, -20_000.0).unwrap();
        let points = ObservationPoints::from_geographic(
            &[50.0, 0.0],
            &[0.0, 0.0],
            &[0.0, -10_000.0],
            MEAN_EARTH_RADIUS,
        )
        .unwrap();
        let mut indices = vec![0, 1];
        let err = too_close(&t, &points, &mut indices, 1.0, MEAN_EARTH_RADIUS).unwrap_err();
        assert!(matches!(err, TesseroidError::DegenerateGeometry { point: 1, .. }));
    }

    #[test]
    fn test_distance_directly_above() {
        let t = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
        let points =
            ObservationPoints::from_geographic(&[0.0], &[0.0], &[100_000.0], MEAN_EARTH_RADIUS)
                .unwrap();
        let extent = distance_and_extent(&t, &points.point(0), MEAN_EARTH_RADIUS);
        assert_relative_eq!(extent.distance, 105_000.0, max_relative = 1e-9);
        assert_relative_eq!(extent.radial, 10_000.0);
        assert_relative_eq!(extent.lat, MEAN_EARTH_RADIUS * D2R, max_relative = 1e-12);
        assert_relative_eq!(extent.lon, MEAN_EARTH_RADIUS * D2R, max_relative = 1e-12);
    }

    #[test]
    fn test_lon_extent_shrinks_towards_pole() {
        let point = ObservationPoint {
            lon: 0.0,
            sin_lat: 0.0,
            cos_lat: 1.0,
            radius: 2.0 * MEAN_EARTH_RADIUS,
        };
        let equator = Tesseroid::new(0.0, 10.0, -1.0, 1.0, 0.0, -1000.0).unwrap();
        let polar = Tesseroid::new(0.0, 10.0, 79.0, 81.0, 0.0, -1000.0).unwrap();
        let e = distance_and_extent(&equator, &point, MEAN_EARTH_RADIUS);
        let p = distance_and_extent(&polar, &point, MEAN_EARTH_RADIUS);
        assert!(p.lon < 0.2 * e.lon);
        assert_relative_eq!(p.lat, e.lat, max_relative = 1e-12);
    }

    #[test]
    fn test_global_cell_extent() {
        let point = ObservationPoint {
            lon: 0.0,
            sin_lat: 0.0,
            cos_lat: 1.0,
            radius: 2.0 * MEAN_EARTH_RADIUS,
        };
        let t = Tesseroid::new(-180.0, 180.0, -10.0, 10.0, 0.0, -1000.0).unwrap();
        let extent = distance_and_extent(&t, &point, MEAN_EARTH_RADIUS);
        assert_relative_eq!(
            extent.lon,
            2.0 * std::f64::consts::PI * MEAN_EARTH_RADIUS,
            max_relative = 1e-12
        );
    }
}
