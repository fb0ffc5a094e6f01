//! Adaptive refinement of tesseroids close to the observation point
//!
//! The 2×2×2 rule loses accuracy once a cell is large compared to its distance
//! from the point. For every point the engine walks an explicit work list of
//! sub-cells: a cell whose extent along an axis exceeds `distance / ratio` is
//! halved along that axis, every other cell is integrated directly.
//!
//! The work list is a preallocated stack reused across the points of one call.
//! Running out of room is reported as [`TesseroidError::RefinementOverflow`]
//! rather than truncating the sum.
//!
//! Contributions are buffered and only added to the caller's result once the
//! whole batch has succeeded, so a failed call leaves the result untouched.

use ndarray::Array1;

use crate::config::TesseroidConfig;
use crate::constants::DEGENERATE_DISTANCE_SQR;
use crate::error::{Result, TesseroidError};
use crate::kernels::{Field, evaluate_direct};
use crate::proximity::{distance_and_extent, too_close};
use crate::quadrature::scale_nodes;
use crate::tesseroid::{ObservationPoint, ObservationPoints, Tesseroid};

/// Work done by an adaptive evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefinementStats {
    /// Number of refining points
    pub points: usize,
    /// Cells integrated with the quadrature rule
    pub evaluated_cells: usize,
    /// Cells replaced by their children
    pub split_cells: usize,
    /// Largest number of outstanding cells seen in the work list
    pub max_stack_depth: usize,
}

impl RefinementStats {
    pub(crate) fn merge(&mut self, other: &RefinementStats) {
        self.points += other.points;
        self.evaluated_cells += other.evaluated_cells;
        self.split_cells += other.split_cells;
        self.max_stack_depth = self.max_stack_depth.max(other.max_stack_depth);
    }
}

/// Fixed-capacity stack of cells awaiting evaluation or splitting
struct WorkList {
    cells: Vec<Tesseroid>,
    capacity: usize,
}

impl WorkList {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    fn push(&mut self, cell: Tesseroid, point: usize) -> Result<()> {
        if self.cells.len() >= self.capacity {
            return Err(TesseroidError::RefinementOverflow {
                point,
                capacity: self.capacity,
            });
        }
        self.cells.push(cell);
        Ok(())
    }

    #[inline]
    fn pop(&mut self) -> Option<Tesseroid> {
        self.cells.pop()
    }

    fn clear(&mut self) {
        self.cells.clear();
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

fn check_ratio(ratio: f64) -> Result<()> {
    if !(ratio.is_finite() && ratio > 0.0) {
        return Err(TesseroidError::InvalidConfig(format!(
            "ratio must be positive, got {}",
            ratio
        )));
    }
    Ok(())
}

/// Refine `tesseroid` for one point and return the unscaled integral
fn refine_point(
    tesseroid: &Tesseroid,
    index: usize,
    point: &ObservationPoint,
    ratio: f64,
    field: Field,
    config: &TesseroidConfig,
    stack: &mut WorkList,
    stats: &mut RefinementStats,
) -> Result<f64> {
    stack.clear();
    stack.push(*tesseroid, index)?;
    stats.points += 1;
    stats.max_stack_depth = stats.max_stack_depth.max(stack.len());

    let mut sum = 0.0;
    while let Some(cell) = stack.pop() {
        let extent = distance_and_extent(&cell, point, config.mean_radius);
        let distance_sqr = extent.distance * extent.distance;
        if distance_sqr < DEGENERATE_DISTANCE_SQR {
            return Err(TesseroidError::DegenerateGeometry {
                point: index,
                distance_sqr,
            });
        }

        let split_lon = extent.distance < ratio * extent.lon;
        let split_lat = extent.distance < ratio * extent.lat;
        let split_r = extent.distance < ratio * extent.radial;

        if split_lon || split_lat || split_r {
            for child in cell.split(split_lon, split_lat, split_r).as_slice() {
                stack.push(*child, index)?;
            }
            stats.split_cells += 1;
            stats.max_stack_depth = stats.max_stack_depth.max(stack.len());
        } else {
            let nodes = scale_nodes(&cell, &config.abscissas, config.mean_radius);
            sum += field.integrate(point, &nodes);
            stats.evaluated_cells += 1;
        }
    }
    Ok(sum)
}

/// Evaluate `field` for the points in `indices` with adaptive refinement
///
/// Every listed point is refined independently; `density` times each integral
/// is added to `result` only after all points succeeded.
///
/// # Panics
/// Panics if an entry of `indices` is out of bounds for `points`.
pub fn evaluate_adaptive(
    tesseroid: &Tesseroid,
    density: f64,
    ratio: f64,
    points: &ObservationPoints,
    indices: &[usize],
    field: Field,
    config: &TesseroidConfig,
    result: &mut Array1<f64>,
) -> Result<RefinementStats> {
    points.check_result_len(result)?;
    check_ratio(ratio)?;

    let mut stack = WorkList::with_capacity(config.stack_capacity);
    let mut stats = RefinementStats::default();
    let mut contributions = Vec::with_capacity(indices.len());
    for &i in indices {
        let value = refine_point(
            tesseroid,
            i,
            &points.point(i),
            ratio,
            field,
            config,
            &mut stack,
            &mut stats,
        )?;
        contributions.push((i, density * value));
    }
    for (i, value) in contributions {
        result[i] += value;
    }

    if stats.points > 0 {
        log::debug!(
            "{} adaptive: {} points, {} cells evaluated, {} split, max stack {}",
            field,
            stats.points,
            stats.evaluated_cells,
            stats.split_cells,
            stats.max_stack_depth
        );
    }
    Ok(stats)
}

/// Add the contribution of one tesseroid to every point of the batch
///
/// Points are screened with [`too_close`]: far points share one direct
/// quadrature, close points go through [`evaluate_adaptive`]. On error
/// `result` is left unchanged.
pub fn evaluate(
    tesseroid: &Tesseroid,
    density: f64,
    ratio: f64,
    points: &ObservationPoints,
    field: Field,
    config: &TesseroidConfig,
    result: &mut Array1<f64>,
) -> Result<RefinementStats> {
    points.check_result_len(result)?;
    check_ratio(ratio)?;
    let mut indices: Vec<usize> = (0..points.len()).collect();
    let first_close = too_close(tesseroid, points, &mut indices, ratio, config.mean_radius)?;
    let (far, close) = indices.split_at(first_close);

    if close.is_empty() {
        evaluate_direct(tesseroid, density, points, far, field, config, result)?;
        return Ok(RefinementStats::default());
    }

    let mut refined = Array1::zeros(points.len());
    let stats = evaluate_adaptive(
        tesseroid,
        density,
        ratio,
        points,
        close,
        field,
        config,
        &mut refined,
    )?;
    evaluate_direct(tesseroid, density, points, far, field, config, result)?;
    for &i in close {
        result[i] += refined[i];
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn points(lon: &[f64], lat: &[f64], height: &[f64]) -> ObservationPoints {
        ObservationPoints::from_geographic(lon, lat, height, TesseroidConfig::default().mean_radius)
            .unwrap()
    }

    #[test]
    fn test_no_split_equals_direct() {
        let config = TesseroidConfig::default();
        let t = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
        let pts = points(&[3.0, -2.0], &[1.0, 4.0], &[1000.0, 50_000.0]);

        for field in Field::ALL {
            let mut adaptive = Array1::zeros(2);
            let stats = evaluate_adaptive(&t, 2.67, 1.0, &pts, &[0, 1], field, &config, &mut adaptive)
                .unwrap();
            assert_eq!(stats.split_cells, 0);
            assert_eq!(stats.evaluated_cells, 2);

            let mut direct = Array1::zeros(2);
            evaluate_direct(&t, 2.67, &pts, &[0, 1], field, &config, &mut direct).unwrap();
            assert_eq!(adaptive, direct, "{} differs", field);
        }
    }

    #[test]
    fn test_close_point_splits() {
        let config = TesseroidConfig::default();
        let t = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
        let pts = points(&[0.0], &[0.0], &[1000.0]);
        let mut result = Array1::zeros(1);

        let stats = evaluate_adaptive(&t, 1.0, 8.0, &pts, &[0], Field::Gzz, &config, &mut result)
            .unwrap();
        assert!(stats.split_cells > 0);
        assert!(stats.evaluated_cells > 8);
        assert!(stats.max_stack_depth < config.stack_capacity);
        assert!(result[0] > 0.0);
    }

    #[test]
    fn test_overflow_leaves_result_untouched() {
        let config = TesseroidConfig {
            stack_capacity: 16,
            ..Default::default()
        };
        let t = Tesseroid::new(-5.0, 5.0, -5.0, 5.0, 0.0, -10_000.0).unwrap();
        let pts = points(&[120.0, 0.0], &[0.0, 0.0], &[0.0, 1000.0]);
        let mut result = Array1::from_elem(2, 7.0);

        let err = evaluate_adaptive(&t, 1.0, 8.0, &pts, &[0, 1], Field::Gzz, &config, &mut result)
            .unwrap_err();
        assert!(matches!(
            err,
            TesseroidError::RefinementOverflow {
                point: 1,
                capacity: 16
            }
        ));
        assert_eq!(result, Array1::from_elem(2, 7.0));
    }

    #[test]
    fn test_point_at_centre_is_degenerate() {
        let config = TesseroidConfig::default();
        let t = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
        let pts = points(&[0.0], &[0.0], &[-5000.0]);
        let mut result = Array1::zeros(1);

        let err = evaluate_adaptive(&t, 1.0, 1.0, &pts, &[0], Field::Potential, &config, &mut result)
            .unwrap_err();
        assert!(err.is_geometry_error());
        assert_eq!(result[0], 0.0);
    }

    #[test]
    fn test_evaluate_combines_direct_and_adaptive() {
        let config = TesseroidConfig::default();
        let t = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
        let pts = points(&[0.0, 10.0], &[0.0, 10.0], &[5000.0, 5000.0]);

        let mut combined = Array1::zeros(2);
        let stats = evaluate(&t, 1.0, 1.6, &pts, Field::Gz, &config, &mut combined).unwrap();
        assert_eq!(stats.points, 1);

        let mut adaptive = Array1::zeros(2);
        evaluate_adaptive(&t, 1.0, 1.6, &pts, &[0, 1], Field::Gz, &config, &mut adaptive).unwrap();
        assert_relative_eq!(combined[0], adaptive[0], max_relative = 1e-14);
        assert_relative_eq!(combined[1], adaptive[1], max_relative = 1e-14);
    }

    #[test]
    fn test_rejects_bad_ratio() {
        let config = TesseroidConfig::default();
        let t = Tesseroid::new(-0.5, 0.5, -0.5, 0.5, 0.0, -10_000.0).unwrap();
        let pts = points(&[0.0], &[0.0], &[5000.0]);
        let mut result = Array1::zeros(1);
        let err = evaluate_adaptive(&t, 1.0, 0.0, &pts, &[0], Field::Gz, &config, &mut result)
            .unwrap_err();
        assert!(err.is_config_error());
    }
}
