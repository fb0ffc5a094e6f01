//! Summation of a tesseroid model over an observation batch
//!
//! Adds the contribution of every cell of a model, then applies the
//! gravitational constant and converts to conventional units (m²/s² for the
//! potential, mGal for gravity, Eötvös for gradients).

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::config::TesseroidConfig;
use crate::error::Result;
use crate::kernels::Field;
use crate::refinement::{RefinementStats, evaluate};
use crate::tesseroid::{ObservationPoints, Tesseroid};

/// A tesseroid with its density (kg/m³)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelCell {
    /// Cell geometry
    pub tesseroid: Tesseroid,
    /// Density (kg/m³)
    pub density: f64,
}

impl ModelCell {
    /// Pair a tesseroid with a density
    pub fn new(tesseroid: Tesseroid, density: f64) -> Self {
        Self { tesseroid, density }
    }
}

/// What to do when one cell of the model fails to evaluate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing cell and return its error
    #[default]
    Abort,
    /// Log the failing cell and leave it out of the sum
    Skip,
}

/// Field values of a survey
#[derive(Debug, Clone)]
pub struct Survey {
    /// Field component
    pub field: Field,
    /// One value per observation point, in conventional units
    pub values: Array1<f64>,
    /// Refinement work over all cells
    pub stats: RefinementStats,
    /// Indices of model cells left out under [`FailurePolicy::Skip`]
    pub skipped: Vec<usize>,
}

/// Compute `field` of a whole model at every point of the batch
///
/// Cells with zero density are ignored. Under [`FailurePolicy::Skip`] a cell
/// that fails contributes nothing; its index is reported in
/// [`Survey::skipped`].
pub fn compute_field(
    field: Field,
    points: &ObservationPoints,
    model: &[ModelCell],
    config: &TesseroidConfig,
    policy: FailurePolicy,
) -> Result<Survey> {
    config.validate()?;
    let ratio = config.ratio_for(field);
    let mut values = Array1::zeros(points.len());
    let mut stats = RefinementStats::default();
    let mut skipped = Vec::new();

    for (index, cell) in model.iter().enumerate() {
        if cell.density == 0.0 {
            continue;
        }
        match evaluate(
            &cell.tesseroid,
            cell.density,
            ratio,
            points,
            field,
            config,
            &mut values,
        ) {
            Ok(cell_stats) => stats.merge(&cell_stats),
            Err(err) => match policy {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Skip => {
                    log::warn!("skipping model cell {} for {}: {}", index, field, err);
                    skipped.push(index);
                }
            },
        }
    }

    values *= config.gravitational_constant * field.si_factor();
    Ok(Survey {
        field,
        values,
        stats,
        skipped,
    })
}
