//! JSON configuration for tesseroid field evaluation

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::{
    DEFAULT_STACK_CAPACITY, GAUSS_LEGENDRE_2, GRAVITATIONAL_CONSTANT, MEAN_EARTH_RADIUS,
    RATIO_GRADIENT, RATIO_GRAVITY, RATIO_POTENTIAL,
};
use crate::error::{Result, TesseroidError};
use crate::kernels::{Field, FieldKind};

/// Tunables shared by every evaluation path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TesseroidConfig {
    /// Radius of the reference sphere (m); tesseroid heights are relative to it
    #[serde(default = "default_mean_radius")]
    pub mean_radius: f64,
    /// Gravitational constant (m³ kg⁻¹ s⁻²), applied by the survey layer
    #[serde(default = "default_gravitational_constant")]
    pub gravitational_constant: f64,
    /// Gauss-Legendre abscissas on [-1, 1] used along every axis
    #[serde(default = "default_abscissas")]
    pub abscissas: [f64; 2],
    /// Maximum number of outstanding cells in the refinement work list
    #[serde(default = "default_stack_capacity")]
    pub stack_capacity: usize,
    /// Closeness ratios per field family
    #[serde(default)]
    pub ratios: RatioConfig,
}

/// Closeness ratios. A larger ratio splits cells further away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioConfig {
    /// Ratio for the potential
    #[serde(default = "default_ratio_potential")]
    pub potential: f64,
    /// Ratio for gx, gy, gz
    #[serde(default = "default_ratio_gravity")]
    pub gravity: f64,
    /// Ratio for the gradient tensor components
    #[serde(default = "default_ratio_gradient")]
    pub gradient: f64,
}

impl Default for RatioConfig {
    fn default() -> Self {
        Self {
            potential: RATIO_POTENTIAL,
            gravity: RATIO_GRAVITY,
            gradient: RATIO_GRADIENT,
        }
    }
}

impl Default for TesseroidConfig {
    fn default() -> Self {
        Self {
            mean_radius: MEAN_EARTH_RADIUS,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
            abscissas: GAUSS_LEGENDRE_2,
            stack_capacity: DEFAULT_STACK_CAPACITY,
            ratios: RatioConfig::default(),
        }
    }
}

fn default_mean_radius() -> f64 {
    MEAN_EARTH_RADIUS
}

fn default_gravitational_constant() -> f64 {
    GRAVITATIONAL_CONSTANT
}

fn default_abscissas() -> [f64; 2] {
    GAUSS_LEGENDRE_2
}

fn default_stack_capacity() -> usize {
    DEFAULT_STACK_CAPACITY
}

fn default_ratio_potential() -> f64 {
    RATIO_POTENTIAL
}

fn default_ratio_gravity() -> f64 {
    RATIO_GRAVITY
}

fn default_ratio_gradient() -> f64 {
    RATIO_GRADIENT
}

impl TesseroidConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.mean_radius.is_finite() && self.mean_radius > 0.0) {
            return Err(TesseroidError::InvalidConfig(format!(
                "mean_radius must be positive, got {}",
                self.mean_radius
            )));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(TesseroidError::InvalidConfig(
                "gravitational_constant must be finite".to_string(),
            ));
        }
        if self.stack_capacity == 0 {
            return Err(TesseroidError::InvalidConfig(
                "stack_capacity must be at least 1".to_string(),
            ));
        }
        if self.abscissas.iter().any(|x| !(x.abs() < 1.0)) {
            return Err(TesseroidError::InvalidConfig(format!(
                "abscissas must lie in (-1, 1), got {:?}",
                self.abscissas
            )));
        }
        for (name, ratio) in [
            ("potential", self.ratios.potential),
            ("gravity", self.ratios.gravity),
            ("gradient", self.ratios.gradient),
        ] {
            if !(ratio.is_finite() && ratio > 0.0) {
                return Err(TesseroidError::InvalidConfig(format!(
                    "{} ratio must be positive, got {}",
                    name, ratio
                )));
            }
        }
        Ok(())
    }

    /// Closeness ratio configured for a field component
    pub fn ratio_for(&self, field: Field) -> f64 {
        match field.kind() {
            FieldKind::Potential => self.ratios.potential,
            FieldKind::Gravity => self.ratios.gravity,
            FieldKind::Gradient => self.ratios.gradient,
        }
    }
}
