//! Tesseroid cells and observation point batches

use ndarray::Array1;

use crate::constants::D2R;
use crate::error::{Result, TesseroidError};

/// A spherical prism bounded by two meridians, two parallels and two
/// concentric spheres.
///
/// Longitudes and latitudes are in degrees; `top` and `bottom` are heights in
/// metres relative to the mean radius of the reference sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tesseroid {
    west: f64,
    east: f64,
    south: f64,
    north: f64,
    top: f64,
    bottom: f64,
}

impl Tesseroid {
    /// Create a tesseroid, checking `west < east`, `south < north` and `top > bottom`
    pub fn new(west: f64, east: f64, south: f64, north: f64, top: f64, bottom: f64) -> Result<Self> {
        let finite = [west, east, south, north, top, bottom]
            .iter()
            .all(|v| v.is_finite());
        if !finite || west >= east || south >= north || top <= bottom {
            return Err(TesseroidError::InvalidBounds {
                west,
                east,
                south,
                north,
                top,
                bottom,
            });
        }
        Ok(Self::from_bounds(west, east, south, north, top, bottom))
    }

    /// Build a cell without validation. Only used for children of a valid cell.
    pub(crate) fn from_bounds(
        west: f64,
        east: f64,
        south: f64,
        north: f64,
        top: f64,
        bottom: f64,
    ) -> Self {
        Self {
            west,
            east,
            south,
            north,
            top,
            bottom,
        }
    }

    /// Western longitude bound (degrees)
    pub fn west(&self) -> f64 {
        self.west
    }

    /// Eastern longitude bound (degrees)
    pub fn east(&self) -> f64 {
        self.east
    }

    /// Southern latitude bound (degrees)
    pub fn south(&self) -> f64 {
        self.south
    }

    /// Northern latitude bound (degrees)
    pub fn north(&self) -> f64 {
        self.north
    }

    /// Top height (m)
    pub fn top(&self) -> f64 {
        self.top
    }

    /// Bottom height (m)
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    /// Geometric centre as (longitude deg, latitude deg, height m)
    pub fn center(&self) -> (f64, f64, f64) {
        (
            0.5 * (self.west + self.east),
            0.5 * (self.south + self.north),
            0.5 * (self.top + self.bottom),
        )
    }

    /// Exact volume (m³) on a sphere of the given mean radius
    pub fn volume(&self, mean_radius: f64) -> f64 {
        let r_top = mean_radius + self.top;
        let r_bottom = mean_radius + self.bottom;
        D2R * (self.east - self.west)
            * ((D2R * self.north).sin() - (D2R * self.south).sin())
            * (r_top.powi(3) - r_bottom.powi(3))
            / 3.0
    }

    /// Split the flagged axes into two equal halves each.
    ///
    /// Unflagged axes are kept whole, so the result holds 1, 2, 4 or 8 cells.
    pub fn split(&self, lon: bool, lat: bool, radial: bool) -> Split {
        let lon_mid = 0.5 * (self.west + self.east);
        let lat_mid = 0.5 * (self.south + self.north);
        let r_mid = 0.5 * (self.top + self.bottom);

        let lons = halves(lon, (self.west, lon_mid), (lon_mid, self.east));
        let lats = halves(lat, (self.south, lat_mid), (lat_mid, self.north));
        let radii = halves(radial, (self.top, r_mid), (r_mid, self.bottom));

        let mut split = Split {
            cells: [*self; 8],
            len: 0,
        };
        for &(w, e) in lons.as_slice() {
            for &(s, n) in lats.as_slice() {
                for &(t, b) in radii.as_slice() {
                    split.cells[split.len] = Self::from_bounds(w, e, s, n, t, b);
                    split.len += 1;
                }
            }
        }
        split
    }
}

/// Bounds along one axis: both halves when split, the whole range otherwise
fn halves(split: bool, first: (f64, f64), second: (f64, f64)) -> AxisRanges {
    let whole = (first.0, second.1);
    if split {
        AxisRanges {
            ranges: [first, second],
            len: 2,
        }
    } else {
        AxisRanges {
            ranges: [whole, whole],
            len: 1,
        }
    }
}

struct AxisRanges {
    ranges: [(f64, f64); 2],
    len: usize,
}

impl AxisRanges {
    fn as_slice(&self) -> &[(f64, f64)] {
        &self.ranges[..self.len]
    }
}

/// Children of a split tesseroid, stored inline
#[derive(Debug, Clone, Copy)]
pub struct Split {
    cells: [Tesseroid; 8],
    len: usize,
}

impl Split {
    /// The child cells
    pub fn as_slice(&self) -> &[Tesseroid] {
        &self.cells[..self.len]
    }

    /// Number of child cells
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a split yields at least the unsplit cell
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// One observation point in precomputed spherical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationPoint {
    /// Longitude (radians)
    pub lon: f64,
    /// Sine of latitude
    pub sin_lat: f64,
    /// Cosine of latitude
    pub cos_lat: f64,
    /// Geocentric radius (m)
    pub radius: f64,
}

/// Batch of observation points stored as parallel arrays
#[derive(Debug, Clone)]
pub struct ObservationPoints {
    lon: Array1<f64>,
    sin_lat: Array1<f64>,
    cos_lat: Array1<f64>,
    radius: Array1<f64>,
}

impl ObservationPoints {
    /// Wrap precomputed arrays (longitude in radians, sin/cos latitude, radius in m)
    pub fn new(
        lon: Array1<f64>,
        sin_lat: Array1<f64>,
        cos_lat: Array1<f64>,
        radius: Array1<f64>,
    ) -> Result<Self> {
        let expected = lon.len();
        for got in [sin_lat.len(), cos_lat.len(), radius.len()] {
            if got != expected {
                return Err(TesseroidError::LengthMismatch { expected, got });
            }
        }
        Ok(Self {
            lon,
            sin_lat,
            cos_lat,
            radius,
        })
    }

    /// Precompute the arrays from geographic longitude/latitude (degrees) and
    /// height (m) above a sphere of radius `mean_radius`
    pub fn from_geographic(
        lon: &[f64],
        lat: &[f64],
        height: &[f64],
        mean_radius: f64,
    ) -> Result<Self> {
        let expected = lon.len();
        for got in [lat.len(), height.len()] {
            if got != expected {
                return Err(TesseroidError::LengthMismatch { expected, got });
            }
        }
        let lon_rad = lon.iter().map(|&l| D2R * l).collect::<Array1<f64>>();
        let sin_lat = lat.iter().map(|&l| (D2R * l).sin()).collect::<Array1<f64>>();
        let cos_lat = lat.iter().map(|&l| (D2R * l).cos()).collect::<Array1<f64>>();
        let radius = height
            .iter()
            .map(|&h| mean_radius + h)
            .collect::<Array1<f64>>();
        Self::new(lon_rad, sin_lat, cos_lat, radius)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.lon.len()
    }

    /// True when the batch holds no points
    pub fn is_empty(&self) -> bool {
        self.lon.is_empty()
    }

    /// Point `i` of the batch
    #[inline]
    pub fn point(&self, i: usize) -> ObservationPoint {
        ObservationPoint {
            lon: self.lon[i],
            sin_lat: self.sin_lat[i],
            cos_lat: self.cos_lat[i],
            radius: self.radius[i],
        }
    }

    /// Check that a result array matches this batch
    pub(crate) fn check_result_len(&self, result: &Array1<f64>) -> Result<()> {
        if result.len() != self.len() {
            return Err(TesseroidError::LengthMismatch {
                expected: self.len(),
                got: result.len(),
            });
        }
        Ok(())
    }
}
