use std::sync::Arc;

use crate::geom::{PreparedShape, Projection, Shape};

/// A statistical zone (e.g. a Destination Zone) with one value for one census year.
#[derive(Debug, Clone)]
pub struct Zone {
    code: Arc<str>,
    value: Option<f64>,
    shape: Shape,             // Geographic lon/lat, for point lookups
    prepared: PreparedShape,  // Projected and cleaned, for overlay
}

impl Zone {
    /// Build a zone, projecting and cleaning its geometry once.
    /// Non-finite values are stored as missing.
    pub fn new(code: impl Into<Arc<str>>, value: Option<f64>, shape: Shape, projection: &Projection) -> Self {
        let prepared = PreparedShape::new(&shape, projection);
        Self {
            code: code.into(),
            value: value.filter(|v| v.is_finite()),
            shape,
            prepared,
        }
    }

    /// Get the zone code.
    #[inline] pub fn code(&self) -> &str { &self.code }

    /// Get the attribute value, if present and finite.
    #[inline] pub fn value(&self) -> Option<f64> { self.value }

    /// Get the attribute value, with missing values counted as 0.
    #[inline] pub fn value_or_zero(&self) -> f64 { self.value.unwrap_or(0.0) }

    /// Get the geographic shape.
    #[inline] pub fn shape(&self) -> &Shape { &self.shape }

    /// Get the projected, cleaned shape.
    #[inline] pub fn prepared(&self) -> &PreparedShape { &self.prepared }
}
