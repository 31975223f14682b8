//! Configuration for the surface mapper.

use crate::error::{MappingError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the surface mapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Intersections with an area at or below this are treated as no overlap.
    /// Also the threshold below which a triangle counts as degenerate.
    pub area_epsilon: f64,

    /// Intersect triangles on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            area_epsilon: 1e-9,
            parallel: true,
        }
    }
}

impl MapperConfig {
    /// Apply `MAPPER_*` overrides from a `KEY -> value` lookup such as
    /// `std::env::var`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("MAPPER_AREA_EPSILON") {
            self.area_epsilon = val.parse().map_err(|_| {
                MappingError::config_error(format!("MAPPER_AREA_EPSILON is not a number: {}", val))
            })?;
        }

        if let Some(val) = lookup("MAPPER_PARALLEL") {
            self.parallel = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
        }

        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.area_epsilon.is_finite() || self.area_epsilon < 0.0 {
            return Err(MappingError::config_error(format!(
                "area_epsilon must be finite and >= 0, got {}",
                self.area_epsilon
            )));
        }
        Ok(())
    }
}
