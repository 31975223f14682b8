//! Converter configuration.
//!
//! Values come from an optional YAML file, then `CONVERTER_*` (and the
//! mapper's `MAPPER_*`) environment variables, then command-line flags.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use surface_mapper::{AggregationMode, MapperConfig, SampleStencil};

/// Largest number of decimals accepted for `.val` output.
pub const MAX_VALUE_PRECISION: usize = 12;

/// How grid values are carried onto triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridToMeshMethod {
    /// Exact cell/triangle overlap areas
    #[default]
    Surface,
    /// Value of the cell holding each barycenter
    Barycenter,
    /// Bilinear sample at each barycenter
    Bilinear,
    /// Mean of bilinear samples at a barycentric stencil
    Multisample,
}

impl GridToMeshMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GridToMeshMethod::Surface => "surface",
            GridToMeshMethod::Barycenter => "barycenter",
            GridToMeshMethod::Bilinear => "bilinear",
            GridToMeshMethod::Multisample => "multisample",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "surface" | "exact" => Some(GridToMeshMethod::Surface),
            "barycenter" | "centroid" => Some(GridToMeshMethod::Barycenter),
            "bilinear" => Some(GridToMeshMethod::Bilinear),
            "multisample" => Some(GridToMeshMethod::Multisample),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub mapper: MapperConfig,

    /// Reduction used by the exact mapper in both directions
    pub aggregation: AggregationMode,

    /// Grid to mesh only; mesh to grid always uses exact overlaps
    pub method: GridToMeshMethod,

    /// Stencil for the multisample method
    pub stencil: SampleStencil,

    /// Move the mesh's bounding-box centre onto the grid's before mapping
    pub align: bool,

    /// Counter-clockwise rotation applied about the mesh's mean XY, degrees
    pub rotation_deg: f64,

    /// Sentinel written for cells without a value
    pub nodata_value: f64,

    /// Decimals written to `.val` files; `None` writes every value exactly
    pub value_precision: Option<usize>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            mapper: MapperConfig::default(),
            aggregation: AggregationMode::Mean,
            method: GridToMeshMethod::Surface,
            stencil: SampleStencil::SevenPoint,
            align: true,
            rotation_deg: 0.0,
            nodata_value: mesh_common::DEFAULT_NODATA,
            value_precision: None,
        }
    }
}

impl ConverterConfig {
    /// Read a YAML file. Missing keys keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read converter config from {:?}", path.as_ref()))?;
        let config: ConverterConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse converter config from {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// File (when given), then environment. The result is validated by the
    /// caller after command-line overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_yaml(p)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a `KEY -> value` lookup using the environment
    /// variable names.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.mapper.apply_overrides(&lookup)?;
        if let Some(val) = lookup("CONVERTER_AGGREGATION") {
            self.aggregation = match AggregationMode::from_str(&val) {
                Some(mode) => mode,
                None => bail!("Unknown aggregation mode: {}", val),
            };
        }
        if let Some(val) = lookup("CONVERTER_METHOD") {
            self.method = match GridToMeshMethod::from_str(&val) {
                Some(method) => method,
                None => bail!("Unknown grid to mesh method: {}", val),
            };
        }
        if let Some(val) = lookup("CONVERTER_ALIGN") {
            self.align = parse_bool(&val);
        }
        if let Some(val) = lookup("CONVERTER_ROTATION_DEG") {
            self.rotation_deg = val
                .parse()
                .with_context(|| format!("CONVERTER_ROTATION_DEG is not a number: {}", val))?;
        }
        if let Some(val) = lookup("CONVERTER_NODATA_VALUE") {
            self.nodata_value = val
                .parse()
                .with_context(|| format!("CONVERTER_NODATA_VALUE is not a number: {}", val))?;
        }
        if let Some(val) = lookup("CONVERTER_VALUE_PRECISION") {
            self.value_precision = match val.to_lowercase().as_str() {
                "exact" | "" => None,
                digits => Some(digits.parse().with_context(|| {
                    format!("CONVERTER_VALUE_PRECISION is not an integer or 'exact': {}", val)
                })?),
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.mapper.validate()?;
        self.stencil.validate()?;

        if let Some(precision) = self.value_precision {
            if precision > MAX_VALUE_PRECISION {
                bail!(
                    "value_precision must be at most {}, got {}",
                    MAX_VALUE_PRECISION,
                    precision
                );
            }
        }
        if !self.rotation_deg.is_finite() {
            bail!("rotation_deg must be finite, got {}", self.rotation_deg);
        }
        if !self.nodata_value.is_finite() {
            bail!("nodata_value must be finite, got {}", self.nodata_value);
        }
        Ok(())
    }
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}
