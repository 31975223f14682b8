//! File formats exchanged with the mapping engine.
//!
//! - [`ascii_grid`]: ESRI ASCII rasters, read into a [`GridDescriptor`] and
//!   [`GridField`] with nodata turned into `NaN`, and written back
//! - [`triangle_list`]: the facet-grouped triangle listing (`.cir`)
//! - [`scalar_values`]: per-triangle values in facet order (`.val`)
//! - [`consistency`]: checks that a `.cir` and a `.val` belong together
//!
//! [`GridDescriptor`]: mesh_common::GridDescriptor
//! [`GridField`]: mesh_common::GridField

pub mod ascii_grid;
pub mod consistency;
pub mod error;
pub mod scalar_values;
pub mod triangle_list;

pub use ascii_grid::{format_ascii_grid, parse_ascii_grid, read_ascii_grid, write_ascii_grid, AsciiGrid};
pub use consistency::{check_consistency, check_files, ConsistencyReport, ValueStats};
pub use error::{FormatError, FormatResult};
pub use scalar_values::{
    format_scalar_values, parse_scalar_values, read_aligned, read_scalar_values, write_scalar_values,
    FIXED_PRECISION,
};
pub use triangle_list::{
    parse_facet_sizes, parse_triangle_list, read_facet_sizes, read_triangle_list, TriangleList,
};
