//! Common text fixtures for mesh-exchange tests.
//!
//! The three files describe one small scene: a 3x3 grid over `[0, 3] x [0, 3]`
//! and a two-facet triangle list inside it, plus a value file aligned to
//! that triangle list.

use std::io::Write;
use tempfile::NamedTempFile;

/// ASCII grid fixtures.
pub mod ascii_grid {
    /// 3x3 unit grid with lower-left corner at the origin.
    ///
    /// Cell (1, 1) holds the file's own nodata value and cell (2, 2) holds
    /// the project sentinel 9999; both load as `NaN`.
    pub const GRID_3X3: &str = "\
ncols         3
nrows         3
xllcorner     0.0
yllcorner     0.0
cellsize      1.0
NODATA_value  -9999
1 2 3
4 -9999 6
7 8 9999
";

    /// Same grid using centre-registered origin keys and mixed-case names.
    pub const GRID_3X3_CENTER: &str = "\
NCOLS 3
NROWS 3
XLLCENTER 0.5
YLLCENTER 0.5
CELLSIZE 1.0
1 2 3
4 5 6
7 8 9
";

    /// Header promises 2x2 but only three values follow.
    pub const SHORT_DATA: &str = "\
ncols 2
nrows 2
xllcorner 0
yllcorner 0
cellsize 1
1 2 3
";

    /// `cellsize` is missing.
    pub const MISSING_CELLSIZE: &str = "\
ncols 2
nrows 2
xllcorner 0
yllcorner 0
1 2
3 4
";
}

/// Triangle-list (`.cir`) fixtures.
pub mod triangle_list {
    /// Two facets: `f1` with two triangles and a normal line, `f2` with one.
    ///
    /// Each block lists a closing fourth point, which is ignored.
    pub const TWO_FACETS: &str = "\
f1 2
0.0 0.0 1.0
c1
4
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
0.0 0.0 0.0
c2
4
1.0 0.0 0.0
1.0 1.0 0.0
0.0 1.0 0.0
1.0 0.0 0.0
f2 1
c3
3
1.0 1.0 2.0
2.5 1.0 2.0
2.5 2.5 2.0
";

    /// `f1` promises three triangles but only one block follows.
    pub const TRUNCATED: &str = "\
f1 3
c1
3
0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
";

    /// Triangle facet sizes of [`TWO_FACETS`].
    pub const TWO_FACETS_SIZES: [usize; 2] = [2, 1];
}

/// Scalar-value (`.val`) fixtures.
pub mod scalar_values {
    /// Values aligned to [`super::triangle_list::TWO_FACETS`].
    pub const TWO_FACETS: &str = "2 2\t 1.50 3.25\nf1 2\n\t1.50\n\t2.00\nf2 1\n\t3.25\n";

    /// The values stored in [`TWO_FACETS`], in facet order.
    pub const TWO_FACETS_VALUES: [f64; 3] = [1.5, 2.0, 3.25];

    /// Facet sizes `[1, 2]`, which disagree with the triangle-list fixture.
    pub const MISMATCHED: &str = "2 2\t 0.00 4.00\nf1 1\n\t0.00\nf2 2\n\t4.00\n\t0.00\n";
}

/// Write `contents` to a fresh temporary file that is removed on drop.
pub fn temp_file_with(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}
