//! Coarse rigid placement of a mesh over a grid.
//!
//! These are plain coordinate transforms: a bounding-box centre translation
//! and an optional rotation. There is no iterative registration.

use mesh_common::{GridDescriptor, Mesh};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters applied by [`rigid_align`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    /// Counter-clockwise rotation about the mesh's mean XY, in degrees
    pub angle_deg: f64,
    pub tx: f64,
    pub ty: f64,
}

/// Translate XY so the mesh's bounding-box centre lands on the grid extent's
/// centre. Returns the moved copy and the applied `(tx, ty)`.
///
/// A mesh without points is returned unchanged with a zero translation.
pub fn bbox_translation(mesh: &Mesh, grid: &GridDescriptor) -> (Mesh, (f64, f64)) {
    let Some(bbox) = mesh.bbox() else {
        return (mesh.clone(), (0.0, 0.0));
    };

    let (gx, gy) = grid.extent().center();
    let (mx, my) = bbox.center();
    let (tx, ty) = (gx - mx, gy - my);

    debug!(tx, ty, "Translating mesh onto grid centre");
    (mesh.map_xy(|x, y| (x + tx, y + ty)), (tx, ty))
}

/// Rotate XY counter-clockwise by `angle_deg` about `centre`, defaulting to
/// the mean XY of the mesh points. Z is unchanged.
pub fn rotate_xy(mesh: &Mesh, angle_deg: f64, centre: Option<(f64, f64)>) -> Mesh {
    let Some((cx, cy)) = centre.or_else(|| mesh.mean_xy()) else {
        return mesh.clone();
    };

    let (sin, cos) = angle_deg.to_radians().sin_cos();
    mesh.map_xy(|x, y| {
        let (dx, dy) = (x - cx, y - cy);
        (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
    })
}

/// Rotate about the mesh's mean XY, then translate its bounding-box centre
/// onto the grid's centre.
pub fn rigid_align(mesh: &Mesh, grid: &GridDescriptor, angle_deg: f64) -> (Mesh, RigidTransform) {
    let rotated = if angle_deg == 0.0 {
        mesh.clone()
    } else {
        rotate_xy(mesh, angle_deg, None)
    };
    let (aligned, (tx, ty)) = bbox_translation(&rotated, grid);

    (aligned, RigidTransform { angle_deg, tx, ty })
}
