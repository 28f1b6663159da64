use crate::image::{classify_voxel, VoxelView};
use crate::params::ShollParams;
use crate::types::{Bounds, PointI3};
use rayon::prelude::*;

const FACE_NEIGHBORS: [(i32, i32, i32); 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// Foreground voxels forming the digital shell of `radius` (physical units)
/// around the configured center.
///
/// The per-radius bounding box, clipped to the analysis bounds, is scanned
/// and a voxel is kept when its anisotropic Euclidean distance to the center
/// lies within ±0.5 of the target radius, its intensity falls inside the
/// threshold band, and — with `skip_single_voxels` set — at least one of its
/// 6 face neighbors is also foreground.
///
/// Slices are scanned in parallel; the result is ordered by z, then y, then x,
/// so the scan stays deterministic.
pub fn shell_points<V>(stack: &V, params: &ShollParams, radius: f64) -> Vec<PointI3>
where
    V: VoxelView + Sync,
{
    let c = params.center;
    let r_xy = (radius / params.vx_wh).round() as i32;
    let r_z = (radius / params.vx_d).round() as i32;
    let scan = Bounds::around(c, r_xy, r_z).intersect(&params.bounds);
    if scan.min_x > scan.max_x || scan.min_y > scan.max_y || scan.min_z > scan.max_z {
        return Vec::new();
    }

    let band = params.threshold;
    (scan.min_z..=scan.max_z)
        .into_par_iter()
        .map(|z| {
            let mut slice = Vec::new();
            let dz = (z - c.z) as f64 * params.vx_d;
            for y in scan.min_y..=scan.max_y {
                let dy = (y - c.y) as f64 * params.vx_wh;
                for x in scan.min_x..=scan.max_x {
                    let dx = (x - c.x) as f64 * params.vx_wh;
                    let dist = (dx * dx + dy * dy + dz * dz).sqrt();
                    if (dist - radius).abs() >= 0.5 {
                        continue;
                    }
                    if !classify_voxel(stack, band, x, y, z) {
                        continue;
                    }
                    if params.skip_single_voxels && !has_face_neighbor(stack, params, x, y, z) {
                        continue;
                    }
                    slice.push(PointI3::new(x, y, z));
                }
            }
            slice
        })
        .reduce(Vec::new, |mut acc, mut slice| {
            acc.append(&mut slice);
            acc
        })
}

/// True when at least one 6-connected neighbor is foreground. Out-of-stack
/// positions read as background.
fn has_face_neighbor<V: VoxelView>(stack: &V, params: &ShollParams, x: i32, y: i32, z: i32) -> bool {
    FACE_NEIGHBORS
        .iter()
        .any(|&(ox, oy, oz)| classify_voxel(stack, params.threshold, x + ox, y + oy, z + oz))
}
