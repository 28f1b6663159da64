//! Connected-component counting over shell points.
//!
//! A "group" is one arbor structure crossing the sampled shell: foreground
//! points are merged whenever their chessboard distance is 1 (8-connectivity
//! in 2D, 26-connectivity in 3D). Point sets are one circumference/shell
//! long, so the all-pairs merge over a union-find stays cheap.
//!
//! The 2D counter optionally applies spike suppression: single-pixel groups
//! sitting on the edge of a "stair" of foreground pixels are digitization
//! artifacts of a shell grazing a diagonal edge, not true crossings, and are
//! subtracted from the count. The four stair patterns checked are known not
//! to cover every orientation; the correction is an approximation.

mod union_find;

use crate::types::{PointI2, PointI3};
use union_find::UnionFind;

/// Offsets of the 8 neighbors probed by spike suppression, in pattern order.
const NEIGHBORS_2D: [(i32, i32); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Count 8-connected groups among foreground circumference points.
///
/// `classify` reports whether an arbitrary pixel position is foreground; it
/// is only consulted by spike suppression, which probes the 8 neighbors of
/// singleton groups directly on the image.
pub fn count_groups<F>(points: &[PointI2], suppress_spikes: bool, classify: F) -> usize
where
    F: Fn(i32, i32) -> bool,
{
    let mut uf = UnionFind::new(points.len());
    let mut groups = points.len();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if points[i].chebyshev(&points[j]) == 1 && uf.union(i, j) {
                groups -= 1;
            }
        }
    }
    if suppress_spikes {
        groups -= count_stair_artifacts(points, &mut uf, classify);
    }
    groups
}

/// Count singleton groups that exist solely on the edge of a stair of
/// foreground pixels.
fn count_stair_artifacts<F>(points: &[PointI2], uf: &mut UnionFind, classify: F) -> usize
where
    F: Fn(i32, i32) -> bool,
{
    let mut artifacts = 0;
    for i in 0..points.len() {
        if !uf.is_singleton(i) {
            continue;
        }
        let p = points[i];
        let mut n = [false; 8];
        for (k, &(ox, oy)) in NEIGHBORS_2D.iter().enumerate() {
            n[k] = classify(p.x + ox, p.y + oy);
        }
        // Three consecutive neighbors foreground while the three
        // complementary ones are background, for all 4 rotations.
        let stair = (n[0] && n[1] && n[3] && !n[4] && !n[6] && !n[7])
            || (n[1] && n[2] && n[4] && !n[3] && !n[5] && !n[6])
            || (n[4] && n[6] && n[7] && !n[0] && !n[1] && !n[3])
            || (n[3] && n[5] && n[6] && !n[1] && !n[2] && !n[4]);
        if stair {
            artifacts += 1;
        }
    }
    artifacts
}

/// Count 26-connected groups among shell voxels. No spike suppression is
/// applied in 3D.
pub fn count_groups_3d(voxels: &[PointI3]) -> usize {
    let mut uf = UnionFind::new(voxels.len());
    let mut groups = voxels.len();
    for i in 0..voxels.len() {
        for j in (i + 1)..voxels.len() {
            if voxels[i].chebyshev(&voxels[j]) <= 1 && uf.union(i, j) {
                groups -= 1;
            }
        }
    }
    groups
}
