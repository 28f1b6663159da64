//! Shell geometry: digital circles (2D) and spherical voxel shells (3D).
//!
//! The 2D rasterizer walks one octant of the midpoint circle and mirrors it
//! across the 8 symmetric positions, removing the duplicate points that occur
//! at octant seams; this yields each lattice point of the digital circle
//! exactly once. The 3D shell is realized as a filtered scan of the
//! per-radius bounding box, keeping voxels whose anisotropic distance to the
//! center lies within half a voxel of the target radius.
//!
//! Both generators are pure functions of the center, radius and bounds; the
//! 3D scan additionally classifies voxels against the threshold band so the
//! isolated-voxel filter can probe face neighbors in the same pass.

mod circle;
mod shell;

pub use circle::circumference_points;
pub use shell::shell_points;
