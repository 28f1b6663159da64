use serde::{Deserialize, Serialize};

/// Integer lattice point in the sampling plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointI2 {
    pub x: i32,
    pub y: i32,
}

impl PointI2 {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chessboard (Chebyshev) distance. A distance of 1 underlies
    /// 8-connectivity.
    #[inline]
    pub fn chebyshev(&self, other: &PointI2) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Integer lattice point in a voxel stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointI3 {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl PointI3 {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn xy(&self) -> PointI2 {
        PointI2::new(self.x, self.y)
    }

    /// 3D chessboard distance: the lateral Chebyshev distance combined with
    /// the axial offset. A distance of 1 underlies 26-connectivity.
    #[inline]
    pub fn chebyshev(&self, other: &PointI3) -> i32 {
        let lateral = (self.x - other.x).abs().max((self.y - other.y).abs());
        lateral.max((self.z - other.z).abs())
    }
}

/// Inclusive axis-aligned box restricting the analysis. For 2D images the z
/// range is `0..=0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Bounds {
    /// Bounds covering a full `w × h` image.
    pub fn for_image(w: usize, h: usize) -> Self {
        Self {
            min_x: 0,
            max_x: w as i32 - 1,
            min_y: 0,
            max_y: h as i32 - 1,
            min_z: 0,
            max_z: 0,
        }
    }

    /// Bounds covering a full `w × h × d` stack.
    pub fn for_stack(w: usize, h: usize, d: usize) -> Self {
        Self {
            max_z: d as i32 - 1,
            ..Self::for_image(w, h)
        }
    }

    /// Box of lateral half-extent `r_xy` and axial half-extent `r_z` around
    /// `center`.
    pub fn around(center: PointI3, r_xy: i32, r_z: i32) -> Self {
        Self {
            min_x: center.x - r_xy,
            max_x: center.x + r_xy,
            min_y: center.y - r_xy,
            max_y: center.y + r_xy,
            min_z: center.z - r_z,
            max_z: center.z + r_z,
        }
    }

    pub fn intersect(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
            min_z: self.min_z.max(other.min_z),
            max_z: self.max_z.min(other.max_z),
        }
    }

    #[inline]
    pub fn contains_xy(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    #[inline]
    pub fn contains(&self, p: PointI3) -> bool {
        self.contains_xy(p.x, p.y) && p.z >= self.min_z && p.z <= self.max_z
    }
}

/// Inclusive intensity range defining foreground ("arbor") pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub lower: f64,
    pub upper: f64,
}

impl ThresholdBand {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Band for binary images: background is always 0, any non-zero 8-bit
    /// value is arbor.
    pub fn binary() -> Self {
        Self {
            lower: 1.0,
            upper: 255.0,
        }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}
