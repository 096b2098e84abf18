/// Point, colour and voxel records shared by every pipeline stage
use serde::Serialize;

/// Raw point cloud sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub r: u16,
    pub g: u16,
    pub b: u16,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64, r: u16, g: u16, b: u16) -> Self {
        Self { x, y, z, r, g, b }
    }

    pub fn rgb(&self) -> [u16; 3] {
        [self.r, self.g, self.b]
    }
}

/// Normalised colour, each channel in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_array(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Squared Euclidean distance in normalised RGB space
    pub fn distance_squared(&self, other: &Color) -> f64 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        dr * dr + dg * dg + db * db
    }
}

/// Integer lattice cell. Ordering is lexicographic on (x, y, z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VoxelKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl VoxelKey {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }
}

/// Point after lattice mapping, carrying its original 16 bit colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedPoint {
    pub key: VoxelKey,
    pub rgb: [u16; 3],
}

impl MappedPoint {
    pub fn new(key: VoxelKey, rgb: [u16; 3]) -> Self {
        Self { key, rgb }
    }
}

/// Aggregate of every point that landed in one voxel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoxelRecord {
    pub key: VoxelKey,
    /// Mean channel values before normalisation
    pub mean_rgb: [f64; 3],
    /// Normalised mean colour used for classification
    pub color: Color,
    pub label: &'static str,
    pub point_count: usize,
}
