/// Point cloud coordinate bounds tracking
use crate::point::Point;
use constants::pipeline::PARALLEL_CHUNK_SIZE;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloudBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Default for PointCloudBounds {
    fn default() -> Self {
        Self::new()
    }
}

impl PointCloudBounds {
    /// Create new bounds initialised to infinity values
    pub fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            min_y: f64::INFINITY,
            max_y: f64::NEG_INFINITY,
            min_z: f64::INFINITY,
            max_z: f64::NEG_INFINITY,
        }
    }

    /// Bounds of a point set, reduced in parallel chunks.
    /// Returns `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        points
            .par_chunks(PARALLEL_CHUNK_SIZE)
            .map(|chunk| {
                let mut local_bounds = PointCloudBounds::new();
                for point in chunk {
                    local_bounds.update(point.x, point.y, point.z);
                }
                local_bounds
            })
            .reduce_with(PointCloudBounds::merge)
    }

    /// Update bounds with a new point
    pub fn update(&mut self, x: f64, y: f64, z: f64) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    /// Union of two bounds
    pub fn merge(mut self, other: PointCloudBounds) -> Self {
        self.min_x = self.min_x.min(other.min_x);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_y = self.max_y.max(other.max_y);
        self.min_z = self.min_z.min(other.min_z);
        self.max_z = self.max_z.max(other.max_z);
        self
    }

    /// World space extent per axis
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_points_have_no_bounds() {
        assert!(PointCloudBounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_bounds_cover_all_points() {
        let points = vec![
            Point::new(1.0, -2.0, 3.0, 0, 0, 0),
            Point::new(-1.0, 4.0, 0.5, 0, 0, 0),
            Point::new(0.0, 0.0, 10.0, 0, 0, 0),
        ];
        let bounds = PointCloudBounds::from_points(&points).unwrap();
        assert_eq!(bounds.min_x, -1.0);
        assert_eq!(bounds.max_x, 1.0);
        assert_eq!(bounds.min_y, -2.0);
        assert_eq!(bounds.max_y, 4.0);
        assert_eq!(bounds.min_z, 0.5);
        assert_eq!(bounds.max_z, 10.0);
        assert_eq!(bounds.dimensions(), (2.0, 6.0, 9.5));
    }

    #[test]
    fn test_parallel_chunks_match_sequential() {
        let points: Vec<Point> = (0..(PARALLEL_CHUNK_SIZE * 3 + 7))
            .map(|i| {
                let f = i as f64;
                Point::new(f.sin() * 100.0, f.cos() * 50.0, f * 0.01, 0, 0, 0)
            })
            .collect();

        let mut sequential = PointCloudBounds::new();
        for p in &points {
            sequential.update(p.x, p.y, p.z);
        }

        assert_eq!(PointCloudBounds::from_points(&points).unwrap(), sequential);
    }
}
