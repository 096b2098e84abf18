/// World space to integer block lattice mapping
use crate::bounds::PointCloudBounds;
use crate::error::{Result, Stage, VoxelizerError};
use crate::point::{MappedPoint, Point, VoxelKey};
use constants::coordinate_system::{VERTICAL_LATTICE_OFFSET, permute_axes, unpermute_axes};
use rayon::prelude::*;

/// Round to the nearest integer, ties to the even neighbour.
/// This is the only float to integer rounding used by the pipeline.
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Maps filtered world coordinates onto the block lattice.
///
/// Each axis is shifted by its minimum, scaled uniformly and rounded half to
/// even, then permuted so world Y becomes lattice X, world X becomes lattice Z
/// and world Z stays vertical. The start offset is added after rounding and
/// the vertical axis is lowered by one block.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    scale: f64,
    start: [i64; 3],
}

impl CoordinateMapper {
    pub fn new(scale: f64, start: [i64; 3]) -> Self {
        Self { scale, start }
    }

    /// Compute bounds over `points` and map them
    pub fn map(&self, points: &[Point]) -> Result<(PointCloudBounds, Vec<MappedPoint>)> {
        let bounds = PointCloudBounds::from_points(points)
            .ok_or_else(|| VoxelizerError::empty(Stage::CoordinateMapping))?;
        let mapped = self.map_with_bounds(points, &bounds)?;
        Ok((bounds, mapped))
    }

    /// Map `points` relative to the minimum corner of `bounds`
    pub fn map_with_bounds(
        &self,
        points: &[Point],
        bounds: &PointCloudBounds,
    ) -> Result<Vec<MappedPoint>> {
        if points.is_empty() {
            return Err(VoxelizerError::empty(Stage::CoordinateMapping));
        }

        Ok(points
            .par_iter()
            .map(|p| MappedPoint::new(self.to_lattice(p.x, p.y, p.z, bounds), p.rgb()))
            .collect())
    }

    /// Lattice cell of a single world position
    pub fn to_lattice(&self, x: f64, y: f64, z: f64, bounds: &PointCloudBounds) -> VoxelKey {
        let (lx, ly, lz) = permute_axes(x - bounds.min_x, y - bounds.min_y, z - bounds.min_z);

        VoxelKey::new(
            round_half_even(lx * self.scale) + self.start[0],
            round_half_even(ly * self.scale) + VERTICAL_LATTICE_OFFSET + self.start[1],
            round_half_even(lz * self.scale) + self.start[2],
        )
    }

    /// World position at the centre of a lattice cell
    pub fn to_world(&self, key: VoxelKey, bounds: &PointCloudBounds) -> (f64, f64, f64) {
        let lx = (key.x - self.start[0]) as f64 / self.scale;
        let ly = (key.y - self.start[1] - VERTICAL_LATTICE_OFFSET) as f64 / self.scale;
        let lz = (key.z - self.start[2]) as f64 / self.scale;

        let (dx, dy, dz) = unpermute_axes(lx, ly, lz);
        (bounds.min_x + dx, bounds.min_y + dy, bounds.min_z + dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z, 100, 200, 300)
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0);
        assert_eq!(round_half_even(1.5), 2);
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(-0.5), 0);
        assert_eq!(round_half_even(-1.5), -2);
        assert_eq!(round_half_even(2.4999), 2);
        assert_eq!(round_half_even(2.5001), 3);
    }

    #[test]
    fn test_axis_permutation_and_vertical_offset() {
        let mapper = CoordinateMapper::new(1.0, [0, 0, 0]);
        let points = vec![point(0.0, 0.0, 0.0), point(3.0, 5.0, 7.0)];
        let (_, mapped) = mapper.map(&points).unwrap();

        assert_eq!(mapped[0].key, VoxelKey::new(0, -1, 0));
        // world y -> lattice x, world z -> lattice y, world x -> lattice z
        assert_eq!(mapped[1].key, VoxelKey::new(5, 6, 3));
        assert_eq!(mapped[1].rgb, [100, 200, 300]);
    }

    #[test]
    fn test_start_offset_added_after_rounding() {
        let mapper = CoordinateMapper::new(1.0, [10, 20, 30]);
        let points = vec![point(0.0, 0.0, 0.0), point(2.5, 0.5, 1.5)];
        let (_, mapped) = mapper.map(&points).unwrap();

        // 0.5 -> 0, 1.5 -> 2, 2.5 -> 2 regardless of the start parity
        assert_eq!(mapped[1].key, VoxelKey::new(10, 21, 32));
    }

    #[test]
    fn test_scale_applied_before_rounding() {
        let mapper = CoordinateMapper::new(60.0, [0, 0, 0]);
        let bounds = PointCloudBounds {
            min_x: 100.0,
            max_x: 101.0,
            min_y: 200.0,
            max_y: 201.0,
            min_z: 5.0,
            max_z: 6.0,
        };
        let key = mapper.to_lattice(100.5, 200.25, 5.1, &bounds);
        assert_eq!(key, VoxelKey::new(15, 5, 30));
    }

    #[test]
    fn test_degenerate_axis_maps_to_single_coordinate() {
        let mapper = CoordinateMapper::new(60.0, [0, 0, 0]);
        let points = vec![point(1.0, 2.0, 3.0), point(4.0, 2.0, 3.0)];
        let (_, mapped) = mapper.map(&points).unwrap();
        assert!(mapped.iter().all(|m| m.key.x == 0 && m.key.y == -1));
        assert_eq!(mapped[1].key.z, 180);
    }

    #[test]
    fn test_inverse_within_rounding_tolerance() {
        let scale = 7.3;
        let mapper = CoordinateMapper::new(scale, [3, -2, 11]);
        let points: Vec<Point> = (0..500)
            .map(|i| {
                let f = i as f64;
                point(
                    1000.0 + (f * 0.37).sin() * 20.0,
                    -50.0 + (f * 0.11).cos() * 35.0,
                    f * 0.013,
                )
            })
            .collect();
        let (bounds, mapped) = mapper.map(&points).unwrap();

        let tolerance = 0.5 / scale + 1e-9;
        for (p, m) in points.iter().zip(&mapped) {
            let (x, y, z) = mapper.to_world(m.key, &bounds);
            assert!((x - p.x).abs() <= tolerance);
            assert!((y - p.y).abs() <= tolerance);
            assert!((z - p.z).abs() <= tolerance);
        }
    }

    #[test]
    fn test_empty_points() {
        let mapper = CoordinateMapper::new(1.0, [0, 0, 0]);
        assert!(matches!(
            mapper.map(&[]),
            Err(VoxelizerError::EmptyInput {
                stage: Stage::CoordinateMapping
            })
        ));
    }
}
