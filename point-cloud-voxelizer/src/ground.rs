/// Ground level detection and below-ground noise removal
use crate::coordinates::round_half_even;
use crate::error::{Result, Stage, VoxelizerError};
use crate::point::Point;
use constants::pipeline::{DEFAULT_GROUND_OFFSET, PARALLEL_CHUNK_SIZE};
use rayon::prelude::*;
use std::collections::HashMap;

/// Most frequent rounded elevation.
///
/// Elevations are rounded half to even. When several values share the
/// highest count the lowest of them is returned.
pub fn ground_level(elevations: &[f64]) -> Result<f64> {
    if elevations.is_empty() {
        return Err(VoxelizerError::empty(Stage::GroundFilter));
    }

    let counts = elevations
        .par_chunks(PARALLEL_CHUNK_SIZE)
        .map(|chunk| {
            let mut local: HashMap<i64, usize> = HashMap::new();
            for &z in chunk {
                *local.entry(round_half_even(z)).or_insert(0) += 1;
            }
            local
        })
        .reduce(HashMap::new, |mut a, b| {
            for (level, count) in b {
                *a.entry(level).or_insert(0) += count;
            }
            a
        });

    let mut best: Option<(i64, usize)> = None;
    for (&level, &count) in &counts {
        best = match best {
            Some((best_level, best_count))
                if count < best_count || (count == best_count && level > best_level) =>
            {
                Some((best_level, best_count))
            }
            _ => Some((level, count)),
        };
    }

    best.map(|(level, _)| level as f64)
        .ok_or_else(|| VoxelizerError::empty(Stage::GroundFilter))
}

/// `true` for every elevation strictly above `ground_z - offset`
pub fn ground_mask(elevations: &[f64], ground_z: f64, offset: f64) -> Vec<bool> {
    let cutoff = ground_z - offset;
    elevations.par_iter().map(|&z| z > cutoff).collect()
}

/// Points kept by the ground filter
#[derive(Debug, Clone)]
pub struct GroundFiltered {
    pub ground_z: f64,
    pub points: Vec<Point>,
    pub discarded: usize,
}

/// Discards points lying more than `offset` below the modal elevation
#[derive(Debug, Clone, Copy)]
pub struct GroundFilter {
    offset: f64,
}

impl Default for GroundFilter {
    fn default() -> Self {
        Self::new(DEFAULT_GROUND_OFFSET)
    }
}

impl GroundFilter {
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }

    /// Detect the ground level of `points` and filter against it
    pub fn apply(&self, points: &[Point]) -> Result<GroundFiltered> {
        let elevations = Self::elevations(points);
        let ground_z = ground_level(&elevations)?;
        self.filter(points, &elevations, ground_z)
    }

    /// Filter against a known ground level
    pub fn apply_with_ground(&self, points: &[Point], ground_z: f64) -> Result<GroundFiltered> {
        if points.is_empty() {
            return Err(VoxelizerError::empty(Stage::GroundFilter));
        }
        self.filter(points, &Self::elevations(points), ground_z)
    }

    fn elevations(points: &[Point]) -> Vec<f64> {
        points.par_iter().map(|p| p.z).collect()
    }

    fn filter(&self, points: &[Point], elevations: &[f64], ground_z: f64) -> Result<GroundFiltered> {
        let mask = ground_mask(elevations, ground_z, self.offset);

        let kept: Vec<Point> = points
            .iter()
            .zip(&mask)
            .filter(|&(_, keep)| *keep)
            .map(|(point, _)| *point)
            .collect();

        if kept.is_empty() {
            return Err(VoxelizerError::empty(Stage::GroundFilter));
        }

        Ok(GroundFiltered {
            ground_z,
            discarded: points.len() - kept.len(),
            points: kept,
        })
    }
}
