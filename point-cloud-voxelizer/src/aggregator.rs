/// Point to voxel aggregation with colour averaging and classification
use crate::classifier::ColorClassifier;
use crate::colour::ColourAdjustment;
use crate::error::{Result, Stage, VoxelizerError};
use crate::point::{MappedPoint, VoxelKey, VoxelRecord};
use constants::pipeline::PARALLEL_CHUNK_SIZE;
use rayon::prelude::*;
use std::collections::HashMap;

/// Running channel sums of one voxel. Integer sums keep the merge exact and
/// independent of the order chunks are reduced in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Accumulator {
    sum: [u64; 3],
    count: usize,
}

impl Accumulator {
    fn add(&mut self, rgb: [u16; 3]) {
        for (total, channel) in self.sum.iter_mut().zip(rgb) {
            *total += channel as u64;
        }
        self.count += 1;
    }

    fn merge(&mut self, other: &Accumulator) {
        for (total, channel) in self.sum.iter_mut().zip(other.sum) {
            *total += channel;
        }
        self.count += other.count;
    }

    fn mean(&self) -> [f64; 3] {
        let n = self.count as f64;
        self.sum.map(|total| total as f64 / n)
    }
}

/// Groups mapped points by voxel, averages their adjusted colours and labels
/// each voxel with the nearest palette entry.
pub struct VoxelAggregator<'a> {
    adjustment: ColourAdjustment,
    classifier: &'a ColorClassifier,
}

impl<'a> VoxelAggregator<'a> {
    pub fn new(adjustment: ColourAdjustment, classifier: &'a ColorClassifier) -> Self {
        Self {
            adjustment,
            classifier,
        }
    }

    /// One record per distinct key, sorted by key
    pub fn aggregate(&self, points: &[MappedPoint]) -> Result<Vec<VoxelRecord>> {
        if points.is_empty() {
            return Err(VoxelizerError::empty(Stage::Aggregation));
        }

        let groups = self.accumulate(points);

        let mut cells: Vec<(VoxelKey, Accumulator)> = groups.into_iter().collect();
        cells.par_sort_unstable_by_key(|(key, _)| *key);

        Ok(cells
            .par_iter()
            .map(|(key, acc)| {
                let mean_rgb = acc.mean();
                let color = ColorClassifier::normalize(mean_rgb);
                VoxelRecord {
                    key: *key,
                    mean_rgb,
                    color,
                    label: self.classifier.classify_color(&color),
                    point_count: acc.count,
                }
            })
            .collect())
    }

    /// Key to accumulator map built in parallel chunks
    fn accumulate(&self, points: &[MappedPoint]) -> HashMap<VoxelKey, Accumulator> {
        points
            .par_chunks(PARALLEL_CHUNK_SIZE)
            .map(|chunk| {
                let mut local: HashMap<VoxelKey, Accumulator> = HashMap::new();
                for point in chunk {
                    local
                        .entry(point.key)
                        .or_default()
                        .add(self.adjustment.apply(point.rgb));
                }
                local
            })
            .reduce(HashMap::new, |mut a, b| {
                for (key, acc) in b {
                    a.entry(key).or_default().merge(&acc);
                }
                a
            })
    }
}
