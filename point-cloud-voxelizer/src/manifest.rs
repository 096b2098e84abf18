/// Run summary and manifest generation.
use crate::bounds::PointCloudBounds;
use crate::error::Result;
use crate::point::{VoxelKey, VoxelRecord};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Inclusive lattice extent of the emitted voxels
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct LatticeExtent {
    pub min: VoxelKey,
    pub max: VoxelKey,
}

impl LatticeExtent {
    /// Per-axis extent of `records`, `None` when empty
    pub fn of(records: &[VoxelRecord]) -> Option<Self> {
        let first = records.first()?.key;
        let mut extent = LatticeExtent {
            min: first,
            max: first,
        };
        for record in records {
            let k = record.key;
            extent.min = VoxelKey::new(
                extent.min.x.min(k.x),
                extent.min.y.min(k.y),
                extent.min.z.min(k.z),
            );
            extent.max = VoxelKey::new(
                extent.max.x.max(k.x),
                extent.max.y.max(k.y),
                extent.max.z.max(k.z),
            );
        }
        Some(extent)
    }

    /// Cell count along each lattice axis
    pub fn size(&self) -> (i64, i64, i64) {
        (
            self.max.x - self.min.x + 1,
            self.max.y - self.min.y + 1,
            self.max.z - self.min.z + 1,
        )
    }
}

/// Statistics of one successful conversion run.
#[derive(Serialize, Debug, Clone)]
pub struct RunSummary {
    /// Input the points were read from.
    pub source: String,
    pub source_points: usize,
    /// Points surviving the ground filter.
    pub kept_points: usize,
    pub discarded_points: usize,
    /// Modal rounded elevation in world units.
    pub ground_z: f64,
    /// World bounds of the kept points.
    pub bounds: PointCloudBounds,
    pub lattice_extent: Option<LatticeExtent>,
    pub voxel_count: usize,
    /// Share of kept points merged into an already occupied voxel.
    pub duplicate_ratio: f64,
    pub batch_size: usize,
    pub batch_count: usize,
    /// Voxels per block label.
    pub labels: BTreeMap<String, usize>,
    /// Output units written by the sink.
    pub units: Vec<String>,
}

/// Voxel count per label, ordered by label
pub fn label_histogram(records: &[VoxelRecord]) -> BTreeMap<String, usize> {
    let mut labels = BTreeMap::new();
    for record in records {
        *labels.entry(record.label.to_string()).or_insert(0) += 1;
    }
    labels
}

/// Fraction of `points` that did not create a voxel of their own
pub fn duplicate_ratio(points: usize, voxels: usize) -> f64 {
    if points == 0 {
        return 0.0;
    }
    1.0 - voxels as f64 / points as f64
}

/// Writes `manifest.json` next to the generated scripts.
pub struct ManifestGenerator {
    /// Base output directory for all generated files.
    output_dir: PathBuf,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Serialise `summary` and return the manifest path
    pub fn generate(&self, summary: &RunSummary) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let manifest_path = self.output_dir.join("manifest.json");
        let manifest_json = serde_json::to_string_pretty(summary)?;
        fs::write(&manifest_path, manifest_json)?;

        info!("Generated manifest: {}", manifest_path.display());
        Ok(manifest_path)
    }
}

/// Log the summary for verification.
pub fn log_summary(summary: &RunSummary) {
    info!("Conversion summary:");
    info!("  Source: {}", summary.source);
    info!(
        "  Points: {} read, {} kept, {} below ground",
        summary.source_points, summary.kept_points, summary.discarded_points
    );
    info!(
        "  Voxels: {} ({:.1}% duplicates)",
        summary.voxel_count,
        summary.duplicate_ratio * 100.0
    );
    if let Some(extent) = &summary.lattice_extent {
        let (sx, sy, sz) = extent.size();
        info!(
            "  Lattice: ({}, {}, {}) to ({}, {}, {}), {}x{}x{} cells",
            extent.min.x, extent.min.y, extent.min.z, extent.max.x, extent.max.y, extent.max.z, sx,
            sy, sz
        );
    }
    info!(
        "  Batches: {} of up to {} blocks",
        summary.batch_count, summary.batch_size
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Color;
    use tempfile::TempDir;

    fn record(x: i64, y: i64, z: i64, label: &'static str) -> VoxelRecord {
        VoxelRecord {
            key: VoxelKey::new(x, y, z),
            mean_rgb: [0.0; 3],
            color: Color::new(0.0, 0.0, 0.0),
            label,
            point_count: 1,
        }
    }

    #[test]
    fn test_lattice_extent() {
        let records = vec![
            record(-2, 5, 1, "STONE"),
            record(4, -1, 0, "STONE"),
            record(0, 0, 9, "STONE"),
        ];
        let extent = LatticeExtent::of(&records).unwrap();
        assert_eq!(extent.min, VoxelKey::new(-2, -1, 0));
        assert_eq!(extent.max, VoxelKey::new(4, 5, 9));
        assert_eq!(extent.size(), (7, 7, 10));
        assert!(LatticeExtent::of(&[]).is_none());
    }

    #[test]
    fn test_label_histogram_and_ratio() {
        let records = vec![
            record(0, 0, 0, "WOOL"),
            record(1, 0, 0, "STONE"),
            record(2, 0, 0, "WOOL"),
        ];
        let labels = label_histogram(&records);
        assert_eq!(labels.get("WOOL"), Some(&2));
        assert_eq!(labels.get("STONE"), Some(&1));
        assert_eq!(duplicate_ratio(4, 3), 0.25);
        assert_eq!(duplicate_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_manifest_written() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![record(0, 0, 0, "WOOL")];
        let summary = RunSummary {
            source: "memory".to_string(),
            source_points: 2,
            kept_points: 2,
            discarded_points: 0,
            ground_z: 0.0,
            bounds: PointCloudBounds::new(),
            lattice_extent: LatticeExtent::of(&records),
            voxel_count: 1,
            duplicate_ratio: 0.5,
            batch_size: 10,
            batch_count: 1,
            labels: label_histogram(&records),
            units: vec!["minecraft_code_part1".to_string()],
        };

        let path = ManifestGenerator::new(temp_dir.path())
            .generate(&summary)
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["voxel_count"], 1);
        assert_eq!(json["labels"]["WOOL"], 1);
        assert_eq!(json["units"][0], "minecraft_code_part1");
    }
}
