/// Main point cloud to block script converter orchestrating every stage.
use crate::aggregator::VoxelAggregator;
use crate::batch::{batch_count, partition};
use crate::bounds::PointCloudBounds;
use crate::classifier::ColorClassifier;
use crate::colour::ColourAdjustment;
use crate::config::VoxelizerConfig;
use crate::coordinates::CoordinateMapper;
use crate::error::{PipelineError, Stage, StageContext};
use crate::ground::GroundFilter;
use crate::laz::{LasPointSource, PointSource};
use crate::manifest::{
    LatticeExtent, ManifestGenerator, RunSummary, duplicate_ratio, label_histogram, log_summary,
};
use crate::point::{Point, VoxelRecord};
use crate::script_writer::{BatchSink, ScriptWriter};
use constants::palette::{BLOCK_PALETTE, PaletteEntry};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

/// Result of the in-memory stages, before anything is handed to a sink
#[derive(Debug, Clone)]
pub struct Voxelized {
    pub source_points: usize,
    pub ground_z: f64,
    pub discarded_points: usize,
    /// Bounds of the points kept by the ground filter
    pub bounds: PointCloudBounds,
    /// Classified voxels sorted by key
    pub records: Vec<VoxelRecord>,
}

impl Voxelized {
    pub fn kept_points(&self) -> usize {
        self.source_points - self.discarded_points
    }
}

/// Point cloud converter: ground filter, lattice mapping, voxel aggregation,
/// batching and output.
pub struct VoxelConverter {
    config: VoxelizerConfig,
    classifier: ColorClassifier,
}

impl VoxelConverter {
    /// Converter classifying against the built-in block palette
    pub fn new(config: VoxelizerConfig) -> Result<Self, PipelineError> {
        Self::with_palette(config, BLOCK_PALETTE)
    }

    /// Converter classifying against `palette`
    pub fn with_palette(
        config: VoxelizerConfig,
        palette: &'static [PaletteEntry],
    ) -> Result<Self, PipelineError> {
        config.validate().at_stage(Stage::Configuration)?;
        let classifier = ColorClassifier::new(palette).at_stage(Stage::Configuration)?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &VoxelizerConfig {
        &self.config
    }

    /// Convert the configured LAS/LAZ file into scripts in the output directory.
    pub fn convert(&self) -> Result<RunSummary, PipelineError> {
        info!(
            "Converting {} into block scripts under {}",
            self.config.input_path.display(),
            self.config.output_dir.display()
        );

        let mut source = LasPointSource::open(&self.config.input_path).at_stage(Stage::Read)?;
        let mut sink = ScriptWriter::new(&self.config.output_dir);
        let summary = self.run(&mut source, &mut sink)?;

        if self.config.write_manifest {
            ManifestGenerator::new(&self.config.output_dir)
                .generate(&summary)
                .at_stage(Stage::Manifest)?;
        }

        info!("Conversion complete!");
        Ok(summary)
    }

    /// Run every stage against an arbitrary source and sink.
    ///
    /// The sink is only touched once all in-memory stages have succeeded, and
    /// its previous output is replaced only when every batch has been written.
    pub fn run<S, K>(&self, source: &mut S, sink: &mut K) -> Result<RunSummary, PipelineError>
    where
        S: PointSource + ?Sized,
        K: BatchSink + ?Sized,
    {
        info!("Reading points from {}", source.describe());
        if let Some(count) = source.point_count() {
            debug!("Source reports {} points", count);
        }
        let points = source.read_points().at_stage(Stage::Read)?;

        let voxelized = self.voxelize(&points)?;
        let batches =
            partition(&voxelized.records, self.config.batch_size).at_stage(Stage::Partitioning)?;

        self.log_batch_plan(voxelized.records.len());

        sink.begin().at_stage(Stage::Output)?;

        let pb = ProgressBar::new(batches.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{bar:40.green/blue}] {pos}/{len} scripts ({percent}%) {msg}")
        {
            pb.set_style(style.progress_chars("▉▊▋▌▍▎▏ "));
        }
        pb.set_message("Writing batches");
        for batch in &batches {
            sink.write_batch(batch).at_stage(Stage::Output)?;
            pb.inc(1);
        }
        sink.commit().at_stage(Stage::Output)?;
        pb.finish_with_message("Batches written");

        let summary = RunSummary {
            source: source.describe(),
            source_points: voxelized.source_points,
            kept_points: voxelized.kept_points(),
            discarded_points: voxelized.discarded_points,
            ground_z: voxelized.ground_z,
            bounds: voxelized.bounds.clone(),
            lattice_extent: LatticeExtent::of(&voxelized.records),
            voxel_count: voxelized.records.len(),
            duplicate_ratio: duplicate_ratio(voxelized.kept_points(), voxelized.records.len()),
            batch_size: self.config.batch_size,
            batch_count: batches.len(),
            labels: label_histogram(&voxelized.records),
            units: sink.units(),
        };
        log_summary(&summary);

        Ok(summary)
    }

    /// Ground filter, lattice mapping and voxel aggregation.
    /// Pure over its input; returns records sorted by key.
    pub fn voxelize(&self, points: &[Point]) -> Result<Voxelized, PipelineError> {
        let filter = GroundFilter::new(self.config.ground_offset);
        let filtered = filter.apply(points).at_stage(Stage::GroundFilter)?;
        info!(
            "Ground level (modal elevation): {:.3}, kept {} / {} points",
            filtered.ground_z,
            filtered.points.len(),
            points.len()
        );

        let mapper = CoordinateMapper::new(self.config.scale, self.config.start_offset);
        let (bounds, mapped) = mapper
            .map(&filtered.points)
            .at_stage(Stage::CoordinateMapping)?;
        self.print_bounds(&bounds);

        let adjustment =
            ColourAdjustment::new(self.config.brightness, self.config.highlight_thresholds);
        if adjustment.brightness != 1.0 {
            info!("Brightness adjustment: x{}", adjustment.brightness);
        }
        let aggregator = VoxelAggregator::new(adjustment, &self.classifier);
        let records = aggregator
            .aggregate(&mapped)
            .at_stage(Stage::Aggregation)?;
        info!(
            "Aggregated {} points into {} voxels",
            mapped.len(),
            records.len()
        );

        Ok(Voxelized {
            source_points: points.len(),
            ground_z: filtered.ground_z,
            discarded_points: filtered.discarded,
            bounds,
            records,
        })
    }

    /// Print coordinate bounds of the kept points.
    fn print_bounds(&self, bounds: &PointCloudBounds) {
        let (dx, dy, dz) = bounds.dimensions();
        info!("Filtered bounds (scale {}):", self.config.scale);
        info!("  X: {:.3} to {:.3} (width {:.3})", bounds.min_x, bounds.max_x, dx);
        info!("  Y: {:.3} to {:.3} (width {:.3})", bounds.min_y, bounds.max_y, dy);
        info!(
            "  Z: {:.3} to {:.3} (elevation, width {:.3})",
            bounds.min_z, bounds.max_z, dz
        );
    }

    fn log_batch_plan(&self, records: usize) {
        let batch_size = self.config.batch_size;
        let count = batch_count(records, batch_size);
        let last = match records % batch_size {
            0 if records > 0 => batch_size,
            rest => rest,
        };
        info!(
            "Batch plan: {} blocks, {} per script, {} scripts, last holds {}",
            records, batch_size, count, last
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoxelizerError;
    use crate::laz::MemoryPointSource;
    use crate::script_writer::MemorySink;

    fn flat_cloud() -> Vec<Point> {
        (0..20)
            .map(|i| Point::new(i as f64 * 0.1, 0.0, 0.0, 40000, 40000, 40000))
            .collect()
    }

    #[test]
    fn test_invalid_config_fails_at_configuration() {
        let config = VoxelizerConfig {
            batch_size: 0,
            ..Default::default()
        };
        let err = VoxelConverter::new(config).err().unwrap();
        assert_eq!(err.stage, Stage::Configuration);
        assert!(matches!(err.kind(), VoxelizerError::InvalidBatchSize(0)));
    }

    #[test]
    fn test_empty_palette_fails_at_configuration() {
        let err = VoxelConverter::with_palette(VoxelizerConfig::default(), &[])
            .err()
            .unwrap();
        assert!(matches!(err.kind(), VoxelizerError::EmptyPalette));
    }

    #[test]
    fn test_voxelize_merges_points_per_cell() {
        let config = VoxelizerConfig {
            scale: 1.0,
            ..Default::default()
        };
        let converter = VoxelConverter::new(config).unwrap();
        let voxelized = converter.voxelize(&flat_cloud()).unwrap();

        // x in [0, 1.9] at scale 1 rounds to lattice z 0, 1 or 2
        assert_eq!(voxelized.records.len(), 3);
        assert_eq!(
            voxelized
                .records
                .iter()
                .map(|r| r.point_count)
                .sum::<usize>(),
            20
        );
        assert_eq!(voxelized.kept_points(), 20);
    }

    #[test]
    fn test_read_failure_writes_nothing() {
        let converter = VoxelConverter::new(VoxelizerConfig::default()).unwrap();
        let mut source = MemoryPointSource::new("empty", Vec::new());
        let mut sink = MemorySink::default();

        let err = converter.run(&mut source, &mut sink).unwrap_err();
        assert_eq!(err.stage, Stage::Read);
        assert!(!sink.begun);
        assert!(sink.batches.is_empty());
    }

    #[test]
    fn test_run_reports_units_and_counts() {
        let config = VoxelizerConfig {
            scale: 10.0,
            batch_size: 4,
            ..Default::default()
        };
        let converter = VoxelConverter::new(config).unwrap();
        let mut source = MemoryPointSource::new("line", flat_cloud());
        let mut sink = MemorySink::default();

        let summary = converter.run(&mut source, &mut sink).unwrap();
        assert!(sink.begun);
        assert!(sink.committed);
        assert_eq!(summary.voxel_count, 20);
        assert_eq!(summary.batch_count, 5);
        assert_eq!(summary.units.len(), 5);
        assert_eq!(summary.units[0], "minecraft_code_part1");
        assert_eq!(summary.duplicate_ratio, 0.0);
    }
}
