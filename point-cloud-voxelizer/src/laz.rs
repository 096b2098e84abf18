/// Point sources: LAS/LAZ files and in-memory point sets
use crate::error::{Result, VoxelizerError};
use crate::point::Point;
use constants::pipeline::{MAX_PREALLOCATED_POINTS, PROGRESS_UPDATE_INTERVAL};
use indicatif::{ProgressBar, ProgressStyle};
use las::Reader;
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Supplier of raw coloured points for one conversion run
pub trait PointSource {
    /// Human readable name used in logs and errors
    fn describe(&self) -> String;

    /// Number of points the source will yield, when known up front
    fn point_count(&self) -> Option<u64>;

    /// Read every point. An empty or malformed source is a `SourceRead` error.
    fn read_points(&mut self) -> Result<Vec<Point>>;
}

/// Create LAS file reader for point cloud access.
/// Handles both .las and .laz compressed formats.
pub fn create_reader(file_path: &Path) -> std::result::Result<Reader, Box<dyn std::error::Error>> {
    let file = File::open(file_path)?;
    let buf_reader = BufReader::new(file);
    Ok(Reader::new(buf_reader)?)
}

/// LAS/LAZ file source. Requires a point format carrying RGB.
pub struct LasPointSource {
    path: PathBuf,
    reader: Reader,
}

impl LasPointSource {
    pub fn open(path: &Path) -> Result<Self> {
        let reader = create_reader(path)
            .map_err(|e| VoxelizerError::source_read(path.display().to_string(), e))?;

        let source = Self {
            path: path.to_path_buf(),
            reader,
        };
        source.log_file_info();

        if !source.reader.header().point_format().has_color {
            return Err(VoxelizerError::source_read(
                source.describe(),
                "point format carries no RGB colour",
            ));
        }

        Ok(source)
    }

    /// Log header information for debugging
    fn log_file_info(&self) {
        let header = self.reader.header();
        let transforms = header.transforms();

        info!("LAS/LAZ file information:");
        info!("  File: {}", self.path.display());
        info!(
            "  Version: {}.{}",
            header.version().major,
            header.version().minor
        );
        info!("  Points: {}", header.number_of_points());
        info!("  Point format: {:?}", header.point_format().to_u8());
        info!(
            "  Scale factors: X={}, Y={}, Z={}",
            transforms.x.scale, transforms.y.scale, transforms.z.scale
        );
        info!(
            "  Offsets: X={}, Y={}, Z={}",
            transforms.x.offset, transforms.y.offset, transforms.z.offset
        );
    }
}

impl PointSource for LasPointSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn point_count(&self) -> Option<u64> {
        Some(self.reader.header().number_of_points())
    }

    fn read_points(&mut self) -> Result<Vec<Point>> {
        let name = self.describe();
        let total_points = self.reader.header().number_of_points();
        if total_points == 0 {
            return Err(VoxelizerError::source_read(name, "file contains no points"));
        }

        let pb = ProgressBar::new(total_points);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {pos}/{len} points ({percent}%) {msg}")
                .map_err(|e| VoxelizerError::source_read(name.clone(), e))?
                .progress_chars("▉▊▋▌▍▎▏ "),
        );
        pb.set_message("Loading points");

        // A truncated file can claim far more points than it holds
        let mut points = Vec::with_capacity(total_points.min(MAX_PREALLOCATED_POINTS) as usize);
        for (idx, point_result) in self.reader.points().enumerate() {
            let point = point_result.map_err(|e| VoxelizerError::source_read(name.clone(), e))?;
            let color = point.color.ok_or_else(|| {
                VoxelizerError::source_read(name.clone(), format!("point {} has no colour", idx))
            })?;

            points.push(Point::new(
                point.x,
                point.y,
                point.z,
                color.red,
                color.green,
                color.blue,
            ));

            if idx % PROGRESS_UPDATE_INTERVAL == 0 {
                pb.set_position(idx as u64);
            }
        }
        pb.finish_with_message("Points loaded");

        if points.is_empty() {
            return Err(VoxelizerError::source_read(name, "file contains no points"));
        }

        Ok(points)
    }
}

/// Points already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryPointSource {
    name: String,
    points: Vec<Point>,
}

impl MemoryPointSource {
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

impl PointSource for MemoryPointSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn point_count(&self) -> Option<u64> {
        Some(self.points.len() as u64)
    }

    fn read_points(&mut self) -> Result<Vec<Point>> {
        if self.points.is_empty() {
            return Err(VoxelizerError::source_read(
                self.describe(),
                "source contains no points",
            ));
        }
        Ok(self.points.clone())
    }
}
