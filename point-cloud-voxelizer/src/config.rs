//! Conversion configuration.

use crate::error::{Result, VoxelizerError};
use constants::pipeline::{
    DEFAULT_BATCH_SIZE, DEFAULT_BRIGHTNESS, DEFAULT_GROUND_OFFSET, DEFAULT_HIGHLIGHT_THRESHOLD,
    DEFAULT_SCALE, DEFAULT_START_OFFSET,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Immutable settings for one conversion run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelizerConfig {
    /// LAS/LAZ input file
    pub input_path: PathBuf,

    /// Directory receiving the scripts and manifest
    pub output_dir: PathBuf,

    /// Lattice cells per world unit
    pub scale: f64,

    /// Placement entries per output script
    pub batch_size: usize,

    /// Colour multiplier (1.0 = unchanged)
    pub brightness: f64,

    /// Per-channel 16 bit highlight thresholds (r, g, b)
    pub highlight_thresholds: [u16; 3],

    /// Lattice position of the minimum corner (x, y, z)
    pub start_offset: [i64; 3],

    /// Distance below the ground level still kept (world units)
    pub ground_offset: f64,

    /// Write manifest.json after a successful run
    pub write_manifest: bool,
}

impl Default for VoxelizerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::new(),
            output_dir: PathBuf::from("output"),
            scale: DEFAULT_SCALE,
            batch_size: DEFAULT_BATCH_SIZE,
            brightness: DEFAULT_BRIGHTNESS,
            highlight_thresholds: [DEFAULT_HIGHLIGHT_THRESHOLD; 3],
            start_offset: DEFAULT_START_OFFSET,
            ground_offset: DEFAULT_GROUND_OFFSET,
            write_manifest: true,
        }
    }
}

impl VoxelizerConfig {
    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            VoxelizerError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| VoxelizerError::InvalidConfig(e.to_string()))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(VoxelizerError::InvalidBatchSize(0));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(VoxelizerError::InvalidConfig(format!(
                "scale must be a positive number, got {}",
                self.scale
            )));
        }
        if !(self.brightness.is_finite() && self.brightness >= 0.0) {
            return Err(VoxelizerError::InvalidConfig(format!(
                "brightness must be zero or positive, got {}",
                self.brightness
            )));
        }
        if !(self.ground_offset.is_finite() && self.ground_offset >= 0.0) {
            return Err(VoxelizerError::InvalidConfig(format!(
                "ground offset must be zero or positive, got {}",
                self.ground_offset
            )));
        }
        Ok(())
    }
}

/// Convert a signed batch size (CLI or other loosely typed input)
pub fn batch_size_from_signed(value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(VoxelizerError::InvalidBatchSize(value));
    }
    usize::try_from(value).map_err(|_| VoxelizerError::InvalidBatchSize(value))
}
