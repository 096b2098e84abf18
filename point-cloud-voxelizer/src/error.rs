//! Error types for the voxelizer

use std::fmt;

/// Result type alias
pub type Result<T> = std::result::Result<T, VoxelizerError>;

/// Pipeline stage, reported alongside every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Read,
    GroundFilter,
    CoordinateMapping,
    Aggregation,
    Partitioning,
    Output,
    Manifest,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Read => "read",
            Stage::GroundFilter => "ground filter",
            Stage::CoordinateMapping => "coordinate mapping",
            Stage::Aggregation => "voxel aggregation",
            Stage::Partitioning => "batch partitioning",
            Stage::Output => "output",
            Stage::Manifest => "manifest",
        };
        f.write_str(name)
    }
}

/// Voxelizer error kinds
#[derive(Debug, thiserror::Error)]
pub enum VoxelizerError {
    /// A stage received (or produced) zero points
    #[error("no points left to process in {stage}")]
    EmptyInput { stage: Stage },

    /// Palette table has no entries
    #[error("palette contains no entries")]
    EmptyPalette,

    /// Batch size must be positive
    #[error("batch size must be positive, got {0}")]
    InvalidBatchSize(i64),

    /// Input collaborator could not produce points
    #[error("failed to read {source_name}: {reason}")]
    SourceRead { source_name: String, reason: String },

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Output collaborator failed to persist a unit
    #[error("I/O error: {0}")]
    Output(#[from] std::io::Error),

    /// Manifest serialisation failed
    #[error("manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl VoxelizerError {
    /// Shorthand for the empty input error of a stage
    pub fn empty(stage: Stage) -> Self {
        VoxelizerError::EmptyInput { stage }
    }

    pub fn source_read(source_name: impl Into<String>, reason: impl fmt::Display) -> Self {
        VoxelizerError::SourceRead {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of a pipeline run, tagged with the stage that raised it
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub error: VoxelizerError,
}

impl PipelineError {
    pub fn new(stage: Stage, error: VoxelizerError) -> Self {
        Self { stage, error }
    }

    /// The underlying error kind
    pub fn kind(&self) -> &VoxelizerError {
        &self.error
    }
}

/// Attach a stage to a stage-local result
pub trait StageContext<T> {
    fn at_stage(self, stage: Stage) -> std::result::Result<T, PipelineError>;
}

impl<T> StageContext<T> for Result<T> {
    fn at_stage(self, stage: Stage) -> std::result::Result<T, PipelineError> {
        self.map_err(|error| PipelineError::new(stage, error))
    }
}
