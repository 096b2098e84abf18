//! Point cloud to block lattice conversion

pub mod aggregator;
pub mod batch;
pub mod bounds;
pub mod classifier;
pub mod colour;
pub mod config;
pub mod converter;
pub mod coordinates;
pub mod error;
pub mod ground;
pub mod laz;
pub mod manifest;
pub mod point;
pub mod script_writer;

pub use config::VoxelizerConfig;
pub use converter::{VoxelConverter, Voxelized};
pub use error::{PipelineError, Stage, VoxelizerError};
pub use point::{Color, MappedPoint, Point, VoxelKey, VoxelRecord};
