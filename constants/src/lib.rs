//! Shared tables and defaults for the voxelizer workspace

pub mod coordinate_system;
pub mod palette;
pub mod pipeline;
