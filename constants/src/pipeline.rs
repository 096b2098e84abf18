//! Default conversion settings

/// World units to lattice cells
pub const DEFAULT_SCALE: f64 = 60.0;

/// Placement entries per output unit
pub const DEFAULT_BATCH_SIZE: usize = 20_000;

/// Colour multiplier, 1.0 passes colours through unchanged
pub const DEFAULT_BRIGHTNESS: f64 = 1.0;

/// Per-channel 16 bit level above which a sample counts as overexposed
pub const DEFAULT_HIGHLIGHT_THRESHOLD: u16 = 254 * 256;

/// Channel value written to every channel of an overexposed sample (8 bit white)
pub const HIGHLIGHT_FILL: u16 = 255;

/// Points more than this far below the ground level are discarded (world units)
pub const DEFAULT_GROUND_OFFSET: f64 = 5.0;

/// Lattice start position of the minimum corner
pub const DEFAULT_START_OFFSET: [i64; 3] = [0, 0, 0];

/// Largest 16 bit channel value
pub const MAX_CHANNEL_16: f64 = 65535.0;

/// Largest 8 bit channel value
pub const MAX_CHANNEL_8: f64 = 255.0;

/// Chunk size for parallel reductions over points
pub const PARALLEL_CHUNK_SIZE: usize = 25_000;

/// Upper bound on the up-front point buffer reservation; header counts are not trusted beyond it
pub const MAX_PREALLOCATED_POINTS: u64 = 1_000_000;

/// Progress bar refresh interval while reading points
pub const PROGRESS_UPDATE_INTERVAL: usize = 50_000;

/// Prefix of each persisted output unit
pub const OUTPUT_UNIT_PREFIX: &str = "minecraft_code_part";
