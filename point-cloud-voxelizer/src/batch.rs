/// Fixed-size batch partitioning of classified voxels
use crate::error::{Result, VoxelizerError};
use crate::point::VoxelRecord;

/// Contiguous run of records handed to the output sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Batch<'a> {
    /// 1-based position in the run
    pub index: usize,
    pub records: &'a [VoxelRecord],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Number of batches needed for `len` records
pub fn batch_count(len: usize, batch_size: usize) -> usize {
    if batch_size == 0 {
        return 0;
    }
    len.div_ceil(batch_size)
}

/// Split `records` into batches of `batch_size`, keeping their order.
/// Only the last batch may be shorter. No records yields no batches.
pub fn partition(records: &[VoxelRecord], batch_size: usize) -> Result<Vec<Batch<'_>>> {
    if batch_size == 0 {
        return Err(VoxelizerError::InvalidBatchSize(0));
    }

    Ok(records
        .chunks(batch_size)
        .enumerate()
        .map(|(i, records)| Batch {
            index: i + 1,
            records,
        })
        .collect())
}
