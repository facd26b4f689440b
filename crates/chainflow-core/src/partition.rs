//! Block partition geometry.

use std::ops::Range;

use crate::error::ConfigError;
use crate::id::BlockId;

/// A chain of `N` oscillators split into `M` contiguous blocks of length `G`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    chain_len: usize,
    block_len: usize,
}

impl Partition {
    /// Partition `chain_len` oscillators into blocks of `block_len`.
    ///
    /// Fails when either length is zero or when `block_len` does not divide
    /// `chain_len`. A single block (`block_len == chain_len`) is legal.
    pub fn new(chain_len: usize, block_len: usize) -> Result<Self, ConfigError> {
        if chain_len == 0 || block_len == 0 {
            return Err(ConfigError::EmptyPartition {
                chain_len,
                block_len,
            });
        }
        if chain_len % block_len != 0 {
            return Err(ConfigError::IndivisibleChain {
                chain_len,
                block_len,
            });
        }
        let blocks = chain_len / block_len;
        if u32::try_from(blocks).is_err() {
            return Err(ConfigError::TooManyBlocks { value: blocks });
        }
        Ok(Self {
            chain_len,
            block_len,
        })
    }

    /// Total number of oscillators `N`.
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    /// Oscillators per block `G`.
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Number of blocks `M`.
    pub fn block_count(&self) -> usize {
        self.chain_len / self.block_len
    }

    /// Chain indices owned by block `b`.
    pub fn range(&self, b: BlockId) -> Range<usize> {
        let start = b.index() * self.block_len;
        start..start + self.block_len
    }

    /// Iterator over all block ids in chain order.
    pub fn blocks(&self) -> impl Iterator<Item = BlockId> {
        // block_count fits in u32, checked in `new`.
        (0..self.block_count() as u32).map(BlockId)
    }
}
