//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a block within a partitioned chain.
///
/// `BlockId(b)` owns chain indices `[b·G, (b+1)·G)` for block length `G`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

impl BlockId {
    /// The block index as a `usize`, for slicing.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Generation counter of one slot index in a partitioned state.
///
/// Incremented every time the index is rebound to a freshly produced slot.
/// Generation 0 is the slot installed at initialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_advances_by_one() {
        let g = Generation::default();
        assert_eq!(g, Generation(0));
        assert_eq!(g.next().next(), Generation(2));
    }

    #[test]
    fn block_id_display_and_index() {
        let b = BlockId::from(7);
        assert_eq!(b.to_string(), "7");
        assert_eq!(b.index(), 7);
    }
}
