//! Partitioned state: one slot per block.

use std::sync::Arc;

use chainflow_core::{Block, Generation, TaskFault};

use crate::slot::Slot;

/// A fixed-length sequence of slots, one per block, with a generation
/// counter per index.
///
/// The only mutation is [`SlotVec::rebind`], which replaces the slot at one
/// index with a newer one. The previous slot stays alive for as long as any
/// pending node still holds it.
#[derive(Debug)]
pub struct SlotVec<T> {
    slots: Vec<Slot<T>>,
    generations: Vec<Generation>,
}

/// Partitioned positions, momenta or forces of a chain.
pub type BlockState = SlotVec<Block>;

impl<T> Clone for SlotVec<T> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            generations: self.generations.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> SlotVec<T> {
    /// Wrap initial slots, all at generation 0.
    pub fn new(slots: Vec<Slot<T>>) -> Self {
        let generations = vec![Generation::default(); slots.len()];
        Self { slots, generations }
    }

    /// Resolved slots holding the given values.
    pub fn from_values(values: impl IntoIterator<Item = T>) -> Self {
        Self::new(values.into_iter().map(Slot::ready).collect())
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The current slot at index `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= len()`.
    pub fn get(&self, i: usize) -> &Slot<T> {
        &self.slots[i]
    }

    /// Generation of the slot at index `i`.
    pub fn generation(&self, i: usize) -> Generation {
        self.generations[i]
    }

    /// Replace the slot at index `i` and advance its generation.
    pub fn rebind(&mut self, i: usize, slot: Slot<T>) {
        self.slots[i] = slot;
        self.generations[i] = self.generations[i].next();
    }

    /// Iterate over the current slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot<T>> {
        self.slots.iter()
    }

    /// Block until every slot resolves.
    ///
    /// Returns all values in index order, or the fault of the first
    /// poisoned index.
    pub fn wait_all(&self) -> Result<Vec<Arc<T>>, TaskFault> {
        self.slots.iter().map(Slot::wait).collect()
    }
}

impl SlotVec<Block> {
    /// Concatenate all blocks in index order. Waits for every slot.
    pub fn flatten(&self) -> Result<Vec<f64>, TaskFault> {
        let blocks = self.wait_all()?;
        let mut out = Vec::with_capacity(blocks.iter().map(|b| b.len()).sum());
        for b in &blocks {
            out.extend_from_slice(b);
        }
        Ok(out)
    }
}
