use std::iter::Rev;
use std::vec::Drain;

use crate::quince_assert_simple;

/// A stack of entries partitioned into checkpoints.
///
/// Entries pushed after the `k`-th call to [`Trail::new_checkpoint`] belong to checkpoint `k`;
/// [`Trail::synchronise`] hands back everything above a given checkpoint, newest first, so the
/// caller can undo it.
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    current_checkpoint: usize,
    /// At index i is the position where checkpoint i ends (exclusive) on the trail
    delimiters: Vec<usize>,
    entries: Vec<T>,
}

// Implemented by hand so that `T` is not required to implement `Default`.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            current_checkpoint: 0,
            delimiters: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn new_checkpoint(&mut self) {
        self.current_checkpoint += 1;
        self.delimiters.push(self.entries.len());
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.current_checkpoint
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes all entries which were pushed after `new_checkpoint` was entered, most recent entry
    /// first.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) -> Rev<Drain<'_, T>> {
        quince_assert_simple!(
            new_checkpoint < self.current_checkpoint,
            "can only synchronise to an earlier checkpoint"
        );

        let new_len = self.delimiters[new_checkpoint];

        self.current_checkpoint = new_checkpoint;
        self.delimiters.truncate(new_checkpoint);
        self.entries.drain(new_len..).rev()
    }

    pub(crate) fn push(&mut self, entry: T) {
        self.entries.push(entry)
    }
}
