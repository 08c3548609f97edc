use super::TrailedInteger;
use super::TrailedValues;
use crate::quince_assert_moderate;

const WORD_SIZE: i32 = 64;

/// A fixed-capacity set of integers in `[offset, offset + capacity)` whose words are reversible
/// cells.
#[derive(Debug, Clone)]
pub(crate) struct TrailedBitSet {
    offset: i32,
    capacity: u32,
    words: Vec<TrailedInteger>,
}

impl TrailedBitSet {
    /// Allocates the bitset with the given members.
    pub(crate) fn new(
        trailed_values: &mut TrailedValues,
        offset: i32,
        capacity: u32,
        members: impl IntoIterator<Item = i32>,
    ) -> TrailedBitSet {
        let num_words = (capacity as usize).div_ceil(WORD_SIZE as usize);
        let mut words = vec![0_u64; num_words];
        for member in members {
            let position = member - offset;
            quince_assert_moderate!(position >= 0 && (position as u32) < capacity);
            words[(position / WORD_SIZE) as usize] |= 1 << (position % WORD_SIZE);
        }

        TrailedBitSet {
            offset,
            capacity,
            words: words
                .into_iter()
                .map(|word| trailed_values.grow(word as i64))
                .collect(),
        }
    }

    fn locate(&self, value: i32) -> Option<(TrailedInteger, u64)> {
        let position = value.checked_sub(self.offset)?;
        if position < 0 || position as u32 >= self.capacity {
            return None;
        }
        Some((
            self.words[(position / WORD_SIZE) as usize],
            1 << (position % WORD_SIZE),
        ))
    }

    pub(crate) fn contains(&self, trailed_values: &TrailedValues, value: i32) -> bool {
        self.locate(value)
            .is_some_and(|(word, mask)| trailed_values.read(word) as u64 & mask != 0)
    }

    /// Returns whether the value was newly added.
    pub(crate) fn insert(&self, trailed_values: &mut TrailedValues, value: i32) -> bool {
        let Some((word, mask)) = self.locate(value) else {
            return false;
        };
        let bits = trailed_values.read(word) as u64;
        if bits & mask != 0 {
            return false;
        }
        trailed_values.assign(word, (bits | mask) as i64);
        true
    }

    /// Returns whether the value was present.
    pub(crate) fn remove(&self, trailed_values: &mut TrailedValues, value: i32) -> bool {
        let Some((word, mask)) = self.locate(value) else {
            return false;
        };
        let bits = trailed_values.read(word) as u64;
        if bits & mask == 0 {
            return false;
        }
        trailed_values.assign(word, (bits & !mask) as i64);
        true
    }

    /// The smallest member in `[from, to]`.
    pub(crate) fn next_member(
        &self,
        trailed_values: &TrailedValues,
        from: i32,
        to: i32,
    ) -> Option<i32> {
        (from.max(self.offset)..=to.min(self.last_value()))
            .find(|&value| self.contains(trailed_values, value))
    }

    /// The largest member in `[from, to]`.
    pub(crate) fn previous_member(
        &self,
        trailed_values: &TrailedValues,
        from: i32,
        to: i32,
    ) -> Option<i32> {
        (from.max(self.offset)..=to.min(self.last_value()))
            .rev()
            .find(|&value| self.contains(trailed_values, value))
    }

    pub(crate) fn count_members(&self, trailed_values: &TrailedValues, from: i32, to: i32) -> u32 {
        (from.max(self.offset)..=to.min(self.last_value()))
            .filter(|&value| self.contains(trailed_values, value))
            .count() as u32
    }

    pub(crate) fn members<'a>(
        &'a self,
        trailed_values: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        (self.offset..=self.last_value()).filter(move |&value| self.contains(trailed_values, value))
    }

    fn last_value(&self) -> i32 {
        self.offset + self.capacity as i32 - 1
    }
}
