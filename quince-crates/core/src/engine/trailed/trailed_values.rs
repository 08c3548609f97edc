use super::TrailedChange;
use super::TrailedInteger;
use crate::basic_types::Trail;
use crate::containers::KeyedVec;

/// The store of all reversible integers.
///
/// A cell is saved at most once per checkpoint: the first write after entering a checkpoint
/// records the prior value, later writes within the same checkpoint overwrite in place.
#[derive(Default, Debug, Clone)]
pub(crate) struct TrailedValues {
    trail: Trail<TrailedChange>,
    values: KeyedVec<TrailedInteger, i64>,
    /// The checkpoint at which each cell was last saved on the trail.
    stamps: KeyedVec<TrailedInteger, usize>,
}

impl TrailedValues {
    pub(crate) fn grow(&mut self, initial_value: i64) -> TrailedInteger {
        let _ = self.stamps.push(0);
        self.values.push(initial_value)
    }

    pub(crate) fn new_checkpoint(&mut self) {
        self.trail.new_checkpoint()
    }

    pub(crate) fn get_checkpoint(&self) -> usize {
        self.trail.get_checkpoint()
    }

    pub(crate) fn read(&self, trailed_integer: TrailedInteger) -> i64 {
        self.values[trailed_integer]
    }

    /// Restores every cell to the value it had when `new_checkpoint` was entered.
    pub(crate) fn synchronise(&mut self, new_checkpoint: usize) {
        self.trail
            .synchronise(new_checkpoint)
            .for_each(|change| {
                self.values[change.reference] = change.old_value;
                self.stamps[change.reference] = change.old_stamp;
            })
    }

    pub(crate) fn assign(&mut self, trailed_integer: TrailedInteger, value: i64) {
        let old_value = self.values[trailed_integer];
        if old_value == value {
            return;
        }

        let checkpoint = self.trail.get_checkpoint();
        let old_stamp = self.stamps[trailed_integer];
        if old_stamp < checkpoint {
            self.trail.push(TrailedChange {
                reference: trailed_integer,
                old_value,
                old_stamp,
            });
            self.stamps[trailed_integer] = checkpoint;
        }

        self.values[trailed_integer] = value;
    }

    pub(crate) fn add_assign(&mut self, trailed_integer: TrailedInteger, addition: i64) {
        self.assign(trailed_integer, self.values[trailed_integer] + addition);
    }

    #[cfg(test)]
    pub(crate) fn num_trailed_changes(&self) -> usize {
        self.trail.len()
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<i64> {
        self.values.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::TrailedValues;

    #[test]
    fn restore_returns_value_of_checkpoint() {
        let mut trailed_values = TrailedValues::default();
        let cell = trailed_values.grow(0);

        trailed_values.assign(cell, 3);
        trailed_values.new_checkpoint();
        trailed_values.assign(cell, 8);
        assert_eq!(8, trailed_values.read(cell));

        trailed_values.synchronise(0);
        assert_eq!(3, trailed_values.read(cell));
    }

    #[test]
    fn nested_checkpoints_are_restored_in_order() {
        let mut trailed_values = TrailedValues::default();
        let cell = trailed_values.grow(0);

        trailed_values.new_checkpoint();
        trailed_values.add_assign(cell, 5);
        trailed_values.add_assign(cell, 5);
        assert_eq!(10, trailed_values.read(cell));

        trailed_values.new_checkpoint();
        trailed_values.add_assign(cell, 1);
        assert_eq!(11, trailed_values.read(cell));

        trailed_values.synchronise(1);
        assert_eq!(10, trailed_values.read(cell));

        trailed_values.synchronise(0);
        assert_eq!(0, trailed_values.read(cell));
    }

    #[test]
    fn cell_is_saved_once_per_checkpoint() {
        let mut trailed_values = TrailedValues::default();
        let cell = trailed_values.grow(0);
        let other = trailed_values.grow(4);

        trailed_values.new_checkpoint();
        for value in 1..10 {
            trailed_values.assign(cell, value);
        }
        trailed_values.assign(other, 4);
        assert_eq!(1, trailed_values.num_trailed_changes());

        trailed_values.new_checkpoint();
        trailed_values.assign(cell, 20);
        trailed_values.assign(cell, 21);
        assert_eq!(2, trailed_values.num_trailed_changes());

        trailed_values.synchronise(1);
        assert_eq!(9, trailed_values.read(cell));

        // The checkpoint is re-entered, so the cell has to be saved again.
        trailed_values.new_checkpoint();
        trailed_values.assign(cell, 30);
        trailed_values.synchronise(1);
        assert_eq!(9, trailed_values.read(cell));
    }
}
