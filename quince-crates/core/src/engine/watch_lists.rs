use crate::containers::KeyedVec;
use crate::engine::events::WakeDistance;
use crate::engine::variables::VariableId;
use crate::propagation::LocalId;
use crate::propagation::PropagatorId;

/// A propagator which registered for a variable, together with the local id it registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Watcher {
    pub(crate) propagator: PropagatorId,
    pub(crate) local_id: LocalId,
}

/// For every variable, the propagators watching it per wake distance, and the fine queue bucket
/// the variable is scheduled in when it has fine-grained watchers.
#[derive(Debug, Clone, Default)]
pub(crate) struct WatchLists {
    watchers: KeyedVec<VariableId, Vec<Vec<Watcher>>>,
    fine_buckets: KeyedVec<VariableId, Option<usize>>,
}

impl WatchLists {
    pub(crate) fn grow(&mut self, num_distances: usize) {
        let _ = self.watchers.push(vec![vec![]; num_distances]);
        let _ = self.fine_buckets.push(None);
    }

    pub(crate) fn watch(&mut self, variable: VariableId, distance: WakeDistance, watcher: Watcher) {
        self.watchers[variable][distance.index()].push(watcher);
    }

    pub(crate) fn watchers(&self, variable: VariableId, distance: WakeDistance) -> &[Watcher] {
        &self.watchers[variable][distance.index()]
    }

    pub(crate) fn is_watched(&self, variable: VariableId) -> bool {
        self.watchers[variable]
            .iter()
            .any(|watchers| !watchers.is_empty())
    }

    /// The fine queue bucket of the variable; `None` if no fine propagator watches it.
    pub(crate) fn fine_bucket(&self, variable: VariableId) -> Option<usize> {
        self.fine_buckets[variable]
    }

    pub(crate) fn lower_fine_bucket(&mut self, variable: VariableId, bucket: usize) {
        let current = &mut self.fine_buckets[variable];
        *current = Some(current.map_or(bucket, |current| current.min(bucket)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::StorageKey;

    #[test]
    fn fine_bucket_is_the_minimum_over_fine_watchers() {
        let mut watch_lists = WatchLists::default();
        watch_lists.grow(3);
        let variable = VariableId::create_from_index(0);

        assert_eq!(None, watch_lists.fine_bucket(variable));
        watch_lists.lower_fine_bucket(variable, 2);
        watch_lists.lower_fine_bucket(variable, 0);
        watch_lists.lower_fine_bucket(variable, 1);

        assert_eq!(Some(0), watch_lists.fine_bucket(variable));
    }

    #[test]
    fn watchers_are_kept_per_distance() {
        let mut watch_lists = WatchLists::default();
        watch_lists.grow(3);
        let variable = VariableId::create_from_index(0);
        let watcher = Watcher {
            propagator: PropagatorId::create_from_index(4),
            local_id: LocalId::from(1),
        };

        assert!(!watch_lists.is_watched(variable));
        watch_lists.watch(variable, WakeDistance::new(1), watcher);

        assert!(watch_lists.is_watched(variable));
        assert!(watch_lists.watchers(variable, WakeDistance::new(0)).is_empty());
        assert_eq!(&[watcher], watch_lists.watchers(variable, WakeDistance::new(1)));
    }
}
