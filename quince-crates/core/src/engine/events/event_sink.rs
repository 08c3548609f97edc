use super::DomainEvent;
use super::DomainEvents;
use crate::containers::KeyedVec;
use crate::engine::variables::VariableId;

/// Collects the events produced by domain operations until the driver moves them into the fine
/// queue.
///
/// Variables are handed out in the order in which they were first modified, which keeps dispatch
/// deterministic.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    pending: KeyedVec<VariableId, DomainEvents>,
    modified: Vec<VariableId>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.pending.push(DomainEvents::empty());
    }

    pub(crate) fn record(&mut self, variable: VariableId, event: DomainEvent) {
        let pending = &mut self.pending[variable];
        if pending.is_empty() {
            self.modified.push(variable);
        }
        *pending = pending.union(event.into());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.modified.is_empty()
    }

    pub(crate) fn drain(&mut self) -> impl Iterator<Item = (VariableId, DomainEvents)> + '_ {
        let pending = &mut self.pending;
        self.modified
            .drain(..)
            .map(move |variable| (variable, std::mem::take(&mut pending[variable])))
    }

    pub(crate) fn clear(&mut self) {
        self.drain().for_each(drop);
    }
}
