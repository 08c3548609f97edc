use std::marker::PhantomData;
use std::ops::Index;
use std::ops::IndexMut;

use super::Propagator;
use super::PropagatorId;
use crate::containers::KeyedVec;

/// A handle to a propagator of type `P` which was added to a [`crate::State`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropagatorHandle<P> {
    pub(crate) id: PropagatorId,
    pub(crate) propagator: PhantomData<P>,
}

impl<P> PropagatorHandle<P> {
    pub fn propagator_id(&self) -> PropagatorId {
        self.id
    }
}

impl<P> Clone for PropagatorHandle<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PropagatorHandle<P> {}

/// Owns every propagator of a model.
#[derive(Default, Clone)]
pub(crate) struct PropagatorStore {
    propagators: KeyedVec<PropagatorId, Box<dyn Propagator>>,
}

impl std::fmt::Debug for PropagatorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.propagators.iter().map(|propagator| propagator.name()))
            .finish()
    }
}

impl PropagatorStore {
    pub(crate) fn next_id(&self) -> PropagatorId {
        self.propagators.next_key()
    }

    pub(crate) fn push<P: Propagator>(&mut self, propagator: P) -> PropagatorHandle<P> {
        let id = self.propagators.push(Box::new(propagator));
        PropagatorHandle {
            id,
            propagator: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.propagators.len()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Propagator>> {
        self.propagators.iter_mut()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn Propagator> {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }

    pub(crate) fn get_propagator<P: Propagator>(&self, handle: PropagatorHandle<P>) -> Option<&P> {
        self.propagators
            .get(handle.id)
            .and_then(|propagator| propagator.downcast_ref())
    }
}

impl Index<PropagatorId> for PropagatorStore {
    type Output = dyn Propagator;

    fn index(&self, index: PropagatorId) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl IndexMut<PropagatorId> for PropagatorStore {
    fn index_mut(&mut self, index: PropagatorId) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}
