use super::VariableId;
use crate::basic_types::EmptyDomain;
use crate::engine::events::DomainEvent;
use crate::engine::trailed::TrailedBitSet;
use crate::engine::trailed::TrailedInteger;
use crate::engine::trailed::TrailedValues;

/// The domain of a set variable: the envelope holds the values which may still be in the set, the
/// kernel the values which certainly are. The envelope always contains the kernel.
#[derive(Debug, Clone)]
pub(crate) struct SetDomain {
    id: VariableId,
    envelope: TrailedBitSet,
    kernel: TrailedBitSet,
    envelope_size: TrailedInteger,
    kernel_size: TrailedInteger,
}

impl SetDomain {
    /// Both slices must be free of duplicates and `kernel` must be a subset of `envelope`.
    pub(crate) fn new(
        id: VariableId,
        trailed_values: &mut TrailedValues,
        envelope: &[i32],
        kernel: &[i32],
    ) -> SetDomain {
        let offset = envelope.iter().copied().min().unwrap_or(0);
        let capacity = envelope
            .iter()
            .copied()
            .max()
            .map_or(0, |max| (max as i64 - offset as i64 + 1) as u32);

        SetDomain {
            id,
            envelope: TrailedBitSet::new(
                trailed_values,
                offset,
                capacity,
                envelope.iter().copied(),
            ),
            kernel: TrailedBitSet::new(trailed_values, offset, capacity, kernel.iter().copied()),
            envelope_size: trailed_values.grow(envelope.len() as i64),
            kernel_size: trailed_values.grow(kernel.len() as i64),
        }
    }

    pub(crate) fn kernel_contains(&self, trailed_values: &TrailedValues, value: i32) -> bool {
        self.kernel.contains(trailed_values, value)
    }

    pub(crate) fn envelope_contains(&self, trailed_values: &TrailedValues, value: i32) -> bool {
        self.envelope.contains(trailed_values, value)
    }

    pub(crate) fn kernel_size(&self, trailed_values: &TrailedValues) -> u32 {
        trailed_values.read(self.kernel_size) as u32
    }

    pub(crate) fn envelope_size(&self, trailed_values: &TrailedValues) -> u32 {
        trailed_values.read(self.envelope_size) as u32
    }

    /// The set is decided once every value of the envelope is in the kernel.
    pub(crate) fn is_fixed(&self, trailed_values: &TrailedValues) -> bool {
        self.kernel_size(trailed_values) == self.envelope_size(trailed_values)
    }

    pub(crate) fn kernel_values<'a>(
        &'a self,
        trailed_values: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        self.kernel.members(trailed_values)
    }

    pub(crate) fn envelope_values<'a>(
        &'a self,
        trailed_values: &'a TrailedValues,
    ) -> impl Iterator<Item = i32> + 'a {
        self.envelope.members(trailed_values)
    }

    pub(crate) fn add_to_kernel(
        &self,
        trailed_values: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<DomainEvent>, EmptyDomain> {
        if self.kernel.contains(trailed_values, value) {
            return Ok(None);
        }
        if !self.envelope.contains(trailed_values, value) {
            return Err(EmptyDomain(self.id));
        }

        let _ = self.kernel.insert(trailed_values, value);
        trailed_values.add_assign(self.kernel_size, 1);

        Ok(Some(DomainEvent::AddToKernel))
    }

    pub(crate) fn remove_from_envelope(
        &self,
        trailed_values: &mut TrailedValues,
        value: i32,
    ) -> Result<Option<DomainEvent>, EmptyDomain> {
        if !self.envelope.contains(trailed_values, value) {
            return Ok(None);
        }
        if self.kernel.contains(trailed_values, value) {
            return Err(EmptyDomain(self.id));
        }

        let _ = self.envelope.remove(trailed_values, value);
        trailed_values.add_assign(self.envelope_size, -1);

        Ok(Some(DomainEvent::RemoveFromEnvelope))
    }
}
