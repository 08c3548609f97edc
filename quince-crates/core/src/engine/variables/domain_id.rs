use std::fmt::Display;

use crate::containers::StorageKey;

/// Identifies any variable of a [`crate::State`], integer or set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId {
    id: u32,
}

impl StorageKey for VariableId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        VariableId { id: index as u32 }
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.id)
    }
}

/// An integer variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainId {
    pub(crate) variable: VariableId,
}

/// A set variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetDomainId {
    pub(crate) variable: VariableId,
}

impl From<DomainId> for VariableId {
    fn from(domain: DomainId) -> Self {
        domain.variable
    }
}

impl From<SetDomainId> for VariableId {
    fn from(domain: SetDomainId) -> Self {
        domain.variable
    }
}

impl Display for DomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variable)
    }
}

impl Display for SetDomainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variable)
    }
}
