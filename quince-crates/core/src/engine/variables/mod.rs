//! Variables and their domains.
mod assignments;
mod domain_id;
mod integer_domain;
mod set_domain;

pub(crate) use assignments::Assignments;
pub(crate) use assignments::VariableKind;
pub use domain_id::DomainId;
pub use domain_id::SetDomainId;
pub use domain_id::VariableId;
pub(crate) use integer_domain::IntegerDomain;
pub(crate) use set_domain::SetDomain;
