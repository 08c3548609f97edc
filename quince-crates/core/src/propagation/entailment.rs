/// Whether the current domains already decide a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entailment {
    /// Every assignment left in the domains satisfies the constraint.
    True,
    /// No assignment left in the domains satisfies the constraint.
    False,
    /// Neither can be concluded yet.
    Undefined,
}
