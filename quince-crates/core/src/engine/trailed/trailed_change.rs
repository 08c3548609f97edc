use super::TrailedInteger;

#[derive(Debug, Clone, Copy)]
pub(crate) struct TrailedChange {
    pub(crate) reference: TrailedInteger,
    pub(crate) old_value: i64,
    /// The checkpoint at which `reference` was previously saved.
    pub(crate) old_stamp: usize,
}
