pub(crate) mod events;
pub(crate) mod queues;
mod state;
pub(crate) mod trailed;
pub(crate) mod variables;
pub(crate) mod watch_lists;

pub use state::EngineStatistics;
pub use state::PropagationPhase;
pub use state::State;
