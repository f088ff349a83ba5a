// Sync module.
// Coordinates the one-shot agency fetch with the live display subscription.

pub mod coordinator;
pub mod state;

pub use coordinator::SyncCoordinator;
pub use state::UiEvent;
