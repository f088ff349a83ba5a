// Sync state types.
// Fetch lifecycle states and the events marshalled to the foreground thread.

use crate::api::Agency;
use crate::error::{Disposition, KickstartError};

/// Message shown when the API host cannot be reached.
pub const CONNECTIVITY_MESSAGE: &str = "Unable to connect to server";

/// Lifecycle of the one-shot fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
    #[default]
    Idle,
    InFlight,
    Succeeded {
        count: usize,
    },
    Failed(Disposition),
}

impl FetchState {
    pub fn display(&self) -> &'static str {
        match self {
            FetchState::Idle => "Idle",
            FetchState::InFlight => "Fetching agencies",
            FetchState::Succeeded { .. } => "Synced",
            FetchState::Failed(Disposition::Notify) => "Offline",
            FetchState::Failed(Disposition::Fatal) => "Failed",
        }
    }

    /// Whether the fetch has finished, one way or the other.
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Succeeded { .. } | FetchState::Failed(_))
    }
}

/// Events delivered from background tasks to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// Latest full snapshot of the agency table.
    Agencies(Vec<Agency>),
    /// Show or hide the loading indicator.
    Loading(bool),
    /// Transient, dismissible notification.
    Notify(String),
    /// Unrecoverable error; the UI must tear down.
    Fatal(KickstartError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!FetchState::Idle.is_terminal());
        assert!(!FetchState::InFlight.is_terminal());
        assert!(FetchState::Succeeded { count: 0 }.is_terminal());
        assert!(FetchState::Failed(Disposition::Notify).is_terminal());
    }
}
