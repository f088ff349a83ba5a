// Sync/display coordinator.
// Runs the display subscription and the one-shot fetch as a single task group.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::api::AgencySource;
use crate::error::{Disposition, KickstartError};
use crate::store::{AgencyFeed, AgencyStore};

use super::state::{CONNECTIVITY_MESSAGE, FetchState, UiEvent};

/// Wires an agency source to the local store and the UI event channel.
pub struct SyncCoordinator {
    source: Arc<dyn AgencySource>,
    store: AgencyStore,
    demo_delay: Option<Duration>,
}

impl SyncCoordinator {
    pub fn new(source: Arc<dyn AgencySource>, store: AgencyStore) -> Self {
        Self {
            source,
            store,
            demo_delay: None,
        }
    }

    /// Hold the fetch back so the loading indicator stays up long enough to see.
    pub fn with_demo_delay(mut self, delay: Option<Duration>) -> Self {
        self.demo_delay = delay;
        self
    }

    /// Start the display subscription and the fetch.
    ///
    /// Must be called from within a tokio runtime context. Everything the
    /// session spawns is torn down together by [`SyncSession::shutdown`] or
    /// when the session is dropped.
    pub fn start(&self, events: mpsc::UnboundedSender<UiEvent>) -> SyncSession {
        let (state_tx, state_rx) = watch::channel(FetchState::Idle);
        let mut tasks = JoinSet::new();

        // Subscribe before the fetch is spawned so its writes follow the first read
        tasks.spawn(forward_snapshots(self.store.observe_all(), events.clone()));
        tasks.spawn(fetch_and_persist(
            Arc::clone(&self.source),
            self.store.clone(),
            events,
            state_tx,
            self.demo_delay,
        ));

        SyncSession {
            tasks,
            fetch_state: state_rx,
        }
    }
}

/// Running sync tasks, owned by the view that started them.
pub struct SyncSession {
    tasks: JoinSet<()>,
    fetch_state: watch::Receiver<FetchState>,
}

impl SyncSession {
    /// Current fetch state.
    pub fn fetch_state(&self) -> FetchState {
        self.fetch_state.borrow().clone()
    }

    /// Wait until the fetch has succeeded or failed.
    #[cfg(test)]
    pub async fn fetch_finished(&self) -> FetchState {
        let mut rx = self.fetch_state.clone();
        let finished = rx
            .wait_for(FetchState::is_terminal)
            .await
            .map(|state| state.clone());
        finished.unwrap_or_else(|_| rx.borrow().clone())
    }

    /// Cancel the display subscription and any in-flight fetch together.
    pub async fn shutdown(mut self) {
        self.tasks.abort_all();
        while let Some(result) = self.tasks.join_next().await {
            if let Err(err) = result
                && err.is_panic()
            {
                warn!(error = %err, "sync task panicked");
            }
        }
        debug!("sync session torn down");
    }
}

async fn forward_snapshots(mut feed: AgencyFeed, events: mpsc::UnboundedSender<UiEvent>) {
    while let Some(snapshot) = feed.next().await {
        debug!(count = snapshot.len(), "forwarding snapshot to display");
        if events.send(UiEvent::Agencies(snapshot)).is_err() {
            break;
        }
    }
}

async fn fetch_and_persist(
    source: Arc<dyn AgencySource>,
    store: AgencyStore,
    events: mpsc::UnboundedSender<UiEvent>,
    state: watch::Sender<FetchState>,
    demo_delay: Option<Duration>,
) {
    state.send_replace(FetchState::InFlight);
    let _ = events.send(UiEvent::Loading(true));
    info!("fetching agencies");

    if let Some(delay) = demo_delay {
        tokio::time::sleep(delay).await;
    }

    let fetched = source.list_agencies().await;
    let _ = events.send(UiEvent::Loading(false));

    let outcome = match fetched {
        Ok(agencies) => {
            for agency in &agencies {
                debug!(%agency, "received agency");
            }
            store
                .upsert_all(agencies)
                .await
                .map_err(KickstartError::from)
        }
        Err(err) => Err(KickstartError::from(err)),
    };

    match outcome {
        Ok(count) => {
            info!(count, "agencies synced");
            state.send_replace(FetchState::Succeeded { count });
        }
        Err(err) => {
            let disposition = err.disposition();
            match disposition {
                Disposition::Notify => {
                    warn!(error = %err, "agency fetch failed, keeping cached data");
                    let _ = events.send(UiEvent::Notify(CONNECTIVITY_MESSAGE.to_string()));
                }
                Disposition::Fatal => {
                    error!(error = %err, "agency sync failed");
                    let _ = events.send(UiEvent::Fatal(err));
                }
            }
            state.send_replace(FetchState::Failed(disposition));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Agency;
    use crate::api::endpoints::decode_agencies;
    use crate::error::ApiError;
    use async_trait::async_trait;

    enum FakeSource {
        Agencies(Vec<Agency>),
        Unreachable,
        Malformed,
    }

    #[async_trait]
    impl AgencySource for FakeSource {
        async fn list_agencies(&self) -> Result<Vec<Agency>, ApiError> {
            match self {
                FakeSource::Agencies(agencies) => Ok(agencies.clone()),
                FakeSource::Unreachable => Err(ApiError::NetworkUnavailable {
                    host: "api.metro.net".to_string(),
                    reason: "failed to lookup address information".to_string(),
                }),
                FakeSource::Malformed => Err(decode_agencies("[{\"id\":").unwrap_err()),
            }
        }
    }

    fn agency(id: &str, name: &str) -> Agency {
        Agency {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn metro_agencies() -> Vec<Agency> {
        vec![agency("1", "LA Metro"), agency("2", "Metrolink")]
    }

    /// Run one session to completion and collect every event it sent.
    async fn run_once(source: FakeSource, store: &AgencyStore) -> (FetchState, Vec<UiEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session = SyncCoordinator::new(Arc::new(source), store.clone()).start(tx);

        let state = session.fetch_finished().await;
        session.shutdown().await;

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        (state, events)
    }

    fn loading_transitions(events: &[UiEvent]) -> Vec<bool> {
        events
            .iter()
            .filter_map(|event| match event {
                UiEvent::Loading(visible) => Some(*visible),
                _ => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_successful_fetch_persists_agencies() {
        let store = AgencyStore::open_in_memory().unwrap();

        let (state, events) = run_once(FakeSource::Agencies(metro_agencies()), &store).await;

        assert_eq!(state, FetchState::Succeeded { count: 2 });
        assert_eq!(store.select_all().unwrap(), metro_agencies());
        assert_eq!(loading_transitions(&events), vec![true, false]);
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, UiEvent::Notify(_) | UiEvent::Fatal(_)))
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_notifies_and_keeps_store() {
        let store = AgencyStore::open_in_memory().unwrap();
        store.upsert("9", "Foothill Transit").unwrap();
        let before = store.select_all().unwrap();

        let (state, events) = run_once(FakeSource::Unreachable, &store).await;

        assert_eq!(state, FetchState::Failed(Disposition::Notify));
        assert_eq!(store.select_all().unwrap(), before);
        assert_eq!(loading_transitions(&events), vec![true, false]);

        let notices: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notify(message) => Some(message.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(notices, vec![CONNECTIVITY_MESSAGE]);
        assert!(!events.iter().any(|e| matches!(e, UiEvent::Fatal(_))));
    }

    #[tokio::test]
    async fn test_decode_failure_is_fatal_without_writes() {
        let store = AgencyStore::open_in_memory().unwrap();

        let (state, events) = run_once(FakeSource::Malformed, &store).await;

        assert_eq!(state, FetchState::Failed(Disposition::Fatal));
        assert!(store.select_all().unwrap().is_empty());
        assert_eq!(loading_transitions(&events), vec![true, false]);

        let fatal = events.iter().find_map(|e| match e {
            UiEvent::Fatal(err) => Some(err),
            _ => None,
        });
        assert!(matches!(
            fatal,
            Some(KickstartError::Api(ApiError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn test_display_receives_written_snapshot() {
        let store = AgencyStore::open_in_memory().unwrap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session =
            SyncCoordinator::new(Arc::new(FakeSource::Agencies(metro_agencies())), store).start(tx);

        let displayed = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(event) = rx.recv().await {
                if let UiEvent::Agencies(snapshot) = event {
                    if snapshot.len() == 2 {
                        return snapshot;
                    }
                }
            }
            Vec::new()
        })
        .await
        .unwrap();

        assert_eq!(displayed, metro_agencies());
        session.shutdown().await;
    }

    #[tokio::test]
    async fn test_resubscribe_after_teardown_gets_current_contents() {
        let store = AgencyStore::open_in_memory().unwrap();
        run_once(FakeSource::Agencies(metro_agencies()), &store).await;

        // Second session cannot write, so its first snapshot is the stored data
        let (tx, mut rx) = mpsc::unbounded_channel();
        let session =
            SyncCoordinator::new(Arc::new(FakeSource::Unreachable), store.clone()).start(tx);

        let first = tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(event) = rx.recv().await {
                if let UiEvent::Agencies(snapshot) = event {
                    return Some(snapshot);
                }
            }
            None
        })
        .await
        .unwrap();

        assert_eq!(first, Some(store.select_all().unwrap()));
        session.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_delay_keeps_fetch_in_flight() {
        let store = AgencyStore::open_in_memory().unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let session = SyncCoordinator::new(Arc::new(FakeSource::Unreachable), store)
            .with_demo_delay(Some(Duration::from_secs(1)))
            .start(tx);

        tokio::task::yield_now().await;
        assert_eq!(session.fetch_state(), FetchState::InFlight);

        assert_eq!(
            session.fetch_finished().await,
            FetchState::Failed(Disposition::Notify)
        );
        session.shutdown().await;
    }
}
