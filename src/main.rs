// kickstart: syncs LA Metro transit agencies into a local SQLite cache and shows them live.
// The main thread owns the terminal; network and database work runs on a small tokio pool.

mod api;
mod app;
mod config;
mod error;
mod logging;
mod store;
mod sync;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::api::MetroClient;
use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::store::AgencyStore;
use crate::sync::SyncCoordinator;

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => return exit_code(Err(err)),
    };
    // Held until exit so the fatal error below still reaches the log file
    let _log_guard = match logging::init(&config.log_path, &config.log_filter) {
        Ok(guard) => guard,
        Err(err) => return exit_code(Err(err)),
    };

    exit_code(run(config))
}

/// Fail fast on anything unexpected; crash reporting can hook in here later.
fn exit_code(outcome: Result<()>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "fatal error, terminating");
            eprintln!("kickstart: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    info!(
        base_url = %config.client.base_url,
        db = %config.db_path.display(),
        workers = config.worker_threads,
        "starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name("kickstart-worker")
        .enable_all()
        .build()?;

    let store = AgencyStore::open(&config.db_path)?;
    info!(cached = store.select_all()?.len(), "loaded agency cache");
    let client = MetroClient::new(config.client.clone())?;
    let coordinator =
        SyncCoordinator::new(Arc::new(client), store).with_demo_delay(config.demo_delay);

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let session = {
        let _guard = runtime.enter();
        coordinator.start(events_tx)
    };

    let mut terminal = ratatui::init();
    let mut app = App::new();
    let outcome = app.run(&mut terminal, &mut events_rx);
    ratatui::restore();

    info!(fetch = session.fetch_state().display(), "tearing down");
    runtime.block_on(session.shutdown());
    outcome
}
