// App state and main event loop.
// Applies sync events on the foreground thread and handles keyboard input.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::Agency;
use crate::error::{KickstartError, Result};
use crate::sync::UiEvent;
use crate::ui;

/// How long a notification stays up when not dismissed.
pub const NOTIFICATION_TTL: Duration = Duration::from_millis(1500);

/// Transient, dismissible message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.shown_at.elapsed() >= ttl
    }
}

/// Main application state.
#[derive(Debug, Default)]
pub struct App {
    /// Latest snapshot from the local store.
    pub agencies: Vec<Agency>,
    /// Loading indicator visibility.
    pub loading: bool,
    pub notification: Option<Notification>,
    /// Whether the app should exit.
    pub should_quit: bool,
    fatal: Option<KickstartError>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main event loop. Returns the fatal error that ended it, if any.
    pub fn run(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        events: &mut mpsc::UnboundedReceiver<UiEvent>,
    ) -> Result<()> {
        while !self.should_quit {
            self.drain_events(events);
            if let Some(err) = self.fatal.take() {
                return Err(err);
            }
            self.expire_notification(NOTIFICATION_TTL);

            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_input()?;
        }
        info!("quit requested");
        Ok(())
    }

    /// Apply everything the background tasks have sent so far.
    pub fn drain_events(&mut self, events: &mut mpsc::UnboundedReceiver<UiEvent>) {
        while let Ok(event) = events.try_recv() {
            self.apply(event);
        }
    }

    /// Apply a single sync event to the display state.
    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Agencies(agencies) => {
                debug!(count = agencies.len(), "displayed agencies");
                self.agencies = agencies;
            }
            UiEvent::Loading(visible) => self.loading = visible,
            UiEvent::Notify(message) => self.notification = Some(Notification::new(message)),
            UiEvent::Fatal(err) => {
                self.fatal.get_or_insert(err);
            }
        }
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn expire_notification(&mut self, ttl: Duration) {
        if self.notification.as_ref().is_some_and(|n| n.is_expired(ttl)) {
            self.notification = None;
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            self.should_quit = true
                        }
                        KeyCode::Esc => self.dismiss_notification(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }
}
