//! Filesystem watcher for incremental analysis.
//!
//! Emits debounced file events on a channel; the watch command feeds them
//! into [`RouteAnalyzer::detect_routes`] so the graph tracks the working
//! tree. Event kinds are not distinguished — the refresh path checks actual
//! filesystem state, which covers create, modify and delete uniformly.
//!
//! [`RouteAnalyzer::detect_routes`]: crate::analyzer::RouteAnalyzer::detect_routes

use anyhow::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, SystemTime};
use tracing::warn;

/// File event emitted by the watcher
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEvent {
    /// Path of the affected file
    pub path: PathBuf,
    /// Timestamp when the event was detected
    pub timestamp: SystemTime,
}

/// Filesystem watcher configuration
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self { debounce_ms: 500 }
    }
}

/// Filesystem watcher that emits events on a channel
pub struct FileSystemWatcher {
    _watcher_thread: thread::JoinHandle<()>,
    event_receiver: Receiver<FileEvent>,
}

impl FileSystemWatcher {
    /// Create a new watcher for the given directory
    ///
    /// # Arguments
    /// * `path` - Directory to watch recursively
    /// * `config` - Watcher configuration
    ///
    /// # Returns
    /// A watcher that can be polled for events
    pub fn new(path: PathBuf, config: WatcherConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel();

        let thread = thread::spawn(move || {
            if let Err(e) = run_watcher(path, tx, config) {
                warn!(error = %e, "watcher thread terminated");
            }
        });

        Ok(Self {
            _watcher_thread: thread,
            event_receiver: rx,
        })
    }

    /// Receive the next event, blocking until available
    ///
    /// # Returns
    /// `None` if the watcher thread has terminated
    pub fn recv_event(&self) -> Option<FileEvent> {
        self.event_receiver.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv_event(&self) -> Option<FileEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive an event with a timeout
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<FileEvent> {
        self.event_receiver.recv_timeout(timeout).ok()
    }
}

fn run_watcher(path: PathBuf, tx: Sender<FileEvent>, config: WatcherConfig) -> Result<()> {
    let (debounce_tx, debounce_rx) = mpsc::channel();

    let mut debouncer = new_debouncer(
        Duration::from_millis(config.debounce_ms),
        move |result: DebounceEventResult| {
            let _ = debounce_tx.send(result);
        },
    )?;
    debouncer
        .watcher()
        .watch(&path, RecursiveMode::Recursive)?;

    for result in debounce_rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "watch error");
                continue;
            }
        };
        for event in events {
            // AnyContinuous marks an in-progress burst; the final Any event
            // follows once writes settle
            if event.kind != DebouncedEventKind::Any {
                continue;
            }
            let file_event = FileEvent {
                path: event.path,
                timestamp: SystemTime::now(),
            };
            if tx.send(file_event).is_err() {
                // Receiver dropped; stop watching
                return Ok(());
            }
        }
    }

    Ok(())
}
