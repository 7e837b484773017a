//! Persisted log journal.
//!
//! The most recent log events are kept in the durable store under `app_logs`
//! as a JSON array of `{level, message, timestamp}`, capped at
//! [`LogJournal::DEFAULT_CAPACITY`] entries with the oldest evicted first.
//!
//! [`JournalLayer`] is a `tracing` layer that mirrors events into a journal,
//! so the CLI can show what happened during earlier invocations.

use std::cell::Cell;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, warn};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use crate::error::StoreResult;
use crate::store::KeyValueStore;

/// Store key of the journal.
pub const LOG_KEY: &str = "app_logs";

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Lowercase level name ("info", "warn", ...).
    pub level: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Creates an entry stamped now.
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded log ring stored in a [`KeyValueStore`].
///
/// Clones share one append lock.
#[derive(Clone)]
pub struct LogJournal {
    store: Arc<dyn KeyValueStore>,
    capacity: usize,
    append_lock: Arc<Mutex<()>>,
}

impl LogJournal {
    /// Number of entries kept by default.
    pub const DEFAULT_CAPACITY: usize = 100;

    /// Creates a journal over `store` with the default capacity.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            capacity: Self::DEFAULT_CAPACITY,
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Sets the maximum number of entries kept.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Appends an entry, evicting the oldest beyond capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn append(&self, entry: LogEntry) -> StoreResult<()> {
        // Held across the read and the write so concurrent appends are not lost.
        let _guard = self.append_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.entries();
        entries.push(entry);
        if entries.len() > self.capacity {
            let excess = entries.len() - self.capacity;
            entries.drain(..excess);
        }
        let json = serde_json::to_string(&entries)?;
        self.store.set(LOG_KEY, &json)
    }

    /// Returns all entries, oldest first.
    ///
    /// A missing or unreadable journal is empty.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.store
            .get(LOG_KEY)
            .ok()
            .flatten()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Removes every entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> StoreResult<()> {
        let _guard = self.append_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.remove(LOG_KEY).map(|_| ())
    }
}

impl fmt::Debug for LogJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogJournal")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

thread_local! {
    /// Set while the layer is writing, so events emitted by the store itself
    /// are not journaled recursively.
    static WRITING: Cell<bool> = const { Cell::new(false) };
}

/// A `tracing` layer that appends events to a [`LogJournal`].
#[derive(Debug, Clone)]
pub struct JournalLayer {
    journal: LogJournal,
    max_level: Level,
}

impl JournalLayer {
    /// Creates a layer journaling `INFO` and more severe events.
    pub fn new(journal: LogJournal) -> Self {
        Self {
            journal,
            max_level: Level::INFO,
        }
    }

    /// Sets the least severe level that is journaled.
    pub fn with_max_level(mut self, level: Level) -> Self {
        self.max_level = level;
        self
    }
}

impl<S: Subscriber> Layer<S> for JournalLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        // Level ordering: TRACE > DEBUG > INFO > WARN > ERROR.
        if level > self.max_level || WRITING.with(Cell::get) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        WRITING.with(|w| w.set(true));
        let result = self
            .journal
            .append(LogEntry::new(level.as_str().to_lowercase(), visitor.finish()));
        if let Err(e) = result {
            // Still inside the guard, so this is not journaled.
            warn!(error = %e, "failed to write log journal");
        }
        WRITING.with(|w| w.set(false));
    }
}

/// Collects the `message` field followed by the other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}
