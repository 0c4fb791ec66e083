//! Periodic autosave of the quote snapshot.
//!
//! Cooperative: the host loop calls `tick` whenever convenient and the
//! task decides if an interval has elapsed. It reads the quote store,
//! never mutates it, and swallows every fault after logging it — a broken
//! disk must not take the session down. UI state is never saved.

use std::time::{Duration, Instant};

use quotegrid_engine::quote::{QuoteData, QuoteStore};
use quotegrid_io::json;
use quotegrid_io::snapshot::{SnapshotStore, AUTOSAVE_KEY};

pub const AUTOSAVE_INTERVAL: Duration = Duration::from_secs(60);

pub struct Autosave {
    store: Option<SnapshotStore>,
    interval: Duration,
    last_run: Instant,
}

impl Autosave {
    /// `store: None` disables autosaving (the task stays callable).
    pub fn new(store: Option<SnapshotStore>, interval: Duration) -> Self {
        Self {
            store,
            interval,
            last_run: Instant::now(),
        }
    }

    /// Reset the timer. Reinitialization must call this so a previously
    /// elapsed interval cannot fire a second, overlapping save.
    pub fn restart(&mut self) {
        self.last_run = Instant::now();
    }

    /// Save if the interval has elapsed since the last run.
    pub fn tick(&mut self, quote: &QuoteStore) {
        if self.last_run.elapsed() < self.interval {
            return;
        }
        self.last_run = Instant::now();
        self.flush(quote);
    }

    /// Save immediately. Quotes without data are not worth snapshotting.
    pub fn flush(&self, quote: &QuoteStore) {
        let Some(store) = &self.store else {
            return;
        };
        if !quote.has_data() {
            return;
        }
        match json::to_json_string(quote.data()) {
            Ok(payload) => {
                if let Err(e) = store.put(AUTOSAVE_KEY, &payload) {
                    eprintln!("Auto-save failed: {}", e);
                }
            }
            Err(e) => eprintln!("Auto-save failed: {}", e),
        }
    }

    /// The previously autosaved quote, if one exists and still parses.
    pub fn load_snapshot(&self) -> Option<QuoteData> {
        let store = self.store.as_ref()?;
        match store.get(AUTOSAVE_KEY) {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(data) => Some(data),
                Err(e) => {
                    eprintln!("Ignoring unreadable auto-save snapshot: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                eprintln!("Failed to read auto-save snapshot: {}", e);
                None
            }
        }
    }

    /// Drop any stored snapshot.
    pub fn discard(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.delete(AUTOSAVE_KEY) {
                eprintln!("Failed to discard auto-save snapshot: {}", e);
            }
        }
    }
}
