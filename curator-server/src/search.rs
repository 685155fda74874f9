//! Search generations
//!
//! Each search round takes a ticket from the [`SearchBoard`]. When the round
//! finishes it publishes its results, but only if no newer round has started
//! in the meantime. A superseded round's results are dropped, so the "latest
//! results" slot never goes backwards.

use chrono::{DateTime, Utc};
use curator_common::events::{CuratorEvent, EventBus};
use curator_common::{Artwork, Source};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use crate::sources::SourceResults;

/// Per-source record count, for diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceCount {
    pub source: Source,
    pub count: usize,
}

/// Completed multi-source search round
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub generation: u64,
    pub query: String,
    pub total: usize,
    pub items: Vec<Artwork>,
    pub sources: Vec<SourceCount>,
    pub completed_at: DateTime<Utc>,
}

impl SearchResult {
    /// Concatenate per-source groups in the order given
    pub fn from_groups(generation: u64, query: &str, groups: Vec<SourceResults>) -> Self {
        let sources = groups
            .iter()
            .map(|g| SourceCount {
                source: g.source,
                count: g.items.len(),
            })
            .collect();
        let items: Vec<Artwork> = groups.into_iter().flat_map(|g| g.items).collect();

        Self {
            generation,
            query: query.to_string(),
            total: items.len(),
            items,
            sources,
            completed_at: Utc::now(),
        }
    }
}

/// Search round ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Generation counter plus the latest published result
pub struct SearchBoard {
    issued: AtomicU64,
    latest: Mutex<Option<SearchResult>>,
    event_bus: EventBus,
}

impl SearchBoard {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            issued: AtomicU64::new(0),
            latest: Mutex::new(None),
            event_bus,
        }
    }

    /// Start a round; generations start at 1
    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Newest generation issued so far (0 before the first search)
    pub fn current_generation(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    /// Publish a finished round; returns `false` if it was superseded
    pub fn publish(&self, result: SearchResult) -> bool {
        let mut latest = self.latest.lock().unwrap_or_else(PoisonError::into_inner);

        // Checked under the lock so two finishing rounds cannot interleave.
        if result.generation != self.current_generation() {
            debug!(
                generation = result.generation,
                current = self.current_generation(),
                "Discarding superseded search results"
            );
            return false;
        }

        self.event_bus.emit_lossy(CuratorEvent::SearchCompleted {
            generation: result.generation,
            query: result.query.clone(),
            total: result.total,
            timestamp: result.completed_at,
        });
        *latest = Some(result);
        true
    }

    pub fn latest(&self) -> Option<SearchResult> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
