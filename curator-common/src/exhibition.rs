//! Exhibition manager
//!
//! Owns the process-wide [`SelectionSet`] and its session-store mirror.
//! Constructed once at startup and handed to whoever needs it.
//!
//! Every mutation runs under one mutex, and the stored copy is written
//! before the mutating call returns, so the in-memory and persisted views
//! never diverge. Storage failures are logged and swallowed.
//!
//! Persisted layout under [`STORAGE_KEY`]:
//!
//! ```json
//! {"version": 1, "items": [ /* canonical artworks, insertion order */ ]}
//! ```
//!
//! A bare JSON array (the older unversioned layout, possibly holding
//! precursor field names) is still accepted on restore.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use crate::artwork::{Artwork, ArtworkDraft, IdentityKey, Identify};
use crate::events::{CuratorEvent, EventBus, SelectionChange};
use crate::selection::{AddOutcome, SelectionSet};
use crate::storage::SessionStore;
use crate::{Error, Result};

/// Session storage key holding the exhibition
pub const STORAGE_KEY: &str = "exhibition-items";

/// Current persisted schema version
pub const PERSISTED_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedExhibition {
    version: u32,
    items: Vec<Artwork>,
}

/// Serialize entries into the versioned persisted layout
pub fn encode(items: &[Artwork]) -> Result<String> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        version: u32,
        items: &'a [Artwork],
    }

    Ok(serde_json::to_string(&Borrowed {
        version: PERSISTED_VERSION,
        items,
    })?)
}

/// Parse a persisted value (versioned object or legacy bare array)
pub fn decode(raw: &str) -> Result<Vec<Artwork>> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(elements) => {
            let total = elements.len();
            let items: Vec<Artwork> = elements
                .into_iter()
                .filter_map(|element| serde_json::from_value::<ArtworkDraft>(element).ok())
                .filter_map(ArtworkDraft::into_artwork)
                .collect();
            if items.len() < total {
                warn!(
                    kept = items.len(),
                    skipped = total - items.len(),
                    "Legacy exhibition data contained unusable entries"
                );
            }
            Ok(items)
        }
        object @ Value::Object(_) => {
            let persisted: PersistedExhibition = serde_json::from_value(object)?;
            if persisted.version != PERSISTED_VERSION {
                return Err(Error::Persistence(format!(
                    "unsupported exhibition schema version {}",
                    persisted.version
                )));
            }
            Ok(persisted.items.into_iter().map(Artwork::normalized).collect())
        }
        other => Err(Error::Persistence(format!(
            "unexpected exhibition data: {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Point-in-time copy of the exhibition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionSnapshot {
    pub revision: u64,
    pub count: usize,
    pub items: Vec<Artwork>,
}

/// Outcome of a mutation plus the state it left behind, read under one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied<T> {
    pub result: T,
    pub revision: u64,
    pub count: usize,
}

impl<T> Applied<T> {
    fn after(result: T, set: &SelectionSet) -> Self {
        Self {
            result,
            revision: set.revision(),
            count: set.count(),
        }
    }
}

/// Shared, persisted selection set
pub struct Exhibition {
    state: Mutex<SelectionSet>,
    store: Arc<dyn SessionStore>,
    event_bus: EventBus,
}

impl Exhibition {
    /// Restore from the session store; any failure starts from an empty set
    pub fn restore(store: Arc<dyn SessionStore>, event_bus: EventBus) -> Self {
        let set = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(items) => {
                    let set = SelectionSet::from_entries(items);
                    info!(count = set.count(), "Exhibition restored from session storage");
                    set
                }
                Err(e) => {
                    warn!(error = %e, "Stored exhibition unreadable, starting empty");
                    SelectionSet::new()
                }
            },
            Ok(None) => {
                debug!("No stored exhibition, starting empty");
                SelectionSet::new()
            }
            Err(e) => {
                warn!(error = %e, "Session storage unavailable, starting empty");
                SelectionSet::new()
            }
        };

        Self {
            state: Mutex::new(set),
            store,
            event_bus,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectionSet> {
        // A panic mid-mutation cannot leave the Vec half-written, so the data is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, artwork: Artwork) -> Applied<AddOutcome> {
        let mut set = self.lock();
        let key = artwork.key();
        let outcome = set.add(artwork);
        if outcome.is_mutation() {
            self.commit(&set, SelectionChange::Added, Some(key));
        }
        Applied::after(outcome, &set)
    }

    /// Add a lenient record; unidentifiable drafts are ignored
    pub fn add_draft(&self, draft: ArtworkDraft) -> Applied<AddOutcome> {
        let Some(artwork) = draft.into_artwork() else {
            debug!("Ignoring exhibition add without a usable identifier");
            return Applied::after(AddOutcome::Unidentifiable, &self.lock());
        };
        self.add(artwork)
    }

    pub fn remove<T: Identify + ?Sized>(&self, item: &T) -> Applied<bool> {
        let mut set = self.lock();
        let removed = set.remove(item);
        if removed {
            self.commit(&set, SelectionChange::Removed, item.identity_key());
        }
        Applied::after(removed, &set)
    }

    pub fn contains<T: Identify + ?Sized>(&self, item: &T) -> bool {
        self.lock().contains(item)
    }

    pub fn count(&self) -> usize {
        self.lock().count()
    }

    /// Entries in insertion order
    pub fn list(&self) -> Vec<Artwork> {
        self.lock().list().to_vec()
    }

    pub fn snapshot(&self) -> ExhibitionSnapshot {
        let set = self.lock();
        ExhibitionSnapshot {
            revision: set.revision(),
            count: set.count(),
            items: set.list().to_vec(),
        }
    }

    /// Remove every entry
    pub fn clear(&self) -> Applied<bool> {
        let mut set = self.lock();
        let cleared = set.clear();
        if cleared {
            self.commit(&set, SelectionChange::Cleared, None);
        }
        Applied::after(cleared, &set)
    }

    /// End of session: drop the stored copy, keep serving the in-memory set
    pub fn expire_storage(&self) {
        let _set = self.lock();
        match self.store.clear(STORAGE_KEY) {
            Ok(()) => info!("Exhibition session storage cleared"),
            Err(e) => warn!(error = %e, "Failed to clear exhibition session storage"),
        }
    }

    // Runs with the lock held.
    fn commit(&self, set: &SelectionSet, change: SelectionChange, key: Option<IdentityKey>) {
        let written = if set.is_empty() {
            self.store.clear(STORAGE_KEY)
        } else {
            encode(set.list()).and_then(|raw| self.store.set(STORAGE_KEY, &raw))
        };
        match written {
            Ok(()) => debug!(revision = set.revision(), count = set.count(), "Exhibition persisted"),
            Err(e) => warn!(error = %e, "Failed to persist exhibition, keeping in-memory state"),
        }

        self.event_bus.emit_lossy(CuratorEvent::SelectionChanged {
            change,
            key,
            revision: set.revision(),
            count: set.count(),
            timestamp: Utc::now(),
        });
    }
}
