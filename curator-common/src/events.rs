//! Event types for the curator event system
//!
//! Provides shared event definitions and an EventBus. The server forwards
//! these events to browsers over SSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::artwork::IdentityKey;

/// What happened to the selection set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionChange {
    Added,
    Removed,
    Cleared,
}

/// Curator event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CuratorEvent {
    /// The exhibition changed (emitted only for effective mutations)
    SelectionChanged {
        change: SelectionChange,
        /// Affected entry; `None` for `Cleared`
        key: Option<IdentityKey>,
        /// Selection revision after the change
        revision: u64,
        /// Entry count after the change
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A multi-source search round finished and became the latest result
    SearchCompleted {
        generation: u64,
        query: String,
        total: usize,
        timestamp: DateTime<Utc>,
    },
}

impl CuratorEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            CuratorEvent::SelectionChanged { .. } => "SelectionChanged",
            CuratorEvent::SearchCompleted { .. } => "SearchCompleted",
        }
    }
}

/// Broadcast channel shared by the exhibition, the search board and SSE clients
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<CuratorEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<CuratorEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: CuratorEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::Source;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = CuratorEvent::SelectionChanged {
            change: SelectionChange::Added,
            key: Some(IdentityKey::new(Source::Aic, 7)),
            revision: 1,
            count: 1,
            timestamp: Utc::now(),
        };

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "SelectionChanged");
        assert_eq!(value["change"], "added");
        assert_eq!(value["key"]["source"], "aic");
        assert_eq!(value["key"]["id"], 7);
        assert_eq!(event.event_type(), "SelectionChanged");
    }

    #[tokio::test]
    async fn test_subscribers_receive_emitted_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.emit_lossy(CuratorEvent::SearchCompleted {
            generation: 3,
            query: "painting".to_string(),
            total: 5,
            timestamp: Utc::now(),
        });

        match rx.recv().await.unwrap() {
            CuratorEvent::SearchCompleted { generation, total, .. } => {
                assert_eq!(generation, 3);
                assert_eq!(total, 5);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_emit_without_subscribers_is_harmless() {
        let bus = EventBus::new(4);
        bus.emit_lossy(CuratorEvent::SearchCompleted {
            generation: 1,
            query: "x".to_string(),
            total: 0,
            timestamp: Utc::now(),
        });
        assert_eq!(bus.subscriber_count(), 0);
    }
}
