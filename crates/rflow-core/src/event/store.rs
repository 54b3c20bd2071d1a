use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{ReplayEvent, ReplayEventKind};

/// Append-only event storage, keyed by replay id.
pub trait EventStore {
    /// Append an event from its kind; the store assigns `seq` and `ts`.
    fn append_kind(&mut self, replay_id: Uuid, kind: ReplayEventKind) -> ReplayEvent;
    /// Events of one replay, ascending by `seq`.
    fn list(&self, replay_id: Uuid) -> Vec<ReplayEvent>;
}

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: HashMap<Uuid, Vec<ReplayEvent>>,
}

impl EventStore for InMemoryEventStore {
    fn append_kind(&mut self, replay_id: Uuid, kind: ReplayEventKind) -> ReplayEvent {
        let trail = self.events.entry(replay_id).or_default();
        let event = ReplayEvent {
            seq: trail.len() as u64,
            replay_id,
            kind,
            ts: Utc::now(),
        };
        trail.push(event.clone());
        event
    }

    fn list(&self, replay_id: Uuid) -> Vec<ReplayEvent> {
        self.events.get(&replay_id).cloned().unwrap_or_default()
    }
}
