//! Following references between records

use ahash::AHashSet;

use crate::core::error::{LegendsError, Result};
use crate::core::types::{Kind, RecordId};
use crate::query::Query;
use crate::schema::events::HistoricalEvent;

impl Query {
    /// Events that name `(kind, id)` in one of their reference fields,
    /// ascending by id. The target need not exist.
    pub fn events_related_to(&self, kind: Kind, id: RecordId) -> Result<Vec<&HistoricalEvent>> {
        let mut events: Vec<_> = self
            .world()?
            .historical_events
            .values()
            .filter(|e| e.mentions(kind, id))
            .collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    /// Ids of every event in a collection, including those of nested
    /// collections, sorted and without repeats. Containment cycles are
    /// visited once.
    pub fn collection_events(&self, id: RecordId) -> Result<Vec<RecordId>> {
        let world = self.world()?;
        if !world.historical_event_collections.contains_key(&id) {
            return Err(LegendsError::NotFound {
                kind: Kind::HistoricalEventCollection,
                id,
            });
        }

        let mut visited = AHashSet::new();
        let mut events = AHashSet::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                continue;
            }
            // dangling sub-collection ids are skipped
            let Some(col) = world.historical_event_collections.get(&current) else {
                continue;
            };
            events.extend(col.events.iter().copied());
            pending.extend(col.subcollections.iter().copied());
        }

        let mut ids: Vec<_> = events.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
