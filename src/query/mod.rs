//! Query Layer
//!
//! Read-only accessors over one published World. A [`Query`] holds the
//! `Arc<World>` it was created with, so a reload that publishes a new World
//! does not change answers mid-request.

pub mod labels;
pub mod links;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::{LegendsError, Result};
use crate::core::types::{Kind, RecordId};
use crate::model::{RecordRef, World};
use crate::schema::collections::HistoricalEventCollection;
use crate::schema::events::HistoricalEvent;
use crate::schema::records::ArtForm;
use crate::schema::Record;

pub use labels::title_case;

#[derive(Debug, Clone, Default)]
pub struct Query {
    world: Option<Arc<World>>,
}

/// Name ascending, ties by id
fn by_name_then_id<T: Record + ?Sized>(a: &T, b: &T) -> std::cmp::Ordering {
    a.name().cmp(b.name()).then(a.id().cmp(&b.id()))
}

impl Query {
    pub fn new(world: Option<Arc<World>>) -> Self {
        Self { world }
    }

    pub fn from_world(world: World) -> Self {
        Self::new(Some(Arc::new(world)))
    }

    pub fn is_loaded(&self) -> bool {
        self.world.is_some()
    }

    pub fn world(&self) -> Result<&World> {
        self.world.as_deref().ok_or(LegendsError::NotLoaded)
    }

    pub fn get_by_id(&self, kind: Kind, id: RecordId) -> Result<RecordRef<'_>> {
        self.world()?
            .get(kind, id)
            .ok_or(LegendsError::NotFound { kind, id })
    }

    /// Every record of `kind` exactly once, keyed by its type string
    pub fn list_grouped_by_type(&self, kind: Kind) -> Result<BTreeMap<String, Vec<RecordRef<'_>>>> {
        let mut groups: BTreeMap<String, Vec<RecordRef<'_>>> = BTreeMap::new();
        for record in self.world()?.records(kind) {
            groups
                .entry(record.type_name().to_string())
                .or_default()
                .push(record);
        }
        for list in groups.values_mut() {
            list.sort_by(|a, b| by_name_then_id(a.as_record(), b.as_record()));
        }
        Ok(groups)
    }

    /// Distinct event sub-kinds, sorted
    pub fn list_event_kinds(&self) -> Result<Vec<&str>> {
        Ok(self.world()?.event_kinds.iter().map(String::as_str).collect())
    }

    pub fn list_collection_kinds(&self) -> Result<Vec<&str>> {
        Ok(self
            .world()?
            .collection_kinds
            .iter()
            .map(String::as_str)
            .collect())
    }

    /// Events whose sub-kind name is `name`, ascending by id
    pub fn list_events_of_kind(&self, name: &str) -> Result<Vec<&HistoricalEvent>> {
        let mut events: Vec<_> = self
            .world()?
            .historical_events
            .values()
            .filter(|e| e.kind_name() == name)
            .collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }

    pub fn list_collections_of_kind(&self, name: &str) -> Result<Vec<&HistoricalEventCollection>> {
        let mut cols: Vec<_> = self
            .world()?
            .historical_event_collections
            .values()
            .filter(|c| c.kind_name() == name)
            .collect();
        cols.sort_by_key(|c| c.id);
        Ok(cols)
    }

    /// Dance, musical and poetic forms, each list sorted by name then id
    pub fn list_art_forms(&self) -> Result<BTreeMap<Kind, Vec<&ArtForm>>> {
        let world = self.world()?;
        let mut out = BTreeMap::new();
        for kind in [Kind::DanceForm, Kind::MusicalForm, Kind::PoeticForm] {
            let mut forms: Vec<&ArtForm> = world
                .art_forms(kind)
                .map(|t| t.values().collect())
                .unwrap_or_default();
            forms.sort_by(|a, b| by_name_then_id(*a, *b));
            out.insert(kind, forms);
        }
        Ok(out)
    }
}
