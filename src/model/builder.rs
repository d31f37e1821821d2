//! Single-pass world construction

use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::core::types::{Kind, RecordId};
use crate::model::world::World;
use crate::schema::dispatch::DispatchedRecord;
use crate::schema::Record;

/// Counters describing one completed load
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadStats {
    /// Records kept per kind, after duplicate ids collapsed
    pub records: BTreeMap<Kind, usize>,
    pub eras: usize,
    pub rivers: usize,
    /// Records that replaced an earlier record with the same kind and id
    pub duplicates: u64,
    /// Skipped elements per unrecognized top-level tag
    pub unknown_tags: BTreeMap<String, u64>,
    /// Integer fields that did not parse and were read as zero
    pub coercion_warnings: u64,
    /// Fields present in the file that no known layout declares
    pub unknown_fields: u64,
    pub bytes_read: u64,
    pub elapsed: Duration,
}

impl LoadStats {
    pub fn total_records(&self) -> usize {
        self.records.values().sum()
    }
}

/// Fills a fresh [`World`] from dispatched records.
///
/// References are kept as ids, so insertion order does not matter: an event
/// may name a figure that appears later in the file.
#[derive(Debug, Default)]
pub struct WorldBuilder {
    world: World,
    duplicates: u64,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn put<T: Record>(table: &mut AHashMap<RecordId, T>, record: T, duplicates: &mut u64) {
        let (kind, id) = (record.kind(), record.id());
        if table.insert(id, record).is_some() {
            *duplicates += 1;
            tracing::debug!(kind = %kind, id, "Duplicate id, keeping the later record");
        }
    }

    pub fn insert(&mut self, record: DispatchedRecord) {
        let w = &mut self.world;
        let d = &mut self.duplicates;
        match record {
            DispatchedRecord::Artifact(r) => Self::put(&mut w.artifacts, r, d),
            DispatchedRecord::Entity(r) => Self::put(&mut w.entities, r, d),
            DispatchedRecord::HistoricalFigure(r) => Self::put(&mut w.historical_figures, r, d),
            DispatchedRecord::Identity(r) => Self::put(&mut w.identities, r, d),
            DispatchedRecord::Site(r) => Self::put(&mut w.sites, r, d),
            DispatchedRecord::Region(r) => Self::put(&mut w.regions, r, d),
            DispatchedRecord::Landmass(r) => Self::put(&mut w.landmasses, r, d),
            DispatchedRecord::MountainPeak(r) => Self::put(&mut w.mountain_peaks, r, d),
            DispatchedRecord::UndergroundRegion(r) => Self::put(&mut w.underground_regions, r, d),
            DispatchedRecord::WorldConstruction(r) => Self::put(&mut w.world_constructions, r, d),
            DispatchedRecord::WrittenContent(r) => Self::put(&mut w.written_contents, r, d),
            DispatchedRecord::EntityPopulation(r) => Self::put(&mut w.entity_populations, r, d),
            DispatchedRecord::ArtForm(r) => match r.kind() {
                Kind::MusicalForm => Self::put(&mut w.musical_forms, r, d),
                Kind::PoeticForm => Self::put(&mut w.poetic_forms, r, d),
                _ => Self::put(&mut w.dance_forms, r, d),
            },
            DispatchedRecord::Event(r) => Self::put(&mut w.historical_events, r, d),
            DispatchedRecord::Collection(r) => Self::put(&mut w.historical_event_collections, r, d),
            DispatchedRecord::Era(r) => w.eras.push(r),
            DispatchedRecord::River(r) => w.rivers.push(r),
            DispatchedRecord::WorldName(name) => w.name = name,
            DispatchedRecord::WorldAltName(name) => w.altname = name,
        }
    }

    /// Freeze the world. Only per-kind counts and duplicates are filled in
    /// the returned stats; the loader adds input-side counters.
    ///
    /// Sub-kind sets are taken from the records that survived duplicate
    /// replacement, so every listed kind has at least one record.
    pub fn finish(self) -> (World, LoadStats) {
        let mut world = self.world;
        world.event_kinds = world
            .historical_events
            .values()
            .map(|e| e.kind_name().to_string())
            .collect();
        world.collection_kinds = world
            .historical_event_collections
            .values()
            .map(|c| c.kind_name().to_string())
            .collect();
        let stats = LoadStats {
            records: Kind::ALL
                .iter()
                .map(|&k| (k, world.count(k)))
                .filter(|(_, n)| *n > 0)
                .collect(),
            eras: world.eras.len(),
            rivers: world.rivers.len(),
            duplicates: self.duplicates,
            ..Default::default()
        };
        (world, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::events::{EventDetails, HfDied, HistoricalEvent, ItemStolen};
    use crate::schema::records::Site;
    use crate::core::calendar::Timestamp;

    fn site(id: RecordId, name: &str) -> DispatchedRecord {
        DispatchedRecord::Site(Site {
            id,
            name: name.into(),
            ..Default::default()
        })
    }

    fn event(id: RecordId, details: EventDetails) -> DispatchedRecord {
        DispatchedRecord::Event(HistoricalEvent {
            id,
            timestamp: Timestamp::new(1, 0),
            details,
        })
    }

    #[test]
    fn test_last_duplicate_wins() {
        let mut builder = WorldBuilder::new();
        builder.insert(site(1, "first"));
        builder.insert(site(1, "second"));
        builder.insert(site(2, "other"));
        let (world, stats) = builder.finish();
        assert_eq!(world.sites[&1].name, "second");
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.records.get(&Kind::Site), Some(&2));
        assert_eq!(stats.total_records(), 2);
    }

    #[test]
    fn test_event_kinds_accumulate() {
        let mut builder = WorldBuilder::new();
        builder.insert(event(1, EventDetails::HfDied(HfDied::default())));
        builder.insert(event(2, EventDetails::ItemStolen(ItemStolen::default())));
        builder.insert(event(3, EventDetails::HfDied(HfDied::default())));
        let (world, _) = builder.finish();
        let kinds: Vec<_> = world.event_kinds.iter().map(String::as_str).collect();
        assert_eq!(kinds, vec!["HfDied", "ItemStolen"]);
    }

    #[test]
    fn test_replaced_event_drops_its_kind() {
        let mut builder = WorldBuilder::new();
        builder.insert(event(1, EventDetails::HfDied(HfDied::default())));
        builder.insert(event(1, EventDetails::ItemStolen(ItemStolen::default())));
        let (world, stats) = builder.finish();
        let kinds: Vec<_> = world.event_kinds.iter().map(String::as_str).collect();
        assert_eq!(kinds, vec!["ItemStolen"]);
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_world_metadata() {
        let mut builder = WorldBuilder::new();
        builder.insert(DispatchedRecord::WorldName("the world of x".into()));
        builder.insert(DispatchedRecord::WorldAltName("Urdim".into()));
        let (world, stats) = builder.finish();
        assert_eq!(world.name, "the world of x");
        assert_eq!(world.altname, "Urdim");
        assert!(stats.records.is_empty());
    }
}
