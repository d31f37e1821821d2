//! World - the decoded, id-indexed snapshot of one legends export

use ahash::AHashMap;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::core::types::{Kind, RecordId};
use crate::schema::collections::HistoricalEventCollection;
use crate::schema::events::HistoricalEvent;
use crate::schema::records::*;
use crate::schema::Record;

/// Everything decoded from one file. Immutable once published; shared
/// between readers through `Arc<World>`.
///
/// References between records are plain ids and may dangle.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// World name, when the file carries one
    pub name: String,
    /// Name in the native language
    pub altname: String,

    pub artifacts: AHashMap<RecordId, Artifact>,
    pub entities: AHashMap<RecordId, Entity>,
    pub historical_figures: AHashMap<RecordId, HistoricalFigure>,
    pub identities: AHashMap<RecordId, Identity>,
    pub sites: AHashMap<RecordId, Site>,
    pub regions: AHashMap<RecordId, Region>,
    pub landmasses: AHashMap<RecordId, Landmass>,
    pub mountain_peaks: AHashMap<RecordId, MountainPeak>,
    pub underground_regions: AHashMap<RecordId, UndergroundRegion>,
    pub world_constructions: AHashMap<RecordId, WorldConstruction>,
    pub written_contents: AHashMap<RecordId, WrittenContent>,
    pub dance_forms: AHashMap<RecordId, ArtForm>,
    pub musical_forms: AHashMap<RecordId, ArtForm>,
    pub poetic_forms: AHashMap<RecordId, ArtForm>,
    pub entity_populations: AHashMap<RecordId, EntityPopulation>,
    pub historical_events: AHashMap<RecordId, HistoricalEvent>,
    pub historical_event_collections: AHashMap<RecordId, HistoricalEventCollection>,

    /// Eras in file order
    pub eras: Vec<HistoricalEra>,
    /// Rivers in file order
    pub rivers: Vec<River>,

    /// Distinct event sub-kinds seen while loading
    pub event_kinds: BTreeSet<String>,
    /// Distinct collection sub-kinds seen while loading
    pub collection_kinds: BTreeSet<String>,
}

/// A borrowed record of any kind
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(untagged)]
pub enum RecordRef<'a> {
    Artifact(&'a Artifact),
    Entity(&'a Entity),
    HistoricalFigure(&'a HistoricalFigure),
    Identity(&'a Identity),
    Site(&'a Site),
    Region(&'a Region),
    Landmass(&'a Landmass),
    MountainPeak(&'a MountainPeak),
    UndergroundRegion(&'a UndergroundRegion),
    WorldConstruction(&'a WorldConstruction),
    WrittenContent(&'a WrittenContent),
    ArtForm(&'a ArtForm),
    EntityPopulation(&'a EntityPopulation),
    Event(&'a HistoricalEvent),
    Collection(&'a HistoricalEventCollection),
}

impl<'a> RecordRef<'a> {
    pub fn as_record(&self) -> &'a dyn Record {
        match *self {
            RecordRef::Artifact(r) => r,
            RecordRef::Entity(r) => r,
            RecordRef::HistoricalFigure(r) => r,
            RecordRef::Identity(r) => r,
            RecordRef::Site(r) => r,
            RecordRef::Region(r) => r,
            RecordRef::Landmass(r) => r,
            RecordRef::MountainPeak(r) => r,
            RecordRef::UndergroundRegion(r) => r,
            RecordRef::WorldConstruction(r) => r,
            RecordRef::WrittenContent(r) => r,
            RecordRef::ArtForm(r) => r,
            RecordRef::EntityPopulation(r) => r,
            RecordRef::Event(r) => r,
            RecordRef::Collection(r) => r,
        }
    }

    pub fn kind(&self) -> Kind {
        self.as_record().kind()
    }

    pub fn id(&self) -> RecordId {
        self.as_record().id()
    }

    pub fn name(&self) -> &'a str {
        self.as_record().name()
    }

    pub fn type_name(&self) -> &'a str {
        self.as_record().type_name()
    }
}

fn refs<'a, T>(
    table: &'a AHashMap<RecordId, T>,
    wrap: fn(&'a T) -> RecordRef<'a>,
) -> Vec<RecordRef<'a>> {
    table.values().map(wrap).collect()
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dance, musical or poetic form table for `kind`
    pub fn art_forms(&self, kind: Kind) -> Option<&AHashMap<RecordId, ArtForm>> {
        match kind {
            Kind::DanceForm => Some(&self.dance_forms),
            Kind::MusicalForm => Some(&self.musical_forms),
            Kind::PoeticForm => Some(&self.poetic_forms),
            _ => None,
        }
    }

    /// Look up one record; `None` when the id is not present for that kind
    pub fn get(&self, kind: Kind, id: RecordId) -> Option<RecordRef<'_>> {
        match kind {
            Kind::Artifact => self.artifacts.get(&id).map(RecordRef::Artifact),
            Kind::Entity => self.entities.get(&id).map(RecordRef::Entity),
            Kind::HistoricalFigure => self.historical_figures.get(&id).map(RecordRef::HistoricalFigure),
            Kind::Identity => self.identities.get(&id).map(RecordRef::Identity),
            Kind::Site => self.sites.get(&id).map(RecordRef::Site),
            Kind::Region => self.regions.get(&id).map(RecordRef::Region),
            Kind::Landmass => self.landmasses.get(&id).map(RecordRef::Landmass),
            Kind::MountainPeak => self.mountain_peaks.get(&id).map(RecordRef::MountainPeak),
            Kind::UndergroundRegion => self
                .underground_regions
                .get(&id)
                .map(RecordRef::UndergroundRegion),
            Kind::WorldConstruction => self
                .world_constructions
                .get(&id)
                .map(RecordRef::WorldConstruction),
            Kind::WrittenContent => self.written_contents.get(&id).map(RecordRef::WrittenContent),
            Kind::DanceForm | Kind::MusicalForm | Kind::PoeticForm => self
                .art_forms(kind)
                .and_then(|t| t.get(&id))
                .map(RecordRef::ArtForm),
            Kind::EntityPopulation => self.entity_populations.get(&id).map(RecordRef::EntityPopulation),
            Kind::HistoricalEvent => self.historical_events.get(&id).map(RecordRef::Event),
            Kind::HistoricalEventCollection => self
                .historical_event_collections
                .get(&id)
                .map(RecordRef::Collection),
        }
    }

    /// All records of one kind, in no particular order
    pub fn records(&self, kind: Kind) -> Vec<RecordRef<'_>> {
        match kind {
            Kind::Artifact => refs(&self.artifacts, RecordRef::Artifact),
            Kind::Entity => refs(&self.entities, RecordRef::Entity),
            Kind::HistoricalFigure => refs(&self.historical_figures, RecordRef::HistoricalFigure),
            Kind::Identity => refs(&self.identities, RecordRef::Identity),
            Kind::Site => refs(&self.sites, RecordRef::Site),
            Kind::Region => refs(&self.regions, RecordRef::Region),
            Kind::Landmass => refs(&self.landmasses, RecordRef::Landmass),
            Kind::MountainPeak => refs(&self.mountain_peaks, RecordRef::MountainPeak),
            Kind::UndergroundRegion => refs(&self.underground_regions, RecordRef::UndergroundRegion),
            Kind::WorldConstruction => refs(&self.world_constructions, RecordRef::WorldConstruction),
            Kind::WrittenContent => refs(&self.written_contents, RecordRef::WrittenContent),
            Kind::DanceForm => refs(&self.dance_forms, RecordRef::ArtForm),
            Kind::MusicalForm => refs(&self.musical_forms, RecordRef::ArtForm),
            Kind::PoeticForm => refs(&self.poetic_forms, RecordRef::ArtForm),
            Kind::EntityPopulation => refs(&self.entity_populations, RecordRef::EntityPopulation),
            Kind::HistoricalEvent => refs(&self.historical_events, RecordRef::Event),
            Kind::HistoricalEventCollection => {
                refs(&self.historical_event_collections, RecordRef::Collection)
            }
        }
    }

    pub fn count(&self, kind: Kind) -> usize {
        match kind {
            Kind::Artifact => self.artifacts.len(),
            Kind::Entity => self.entities.len(),
            Kind::HistoricalFigure => self.historical_figures.len(),
            Kind::Identity => self.identities.len(),
            Kind::Site => self.sites.len(),
            Kind::Region => self.regions.len(),
            Kind::Landmass => self.landmasses.len(),
            Kind::MountainPeak => self.mountain_peaks.len(),
            Kind::UndergroundRegion => self.underground_regions.len(),
            Kind::WorldConstruction => self.world_constructions.len(),
            Kind::WrittenContent => self.written_contents.len(),
            Kind::DanceForm => self.dance_forms.len(),
            Kind::MusicalForm => self.musical_forms.len(),
            Kind::PoeticForm => self.poetic_forms.len(),
            Kind::EntityPopulation => self.entity_populations.len(),
            Kind::HistoricalEvent => self.historical_events.len(),
            Kind::HistoricalEventCollection => self.historical_event_collections.len(),
        }
    }

    /// True when the file held no records at all
    pub fn is_empty(&self) -> bool {
        Kind::ALL.iter().all(|&k| self.count(k) == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> World {
        let mut world = World::new();
        world.sites.insert(
            12,
            Site {
                id: 12,
                name: "stonehold".into(),
                site_type: "fortress".into(),
                ..Default::default()
            },
        );
        world.poetic_forms.insert(
            1,
            ArtForm {
                id: 1,
                name: "the verse of ash".into(),
                form_kind: ArtFormKind::Poetic,
                ..Default::default()
            },
        );
        world
    }

    #[test]
    fn test_get_by_kind_and_id() {
        let world = sample();
        let site = world.get(Kind::Site, 12).unwrap();
        assert_eq!(site.kind(), Kind::Site);
        assert_eq!(site.name(), "stonehold");
        assert_eq!(site.type_name(), "fortress");
        assert!(world.get(Kind::Site, 13).is_none());
        // ids are only unique per kind
        assert!(world.get(Kind::Entity, 12).is_none());
    }

    #[test]
    fn test_art_forms_keep_their_kind() {
        let world = sample();
        let form = world.get(Kind::PoeticForm, 1).unwrap();
        assert_eq!(form.kind(), Kind::PoeticForm);
        assert!(world.get(Kind::DanceForm, 1).is_none());
        assert_eq!(world.records(Kind::PoeticForm).len(), 1);
    }

    #[test]
    fn test_counts() {
        let world = sample();
        assert_eq!(world.count(Kind::Site), 1);
        assert!(!world.is_empty());
        assert!(World::new().is_empty());
    }
}
