//! Top-level tag dispatch

use ahash::AHashSet;
use std::collections::BTreeMap;

use crate::core::types::Kind;
use crate::schema::collections::HistoricalEventCollection;
use crate::schema::events::HistoricalEvent;
use crate::schema::fields::{Diagnostics, FieldReader, FromRaw};
use crate::schema::records::*;
use crate::tokenizer::RawElement;

/// What a top-level element tag stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelTag {
    Record(Kind),
    Era,
    River,
    WorldName,
    WorldAltName,
    Unrecognized,
}

/// Tags that are not the record tag of a [`Kind`]
const EXTRA_TAGS: &[(&str, TopLevelTag)] = &[
    ("historical_era", TopLevelTag::Era),
    ("river", TopLevelTag::River),
    ("name", TopLevelTag::WorldName),
    ("altname", TopLevelTag::WorldAltName),
];

impl TopLevelTag {
    pub fn classify(tag: &str) -> Self {
        if let Some(kind) = Kind::from_record_tag(tag) {
            return TopLevelTag::Record(kind);
        }
        EXTRA_TAGS
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, class)| *class)
            .unwrap_or(TopLevelTag::Unrecognized)
    }
}

/// A raw element turned into its typed form
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchedRecord {
    Artifact(Artifact),
    Entity(Entity),
    HistoricalFigure(HistoricalFigure),
    Identity(Identity),
    Site(Site),
    Region(Region),
    Landmass(Landmass),
    MountainPeak(MountainPeak),
    UndergroundRegion(UndergroundRegion),
    WorldConstruction(WorldConstruction),
    WrittenContent(WrittenContent),
    ArtForm(ArtForm),
    EntityPopulation(EntityPopulation),
    Event(HistoricalEvent),
    Collection(HistoricalEventCollection),
    Era(HistoricalEra),
    River(River),
    WorldName(String),
    WorldAltName(String),
}

/// Turns raw elements into typed records, tracking what it could not use
#[derive(Debug, Default)]
pub struct Dispatcher {
    pub diagnostics: Diagnostics,
    /// Count of skipped elements per unrecognized tag
    pub unknown_tags: BTreeMap<String, u64>,
    reported_tags: AHashSet<String>,
}

impl Dispatcher {
    pub fn new(report_unknown_fields: bool) -> Self {
        Self {
            diagnostics: Diagnostics::new(report_unknown_fields),
            ..Default::default()
        }
    }

    /// `None` for elements with an unrecognized tag; those are logged once
    /// per distinct tag and counted.
    pub fn dispatch(&mut self, raw: &RawElement) -> Option<DispatchedRecord> {
        let kind = match TopLevelTag::classify(&raw.tag) {
            TopLevelTag::Record(kind) => kind,
            TopLevelTag::WorldName => return Some(DispatchedRecord::WorldName(raw.text.clone())),
            TopLevelTag::WorldAltName => {
                return Some(DispatchedRecord::WorldAltName(raw.text.clone()))
            }
            TopLevelTag::Era => return Some(DispatchedRecord::Era(self.read(raw))),
            TopLevelTag::River => return Some(DispatchedRecord::River(self.read(raw))),
            TopLevelTag::Unrecognized => {
                self.unrecognized(&raw.tag);
                return None;
            }
        };

        let record = match kind {
            Kind::Artifact => DispatchedRecord::Artifact(self.read(raw)),
            Kind::Entity => DispatchedRecord::Entity(self.read(raw)),
            Kind::HistoricalFigure => DispatchedRecord::HistoricalFigure(self.read(raw)),
            Kind::Identity => DispatchedRecord::Identity(self.read(raw)),
            Kind::Site => DispatchedRecord::Site(self.read(raw)),
            Kind::Region => DispatchedRecord::Region(self.read(raw)),
            Kind::Landmass => DispatchedRecord::Landmass(self.read(raw)),
            Kind::MountainPeak => DispatchedRecord::MountainPeak(self.read(raw)),
            Kind::UndergroundRegion => DispatchedRecord::UndergroundRegion(self.read(raw)),
            Kind::WorldConstruction => DispatchedRecord::WorldConstruction(self.read(raw)),
            Kind::WrittenContent => DispatchedRecord::WrittenContent(self.read(raw)),
            Kind::EntityPopulation => DispatchedRecord::EntityPopulation(self.read(raw)),
            Kind::HistoricalEvent => DispatchedRecord::Event(self.read(raw)),
            Kind::HistoricalEventCollection => DispatchedRecord::Collection(self.read(raw)),
            Kind::DanceForm | Kind::MusicalForm | Kind::PoeticForm => {
                let form_kind = ArtFormKind::from_kind(kind).unwrap_or_default();
                let mut reader = FieldReader::new(raw, &mut self.diagnostics);
                let form = ArtForm::read(form_kind, &mut reader);
                reader.finish();
                DispatchedRecord::ArtForm(form)
            }
        };
        Some(record)
    }

    fn read<T: FromRaw>(&mut self, raw: &RawElement) -> T {
        let mut reader = FieldReader::new(raw, &mut self.diagnostics);
        let value = T::from_raw(&mut reader);
        reader.finish();
        value
    }

    fn unrecognized(&mut self, tag: &str) {
        *self.unknown_tags.entry(tag.to_string()).or_insert(0) += 1;
        if self.reported_tags.insert(tag.to_string()) {
            tracing::warn!(tag, "Skipping unrecognized top-level element");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TopLevelTag::classify("site"), TopLevelTag::Record(Kind::Site));
        assert_eq!(
            TopLevelTag::classify("historical_event_collection"),
            TopLevelTag::Record(Kind::HistoricalEventCollection)
        );
        assert_eq!(TopLevelTag::classify("historical_era"), TopLevelTag::Era);
        assert_eq!(TopLevelTag::classify("altname"), TopLevelTag::WorldAltName);
        assert_eq!(TopLevelTag::classify("creature_raw"), TopLevelTag::Unrecognized);
    }

    #[test]
    fn test_dispatch_known_records() {
        let mut dispatcher = Dispatcher::new(true);
        let raw = RawElement::new("site")
            .with_field("id", "12")
            .with_field("name", "stonehold")
            .with_field("type", "fortress");
        match dispatcher.dispatch(&raw) {
            Some(DispatchedRecord::Site(site)) => assert_eq!(site.name, "stonehold"),
            other => panic!("unexpected {:?}", other),
        }

        let raw = RawElement::new("poetic_form")
            .with_field("id", "2")
            .with_field("description", "a verse form");
        match dispatcher.dispatch(&raw) {
            Some(DispatchedRecord::ArtForm(form)) => {
                assert_eq!(form.form_kind, ArtFormKind::Poetic)
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unrecognized_tags_are_counted() {
        let mut dispatcher = Dispatcher::new(true);
        let raw = RawElement::new("creature_raw").with_field("id", "1");
        assert!(dispatcher.dispatch(&raw).is_none());
        assert!(dispatcher.dispatch(&raw).is_none());
        assert_eq!(dispatcher.unknown_tags.get("creature_raw"), Some(&2));
    }

    #[test]
    fn test_world_name_record() {
        let mut dispatcher = Dispatcher::new(true);
        let mut raw = RawElement::new("name");
        raw.text = "the world of x".into();
        assert_eq!(
            dispatcher.dispatch(&raw),
            Some(DispatchedRecord::WorldName("the world of x".into()))
        );
    }
}
