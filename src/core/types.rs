//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::LegendsError;

/// Record identifier as written in the source file.
///
/// Ids are only unique within one [`Kind`]. Negative values (usually `-1`)
/// mean "none" in the source and never match a record.
pub type RecordId = i32;

/// The top-level record categories of a legends export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    Artifact,
    Entity,
    HistoricalFigure,
    Identity,
    Site,
    Region,
    Landmass,
    MountainPeak,
    UndergroundRegion,
    WorldConstruction,
    WrittenContent,
    DanceForm,
    MusicalForm,
    PoeticForm,
    EntityPopulation,
    HistoricalEvent,
    HistoricalEventCollection,
}

impl Kind {
    pub const ALL: [Kind; 17] = [
        Kind::Artifact,
        Kind::Entity,
        Kind::HistoricalFigure,
        Kind::Identity,
        Kind::Site,
        Kind::Region,
        Kind::Landmass,
        Kind::MountainPeak,
        Kind::UndergroundRegion,
        Kind::WorldConstruction,
        Kind::WrittenContent,
        Kind::DanceForm,
        Kind::MusicalForm,
        Kind::PoeticForm,
        Kind::EntityPopulation,
        Kind::HistoricalEvent,
        Kind::HistoricalEventCollection,
    ];

    /// Human readable label, used for placeholders and log output
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Artifact => "artifact",
            Kind::Entity => "entity",
            Kind::HistoricalFigure => "historical figure",
            Kind::Identity => "identity",
            Kind::Site => "site",
            Kind::Region => "region",
            Kind::Landmass => "landmass",
            Kind::MountainPeak => "mountain peak",
            Kind::UndergroundRegion => "underground region",
            Kind::WorldConstruction => "world construction",
            Kind::WrittenContent => "written content",
            Kind::DanceForm => "dance form",
            Kind::MusicalForm => "musical form",
            Kind::PoeticForm => "poetic form",
            Kind::EntityPopulation => "entity population",
            Kind::HistoricalEvent => "historical event",
            Kind::HistoricalEventCollection => "historical event collection",
        }
    }

    /// Element tag of a single record of this kind
    pub fn record_tag(&self) -> &'static str {
        match self {
            Kind::Artifact => "artifact",
            Kind::Entity => "entity",
            Kind::HistoricalFigure => "historical_figure",
            Kind::Identity => "identity",
            Kind::Site => "site",
            Kind::Region => "region",
            Kind::Landmass => "landmass",
            Kind::MountainPeak => "mountain_peak",
            Kind::UndergroundRegion => "underground_region",
            Kind::WorldConstruction => "world_construction",
            Kind::WrittenContent => "written_content",
            Kind::DanceForm => "dance_form",
            Kind::MusicalForm => "musical_form",
            Kind::PoeticForm => "poetic_form",
            Kind::EntityPopulation => "entity_population",
            Kind::HistoricalEvent => "historical_event",
            Kind::HistoricalEventCollection => "historical_event_collection",
        }
    }

    pub fn from_record_tag(tag: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|k| k.record_tag() == tag)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Kind {
    type Err = LegendsError;

    /// Accepts the record tag (`historical_figure`), the label
    /// (`historical figure`) and a few short aliases (`hf`, `event`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        let kind = match key.as_str() {
            "hf" | "figure" => Some(Kind::HistoricalFigure),
            "event" => Some(Kind::HistoricalEvent),
            "collection" | "eventcol" => Some(Kind::HistoricalEventCollection),
            "civ" | "civilization" => Some(Kind::Entity),
            _ => Kind::from_record_tag(&key),
        };
        kind.ok_or_else(|| LegendsError::UnknownKind(s.to_string()))
    }
}

/// A weak reference from one record to another: a kind and an id that may
/// or may not exist in the loaded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub kind: Kind,
    pub id: RecordId,
}

impl Reference {
    pub fn new(kind: Kind, id: RecordId) -> Self {
        Self { kind, id }
    }

    /// Source files use negative ids for "nobody"; those never resolve.
    pub fn is_set(&self) -> bool {
        self.id >= 0
    }
}

/// Values that can name referenced ids: a single id field or a repeated one.
pub trait RefIds {
    fn ref_ids(&self) -> Vec<RecordId>;
}

impl RefIds for RecordId {
    fn ref_ids(&self) -> Vec<RecordId> {
        vec![*self]
    }
}

impl RefIds for Vec<RecordId> {
    fn ref_ids(&self) -> Vec<RecordId> {
        self.clone()
    }
}

/// Push every set reference of `value` into `out`
pub fn collect_refs<T: RefIds>(out: &mut Vec<Reference>, kind: Kind, value: &T) {
    out.extend(
        value
            .ref_ids()
            .into_iter()
            .map(|id| Reference::new(kind, id))
            .filter(Reference::is_set),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_record_tag() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_record_tag(kind.record_tag()), Some(kind));
        }
    }

    #[test]
    fn test_kind_parse_accepts_labels_and_aliases() {
        assert_eq!("historical figure".parse::<Kind>().unwrap(), Kind::HistoricalFigure);
        assert_eq!("hf".parse::<Kind>().unwrap(), Kind::HistoricalFigure);
        assert_eq!("Mountain-Peak".parse::<Kind>().unwrap(), Kind::MountainPeak);
        assert!("dragon".parse::<Kind>().is_err());
    }

    #[test]
    fn test_collect_refs_skips_unset_ids() {
        let mut refs = Vec::new();
        collect_refs(&mut refs, Kind::Site, &-1);
        collect_refs(&mut refs, Kind::HistoricalFigure, &vec![3, -1, 9]);
        assert_eq!(
            refs,
            vec![
                Reference::new(Kind::HistoricalFigure, 3),
                Reference::new(Kind::HistoricalFigure, 9)
            ]
        );
    }
}
