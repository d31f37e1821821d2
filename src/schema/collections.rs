//! Event collections: wars, battles, journeys and the like

use serde::{Deserialize, Serialize};

use crate::core::calendar::Timestamp;
use crate::core::types::{collect_refs, Kind, RecordId, Reference};
use crate::schema::catalog::record_catalog;
use crate::schema::fields::{FieldReader, FromRaw};

/// A named span of history grouping events and nested collections.
///
/// `subcollections` may point back at an ancestor; walkers must guard
/// against cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalEventCollection {
    pub id: RecordId,
    pub name: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub events: Vec<RecordId>,
    pub subcollections: Vec<RecordId>,
    pub details: CollectionDetails,
}

impl HistoricalEventCollection {
    pub fn kind_name(&self) -> &str {
        self.details.kind_name()
    }

    pub fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::HistoricalEvent, &self.events);
        collect_refs(&mut out, Kind::HistoricalEventCollection, &self.subcollections);
        out.extend(self.details.references());
        out
    }
}

impl FromRaw for HistoricalEventCollection {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        let id = reader.int("id");
        let start = Timestamp::new(reader.int("start_year"), reader.int("start_seconds72"));
        let end = Timestamp::new(reader.int("end_year"), reader.int("end_seconds72"));
        let name = reader.text("name");
        let events = reader.ints("event");
        let subcollections = reader.ints("eventcol");
        let type_tag = reader.text("type");
        let details = CollectionDetails::read(&type_tag, reader);
        Self {
            id,
            name,
            start,
            end,
            events,
            subcollections,
            details,
        }
    }
}

record_catalog! {
    /// Sub-kind payload of a [`HistoricalEventCollection`]
    pub enum CollectionDetails;

    Abduction = "abduction" {
        attacking_enid: i32 => Entity,
        defending_enid: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
        coords: String,
    }
    Battle = "battle" {
        war_eventcol: i32 => HistoricalEventCollection,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        attacking_hfid: Vec<i32> => HistoricalFigure,
        defending_hfid: Vec<i32> => HistoricalFigure,
        noncom_hfid: Vec<i32> => HistoricalFigure,
        attacking_squad_race: Vec<String>,
        attacking_squad_number: Vec<i32>,
        attacking_squad_deaths: Vec<i32>,
        defending_squad_race: Vec<String>,
        defending_squad_number: Vec<i32>,
        defending_squad_deaths: Vec<i32>,
        outcome: String,
        coords: String,
    }
    BeastAttack = "beast attack" {
        defending_enid: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
        coords: String,
    }
    Ceremony = "ceremony" {
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Competition = "competition" {
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Duel = "duel" {
        attacking_hfid: i32 => HistoricalFigure,
        defending_hfid: i32 => HistoricalFigure,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
        coords: String,
    }
    EntityOverthrown = "entity overthrown" {
        target_entity_id: i32 => Entity,
        site_id: i32 => Site,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Insurrection = "insurrection" {
        target_enid: i32 => Entity,
        site_id: i32 => Site,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Journey = "journey" {
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Occasion = "occasion" {
        civ_id: i32 => Entity,
        occasion_id: i32,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Performance = "performance" {
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Persecution = "persecution" {
        target_entity_id: i32 => Entity,
        site_id: i32 => Site,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Procession = "procession" {
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Purge = "purge" {
        site_id: i32 => Site,
        adjective: String,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Raid = "raid" {
        attacking_enid: i32 => Entity,
        defending_enid: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
        coords: String,
    }
    SiteConquered = "site conquered" {
        attacking_enid: i32 => Entity,
        defending_enid: i32 => Entity,
        site_id: i32 => Site,
        war_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
    }
    Theft = "theft" {
        attacking_enid: i32 => Entity,
        defending_enid: i32 => Entity,
        site_id: i32 => Site,
        subregion_id: i32 => Region,
        feature_layer_id: i32 => UndergroundRegion,
        parent_eventcol: i32 => HistoricalEventCollection,
        ordinal: i32,
        coords: String,
    }
    War = "war" {
        aggressor_ent_id: i32 => Entity,
        defender_ent_id: i32 => Entity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::Diagnostics;
    use crate::tokenizer::RawElement;

    #[test]
    fn test_war_collection_with_members() {
        let raw = RawElement::new("historical_event_collection")
            .with_field("id", "4")
            .with_field("name", "the war of fire")
            .with_field("start_year", "10")
            .with_field("end_year", "-1")
            .with_field("type", "war")
            .with_field("event", "1")
            .with_field("event", "2")
            .with_field("eventcol", "5")
            .with_field("aggressor_ent_id", "3")
            .with_field("defender_ent_id", "-1");
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(&raw, &mut diag);
        let col = HistoricalEventCollection::from_raw(&mut reader);
        reader.finish();

        assert_eq!(col.kind_name(), "War");
        assert_eq!(col.events, vec![1, 2]);
        assert_eq!(col.subcollections, vec![5]);
        assert_eq!(col.end.year, -1);
        assert_eq!(
            col.references(),
            vec![
                Reference::new(Kind::HistoricalEvent, 1),
                Reference::new(Kind::HistoricalEvent, 2),
                Reference::new(Kind::HistoricalEventCollection, 5),
                Reference::new(Kind::Entity, 3),
            ]
        );
        assert_eq!(diag.unknown_fields, 0);
    }

    #[test]
    fn test_catalog_covers_collection_types() {
        assert_eq!(CollectionDetails::CATALOG.len(), 18);
    }
}
