//! People and the groups they belong to

use serde::{Deserialize, Serialize};

use crate::core::calendar::Timestamp;
use crate::core::types::{collect_refs, Kind, RecordId, Reference};
use crate::schema::fields::{FieldReader, FromRaw};
use crate::schema::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    pub link_type: String,
    pub entity_id: RecordId,
    pub link_strength: i32,
}

impl FromRaw for EntityLink {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            link_type: reader.text("link_type"),
            entity_id: reader.id_ref("entity_id"),
            link_strength: reader.int("link_strength"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HfLink {
    pub link_type: String,
    pub hfid: RecordId,
    pub link_strength: i32,
}

impl FromRaw for HfLink {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            link_type: reader.text("link_type"),
            hfid: reader.id_ref("hfid"),
            link_strength: reader.int("link_strength"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
    pub link_type: String,
    pub site_id: RecordId,
    pub sub_id: i32,
    pub entity_id: RecordId,
    pub occupation_id: i32,
}

impl FromRaw for SiteLink {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            link_type: reader.text("link_type"),
            site_id: reader.id_ref("site_id"),
            sub_id: reader.int("sub_id"),
            entity_id: reader.id_ref("entity_id"),
            occupation_id: reader.int("occupation_id"),
        }
    }
}

/// A position held (or formerly held) in an entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionLink {
    pub position_profile_id: i32,
    pub entity_id: RecordId,
    pub start_year: i32,
    pub end_year: i32,
}

impl FromRaw for PositionLink {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            position_profile_id: reader.int("position_profile_id"),
            entity_id: reader.id_ref("entity_id"),
            start_year: reader.int("start_year"),
            end_year: reader.int("end_year"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub skill: String,
    pub total_ip: i32,
}

impl FromRaw for Skill {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            skill: reader.text("skill"),
            total_ip: reader.int("total_ip"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalFigure {
    pub id: RecordId,
    pub name: String,
    pub race: String,
    pub caste: String,
    pub appeared: i32,
    pub birth: Timestamp,
    pub death: Timestamp,
    pub associated_type: String,
    pub deity: bool,
    pub force: bool,
    pub spheres: Vec<String>,
    pub goals: Vec<String>,
    pub interactions: Vec<String>,
    pub journey_pets: Vec<String>,
    pub ent_pop_id: RecordId,
    pub current_identity_id: RecordId,
    pub used_identity_ids: Vec<RecordId>,
    pub holds_artifacts: Vec<RecordId>,
    pub entity_links: Vec<EntityLink>,
    pub hf_links: Vec<HfLink>,
    pub site_links: Vec<SiteLink>,
    pub positions: Vec<PositionLink>,
    pub former_positions: Vec<PositionLink>,
    pub skills: Vec<Skill>,
}

impl HistoricalFigure {
    /// Still alive at the end of recorded history
    pub fn is_alive(&self) -> bool {
        self.death.year == -1
    }
}

impl FromRaw for HistoricalFigure {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            race: reader.text("race"),
            caste: reader.text("caste"),
            appeared: reader.int("appeared"),
            birth: Timestamp::new(reader.int("birth_year"), reader.int("birth_seconds72")),
            death: Timestamp::new(reader.int("death_year"), reader.int("death_seconds72")),
            associated_type: reader.text("associated_type"),
            deity: reader.flag("deity"),
            force: reader.flag("force"),
            spheres: reader.texts("sphere"),
            goals: reader.texts("goal"),
            interactions: reader.texts("active_interaction"),
            journey_pets: reader.texts("journey_pet"),
            ent_pop_id: reader.id_ref("ent_pop_id"),
            current_identity_id: reader.id_ref("current_identity_id"),
            used_identity_ids: reader.ints("used_identity_id"),
            holds_artifacts: reader.ints("holds_artifact"),
            entity_links: reader.nested("entity_link", EntityLink::from_raw),
            hf_links: reader.nested("hf_link", HfLink::from_raw),
            site_links: reader.nested("site_link", SiteLink::from_raw),
            positions: reader.nested("entity_position_link", PositionLink::from_raw),
            former_positions: reader.nested("entity_former_position_link", PositionLink::from_raw),
            skills: reader.nested("hf_skill", Skill::from_raw),
        }
    }
}

impl Record for HistoricalFigure {
    fn kind(&self) -> Kind {
        Kind::HistoricalFigure
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.race
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::EntityPopulation, &self.ent_pop_id);
        collect_refs(&mut out, Kind::Identity, &self.current_identity_id);
        collect_refs(&mut out, Kind::Identity, &self.used_identity_ids);
        collect_refs(&mut out, Kind::Artifact, &self.holds_artifacts);
        for l in &self.entity_links {
            collect_refs(&mut out, Kind::Entity, &l.entity_id);
        }
        for l in &self.hf_links {
            collect_refs(&mut out, Kind::HistoricalFigure, &l.hfid);
        }
        for l in &self.site_links {
            collect_refs(&mut out, Kind::Site, &l.site_id);
            collect_refs(&mut out, Kind::Entity, &l.entity_id);
        }
        for p in self.positions.iter().chain(&self.former_positions) {
            collect_refs(&mut out, Kind::Entity, &p.entity_id);
        }
        out
    }
}

/// A false identity assumed by a historical figure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: RecordId,
    pub name: String,
    pub histfig_id: RecordId,
    pub nemesis_id: i32,
    pub race: String,
    pub caste: String,
    pub birth: Timestamp,
    pub profession: String,
    pub entity_id: RecordId,
}

impl FromRaw for Identity {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            histfig_id: reader.id_ref("histfig_id"),
            nemesis_id: reader.int("nemesis_id"),
            race: reader.text("race"),
            caste: reader.text("caste"),
            birth: Timestamp::new(reader.int("birth_year"), reader.int("birth_second")),
            profession: reader.text("profession"),
            entity_id: reader.id_ref("entity_id"),
        }
    }
}

impl Record for Identity {
    fn kind(&self) -> Kind {
        Kind::Identity
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.profession
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::HistoricalFigure, &self.histfig_id);
        collect_refs(&mut out, Kind::Entity, &self.entity_id);
        out
    }
}

/// Anonymous members of a race belonging to a civilization
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPopulation {
    pub id: RecordId,
    pub race: String,
    pub count: i32,
    pub civ_id: RecordId,
}

impl EntityPopulation {
    /// Split the `race:count` form used by the export
    fn split_race(raw: &str) -> (String, i32) {
        match raw.rsplit_once(':') {
            Some((race, count)) => match count.trim().parse() {
                Ok(n) => (race.to_string(), n),
                Err(_) => (raw.to_string(), 0),
            },
            None => (raw.to_string(), 0),
        }
    }
}

impl FromRaw for EntityPopulation {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        let (race, count) = Self::split_race(&reader.text("race"));
        Self {
            id: reader.int("id"),
            race,
            count,
            civ_id: reader.id_ref("civ_id"),
        }
    }
}

impl Record for EntityPopulation {
    fn kind(&self) -> Kind {
        Kind::EntityPopulation
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        ""
    }

    fn type_name(&self) -> &str {
        &self.race
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::Entity, &self.civ_id);
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityPosition {
    pub id: i32,
    pub name: String,
    pub name_male: String,
    pub name_female: String,
    pub spouse: String,
}

impl FromRaw for EntityPosition {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            name_male: reader.text("name_male"),
            name_female: reader.text("name_female"),
            spouse: reader.text("spouse"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionAssignment {
    pub id: i32,
    pub histfig: RecordId,
    pub position_id: i32,
    pub squad_id: i32,
}

impl FromRaw for PositionAssignment {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            histfig: reader.id_ref("histfig"),
            position_id: reader.int("position_id"),
            squad_id: reader.int("squad_id"),
        }
    }
}

/// Link from one entity to another (parent civ, religion, ...)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRelation {
    pub link_type: String,
    pub target: RecordId,
    pub strength: i32,
}

impl FromRaw for EntityRelation {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            link_type: reader.text("type"),
            target: reader.id_ref("target"),
            strength: reader.int("strength"),
        }
    }
}

/// A civilization, site government, religion, guild and so on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: RecordId,
    pub name: String,
    pub race: String,
    pub entity_type: String,
    pub children: Vec<RecordId>,
    pub histfig_ids: Vec<RecordId>,
    pub worship_ids: Vec<RecordId>,
    pub weapons: Vec<String>,
    pub professions: Vec<String>,
    pub positions: Vec<EntityPosition>,
    pub assignments: Vec<PositionAssignment>,
    pub links: Vec<EntityRelation>,
}

impl Entity {
    pub fn position(&self, id: i32) -> Option<&EntityPosition> {
        self.positions.iter().find(|p| p.id == id)
    }
}

impl FromRaw for Entity {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            race: reader.text("race"),
            entity_type: reader.text("type"),
            children: reader.ints("child"),
            histfig_ids: reader.ints("histfig_id"),
            worship_ids: reader.ints("worship_id"),
            weapons: reader.texts("weapon"),
            professions: reader.texts("profession"),
            positions: reader.nested("entity_position", EntityPosition::from_raw),
            assignments: reader.nested("entity_position_assignment", PositionAssignment::from_raw),
            links: reader.nested("entity_link", EntityRelation::from_raw),
        }
    }
}

impl Record for Entity {
    fn kind(&self) -> Kind {
        Kind::Entity
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.entity_type
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::Entity, &self.children);
        collect_refs(&mut out, Kind::HistoricalFigure, &self.histfig_ids);
        collect_refs(&mut out, Kind::HistoricalFigure, &self.worship_ids);
        for a in &self.assignments {
            collect_refs(&mut out, Kind::HistoricalFigure, &a.histfig);
        }
        for l in &self.links {
            collect_refs(&mut out, Kind::Entity, &l.target);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::Diagnostics;
    use crate::tokenizer::RawElement;

    fn read<T: FromRaw>(raw: &RawElement) -> (T, Diagnostics) {
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(raw, &mut diag);
        let value = T::from_raw(&mut reader);
        reader.finish();
        (value, diag)
    }

    #[test]
    fn test_figure_with_links() {
        let raw = RawElement::new("historical_figure")
            .with_field("id", "7")
            .with_field("name", "urist")
            .with_field("race", "DWARF")
            .with_field("birth_year", "3")
            .with_field("death_year", "-1")
            .with_field("sphere", "war")
            .with_child(
                RawElement::new("entity_link")
                    .with_field("link_type", "member")
                    .with_field("entity_id", "999"),
            )
            .with_child(
                RawElement::new("hf_skill")
                    .with_field("skill", "MINING")
                    .with_field("total_ip", "500"),
            );
        let (hf, diag) = read::<HistoricalFigure>(&raw);
        assert_eq!(hf.type_name(), "DWARF");
        assert!(hf.is_alive());
        assert_eq!(hf.entity_links[0].entity_id, 999);
        assert_eq!(hf.skills[0].total_ip, 500);
        assert_eq!(hf.references(), vec![Reference::new(Kind::Entity, 999)]);
        assert_eq!(diag.unknown_fields, 0);
    }

    #[test]
    fn test_population_race_count() {
        let raw = RawElement::new("entity_population")
            .with_field("id", "2")
            .with_field("race", "goblin:1234")
            .with_field("civ_id", "5");
        let (pop, _) = read::<EntityPopulation>(&raw);
        assert_eq!(pop.race, "goblin");
        assert_eq!(pop.count, 1234);
        assert_eq!(EntityPopulation::split_race("kobold"), ("kobold".to_string(), 0));
    }

    #[test]
    fn test_entity_positions_and_links() {
        let raw = RawElement::new("entity")
            .with_field("id", "3")
            .with_field("name", "the guild of coins")
            .with_field("type", "guild")
            .with_field("child", "8")
            .with_child(
                RawElement::new("entity_position")
                    .with_field("id", "0")
                    .with_field("name", "guildmaster"),
            )
            .with_child(
                RawElement::new("entity_link")
                    .with_field("type", "PARENT")
                    .with_field("target", "1"),
            );
        let (entity, diag) = read::<Entity>(&raw);
        assert_eq!(entity.type_name(), "guild");
        assert_eq!(entity.position(0).map(|p| p.name.as_str()), Some("guildmaster"));
        assert_eq!(
            entity.references(),
            vec![Reference::new(Kind::Entity, 8), Reference::new(Kind::Entity, 1)]
        );
        assert_eq!(diag.unknown_fields, 0);
    }
}
