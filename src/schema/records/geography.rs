//! Places: regions, layers, landmasses, peaks, rivers, constructions, sites

use serde::{Deserialize, Serialize};

use crate::core::types::{collect_refs, Kind, RecordId, Reference};
use crate::schema::fields::{FieldReader, FromRaw};
use crate::schema::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RecordId,
    pub name: String,
    pub region_type: String,
    pub coords: String,
    pub evilness: String,
    pub force_id: RecordId,
}

impl FromRaw for Region {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            region_type: reader.text("type"),
            coords: reader.text("coords"),
            evilness: reader.text("evilness"),
            force_id: reader.id_ref("force_id"),
        }
    }
}

impl Record for Region {
    fn kind(&self) -> Kind {
        Kind::Region
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.region_type
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// Cavern layers, magma seas and the underworld. These carry no name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndergroundRegion {
    pub id: RecordId,
    pub region_type: String,
    pub depth: i32,
    pub coords: String,
}

impl FromRaw for UndergroundRegion {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            region_type: reader.text("type"),
            depth: reader.int("depth"),
            coords: reader.text("coords"),
        }
    }
}

impl Record for UndergroundRegion {
    fn kind(&self) -> Kind {
        Kind::UndergroundRegion
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        ""
    }

    fn type_name(&self) -> &str {
        &self.region_type
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Landmass {
    pub id: RecordId,
    pub name: String,
    pub coord_1: String,
    pub coord_2: String,
}

impl FromRaw for Landmass {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            coord_1: reader.text("coord_1"),
            coord_2: reader.text("coord_2"),
        }
    }
}

impl Record for Landmass {
    fn kind(&self) -> Kind {
        Kind::Landmass
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        "landmass"
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountainPeak {
    pub id: RecordId,
    pub name: String,
    pub coords: String,
    pub height: i32,
    pub is_volcano: bool,
}

impl FromRaw for MountainPeak {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            coords: reader.text("coords"),
            height: reader.int("height"),
            is_volcano: reader.flag("is_volcano"),
        }
    }
}

impl Record for MountainPeak {
    fn kind(&self) -> Kind {
        Kind::MountainPeak
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        if self.is_volcano {
            "volcano"
        } else {
            "mountain"
        }
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// Rivers have no id; they are kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct River {
    pub name: String,
    pub path: String,
    pub end_pos: String,
}

impl FromRaw for River {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            name: reader.text("name"),
            path: reader.text("path"),
            end_pos: reader.text("end_pos"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldConstruction {
    pub id: RecordId,
    pub name: String,
    pub construction_type: String,
    pub coords: String,
}

impl FromRaw for WorldConstruction {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            construction_type: reader.text("type"),
            coords: reader.text("coords"),
        }
    }
}

impl Record for WorldConstruction {
    fn kind(&self) -> Kind {
        Kind::WorldConstruction
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.construction_type
    }

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }
}

/// A building inside a site. `local_id` is only unique within its site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Structure {
    pub local_id: i32,
    pub name: String,
    pub structure_type: String,
    pub subtype: String,
    pub entity_id: RecordId,
    pub worship_hfid: RecordId,
    pub deity: RecordId,
    pub religion: RecordId,
    pub inhabitants: Vec<RecordId>,
}

impl FromRaw for Structure {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            local_id: reader.int_any(&["local_id", "id"]),
            name: reader.text("name"),
            structure_type: reader.text("type"),
            subtype: reader.text("subtype"),
            entity_id: reader.id_ref("entity_id"),
            worship_hfid: reader.id_ref("worship_hfid"),
            deity: reader.id_ref("deity"),
            religion: reader.id_ref("religion"),
            inhabitants: reader.ints("inhabitant"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProperty {
    pub id: i32,
    pub property_type: String,
    pub structure_id: i32,
    pub owner_hfid: RecordId,
}

impl FromRaw for SiteProperty {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            property_type: reader.text("type"),
            structure_id: reader.int("structure_id"),
            owner_hfid: reader.id_ref("owner_hfid"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: RecordId,
    pub name: String,
    pub site_type: String,
    pub coords: String,
    pub rectangle: String,
    pub civ_id: RecordId,
    pub cur_owner_id: RecordId,
    pub structures: Vec<Structure>,
    pub properties: Vec<SiteProperty>,
}

impl Site {
    pub fn structure(&self, local_id: i32) -> Option<&Structure> {
        self.structures.iter().find(|s| s.local_id == local_id)
    }
}

impl FromRaw for Site {
    fn from_raw(reader: &mut FieldReader<'_>) -> Self {
        Self {
            id: reader.int("id"),
            name: reader.text("name"),
            site_type: reader.text("type"),
            coords: reader.text("coords"),
            rectangle: reader.text("rectangle"),
            civ_id: reader.id_ref("civ_id"),
            cur_owner_id: reader.id_ref("cur_owner_id"),
            structures: reader.nested_in("structures", "structure", Structure::from_raw),
            properties: reader.nested_in("site_properties", "site_property", SiteProperty::from_raw),
        }
    }
}

impl Record for Site {
    fn kind(&self) -> Kind {
        Kind::Site
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        &self.site_type
    }

    fn references(&self) -> Vec<Reference> {
        let mut out = Vec::new();
        collect_refs(&mut out, Kind::Entity, &self.civ_id);
        collect_refs(&mut out, Kind::Entity, &self.cur_owner_id);
        for s in &self.structures {
            collect_refs(&mut out, Kind::Entity, &s.entity_id);
            collect_refs(&mut out, Kind::HistoricalFigure, &s.worship_hfid);
            collect_refs(&mut out, Kind::HistoricalFigure, &s.deity);
            collect_refs(&mut out, Kind::Entity, &s.religion);
            collect_refs(&mut out, Kind::HistoricalFigure, &s.inhabitants);
        }
        for p in &self.properties {
            collect_refs(&mut out, Kind::HistoricalFigure, &p.owner_hfid);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fields::Diagnostics;
    use crate::tokenizer::RawElement;

    #[test]
    fn test_site_with_structures() {
        let raw = RawElement::new("site")
            .with_field("id", "12")
            .with_field("type", "fortress")
            .with_field("name", "stonehold")
            .with_field("civ_id", "3")
            .with_child(
                RawElement::new("structures")
                    .with_child(
                        RawElement::new("structure")
                            .with_field("id", "0")
                            .with_field("type", "temple")
                            .with_field("worship_hfid", "7"),
                    )
                    .with_child(
                        RawElement::new("structure")
                            .with_field("id", "1")
                            .with_field("type", "market"),
                    ),
            );
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(&raw, &mut diag);
        let site = Site::from_raw(&mut reader);
        reader.finish();

        assert_eq!(site.type_name(), "fortress");
        assert_eq!(site.structures.len(), 2);
        assert_eq!(site.structure(0).map(|s| s.worship_hfid), Some(7));
        assert_eq!(site.structure(1).map(|s| s.worship_hfid), Some(-1));
        assert!(site
            .references()
            .contains(&Reference::new(Kind::HistoricalFigure, 7)));
        assert_eq!(diag.unknown_fields, 0);
    }

    #[test]
    fn test_peak_type_from_volcano_flag() {
        let raw = RawElement::new("mountain_peak")
            .with_field("id", "1")
            .with_field("name", "the smoking horn")
            .with_field("is_volcano", "");
        let mut diag = Diagnostics::new(true);
        let mut reader = FieldReader::new(&raw, &mut diag);
        let peak = MountainPeak::from_raw(&mut reader);
        assert_eq!(peak.type_name(), "volcano");
        assert_eq!(MountainPeak::default().type_name(), "mountain");
    }
}
