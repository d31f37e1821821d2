//! Display labels for weak references

use crate::core::types::{Kind, RecordId};
use crate::query::Query;

/// Upper-case the first letter of every word: "the plains of bliss" becomes
/// "The Plains Of Bliss"
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = c.is_whitespace() || c == '-';
    }
    out
}

impl Query {
    /// Label for a reference. Never fails: ids that do not resolve, and all
    /// ids while nothing is loaded, get an "Unknown <kind> #<id>" placeholder.
    pub fn resolve_label(&self, kind: Kind, id: RecordId) -> String {
        let record = self.world().ok().and_then(|w| w.get(kind, id));
        match record {
            Some(r) if !r.name().is_empty() => title_case(r.name()),
            Some(_) => format!("{} #{}", title_case(kind.label()), id),
            None => format!("Unknown {} #{}", kind.label(), id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::World;
    use crate::schema::records::{Site, UndergroundRegion};

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the plains of bliss"), "The Plains Of Bliss");
        assert_eq!(title_case("Stonehold"), "Stonehold");
        assert_eq!(title_case("ûdil-lokum"), "Ûdil-Lokum");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_labels() {
        let mut world = World::new();
        world.sites.insert(
            12,
            Site {
                id: 12,
                name: "stonehold".into(),
                ..Default::default()
            },
        );
        world.underground_regions.insert(
            2,
            UndergroundRegion {
                id: 2,
                region_type: "cavern".into(),
                ..Default::default()
            },
        );
        let query = Query::from_world(world);
        assert_eq!(query.resolve_label(Kind::Site, 12), "Stonehold");
        assert_eq!(
            query.resolve_label(Kind::UndergroundRegion, 2),
            "Underground Region #2"
        );
        assert_eq!(query.resolve_label(Kind::Entity, 999), "Unknown entity #999");
    }

    #[test]
    fn test_label_without_world() {
        let label = Query::default().resolve_label(Kind::HistoricalFigure, 7);
        assert_eq!(label, "Unknown historical figure #7");
    }
}
