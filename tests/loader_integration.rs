//! Integration tests for loading legends files through LegendsService

use legends_reader::core::config::LoaderConfig;
use legends_reader::schema::events::EventDetails;
use legends_reader::{Kind, LegendsError, LegendsService};
use std::io::Write;
use std::path::PathBuf;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/small_world.xml")
}

fn write_file(content: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_fixture_loads_every_section() {
    let service = LegendsService::new(LoaderConfig::default());
    let stats = service.load_blocking(&fixture()).unwrap();
    let world = service.world().unwrap();

    assert_eq!(world.name, "the world of dust");
    assert_eq!(world.altname, "Ngatha Odsath");
    assert_eq!(world.sites.len(), 3);
    assert_eq!(world.historical_figures.len(), 2);
    assert_eq!(world.historical_events.len(), 3);
    assert_eq!(world.historical_event_collections.len(), 2);
    assert_eq!(world.dance_forms.len(), 1);
    assert_eq!(world.poetic_forms.len(), 1);
    assert!(world.musical_forms.is_empty());
    assert_eq!(world.eras.len(), 1);
    assert_eq!(world.eras[0].start_year, -1);

    assert_eq!(stats.records.get(&Kind::Site), Some(&3));
    assert_eq!(stats.duplicates, 0);
    assert_eq!(stats.bytes_read, std::fs::metadata(fixture()).unwrap().len());
    let counted: usize = Kind::ALL.iter().map(|k| world.count(*k)).sum();
    assert_eq!(stats.total_records(), counted);

    let snap = service.progress();
    assert!(snap.done);
    assert_eq!(snap.percent, 100.0);
}

#[test]
fn test_site_structures_and_hf_links() {
    let service = LegendsService::new(LoaderConfig::default());
    service.load_blocking(&fixture()).unwrap();
    let world = service.world().unwrap();

    let site = &world.sites[&12];
    assert_eq!(site.site_type, "fortress");
    assert_eq!(site.structures.len(), 1);
    assert_eq!(site.structure(0).unwrap().name, "the hall of rust");

    let urist = &world.historical_figures[&7];
    assert_eq!(urist.race, "dwarf");
    assert_eq!(urist.entity_links.len(), 1);
    assert_eq!(urist.entity_links[0].entity_id, 999);
    assert_eq!(urist.entity_links[0].link_type, "member");
    assert!(!urist.is_alive());
    assert!(world.historical_figures[&8].is_alive());

    // Entity 999 is linked but never defined
    assert!(world.entities.get(&999).is_none());
}

#[test]
fn test_event_details_are_typed() {
    let service = LegendsService::new(LoaderConfig::default());
    service.load_blocking(&fixture()).unwrap();
    let world = service.world().unwrap();

    match &world.historical_events[&100].details {
        EventDetails::HfDied(d) => {
            assert_eq!(d.hfid, 7);
            assert_eq!(d.slayer_hfid, 8);
            assert_eq!(d.site_id, 12);
            assert_eq!(d.cause, "struck");
            // not in the file
            assert_eq!(d.subregion_id, -1);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &world.historical_events[&101].details {
        EventDetails::ItemStolen(d) => {
            assert_eq!(d.histfig, 8);
            assert_eq!(d.site, 12);
            assert_eq!(d.entity, -1);
            assert_eq!(d.item_type, "ring");
        }
        other => panic!("unexpected {:?}", other),
    }

    let kinds: Vec<_> = world.event_kinds.iter().map(String::as_str).collect();
    assert_eq!(kinds, vec!["ChangeHfState", "HfDied", "ItemStolen"]);
}

#[test]
fn test_invalid_int_becomes_zero_and_is_counted() {
    let file = write_file(
        b"<df_world><historical_figures><historical_figure>\
          <id>4</id><name>zon</name><appeared>soon</appeared>\
          </historical_figure></historical_figures></df_world>",
    );
    let service = LegendsService::new(LoaderConfig::default());
    let stats = service.load_blocking(file.path()).unwrap();

    assert_eq!(service.world().unwrap().historical_figures[&4].appeared, 0);
    assert_eq!(stats.coercion_warnings, 1);
}

#[test]
fn test_invalid_reference_ids_become_zero() {
    let file = write_file(
        b"<df_world><historical_figures><historical_figure>\
          <id>4</id><name>zon</name><ent_pop_id>abc</ent_pop_id>\
          </historical_figure></historical_figures>\
          <historical_events><historical_event>\
          <id>1</id><year>3</year><seconds72>-1</seconds72><type>hf died</type><hfid>abc</hfid>\
          </historical_event></historical_events></df_world>",
    );
    let service = LegendsService::new(LoaderConfig::default());
    let stats = service.load_blocking(file.path()).unwrap();
    let world = service.world().unwrap();

    let hf = &world.historical_figures[&4];
    assert_eq!(hf.ent_pop_id, 0);
    // absent, so still "none"
    assert_eq!(hf.current_identity_id, -1);
    match &world.historical_events[&1].details {
        EventDetails::HfDied(d) => {
            assert_eq!(d.hfid, 0);
            assert_eq!(d.slayer_hfid, -1);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(stats.coercion_warnings, 2);
}

#[test]
fn test_duplicate_ids_keep_last() {
    let file = write_file(
        b"<df_world><sites>\
          <site><id>1</id><name>first</name></site>\
          <site><id>1</id><name>second</name></site>\
          </sites></df_world>",
    );
    let service = LegendsService::new(LoaderConfig::default());
    let stats = service.load_blocking(file.path()).unwrap();

    assert_eq!(service.world().unwrap().sites[&1].name, "second");
    assert_eq!(stats.duplicates, 1);
    assert_eq!(stats.records.get(&Kind::Site), Some(&1));
}

#[test]
fn test_latin1_names_survive() {
    let mut xml = b"<df_world><sites><site><id>1</id><name>k".to_vec();
    xml.push(0xE9);
    xml.extend_from_slice(b"n</name></site></sites></df_world>");
    let file = write_file(&xml);

    let service = LegendsService::new(LoaderConfig::default());
    service.load_blocking(file.path()).unwrap();
    assert_eq!(service.world().unwrap().sites[&1].name, "k\u{e9}n");
}

#[test]
fn test_loads_are_deterministic() {
    let first = LegendsService::new(LoaderConfig::default());
    let second = LegendsService::new(LoaderConfig::default());
    first.load_blocking(&fixture()).unwrap();
    second.load_blocking(&fixture()).unwrap();

    let a = first.world().unwrap();
    let b = second.world().unwrap();
    assert_eq!(a.sites, b.sites);
    assert_eq!(a.historical_events, b.historical_events);
    assert_eq!(a.historical_event_collections, b.historical_event_collections);
    assert_eq!(a.event_kinds, b.event_kinds);
}

#[test]
fn test_failed_reload_keeps_previous_world() {
    let service = LegendsService::new(LoaderConfig::default());
    service.load_blocking(&fixture()).unwrap();
    let before = service.world().unwrap();

    let broken = write_file(b"<df_world><sites><site><id>1</id></sites></df_world>");
    let err = service.load_blocking(broken.path()).unwrap_err();
    assert!(matches!(err, LegendsError::Syntax(_)));

    let after = service.world().unwrap();
    assert!(std::sync::Arc::ptr_eq(&before, &after));
    assert!(!service.progress().done);
    assert!(!service.is_loading());
    let query = service.query();
    assert_eq!(query.get_by_id(Kind::Site, 12).unwrap().name(), "stonehold");
}

#[test]
fn test_truncated_file_is_an_error() {
    let truncated = write_file(b"<df_world><sites><site><id>1</id><name>a</name></site>");
    let service = LegendsService::new(LoaderConfig::default());
    assert!(matches!(
        service.load_blocking(truncated.path()),
        Err(LegendsError::Syntax(_))
    ));
    assert!(service.world().is_none());
}

#[test]
fn test_missing_file_is_io_error() {
    let service = LegendsService::new(LoaderConfig::default());
    let missing = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nope.xml");
    assert!(matches!(service.load_blocking(&missing), Err(LegendsError::Io(_))));
}

#[tokio::test]
async fn test_background_load_reports_progress() {
    let config = LoaderConfig {
        progress_interval_bytes: 64,
        ..LoaderConfig::default()
    };
    let service = LegendsService::new(config);
    let handle = service.start_load(fixture()).unwrap();

    // the progress reader never blocks the load
    let mut last = 0.0;
    while !handle.is_finished() {
        let snap = service.progress();
        assert!(snap.percent >= last);
        last = snap.percent;
        tokio::task::yield_now().await;
    }
    let stats = handle.await.unwrap().unwrap();
    assert_eq!(stats.records.get(&Kind::HistoricalFigure), Some(&2));
    assert!(service.progress().done);
    assert!(service.last_stats().is_some());
}
