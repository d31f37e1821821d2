//! Legends Reader - command line entry point
//!
//! Loads one legends export on the blocking pool while printing progress,
//! then answers a single query against the loaded world.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use legends_reader::core::calendar::describe_span;
use legends_reader::core::config::LoaderConfig;
use legends_reader::schema::Record;
use legends_reader::{Kind, LegendsError, LegendsService, LoadStats, Query, RecordId, Result};

/// Decode a legends export and query it
#[derive(Parser, Debug)]
#[command(name = "legends-reader")]
#[command(about = "Load a world legends export and answer queries about it")]
struct Args {
    /// Path to the legends XML export
    file: PathBuf,

    /// Loader configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// World name and record counts
    Summary,
    /// Distinct event sub-kinds
    EventKinds,
    /// Distinct event collection sub-kinds
    CollectionKinds,
    /// Events of one sub-kind, e.g. `HfDied`
    Events { kind: String },
    /// Event collections of one sub-kind, e.g. `War`
    Collections { kind: String },
    /// One record
    Show { kind: Kind, id: RecordId },
    /// Records of a kind grouped by their type
    Groups { kind: Kind },
    /// Display label of a reference
    Label { kind: Kind, id: RecordId },
    /// Events that reference a record
    Related { kind: Kind, id: RecordId },
    /// All events inside a collection, nested collections included
    CollectionEvents { id: RecordId },
    /// Dance, musical and poetic forms
    ArtForms,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("legends_reader=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => LoaderConfig::from_file(path)?,
        None => LoaderConfig::default(),
    };

    let rt = Runtime::new()?;
    let service = LegendsService::new(config);
    let stats = rt.block_on(load_with_progress(&service, &args.file))?;

    let query = service.query();
    run(&args.command, &query, &stats, args.json)
}

/// Run the load in the background and redraw a progress line until it ends
async fn load_with_progress(service: &LegendsService, path: &Path) -> Result<LoadStats> {
    let mut handle = service.start_load(path)?;
    let mut ticker = tokio::time::interval(Duration::from_millis(200));
    let result = loop {
        tokio::select! {
            joined = &mut handle => {
                break joined.map_err(|e| LegendsError::TaskFailed(e.to_string()))?;
            }
            _ = ticker.tick() => {
                let p = service.progress();
                eprint!("\r{:>5.1}% {}", p.percent, p.message);
            }
        }
    };
    let p = service.progress();
    eprintln!("\r{:>5.1}% {}", p.percent, p.message);
    result
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(command: &Command, query: &Query, stats: &LoadStats, json: bool) -> Result<()> {
    match command {
        Command::Summary => summary(query, stats, json),
        Command::EventKinds => {
            let kinds = query.list_event_kinds()?;
            if json {
                return print_json(&kinds);
            }
            kinds.iter().for_each(|k| println!("{}", k));
            Ok(())
        }
        Command::CollectionKinds => {
            let kinds = query.list_collection_kinds()?;
            if json {
                return print_json(&kinds);
            }
            kinds.iter().for_each(|k| println!("{}", k));
            Ok(())
        }
        Command::Events { kind } => {
            let events = query.list_events_of_kind(kind)?;
            if json {
                return print_json(&events);
            }
            for e in events {
                println!("{:>8}  {:<12}  {}", e.id, e.timestamp.to_string(), e.kind_name());
            }
            Ok(())
        }
        Command::Collections { kind } => {
            let cols = query.list_collections_of_kind(kind)?;
            if json {
                return print_json(&cols);
            }
            for c in cols {
                println!(
                    "{:>8}  {}, {} ({} events)",
                    c.id,
                    title_or_kind(query, c),
                    describe_span(c.start, c.end),
                    c.events.len()
                );
            }
            Ok(())
        }
        Command::Show { kind, id } => {
            let record = query.get_by_id(*kind, *id)?;
            if json {
                return print_json(&record);
            }
            println!("{}", query.resolve_label(*kind, *id));
            println!("  {} #{}, type {}", kind, id, record.type_name());
            for r in record.as_record().references() {
                println!("  -> {} #{}: {}", r.kind, r.id, query.resolve_label(r.kind, r.id));
            }
            Ok(())
        }
        Command::Groups { kind } => {
            let groups = query.list_grouped_by_type(*kind)?;
            if json {
                return print_json(&groups);
            }
            for (type_name, records) in &groups {
                println!("{} ({})", type_name, records.len());
                for r in records {
                    println!("  {:>8}  {}", r.id(), query.resolve_label(*kind, r.id()));
                }
            }
            Ok(())
        }
        Command::Label { kind, id } => {
            let label = query.resolve_label(*kind, *id);
            if json {
                return print_json(&label);
            }
            println!("{}", label);
            Ok(())
        }
        Command::Related { kind, id } => {
            let events = query.events_related_to(*kind, *id)?;
            if json {
                return print_json(&events);
            }
            for e in events {
                println!("{:>8}  {}  {}", e.id, e.kind_name(), e.timestamp);
            }
            Ok(())
        }
        Command::CollectionEvents { id } => {
            let ids = query.collection_events(*id)?;
            if json {
                return print_json(&ids);
            }
            ids.iter().for_each(|id| println!("{}", id));
            Ok(())
        }
        Command::ArtForms => {
            let forms = query.list_art_forms()?;
            if json {
                return print_json(&forms);
            }
            for (kind, list) in &forms {
                println!("{} ({})", kind, list.len());
                for f in list {
                    println!("  {:>8}  {}", f.id, query.resolve_label(*kind, f.id));
                }
            }
            Ok(())
        }
    }
}

fn title_or_kind(query: &Query, col: &impl Record) -> String {
    if col.name().is_empty() {
        col.type_name().to_string()
    } else {
        query.resolve_label(col.kind(), col.id())
    }
}

#[derive(Serialize)]
struct Summary<'a> {
    name: &'a str,
    altname: &'a str,
    eras: Vec<&'a str>,
    stats: &'a LoadStats,
}

fn summary(query: &Query, stats: &LoadStats, json: bool) -> Result<()> {
    let world = query.world()?;
    if json {
        return print_json(&Summary {
            name: &world.name,
            altname: &world.altname,
            eras: world.eras.iter().map(|e| e.name.as_str()).collect(),
            stats,
        });
    }

    if !world.name.is_empty() {
        println!("{} ({})", legends_reader::query::title_case(&world.name), world.altname);
    }
    for kind in Kind::ALL {
        let n = world.count(kind);
        if n > 0 {
            println!("  {:<28} {:>8}", kind.label(), n);
        }
    }
    if !world.eras.is_empty() {
        println!("  {:<28} {:>8}", "eras", world.eras.len());
    }
    if !world.rivers.is_empty() {
        println!("  {:<28} {:>8}", "rivers", world.rivers.len());
    }
    println!(
        "Read {} bytes in {:.2?}; {} duplicates, {} coercion warnings, {} unknown fields",
        stats.bytes_read, stats.elapsed, stats.duplicates, stats.coercion_warnings, stats.unknown_fields
    );
    for (tag, count) in &stats.unknown_tags {
        println!("  skipped <{}> x{}", tag, count);
    }
    Ok(())
}
