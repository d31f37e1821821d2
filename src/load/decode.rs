//! One full decoding pass: tokenizer, dispatcher and builder in lock-step

use std::io::BufRead;
use std::path::Path;
use std::time::Instant;

use crate::core::config::LoaderConfig;
use crate::core::error::Result;
use crate::load::progress::Progress;
use crate::model::{LoadStats, World, WorldBuilder};
use crate::schema::Dispatcher;
use crate::tokenizer::{self, ElementStream};

/// Decode the file at `path` into a fresh World
pub fn decode_file(path: &Path, config: &LoaderConfig, progress: &Progress) -> Result<(World, LoadStats)> {
    let (stream, total) = tokenizer::open_file(path, config)?;
    progress.start(format!("Loading {}", path.display()), total);
    tracing::info!(path = %path.display(), bytes = total, "Loading legends file");
    decode_stream(stream, config, progress)
}

/// Decode from any buffered reader. `progress` must already be started.
pub fn decode_reader<R: BufRead>(
    reader: R,
    config: &LoaderConfig,
    progress: &Progress,
) -> Result<(World, LoadStats)> {
    decode_stream(ElementStream::new(reader, config.max_depth), config, progress)
}

fn decode_stream<R: BufRead>(
    mut stream: ElementStream<R>,
    config: &LoaderConfig,
    progress: &Progress,
) -> Result<(World, LoadStats)> {
    let started = Instant::now();
    let mut dispatcher = Dispatcher::new(config.report_unknown_fields);
    let mut builder = WorldBuilder::new();
    let mut reported = 0u64;

    while let Some(raw) = stream.next() {
        let raw = raw?;
        if let Some(record) = dispatcher.dispatch(&raw) {
            builder.insert(record);
        }

        let consumed = stream.bytes_consumed();
        if consumed - reported >= config.progress_interval_bytes {
            progress.advance(consumed);
            reported = consumed;
        }
    }
    let consumed = stream.bytes_consumed();
    progress.advance(consumed);

    let (world, mut stats) = builder.finish();
    stats.bytes_read = consumed;
    stats.coercion_warnings = dispatcher.diagnostics.coercion_warnings;
    stats.unknown_fields = dispatcher.diagnostics.unknown_fields;
    stats.unknown_tags = dispatcher.unknown_tags;
    stats.elapsed = started.elapsed();

    tracing::info!(
        records = stats.total_records(),
        duplicates = stats.duplicates,
        coercion_warnings = stats.coercion_warnings,
        unknown_fields = stats.unknown_fields,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "Decoded legends file"
    );
    Ok((world, stats))
}
