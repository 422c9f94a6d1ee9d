//! CSV feature pipeline.
//!
//! Streams a match table through the rating engine and writes the table
//! back out with pre-match rating columns appended. Rating differences are
//! derived here, not in the engine.

use crate::engine::RatingEngine;
use crate::error::Result;
use crate::store::RatingStore;
use crate::stream::{InvalidRowPolicy, MatchStream};
use csv::{StringRecord, Writer};
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Row counts of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Data rows read from the input
    pub rows_read: usize,

    /// Rows rated and written to the output
    pub rows_rated: usize,

    /// Malformed rows dropped under the skip policy
    pub rows_skipped: usize,
}

/// Rates every row of `reader` and writes the enriched table to `writer`.
///
/// The output header is the input header followed by three columns per
/// namespace (side A, side B, difference). Stops at the first error unless
/// `policy` skips malformed rows; out-of-order dates always stop the run.
pub fn process_csv<S, R, W>(
    engine: &mut RatingEngine<S>,
    reader: R,
    writer: W,
    policy: InvalidRowPolicy,
) -> Result<RunSummary>
where
    S: RatingStore,
    R: Read,
    W: Write,
{
    let require_context = engine.namespaces().iter().any(|ns| ns.scope().requires_context());
    let mut stream = MatchStream::new(reader, require_context, policy)?;
    let mut csv_writer = Writer::from_writer(writer);

    let mut header = stream.headers().clone();
    for ns in engine.namespaces() {
        for column in ns.scope().feature_columns() {
            if stream.headers().iter().any(|h| h == column) {
                warn!("Input already has a '{}' column; output will repeat it", column);
            }
            header.push_field(column);
        }
    }
    csv_writer.write_record(&header)?;

    let mut rows_rated = 0;
    for item in stream.by_ref() {
        let streamed = item?;
        let snapshot = engine.process(&streamed.record);
        debug!(
            "Row {}: {} vs {}, pre-match {:?}",
            streamed.row, streamed.record.player_a, streamed.record.player_b, snapshot.ratings
        );

        let mut out: StringRecord = streamed.fields;
        for pair in &snapshot.ratings {
            out.push_field(&pair.a.to_string());
            out.push_field(&pair.b.to_string());
            out.push_field(&pair.diff().to_string());
        }
        csv_writer.write_record(&out)?;
        rows_rated += 1;
    }
    csv_writer.flush()?;

    let summary = RunSummary {
        rows_read: stream.rows_read(),
        rows_rated,
        rows_skipped: stream.rows_skipped(),
    };
    if summary.rows_skipped > 0 {
        warn!(
            "Dropped {} of {} rows as malformed",
            summary.rows_skipped, summary.rows_read
        );
    }
    info!(
        "Rated {} matches ({} rows read, {} skipped)",
        summary.rows_rated, summary.rows_read, summary.rows_skipped
    );

    Ok(summary)
}

/// Writes every materialized rating as `namespace,player,context,rating`.
///
/// Rows are grouped by namespace in configured order and sorted by player
/// then context, for deterministic output. `context` is empty for global
/// ratings.
pub fn write_ratings<S, W>(engine: &RatingEngine<S>, writer: W) -> Result<()>
where
    S: RatingStore,
    W: Write,
{
    let mut csv_writer = Writer::from_writer(writer);

    csv_writer.write_record(["namespace", "player", "context", "rating"])?;

    for (scope, key, rating) in engine.final_ratings() {
        csv_writer.write_record([
            scope.name(),
            key.player(),
            key.context().unwrap_or(""),
            &rating.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Runs `write` against a temporary file next to `path` and renames it to
/// `path` only if `write` succeeds. A failed run leaves `path` untouched.
pub fn write_file_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;

    let value = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };

    temp.persist(path).map_err(|e| e.error)?;
    Ok(value)
}
