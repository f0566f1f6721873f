//! JSONL export functionality.
//!
//! Each line is one stored document, unchanged. Ideal for piping to `jq` or
//! loading into another document store.

use std::io::Write;

use anyhow::Result;
use futures::TryStreamExt;
use sqlx::SqlitePool;

use crate::storage::stream_price_records;

/// Writes every document of `collection` as JSON lines to `out`.
///
/// Returns the number of lines written.
pub async fn write_jsonl<W: Write>(pool: &SqlitePool, collection: &str, mut out: W) -> Result<usize> {
    let mut records = stream_price_records(pool, collection);
    let mut record_count = 0;

    while let Some(record) = records.try_next().await? {
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
        record_count += 1;
    }

    out.flush()?;
    Ok(record_count)
}
