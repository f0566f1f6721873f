//! Price documents.
//!
//! Each collection holds at most one JSON document per zip code. Writes are
//! upserts, so re-scraping a zip code replaces its document.

use chrono::Utc;
use futures::stream::{BoxStream, StreamExt};
use sqlx::SqlitePool;

use crate::error_handling::DatabaseError;
use crate::input::ZipCode;
use crate::models::PriceRecord;

/// Inserts or replaces the document for `record.zip_code` in `collection`.
pub async fn upsert_price_record(
    pool: &SqlitePool,
    collection: &str,
    record: &PriceRecord,
) -> Result<(), DatabaseError> {
    let body = serde_json::to_string(record)?;
    let now_ms = Utc::now().timestamp_millis();

    sqlx::query(
        "INSERT INTO documents (collection, doc_key, body, created_at_ms, updated_at_ms)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(collection, doc_key) DO UPDATE SET
             body = excluded.body,
             updated_at_ms = excluded.updated_at_ms",
    )
    .bind(collection)
    .bind(record.zip_code.as_str())
    .bind(&body)
    .bind(now_ms)
    .bind(now_ms)
    .execute(pool)
    .await?;

    Ok(())
}

/// Looks up the document for `zip_code`.
pub async fn get_price_record(
    pool: &SqlitePool,
    collection: &str,
    zip_code: &ZipCode,
) -> Result<Option<PriceRecord>, DatabaseError> {
    let body: Option<String> =
        sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? AND doc_key = ?")
            .bind(collection)
            .bind(zip_code.as_str())
            .fetch_optional(pool)
            .await?;

    body.map(|b| serde_json::from_str(&b))
        .transpose()
        .map_err(DatabaseError::from)
}

/// Number of documents in `collection`.
pub async fn count_documents(pool: &SqlitePool, collection: &str) -> Result<i64, DatabaseError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
        .bind(collection)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Streams every document of `collection`, ordered by zip code.
pub fn stream_price_records<'a>(
    pool: &'a SqlitePool,
    collection: &'a str,
) -> BoxStream<'a, Result<PriceRecord, DatabaseError>> {
    sqlx::query_scalar::<_, String>(
        "SELECT body FROM documents WHERE collection = ? ORDER BY doc_key",
    )
    .bind(collection)
    .fetch(pool)
    .map(|row| -> Result<PriceRecord, DatabaseError> {
        let body = row?;
        Ok(serde_json::from_str(&body)?)
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::test_helpers::{create_test_pool, sample_record};
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_upsert_then_get() {
        let pool = create_test_pool().await;
        let record = sample_record("78201", 120.0);

        upsert_price_record(&pool, "zipcodes", &record).await.unwrap();

        let stored = get_price_record(&pool, "zipcodes", &record.zip_code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_document_with_latest_values() {
        let pool = create_test_pool().await;
        let first = sample_record("10001", 100.0);
        let second = PriceRecord {
            facility_name: Some("Updated".to_string()),
            ..sample_record("10001", 250.0)
        };

        upsert_price_record(&pool, "zipcodes", &first).await.unwrap();
        upsert_price_record(&pool, "zipcodes", &second).await.unwrap();

        assert_eq!(count_documents(&pool, "zipcodes").await.unwrap(), 1);
        let stored = get_price_record(&pool, "zipcodes", &first.zip_code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.total_price, 250.0);
        assert_eq!(stored.facility_name.as_deref(), Some("Updated"));
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let pool = create_test_pool().await;
        let record = sample_record("10001", 100.0);

        upsert_price_record(&pool, "a", &record).await.unwrap();

        assert_eq!(count_documents(&pool, "a").await.unwrap(), 1);
        assert_eq!(count_documents(&pool, "b").await.unwrap(), 0);
        assert!(get_price_record(&pool, "b", &record.zip_code)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_stream_is_ordered_by_zip() {
        let pool = create_test_pool().await;
        for zip in ["78201", "02134", "10001"] {
            upsert_price_record(&pool, "zipcodes", &sample_record(zip, 1.0))
                .await
                .unwrap();
        }

        let records: Vec<PriceRecord> = stream_price_records(&pool, "zipcodes")
            .try_collect()
            .await
            .unwrap();
        let zips: Vec<&str> = records.iter().map(|r| r.zip_code.as_str()).collect();
        assert_eq!(zips, vec!["02134", "10001", "78201"]);
    }

    #[tokio::test]
    async fn test_corrupt_document_surfaces_serialization_error() {
        let pool = create_test_pool().await;
        sqlx::query(
            "INSERT INTO documents (collection, doc_key, body, created_at_ms, updated_at_ms)
             VALUES ('zipcodes', '10001', 'not json', 0, 0)",
        )
        .execute(&pool)
        .await
        .unwrap();

        let zip = ZipCode::parse("10001").unwrap();
        let result = get_price_record(&pool, "zipcodes", &zip).await;
        assert!(matches!(result, Err(DatabaseError::SerializationError(_))));
    }
}
