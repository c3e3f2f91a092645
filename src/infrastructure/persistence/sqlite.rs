//! SQLite Catalog Store - 嵌入式文件存储

use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::application::ports::{CatalogError, CatalogStorePort, RowId};
use crate::domain::book::CompleteBookRecord;

/// SQLite Catalog Store
pub struct SqliteCatalogStore {
    pool: Pool<Sqlite>,
}

impl SqliteCatalogStore {
    /// 连接并确保表结构就绪
    ///
    /// url 形如 `sqlite:booklog.db?mode=rwc` 或 `sqlite::memory:`
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, CatalogError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| CatalogError::Connection(e.to_string()))?;

        // 遇到锁时等待而不是立即失败
        sqlx::query("PRAGMA busy_timeout=5000")
            .execute(&pool)
            .await
            .map_err(|e| CatalogError::Database(e.to_string()))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), CatalogError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS master_table (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                publisher TEXT NOT NULL,
                description TEXT NOT NULL,
                subject TEXT NOT NULL,
                specific_subject TEXT NOT NULL,
                location TEXT NOT NULL,
                reading_status TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        tracing::info!("SQLite catalog ready");
        Ok(())
    }
}

#[async_trait]
impl CatalogStorePort for SqliteCatalogStore {
    async fn distinct_subjects(&self) -> Result<Vec<String>, CatalogError> {
        sqlx::query_scalar(
            "SELECT DISTINCT subject FROM master_table WHERE subject <> '' ORDER BY subject",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    async fn distinct_specific_subjects(&self) -> Result<Vec<String>, CatalogError> {
        sqlx::query_scalar(
            "SELECT DISTINCT specific_subject FROM master_table WHERE specific_subject <> '' ORDER BY specific_subject",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))
    }

    async fn insert_book(&self, record: &CompleteBookRecord) -> Result<RowId, CatalogError> {
        record
            .validate()
            .map_err(|e| CatalogError::InvalidRecord(e.to_string()))?;

        let result = sqlx::query(
            r#"
            INSERT INTO master_table
                (title, author, publisher, description, subject, specific_subject, location, reading_status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.title())
        .bind(record.author())
        .bind(record.publisher())
        .bind(record.description())
        .bind(record.subject())
        .bind(record.specific_subject())
        .bind(record.location())
        .bind(record.reading_status().as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogError::Database(e.to_string()))?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::{BookMetadata, ReadingStatus, SubjectInfo};

    async fn memory_store() -> SqliteCatalogStore {
        SqliteCatalogStore::connect("sqlite::memory:", 1)
            .await
            .unwrap()
    }

    fn record(title: &str, subject: &str, specific: &str) -> CompleteBookRecord {
        CompleteBookRecord::merge(
            BookMetadata::new(title, "someone", "somewhere", "something"),
            SubjectInfo::new(subject, specific),
            "Shelf A",
            ReadingStatus::NotStarted,
        )
    }

    #[tokio::test]
    async fn test_empty_catalog_has_no_subjects() {
        let store = memory_store().await;
        assert!(store.distinct_subjects().await.unwrap().is_empty());
        assert!(store.distinct_specific_subjects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_returns_sequential_row_ids() {
        let store = memory_store().await;
        let first = store
            .insert_book(&record("A", "Fiction", "Fantasy"))
            .await
            .unwrap();
        let second = store
            .insert_book(&record("B", "Fiction", "Fantasy"))
            .await
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_distinct_subjects_dedupe_and_sort() {
        let store = memory_store().await;
        store
            .insert_book(&record("A", "History", "Rome"))
            .await
            .unwrap();
        store
            .insert_book(&record("B", "Fiction", "Fantasy"))
            .await
            .unwrap();
        store
            .insert_book(&record("C", "Fiction", "Space Opera"))
            .await
            .unwrap();

        assert_eq!(
            store.distinct_subjects().await.unwrap(),
            vec!["Fiction", "History"]
        );
        assert_eq!(
            store.distinct_specific_subjects().await.unwrap(),
            vec!["Fantasy", "Rome", "Space Opera"]
        );
    }

    #[tokio::test]
    async fn test_empty_title_writes_nothing() {
        let store = memory_store().await;
        let err = store
            .insert_book(&record("   ", "Fiction", "Fantasy"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecord(_)));

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM master_table")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_all_columns_stored() {
        let store = memory_store().await;
        let record = CompleteBookRecord::merge(
            BookMetadata::new("Dune", "Frank Herbert", "Chilton Books", "Desert epic."),
            SubjectInfo::new("Science Fiction", "Space Opera"),
            "Home Office",
            ReadingStatus::PartiallyComplete,
        );
        let row_id = store.insert_book(&record).await.unwrap();

        let (title, specific_subject, location, reading_status): (String, String, String, String) =
            sqlx::query_as(
                "SELECT title, specific_subject, location, reading_status FROM master_table WHERE id = ?",
            )
            .bind(row_id)
            .fetch_one(&store.pool)
            .await
            .unwrap();

        assert_eq!(title, "Dune");
        assert_eq!(specific_subject, "Space Opera");
        assert_eq!(location, "Home Office");
        assert_eq!(reading_status, "Partially Complete");
    }
}
