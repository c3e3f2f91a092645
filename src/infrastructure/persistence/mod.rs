//! Persistence Layer - 书目存储
//!
//! 同一张 master_table 的三种方言实现: MySQL / PostgreSQL / SQLite

pub mod mysql;
pub mod postgres;
pub mod sqlite;

pub use mysql::MySqlCatalogStore;
pub use postgres::PostgresCatalogStore;
pub use sqlite::SqliteCatalogStore;

use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::{CatalogError, CatalogStorePort};

/// 数据库方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogDialect {
    Mysql,
    Postgres,
    Sqlite,
}

impl CatalogDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogDialect::Mysql => "mysql",
            CatalogDialect::Postgres => "postgres",
            CatalogDialect::Sqlite => "sqlite",
        }
    }
}

/// 按配置的方言建立存储连接（含建表迁移）
pub async fn connect_catalog_store(
    dialect: CatalogDialect,
    url: &str,
    max_connections: u32,
) -> Result<Arc<dyn CatalogStorePort>, CatalogError> {
    let store: Arc<dyn CatalogStorePort> = match dialect {
        CatalogDialect::Mysql => {
            Arc::new(MySqlCatalogStore::connect(url, max_connections).await?)
        }
        CatalogDialect::Postgres => {
            Arc::new(PostgresCatalogStore::connect(url, max_connections).await?)
        }
        CatalogDialect::Sqlite => {
            Arc::new(SqliteCatalogStore::connect(url, max_connections).await?)
        }
    };

    tracing::info!(dialect = dialect.as_str(), "Catalog store connected");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct DialectHolder {
        dialect: CatalogDialect,
    }

    #[test]
    fn test_dialect_deserializes_lowercase() {
        let holder: DialectHolder = serde_json::from_str(r#"{"dialect": "postgres"}"#).unwrap();
        assert_eq!(holder.dialect, CatalogDialect::Postgres);

        let holder: DialectHolder = serde_json::from_str(r#"{"dialect": "sqlite"}"#).unwrap();
        assert_eq!(holder.dialect, CatalogDialect::Sqlite);
    }

    #[test]
    fn test_dialect_rejects_unknown_engine() {
        let result: Result<DialectHolder, _> = serde_json::from_str(r#"{"dialect": "oracle"}"#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connect_factory_builds_sqlite_store() {
        let store = connect_catalog_store(CatalogDialect::Sqlite, "sqlite::memory:", 1)
            .await
            .unwrap();
        assert!(store.distinct_subjects().await.unwrap().is_empty());
    }
}
