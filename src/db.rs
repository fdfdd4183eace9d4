use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::store::{MySqlStore, SqliteStore, Store};

/// Connects the adapter matching the URL scheme and makes sure the tables exist.
pub async fn init_store(database_url: &str) -> Result<Arc<dyn Store>> {
    let store: Arc<dyn Store> = match engine_of(database_url) {
        Some(Engine::MySql) => {
            info!("Connecting to MySQL");
            Arc::new(
                MySqlStore::connect(database_url)
                    .await
                    .context("Failed to connect to MySQL")?,
            )
        }
        Some(Engine::Sqlite) => {
            info!("Opening SQLite database");
            Arc::new(
                SqliteStore::connect(database_url)
                    .await
                    .context("Failed to open SQLite database")?,
            )
        }
        None => bail!("DATABASE_URL must start with mysql:// or sqlite:"),
    };

    store
        .init_schema()
        .await
        .context("Failed to create tables")?;

    Ok(store)
}

#[derive(Debug, PartialEq)]
enum Engine {
    MySql,
    Sqlite,
}

fn engine_of(database_url: &str) -> Option<Engine> {
    if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Some(Engine::MySql)
    } else if database_url.starts_with("sqlite:") {
        Some(Engine::Sqlite)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_follows_url_scheme() {
        assert_eq!(engine_of("mysql://u:p@db/leave"), Some(Engine::MySql));
        assert_eq!(engine_of("sqlite://leave.db"), Some(Engine::Sqlite));
        assert_eq!(engine_of("sqlite::memory:"), Some(Engine::Sqlite));
        assert_eq!(engine_of("postgres://db/leave"), None);
    }

    #[actix_web::test]
    async fn sqlite_url_yields_a_ready_store() {
        let store = init_store("sqlite::memory:").await.unwrap();
        assert!(store.list_blocked_dates().await.unwrap().is_empty());
        store.close().await;
    }
}
