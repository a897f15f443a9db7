use crate::config::Config;
use anyhow::Result;
use libsql::{Builder, Connection, Database as LibsqlDatabase};
use std::path::Path;

const SYSTEM_MIGRATIONS: &[(&str, &str)] =
    &[("system/000_migrations_table.sql", include_str!("migrations/system/000_migrations_table.sql"))];

const MIGRATIONS: &[(&str, &str)] = &[("001_devotions.sql", include_str!("migrations/001_devotions.sql"))];

/// The store handle shared by every request. One connection is opened at
/// startup and lives until the process exits.
pub struct Database {
    _db: LibsqlDatabase,
    conn: Connection,
}

impl Database {
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    async fn is_migration_applied(conn: &Connection, name: &str) -> Result<bool> {
        let query = "SELECT 1 FROM _migrations WHERE name = ?";
        match conn.query(query, libsql::params![name]).await {
            Ok(mut rows) => Ok(rows.next().await?.is_some()),
            Err(e) => {
                if e.to_string().contains("no such table") {
                    Ok(false)
                } else {
                    Err(e.into())
                }
            }
        }
    }

    async fn record_migration(conn: &Connection, name: &str) -> Result<()> {
        let query = r#"
            INSERT INTO _migrations (name, applied_at)
            VALUES (?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        "#;
        conn.execute(query, libsql::params![name]).await?;
        Ok(())
    }

    async fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
        if Self::is_migration_applied(conn, name).await? {
            tracing::debug!("migration {} already applied, skipping", name);
            return Ok(());
        }

        tracing::info!("applying migration: {}", name);
        conn.execute_batch(sql)
            .await
            .map_err(|e| anyhow::anyhow!("failed to execute migration {name}: {e}"))?;

        Self::record_migration(conn, name).await?;
        Ok(())
    }

    async fn migrate(conn: &Connection) -> Result<()> {
        for (filename, sql) in SYSTEM_MIGRATIONS.iter().chain(MIGRATIONS) {
            Self::run_migration(conn, filename, sql).await?;
        }
        Ok(())
    }

    async fn from_db(db: LibsqlDatabase) -> Result<Self> {
        let conn = db.connect()?;
        conn.query("SELECT 1", ()).await?;
        Self::migrate(&conn).await?;
        Ok(Database { _db: db, conn })
    }

    /// Opens the remote store when `remote_url` and `remote_auth_token` are
    /// both set, otherwise a local file under `data_dir`.
    pub async fn new(cfg: &Config, data_dir: &Path) -> Result<Self> {
        let db = match cfg.app.remote() {
            Some((url, token)) => {
                tracing::info!(url, "[db] connecting to remote database");
                Builder::new_remote(url.to_string(), token.to_string()).build().await?
            }
            None => {
                let path = data_dir.join(cfg.app.get_db());
                tracing::info!(path = ?path, "[db] opening local database");
                Builder::new_local(&path).build().await?
            }
        };

        Self::from_db(db).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let db = Builder::new_local(":memory:").build().await?;
        Self::from_db(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        Database::migrate(db.connection()).await.unwrap();

        let mut rows = db
            .connection()
            .query("SELECT COUNT(*) FROM _migrations", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        let applied: i64 = row.get(0).unwrap();
        assert_eq!(applied, (SYSTEM_MIGRATIONS.len() + MIGRATIONS.len()) as i64);
    }

    #[tokio::test]
    async fn test_devotions_table_exists() {
        let db = Database::open_in_memory().await.unwrap();
        let affected = db
            .connection()
            .execute("INSERT INTO devotions (title) VALUES (?)", libsql::params!["Hope"])
            .await
            .unwrap();
        assert_eq!(affected, 1);
    }
}
