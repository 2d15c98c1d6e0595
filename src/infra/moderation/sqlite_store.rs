// SQLite implementation of the ModerationStore trait.

use crate::core::moderation::{BlacklistEntry, ModerationError, ModerationStore, Warning};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;

pub struct SqliteModerationStore {
    pool: SqlitePool,
}

impl SqliteModerationStore {
    /// Create a new SQLite moderation store with the given database path.
    /// The file is created if it does not exist.
    pub async fn new(database_path: &str) -> anyhow::Result<Self> {
        let connection_string = format!("sqlite://{}?mode=rwc", database_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&connection_string)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Run database migrations to create tables.
    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS warns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                guild_id INTEGER NOT NULL,
                moderator_id INTEGER NOT NULL,
                reason TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_warns_user_guild
            ON warns(user_id, guild_id)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blacklist (
                user_id INTEGER PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn parse_timestamp(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn warning_from_row(row: &sqlx::sqlite::SqliteRow) -> Warning {
        let created_at: String = row.get("created_at");
        Warning {
            id: row.get::<i64, _>("id"),
            user_id: row.get::<i64, _>("user_id") as u64,
            guild_id: row.get::<i64, _>("guild_id") as u64,
            moderator_id: row.get::<i64, _>("moderator_id") as u64,
            reason: row.get("reason"),
            created_at: Self::parse_timestamp(&created_at),
        }
    }
}

#[async_trait]
impl ModerationStore for SqliteModerationStore {
    async fn add_warning(
        &self,
        user_id: u64,
        guild_id: u64,
        moderator_id: u64,
        reason: &str,
    ) -> Result<Warning, ModerationError> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO warns (user_id, guild_id, moderator_id, reason, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id as i64)
        .bind(guild_id as i64)
        .bind(moderator_id as i64)
        .bind(reason)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(Warning {
            id: result.last_insert_rowid(),
            user_id,
            guild_id,
            moderator_id,
            reason: reason.to_string(),
            created_at,
        })
    }

    async fn remove_warning(
        &self,
        id: i64,
        user_id: u64,
        guild_id: u64,
    ) -> Result<bool, ModerationError> {
        let result = sqlx::query(
            r#"
            DELETE FROM warns
            WHERE id = ? AND user_id = ? AND guild_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id as i64)
        .bind(guild_id as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_warnings(
        &self,
        user_id: u64,
        guild_id: u64,
    ) -> Result<Vec<Warning>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, guild_id, moderator_id, reason, created_at
            FROM warns
            WHERE user_id = ? AND guild_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id as i64)
        .bind(guild_id as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(rows.iter().map(Self::warning_from_row).collect())
    }

    async fn count_warnings(&self, user_id: u64, guild_id: u64) -> Result<u32, ModerationError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total FROM warns
            WHERE user_id = ? AND guild_id = ?
            "#,
        )
        .bind(user_id as i64)
        .bind(guild_id as i64)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(row.get::<i64, _>("total") as u32)
    }

    async fn blacklist_add(&self, user_id: u64) -> Result<bool, ModerationError> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO blacklist (user_id, created_at)
            VALUES (?, ?)
            "#,
        )
        .bind(user_id as i64)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn blacklist_remove(&self, user_id: u64) -> Result<bool, ModerationError> {
        let result = sqlx::query("DELETE FROM blacklist WHERE user_id = ?")
            .bind(user_id as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn blacklist_contains(&self, user_id: u64) -> Result<bool, ModerationError> {
        let row = sqlx::query("SELECT 1 AS present FROM blacklist WHERE user_id = ?")
            .bind(user_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(row.is_some())
    }

    async fn blacklist_all(&self) -> Result<Vec<BlacklistEntry>, ModerationError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, created_at FROM blacklist
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ModerationError::Store(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| {
                let created_at: String = row.get("created_at");
                BlacklistEntry {
                    user_id: row.get::<i64, _>("user_id") as u64,
                    created_at: Self::parse_timestamp(&created_at),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_store() -> (TempDir, SqliteModerationStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("moderation.db");
        let store = SqliteModerationStore::new(path.to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn warnings_round_trip_through_sqlite() {
        let (_dir, store) = temp_store().await;

        let first = store.add_warning(1, 10, 99, "spam").await.unwrap();
        let second = store.add_warning(1, 10, 99, "more spam").await.unwrap();
        assert!(second.id > first.id);

        let listed = store.list_warnings(1, 10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].reason, "spam");
        assert_eq!(listed[0].moderator_id, 99);
        assert_eq!(store.count_warnings(1, 10).await.unwrap(), 2);

        // Other users and guilds are unaffected
        assert_eq!(store.count_warnings(2, 10).await.unwrap(), 0);
        assert_eq!(store.count_warnings(1, 20).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn remove_warning_is_scoped() {
        let (_dir, store) = temp_store().await;

        let warning = store.add_warning(1, 10, 99, "spam").await.unwrap();

        // Mismatched guild deletes nothing
        assert!(!store.remove_warning(warning.id, 1, 20).await.unwrap());
        assert_eq!(store.count_warnings(1, 10).await.unwrap(), 1);

        assert!(store.remove_warning(warning.id, 1, 10).await.unwrap());
        assert_eq!(store.count_warnings(1, 10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blacklist_round_trips_through_sqlite() {
        let (_dir, store) = temp_store().await;

        assert!(store.blacklist_add(5).await.unwrap());
        assert!(!store.blacklist_add(5).await.unwrap());
        assert!(store.blacklist_contains(5).await.unwrap());

        let all = store.blacklist_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_id, 5);

        assert!(store.blacklist_remove(5).await.unwrap());
        assert!(!store.blacklist_contains(5).await.unwrap());
    }

    #[tokio::test]
    async fn large_snowflake_ids_survive_the_i64_cast() {
        let (_dir, store) = temp_store().await;

        // Realistic Discord snowflakes are > i32::MAX
        let user_id = 1_432_001_978_447_167_611u64;
        let guild_id = 1_096_545_156_000_000_000u64;

        store
            .add_warning(user_id, guild_id, user_id, "check ids")
            .await
            .unwrap();
        let listed = store.list_warnings(user_id, guild_id).await.unwrap();
        assert_eq!(listed[0].user_id, user_id);
        assert_eq!(listed[0].guild_id, guild_id);
    }
}
