use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{debug, info};

use tollgate_shared::types::UserListing;

use crate::utils::{generate_uuid_token, get_timestamp};

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub user_id: String,
    pub sex: i64,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// SQLite-backed store of registered phone numbers.
#[derive(Clone, Debug)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open the database at `url` and make sure the schema exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .with_context(|| format!("Failed to open database {}", url))?;

        let store = Self { pool };
        store.create_tables().await?;
        info!("User store ready at {}", url);
        Ok(store)
    }

    /// Private in-memory database. One connection, so every query sees the same data.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id    TEXT    NOT NULL UNIQUE,
                sex        INTEGER NOT NULL DEFAULT 2,
                phone      TEXT    NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create users table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_phone ON users(phone)")
            .execute(&self.pool)
            .await
            .context("Failed to create phone index")?;

        Ok(())
    }

    /// Insert a record under a freshly generated `user_id`.
    pub async fn create(&self, phone: &str, sex: u8) -> Result<UserRecord> {
        let user_id = generate_uuid_token();
        let now = get_timestamp() as i64;

        sqlx::query(
            "INSERT INTO users (user_id, sex, phone, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&user_id)
        .bind(i64::from(sex))
        .bind(phone)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        debug!("User record created: {}", user_id);

        sqlx::query_as::<_, UserRecord>("SELECT * FROM users WHERE user_id = ?1")
            .bind(&user_id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to read back inserted user")
    }

    /// Change the phone number of `user_id`. Returns the number of rows changed.
    pub async fn update_phone(&self, user_id: &str, phone: &str) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET phone = ?1, updated_at = ?2 WHERE user_id = ?3")
            .bind(phone)
            .bind(get_timestamp() as i64)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .context("Failed to update phone")?;

        Ok(result.rows_affected())
    }

    /// Delete every record holding `phone`. Returns the number of rows removed.
    pub async fn delete_by_phone(&self, phone: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE phone = ?1")
            .bind(phone)
            .execute(&self.pool)
            .await
            .context("Failed to delete by phone")?;

        Ok(result.rows_affected())
    }

    pub async fn find_all(&self) -> Result<Vec<UserRecord>> {
        sqlx::query_as::<_, UserRecord>("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list users")
    }

    /// `phone` and `user_id` of every record with the given `sex`.
    pub async fn find_by_sex(&self, sex: u8) -> Result<Vec<UserListing>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT phone, user_id FROM users WHERE sex = ?1 ORDER BY id")
                .bind(i64::from(sex))
                .fetch_all(&self.pool)
                .await
                .context("Failed to query users by sex")?;

        Ok(rows
            .into_iter()
            .map(|(phone, user_id)| UserListing { phone, user_id })
            .collect())
    }
}
