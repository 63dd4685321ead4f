//! The registrant store over a SQLite pool.

use crate::error::StoreError;
use crate::model::{NewRegistrant, Registrant};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Handle to the `registrants` table. Cheap to clone; all methods take
/// `&self` and each statement commits independently.
#[derive(Clone)]
pub struct RegistrantStore {
    pool: SqlitePool,
}

impl RegistrantStore {
    /// Connect to the given sqlx SQLite URL, creating the database file (and
    /// its parent directory) if needed, and run pending migrations.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        ensure_parent_dir(url);
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        let store = Self::from_pool(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Wrap an existing pool without migrating. Used by tests that manage
    /// their own in-memory pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Insert a new registrant with counters at zero.
    ///
    /// Returns `StoreError::Conflict` when any of the UNIQUE constraints
    /// (email, phone, link) is violated; callers decide whether that means
    /// "already registered" or a link-token collision.
    pub async fn create(&self, new: &NewRegistrant) -> Result<Registrant, StoreError> {
        let registrant = sqlx::query_as::<_, Registrant>(
            "INSERT INTO registrants (name, email, phone, link) VALUES (?, ?, ?, ?) \
             RETURNING id, name, email, phone, link, views, referral_credits",
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.link)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(id = registrant.id, "registrant created");
        Ok(registrant)
    }

    /// Find a registrant matching the email OR the phone — either match
    /// counts as "already registered".
    pub async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<Registrant>, StoreError> {
        let registrant = sqlx::query_as::<_, Registrant>(
            "SELECT id, name, email, phone, link, views, referral_credits \
             FROM registrants WHERE email = ? OR phone = ? LIMIT 1",
        )
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;
        Ok(registrant)
    }

    /// Find a registrant by their full shareable link.
    pub async fn find_by_link(&self, link: &str) -> Result<Option<Registrant>, StoreError> {
        let registrant = sqlx::query_as::<_, Registrant>(
            "SELECT id, name, email, phone, link, views, referral_credits \
             FROM registrants WHERE link = ? LIMIT 1",
        )
        .bind(link)
        .fetch_optional(&self.pool)
        .await?;
        Ok(registrant)
    }

    /// Bump the view counter by one. Single atomic UPDATE, so concurrent
    /// visits cannot lose increments.
    pub async fn record_view(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE registrants SET views = views + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Bump the referral credit counter by one.
    pub async fn record_referral(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE registrants SET referral_credits = referral_credits + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// All registrants in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Registrant>, StoreError> {
        let registrants = sqlx::query_as::<_, Registrant>(
            "SELECT id, name, email, phone, link, views, referral_credits \
             FROM registrants ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(registrants)
    }

    /// Number of registrants.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(1) FROM registrants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Delete one registrant. Returns false when the id does not exist;
    /// both outcomes are non-fatal.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM registrants WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!(id, "registrant deleted");
        }
        Ok(deleted)
    }

    /// Delete every registrant. Irreversible; idempotent.
    pub async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM registrants")
            .execute(&self.pool)
            .await?;
        let removed = result.rows_affected();
        tracing::info!(removed, "registrant table cleared");
        Ok(removed)
    }
}

/// Make sure the directory holding a sqlite file exists; in-memory URLs are
/// left alone.
fn ensure_parent_dir(url: &str) {
    let Some(path) = url.strip_prefix("sqlite:") else {
        return;
    };
    let path = path.trim_start_matches("//");
    if path.is_empty() || path.starts_with(':') || path.contains("memory") {
        return;
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
}
