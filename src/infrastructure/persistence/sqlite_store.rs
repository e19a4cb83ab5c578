//! SQLite store for characters and the spend ledger
//!
//! A character row keeps its pools and cursor in columns and the rest of the
//! sheet as JSON. Both commits run in one transaction.

use std::fmt::Display;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::application::ports::outbound::{
    CharacterRepositoryPort, SpendLedgerPort, SpendStorePort, StoreError,
};
use crate::domain::entities::{Character, SpendRequest, SpendStatus};
use crate::domain::value_objects::{CharacterId, ChronicleId, SpendRequestId};

const REQUEST_COLUMNS: &str = "r.id, r.character_id, r.pool, r.category, r.trait_name, \
     r.trait_type, r.trait_key, r.trait_value, r.previous_value, r.cost, r.status, \
     r.requester_id, r.approver_id, r.note, r.created_at, r.decided_at";

pub struct SqliteSpendStore {
    pool: SqlitePool,
}

impl SqliteSpendStore {
    /// Open (creating if needed) the database file at `path`
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        if let Some(dir) = std::path::Path::new(path).parent() {
            if !dir.as_os_str().is_empty() {
                tokio::fs::create_dir_all(dir)
                    .await
                    .map_err(|e| StoreError::Database(e.to_string()))?;
            }
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db)?;
        info!(path, "Opened SQLite store");
        Self::new(pool).await
    }

    /// Wrap an existing pool, creating the tables if missing
    pub async fn new(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                chronicle_id TEXT,
                archetype TEXT NOT NULL,
                freebies INTEGER NOT NULL,
                xp INTEGER NOT NULL,
                creation_cursor INTEGER NOT NULL,
                sheet TEXT NOT NULL,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(db)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS spend_requests (
                id TEXT PRIMARY KEY,
                character_id TEXT NOT NULL REFERENCES characters(id),
                pool TEXT NOT NULL,
                category TEXT NOT NULL,
                trait_name TEXT NOT NULL,
                trait_type TEXT NOT NULL,
                trait_key TEXT NOT NULL,
                trait_value INTEGER NOT NULL,
                previous_value INTEGER NOT NULL,
                cost INTEGER NOT NULL,
                status TEXT NOT NULL,
                requester_id TEXT NOT NULL,
                approver_id TEXT,
                note TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                decided_at TEXT
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(db)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_spend_requests_character \
             ON spend_requests (character_id, status)",
        )
        .execute(&pool)
        .await
        .map_err(db)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn requests_where(
        &self,
        filter: &str,
        bind: String,
    ) -> Result<Vec<SpendRequest>, StoreError> {
        let sql = format!(
            "SELECT {} FROM spend_requests r JOIN characters c ON c.id = r.character_id \
             WHERE {} ORDER BY r.created_at, r.rowid",
            REQUEST_COLUMNS, filter
        );
        let rows = sqlx::query(&sql)
            .bind(bind)
            .fetch_all(&self.pool)
            .await
            .map_err(db)?;
        rows.iter().map(request_from_row).collect()
    }
}

async fn upsert_character(
    tx: &mut Transaction<'_, Sqlite>,
    character: &Character,
) -> Result<(), StoreError> {
    let sheet =
        serde_json::to_string(character).map_err(|e| StoreError::Serialization(e.to_string()))?;
    sqlx::query(
        r#"
        INSERT INTO characters (id, chronicle_id, archetype, freebies, xp, creation_cursor, sheet, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            chronicle_id = excluded.chronicle_id,
            archetype = excluded.archetype,
            freebies = excluded.freebies,
            xp = excluded.xp,
            creation_cursor = excluded.creation_cursor,
            sheet = excluded.sheet,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(character.id.to_string())
    .bind(character.chronicle.map(|c| c.to_string()))
    .bind(character.archetype.as_str())
    .bind(character.freebies)
    .bind(character.xp)
    .bind(i64::from(character.creation_cursor))
    .bind(sheet)
    .execute(&mut **tx)
    .await
    .map_err(db)?;
    Ok(())
}

fn character_from_row(row: &SqliteRow) -> Result<Character, StoreError> {
    let sheet: String = row.try_get("sheet").map_err(db)?;
    let mut character: Character =
        serde_json::from_str(&sheet).map_err(|e| StoreError::Serialization(e.to_string()))?;
    // Columns are authoritative for the fields they carry
    character.freebies = row.try_get("freebies").map_err(db)?;
    character.xp = row.try_get("xp").map_err(db)?;
    let cursor: i64 = row.try_get("creation_cursor").map_err(db)?;
    character.creation_cursor = u32::try_from(cursor)
        .map_err(|_| StoreError::Serialization(format!("bad creation cursor {}", cursor)))?;
    Ok(character)
}

fn request_from_row(row: &SqliteRow) -> Result<SpendRequest, StoreError> {
    let text = |column: &str| -> Result<String, StoreError> { row.try_get(column).map_err(db) };
    let approver: Option<String> = row.try_get("approver_id").map_err(db)?;
    let decided_at: Option<DateTime<Utc>> = row.try_get("decided_at").map_err(db)?;

    Ok(SpendRequest {
        id: parse(&text("id")?, "id")?,
        character_id: parse(&text("character_id")?, "character_id")?,
        pool: parse(&text("pool")?, "pool")?,
        category: text("category")?,
        trait_name: text("trait_name")?,
        trait_type: parse(&text("trait_type")?, "trait_type")?,
        trait_key: text("trait_key")?,
        trait_value: row.try_get("trait_value").map_err(db)?,
        previous_value: row.try_get("previous_value").map_err(db)?,
        cost: row.try_get("cost").map_err(db)?,
        status: parse(&text("status")?, "status")?,
        requester: parse(&text("requester_id")?, "requester_id")?,
        approver: approver
            .map(|a| parse(&a, "approver_id"))
            .transpose()?,
        note: text("note")?,
        created_at: row.try_get("created_at").map_err(db)?,
        decided_at,
    })
}

fn parse<T>(value: &str, column: &str) -> Result<T, StoreError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e: T::Err| StoreError::Serialization(format!("{}: {}", column, e)))
}

fn db(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

#[async_trait]
impl CharacterRepositoryPort for SqliteSpendStore {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, StoreError> {
        let row = sqlx::query("SELECT freebies, xp, creation_cursor, sheet FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.as_ref().map(character_from_row).transpose()
    }

    async fn save(&self, character: &Character) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        upsert_character(&mut tx, character).await?;
        tx.commit().await.map_err(db)?;
        debug!(character_id = %character.id, "Saved character");
        Ok(())
    }
}

#[async_trait]
impl SpendLedgerPort for SqliteSpendStore {
    async fn get_request(&self, id: SpendRequestId) -> Result<Option<SpendRequest>, StoreError> {
        let sql = format!("SELECT {} FROM spend_requests r WHERE r.id = ?", REQUEST_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db)?;
        row.as_ref().map(request_from_row).transpose()
    }

    async fn history(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError> {
        self.requests_where("r.character_id = ?", character_id.to_string())
            .await
    }

    async fn pending(&self, character_id: CharacterId) -> Result<Vec<SpendRequest>, StoreError> {
        self.requests_where(
            "r.character_id = ? AND r.status = 'pending'",
            character_id.to_string(),
        )
        .await
    }

    async fn pending_for_chronicle(
        &self,
        chronicle: ChronicleId,
    ) -> Result<Vec<SpendRequest>, StoreError> {
        self.requests_where(
            "c.chronicle_id = ? AND r.status = 'pending'",
            chronicle.to_string(),
        )
        .await
    }

    async fn pending_count(&self) -> Result<usize, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM spend_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .map_err(db)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl SpendStorePort for SqliteSpendStore {
    async fn commit_spend(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        upsert_character(&mut tx, character).await?;
        sqlx::query(
            r#"
            INSERT INTO spend_requests (
                id, character_id, pool, category, trait_name, trait_type, trait_key,
                trait_value, previous_value, cost, status, requester_id, approver_id,
                note, created_at, decided_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.id.to_string())
        .bind(request.character_id.to_string())
        .bind(request.pool.as_str())
        .bind(&request.category)
        .bind(&request.trait_name)
        .bind(request.trait_type.as_str())
        .bind(&request.trait_key)
        .bind(request.trait_value)
        .bind(request.previous_value)
        .bind(request.cost)
        .bind(request.status.as_str())
        .bind(request.requester.to_string())
        .bind(request.approver.map(|a| a.to_string()))
        .bind(&request.note)
        .bind(request.created_at)
        .bind(request.decided_at)
        .execute(&mut *tx)
        .await
        .map_err(db)?;
        tx.commit().await.map_err(db)?;
        Ok(())
    }

    async fn commit_decision(
        &self,
        character: &Character,
        request: &SpendRequest,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db)?;
        let updated = sqlx::query(
            "UPDATE spend_requests SET status = ?, approver_id = ?, decided_at = ? \
             WHERE id = ? AND status = ?",
        )
        .bind(request.status.as_str())
        .bind(request.approver.map(|a| a.to_string()))
        .bind(request.decided_at)
        .bind(request.id.to_string())
        .bind(SpendStatus::Pending.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db)?;

        if updated.rows_affected() == 0 {
            let status: Option<(String,)> =
                sqlx::query_as("SELECT status FROM spend_requests WHERE id = ?")
                    .bind(request.id.to_string())
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(db)?;
            return Err(match status {
                Some((status,)) => StoreError::Conflict(format!(
                    "spend request {} is already {}",
                    request.id, status
                )),
                None => StoreError::NotFound(format!("spend request {}", request.id)),
            });
        }

        upsert_character(&mut tx, character).await?;
        tx.commit().await.map_err(db)?;
        Ok(())
    }
}
