//! PostgreSQL storage backend using sqlx.
//!
//! Provides [`PostgresLinkStore`] for link records and
//! [`PostgresFollowGraph`] answering the mutual-follow capability against
//! the follow-edge table owned by the social-graph subsystem.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! social-links = { version = "0.1", features = ["postgres"] }
//! ```

use crate::core::error::StoreError;
use crate::core::model::{PlatformType, PrivacyLevel, SocialLink};
use crate::core::relationship::RelationshipOracle;
use crate::core::store::LinkStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Link store backed by PostgreSQL.
///
/// The `(owner_id, platform_type)` pair carries a unique constraint, so
/// racing inserts are resolved by the database: the loser sees SQLSTATE
/// 23505, surfaced as [`StoreError::UniqueViolation`].
#[derive(Clone, Debug)]
pub struct PostgresLinkStore {
    pool: PgPool,
}

impl PostgresLinkStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the links table and its indexes if they do not exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS social_links (
                id UUID PRIMARY KEY,
                owner_id UUID NOT NULL,
                platform_type TEXT NOT NULL,
                url TEXT NOT NULL,
                privacy_level TEXT NOT NULL,
                label TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                CONSTRAINT social_links_owner_platform_key UNIQUE (owner_id, platform_type)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_social_links_owner ON social_links (owner_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }
}

fn db_error(e: sqlx::Error) -> StoreError {
    StoreError::Backend {
        message: e.to_string(),
    }
}

fn row_to_link(row: &PgRow) -> Result<SocialLink, StoreError> {
    let platform_raw: String = row.try_get("platform_type").map_err(db_error)?;
    let privacy_raw: String = row.try_get("privacy_level").map_err(db_error)?;

    let platform_type: PlatformType = platform_raw
        .parse()
        .map_err(|e: String| StoreError::Backend { message: e })?;
    let privacy_level: PrivacyLevel = privacy_raw
        .parse()
        .map_err(|e: String| StoreError::Backend { message: e })?;

    Ok(SocialLink {
        id: row.try_get("id").map_err(db_error)?,
        owner_id: row.try_get("owner_id").map_err(db_error)?,
        platform_type,
        url: row.try_get("url").map_err(db_error)?,
        privacy_level,
        label: row.try_get("label").map_err(db_error)?,
        created_at: row.try_get("created_at").map_err(db_error)?,
        updated_at: row.try_get("updated_at").map_err(db_error)?,
    })
}

#[async_trait]
impl LinkStore for PostgresLinkStore {
    async fn insert(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO social_links
                (id, owner_id, platform_type, url, privacy_level, label, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(link.id)
        .bind(link.owner_id)
        .bind(link.platform_type.as_str())
        .bind(&link.url)
        .bind(link.privacy_level.as_str())
        .bind(&link.label)
        .bind(link.created_at)
        .bind(link.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(link),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23505") => {
                Err(StoreError::UniqueViolation {
                    owner_id: link.owner_id,
                    platform: link.platform_type,
                })
            }
            Err(e) => Err(db_error(e)),
        }
    }

    async fn get(&self, id: &Uuid) -> Result<Option<SocialLink>, StoreError> {
        let row = sqlx::query("SELECT * FROM social_links WHERE id = $1")
            .bind(*id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.as_ref().map(row_to_link).transpose()
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SocialLink>, StoreError> {
        let rows = sqlx::query("SELECT * FROM social_links WHERE owner_id = $1")
            .bind(*owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter().map(row_to_link).collect()
    }

    async fn count_by_owner(&self, owner_id: &Uuid) -> Result<usize, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM social_links WHERE owner_id = $1")
                .bind(*owner_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(count as usize)
    }

    async fn update(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE social_links
            SET url = $2, privacy_level = $3, label = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(link.id)
        .bind(&link.url)
        .bind(link.privacy_level.as_str())
        .bind(&link.label)
        .bind(link.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: link.id });
        }

        Ok(link)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM social_links WHERE id = $1")
            .bind(*id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound { id: *id });
        }

        Ok(())
    }

    async fn delete_by_owner(&self, owner_id: &Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM social_links WHERE owner_id = $1")
            .bind(*owner_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}

/// Mutual-follow oracle backed by the follow-edge table.
///
/// The table itself belongs to the social-graph subsystem; this type only
/// reads it. Both directions are answered by one statement, so the cost per
/// visibility request stays a single round trip regardless of link count.
#[derive(Clone, Debug)]
pub struct PostgresFollowGraph {
    pool: PgPool,
}

impl PostgresFollowGraph {
    /// Create a new oracle with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipOracle for PostgresFollowGraph {
    async fn are_mutual(&self, a: &Uuid, b: &Uuid) -> Result<bool> {
        // One EXISTS per direction: correct even if the external table
        // carries duplicate rows for an edge.
        let mutual: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM follow_edges
                WHERE follower_id = $1 AND followee_id = $2
            ) AND EXISTS (
                SELECT 1 FROM follow_edges
                WHERE follower_id = $2 AND followee_id = $1
            )
            "#,
        )
        .bind(*a)
        .bind(*b)
        .fetch_one(&self.pool)
        .await?;

        Ok(mutual)
    }
}
