//! Persistence seam for link records
//!
//! The registry and the visibility engine are agnostic to the underlying
//! storage mechanism; they only see this trait. Backends must enforce the
//! `(owner_id, platform_type)` uniqueness constraint atomically inside
//! [`LinkStore::insert`], because that constraint is what resolves racing
//! creates: exactly one concurrent insert wins and the loser observes
//! [`StoreError::UniqueViolation`].

use crate::core::error::StoreError;
use crate::core::model::SocialLink;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage backend for [`SocialLink`] records.
///
/// All methods are scoped to a single owner or a single record; no
/// cross-owner queries exist, so backends can index everything by
/// `owner_id` plus the unique `(owner_id, platform_type)` pair.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a new record.
    ///
    /// Must atomically reject a second record for the same
    /// `(owner_id, platform_type)` pair with [`StoreError::UniqueViolation`],
    /// even under concurrent inserts.
    async fn insert(&self, link: SocialLink) -> Result<SocialLink, StoreError>;

    /// Get a record by id
    async fn get(&self, id: &Uuid) -> Result<Option<SocialLink>, StoreError>;

    /// All records for one owner, in unspecified order
    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SocialLink>, StoreError>;

    /// Number of records for one owner
    async fn count_by_owner(&self, owner_id: &Uuid) -> Result<usize, StoreError>;

    /// Replace an existing record; [`StoreError::NotFound`] if the id is
    /// unknown
    async fn update(&self, link: SocialLink) -> Result<SocialLink, StoreError>;

    /// Remove a record; [`StoreError::NotFound`] if the id is unknown
    async fn delete(&self, id: &Uuid) -> Result<(), StoreError>;

    /// Remove every record for an owner, returning how many were removed.
    ///
    /// Cascade hook for account deletion.
    async fn delete_by_owner(&self, owner_id: &Uuid) -> Result<u64, StoreError>;
}
