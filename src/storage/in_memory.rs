//! In-memory implementations of the storage and follow-graph seams
//!
//! Useful for testing and development. Both use `RwLock` for thread-safe
//! access; concurrent reads never block each other.

use crate::core::error::StoreError;
use crate::core::model::SocialLink;
use crate::core::relationship::RelationshipOracle;
use crate::core::store::LinkStore;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory link store.
///
/// The `(owner_id, platform_type)` uniqueness check runs under the same
/// write lock as the insert itself, so two racing creates for the same pair
/// resolve to exactly one winner, matching the relational backend's unique
/// index semantics.
#[derive(Clone)]
pub struct InMemoryLinkStore {
    links: Arc<RwLock<HashMap<Uuid, SocialLink>>>,
}

impl InMemoryLinkStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            links: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryLinkStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend {
        message: format!("Failed to acquire lock: {}", e),
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        let mut links = self.links.write().map_err(lock_error)?;

        let duplicate = links
            .values()
            .any(|l| l.owner_id == link.owner_id && l.platform_type == link.platform_type);
        if duplicate {
            return Err(StoreError::UniqueViolation {
                owner_id: link.owner_id,
                platform: link.platform_type,
            });
        }

        links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<SocialLink>, StoreError> {
        let links = self.links.read().map_err(lock_error)?;

        Ok(links.get(id).cloned())
    }

    async fn list_by_owner(&self, owner_id: &Uuid) -> Result<Vec<SocialLink>, StoreError> {
        let links = self.links.read().map_err(lock_error)?;

        Ok(links
            .values()
            .filter(|l| &l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn count_by_owner(&self, owner_id: &Uuid) -> Result<usize, StoreError> {
        let links = self.links.read().map_err(lock_error)?;

        Ok(links.values().filter(|l| &l.owner_id == owner_id).count())
    }

    async fn update(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
        let mut links = self.links.write().map_err(lock_error)?;

        if !links.contains_key(&link.id) {
            return Err(StoreError::NotFound { id: link.id });
        }

        links.insert(link.id, link.clone());

        Ok(link)
    }

    async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
        let mut links = self.links.write().map_err(lock_error)?;

        links
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id: *id })
    }

    async fn delete_by_owner(&self, owner_id: &Uuid) -> Result<u64, StoreError> {
        let mut links = self.links.write().map_err(lock_error)?;

        let before = links.len();
        links.retain(|_, l| &l.owner_id != owner_id);

        Ok((before - links.len()) as u64)
    }
}

/// In-memory follow graph for development and tests.
///
/// Stores directed `(follower, followee)` edges; `are_mutual` answers both
/// directions from a single lock acquisition.
#[derive(Clone)]
pub struct InMemoryFollowGraph {
    edges: Arc<RwLock<HashSet<(Uuid, Uuid)>>>,
}

impl InMemoryFollowGraph {
    /// Create a new empty follow graph
    pub fn new() -> Self {
        Self {
            edges: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Record a follow edge from `follower` to `followee`
    pub fn follow(&self, follower: Uuid, followee: Uuid) {
        self.edges
            .write()
            .expect("follow graph lock poisoned")
            .insert((follower, followee));
    }

    /// Remove the follow edge from `follower` to `followee`
    pub fn unfollow(&self, follower: Uuid, followee: Uuid) {
        self.edges
            .write()
            .expect("follow graph lock poisoned")
            .remove(&(follower, followee));
    }
}

impl Default for InMemoryFollowGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelationshipOracle for InMemoryFollowGraph {
    async fn are_mutual(&self, a: &Uuid, b: &Uuid) -> Result<bool> {
        let edges = self
            .edges
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(edges.contains(&(*a, *b)) && edges.contains(&(*b, *a)))
    }
}
