//! Follow-graph capability consumed by the visibility engine
//!
//! The follow graph is owned by another subsystem; this crate only needs a
//! single capability from it: whether two accounts follow each other. Keeping
//! the seam this narrow lets the engine be unit-tested against fakes without
//! a real social graph.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Read-only capability answering "do A and B follow each other?".
#[async_trait]
pub trait RelationshipOracle: Send + Sync {
    /// True iff a follow edge exists from `a` to `b` AND from `b` to `a`.
    ///
    /// Implementations must answer with a single query against the
    /// relationship store, not two sequential existence checks. Callers must
    /// not cache the result beyond one visibility computation: a stale
    /// answer would keep showing mutual-only links after an unfollow.
    async fn are_mutual(&self, a: &Uuid, b: &Uuid) -> Result<bool>;
}

/// Oracle that knows no relationships (default for setups without a
/// follow graph). Mutual-only links are then visible to owners only.
pub struct NoFollowGraph;

#[async_trait]
impl RelationshipOracle for NoFollowGraph {
    async fn are_mutual(&self, _: &Uuid, _: &Uuid) -> Result<bool> {
        Ok(false)
    }
}
