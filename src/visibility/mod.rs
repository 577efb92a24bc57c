//! Viewer-scoped filtering of an owner's links
//!
//! [`VisibilityEngine`] computes, for every (owner, viewer) pair, exactly the
//! subset of the owner's links that viewer is entitled to see. It is a pure
//! function over a read-only snapshot of storage plus one optional
//! relationship query; it holds no mutable state and may run concurrently
//! across unrelated requests without locks.

use crate::core::error::{LinksError, LinksResult};
use crate::core::model::{PrivacyLevel, SocialLink};
use crate::core::relationship::RelationshipOracle;
use crate::core::store::LinkStore;
use std::sync::Arc;
use uuid::Uuid;

/// Read-side service deciding link disclosure per viewer.
#[derive(Clone)]
pub struct VisibilityEngine {
    store: Arc<dyn LinkStore>,
    oracle: Arc<dyn RelationshipOracle>,
}

impl VisibilityEngine {
    pub fn new(store: Arc<dyn LinkStore>, oracle: Arc<dyn RelationshipOracle>) -> Self {
        Self { store, oracle }
    }

    /// The links of `owner_id` that `viewer_id` may see, in display order.
    ///
    /// Evaluated first-match-wins:
    /// 1. the owner sees everything, including hidden links
    /// 2. anonymous viewers see public links only
    /// 3. other authenticated viewers see public and community links, plus
    ///    mutual-only links when a mutual follow exists; hidden links never
    ///    appear in this branch
    ///
    /// The mutual-follow answer is fetched at most once per call and never
    /// cached across calls, so an unfollow takes effect on the next request.
    pub async fn visible_links(
        &self,
        owner_id: Uuid,
        viewer_id: Option<Uuid>,
    ) -> LinksResult<Vec<SocialLink>> {
        let mut links = self.store.list_by_owner(&owner_id).await?;

        match viewer_id {
            Some(viewer) if viewer == owner_id => {}
            None => {
                links.retain(|l| l.privacy_level == PrivacyLevel::Public);
            }
            Some(viewer) => {
                let needs_oracle = links
                    .iter()
                    .any(|l| l.privacy_level == PrivacyLevel::Mutual);

                // One relationship query per request, and only when a
                // mutual-only link could actually be disclosed.
                let mutual = if needs_oracle {
                    self.oracle
                        .are_mutual(&owner_id, &viewer)
                        .await
                        .map_err(|e| LinksError::Internal(e.to_string()))?
                } else {
                    false
                };

                tracing::debug!(
                    owner_id = %owner_id,
                    viewer_id = %viewer,
                    mutual,
                    "computing visible links"
                );

                links.retain(|l| match l.privacy_level {
                    PrivacyLevel::Public | PrivacyLevel::Community => true,
                    PrivacyLevel::Mutual => mutual,
                    PrivacyLevel::Hidden => false,
                });
            }
        }

        links.sort_by_key(|l| l.platform_type.display_rank());
        Ok(links)
    }
}
