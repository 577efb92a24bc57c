//! Authorized writes to link records
//!
//! [`LinkRegistry`] mediates every mutation of [`SocialLink`] records:
//! ownership checks, the six-link cap, the one-link-per-platform rule, and
//! the sanitize-before-persist discipline. No mutation has a side effect
//! unless every check passes; writes are all-or-nothing per link.
//!
//! Reads for viewers live in the visibility engine, not here; the only read
//! the registry offers is the owner's own editing view.

use crate::core::error::{LinksError, LinksResult, RegistryError, StoreError};
use crate::core::model::{PlatformType, PrivacyLevel, SocialLink};
use crate::core::store::LinkStore;
use crate::sanitizer::UrlSanitizer;
use std::sync::Arc;
use uuid::Uuid;

/// Maximum number of links one owner may hold.
pub const MAX_LINKS_PER_OWNER: usize = 6;

/// Maximum display-label length in characters.
pub const MAX_LABEL_LENGTH: usize = 80;

fn check_label(label: &Option<String>) -> LinksResult<()> {
    match label {
        Some(l) if l.chars().count() > MAX_LABEL_LENGTH => Err(RegistryError::LabelTooLong {
            max: MAX_LABEL_LENGTH,
        }
        .into()),
        _ => Ok(()),
    }
}

/// Fields a caller may change on an existing link.
///
/// Absent fields are left untouched. The stored URL is re-sanitized on every
/// update even when `url` is absent, so a record can never outlive a
/// tightened domain policy unnoticed.
///
/// `label` is doubly optional: the outer level distinguishes "leave as is"
/// from "set", the inner level allows `Some(None)` to clear a label.
#[derive(Debug, Clone, Default)]
pub struct UpdateFields {
    pub url: Option<String>,
    pub privacy_level: Option<PrivacyLevel>,
    pub label: Option<Option<String>>,
}

/// Write-side service for link records.
#[derive(Clone)]
pub struct LinkRegistry {
    store: Arc<dyn LinkStore>,
    sanitizer: UrlSanitizer,
}

impl LinkRegistry {
    pub fn new(store: Arc<dyn LinkStore>, sanitizer: UrlSanitizer) -> Self {
        Self { store, sanitizer }
    }

    /// Create a link for `owner_id`.
    ///
    /// Fails with `Unauthorized` when the caller is not the owner,
    /// `LimitExceeded` at the six-link cap, `DuplicatePlatform` when a link
    /// for this platform already exists, and bubbles sanitizer rejections.
    ///
    /// The duplicate check runs twice: a pre-read for a precise error
    /// message, and the store's atomic uniqueness constraint on insert,
    /// which is what actually resolves two racing creates. The loser gets
    /// `DuplicatePlatform` instead of silently overwriting.
    pub async fn create(
        &self,
        caller_id: Uuid,
        owner_id: Uuid,
        platform_type: PlatformType,
        url: &str,
        privacy_level: PrivacyLevel,
        label: Option<String>,
    ) -> LinksResult<SocialLink> {
        if caller_id != owner_id {
            return Err(RegistryError::Unauthorized { caller_id }.into());
        }
        check_label(&label)?;

        let count = self.store.count_by_owner(&owner_id).await?;
        if count >= MAX_LINKS_PER_OWNER {
            return Err(RegistryError::LimitExceeded {
                limit: MAX_LINKS_PER_OWNER,
            }
            .into());
        }

        let existing = self.store.list_by_owner(&owner_id).await?;
        if existing.iter().any(|l| l.platform_type == platform_type) {
            return Err(RegistryError::DuplicatePlatform {
                platform: platform_type,
            }
            .into());
        }

        let sanitized = self.sanitizer.sanitize(url, platform_type)?;
        let link = SocialLink::new(owner_id, platform_type, sanitized, privacy_level, label);

        let created = match self.store.insert(link).await {
            Ok(created) => created,
            Err(StoreError::UniqueViolation { platform, .. }) => {
                return Err(RegistryError::DuplicatePlatform { platform }.into());
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            link_id = %created.id,
            owner_id = %owner_id,
            platform = created.platform_type.as_str(),
            "link created"
        );

        Ok(created)
    }

    /// Update an existing link owned by the caller.
    pub async fn update(
        &self,
        link_id: Uuid,
        caller_id: Uuid,
        fields: UpdateFields,
    ) -> LinksResult<SocialLink> {
        let mut link = self.get_owned(&link_id, &caller_id).await?;

        // Re-validate the URL even when the caller only touched privacy:
        // the stored value must satisfy the current domain policy.
        let candidate = fields.url.as_deref().unwrap_or(&link.url);
        link.url = self.sanitizer.sanitize(candidate, link.platform_type)?;

        if let Some(privacy_level) = fields.privacy_level {
            link.privacy_level = privacy_level;
        }
        if let Some(label) = fields.label {
            check_label(&label)?;
            link.label = label;
        }
        link.touch();

        let updated = self.store.update(link).await?;

        tracing::info!(link_id = %updated.id, owner_id = %updated.owner_id, "link updated");

        Ok(updated)
    }

    /// Delete a link owned by the caller.
    pub async fn delete(&self, link_id: Uuid, caller_id: Uuid) -> LinksResult<()> {
        let link = self.get_owned(&link_id, &caller_id).await?;
        self.store.delete(&link.id).await?;

        tracing::info!(link_id = %link_id, owner_id = %caller_id, "link deleted");

        Ok(())
    }

    /// Remove every link for an owner. Cascade hook for account deletion.
    pub async fn delete_all_for_owner(&self, owner_id: Uuid) -> LinksResult<u64> {
        let removed = self.store.delete_by_owner(&owner_id).await?;
        if removed > 0 {
            tracing::info!(owner_id = %owner_id, removed, "owner links cascade-deleted");
        }
        Ok(removed)
    }

    /// Every link for `owner_id` regardless of privacy level, in display
    /// order. The owner's own editing view; never expose this to viewers.
    pub async fn list_all(&self, owner_id: Uuid) -> LinksResult<Vec<SocialLink>> {
        let mut links = self.store.list_by_owner(&owner_id).await?;
        links.sort_by_key(|l| l.platform_type.display_rank());
        Ok(links)
    }

    async fn get_owned(&self, link_id: &Uuid, caller_id: &Uuid) -> LinksResult<SocialLink> {
        let link = self
            .store
            .get(link_id)
            .await?
            .ok_or(LinksError::Registry(RegistryError::NotFound {
                link_id: *link_id,
            }))?;

        if &link.owner_id != caller_id {
            return Err(RegistryError::Unauthorized {
                caller_id: *caller_id,
            }
            .into());
        }

        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use crate::storage::InMemoryLinkStore;

    fn registry() -> LinkRegistry {
        LinkRegistry::new(
            Arc::new(InMemoryLinkStore::new()),
            UrlSanitizer::new(PolicyConfig::default_config().into_policies()),
        )
    }

    #[tokio::test]
    async fn test_create_rejects_non_owner_caller() {
        let registry = registry();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();

        let result = registry
            .create(
                intruder,
                owner,
                PlatformType::Portfolio,
                "https://me.example/",
                PrivacyLevel::Public,
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::Unauthorized { .. }))
        ));
    }

    #[tokio::test]
    async fn test_create_persists_sanitized_url() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::Instagram,
                "https://Instagram.com/someone?igshid=tracker",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        assert_eq!(link.url, "https://instagram.com/someone");
    }

    #[tokio::test]
    async fn test_create_rejects_bad_url_without_persisting() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let result = registry
            .create(
                owner,
                owner,
                PlatformType::Instagram,
                "javascript:alert(1)",
                PrivacyLevel::Public,
                None,
            )
            .await;

        assert!(matches!(result, Err(LinksError::Sanitize(_))));
        assert!(registry.list_all(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_platform_rejected() {
        let registry = registry();
        let owner = Uuid::new_v4();

        registry
            .create(
                owner,
                owner,
                PlatformType::Strava,
                "https://strava.com/athletes/1",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let result = registry
            .create(
                owner,
                owner,
                PlatformType::Strava,
                "https://strava.com/athletes/2",
                PrivacyLevel::Public,
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::DuplicatePlatform {
                platform: PlatformType::Strava
            }))
        ));
    }

    #[tokio::test]
    async fn test_over_length_label_rejected() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let result = registry
            .create(
                owner,
                owner,
                PlatformType::CustomOne,
                "https://me.example/",
                PrivacyLevel::Public,
                Some("x".repeat(MAX_LABEL_LENGTH + 1)),
            )
            .await;

        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::LabelTooLong { max: 80 }))
        ));
        assert!(registry.list_all(owner).await.unwrap().is_empty());
    }

    /// Store whose owner-scoped reads always come back empty, so the
    /// registry's pre-read duplicate check never fires and the insert
    /// constraint is what rejects the second create. Models the interleaving
    /// where both creates pass their pre-reads before either insert lands.
    struct StaleReadStore {
        inner: InMemoryLinkStore,
    }

    #[async_trait::async_trait]
    impl LinkStore for StaleReadStore {
        async fn insert(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
            self.inner.insert(link).await
        }

        async fn get(&self, id: &Uuid) -> Result<Option<SocialLink>, StoreError> {
            self.inner.get(id).await
        }

        async fn list_by_owner(&self, _: &Uuid) -> Result<Vec<SocialLink>, StoreError> {
            Ok(Vec::new())
        }

        async fn count_by_owner(&self, _: &Uuid) -> Result<usize, StoreError> {
            Ok(0)
        }

        async fn update(&self, link: SocialLink) -> Result<SocialLink, StoreError> {
            self.inner.update(link).await
        }

        async fn delete(&self, id: &Uuid) -> Result<(), StoreError> {
            self.inner.delete(id).await
        }

        async fn delete_by_owner(&self, owner_id: &Uuid) -> Result<u64, StoreError> {
            self.inner.delete_by_owner(owner_id).await
        }
    }

    #[tokio::test]
    async fn test_insert_constraint_surfaces_as_duplicate_platform() {
        let registry = LinkRegistry::new(
            Arc::new(StaleReadStore {
                inner: InMemoryLinkStore::new(),
            }),
            UrlSanitizer::new(PolicyConfig::default_config().into_policies()),
        );
        let owner = Uuid::new_v4();

        registry
            .create(
                owner,
                owner,
                PlatformType::Blog,
                "https://medium.com/@me",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        // the pre-read sees nothing, so this rejection can only come from
        // the store's uniqueness constraint on insert
        let result = registry
            .create(
                owner,
                owner,
                PlatformType::Blog,
                "https://medium.com/@me-too",
                PrivacyLevel::Public,
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::DuplicatePlatform {
                platform: PlatformType::Blog
            }))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_creates_single_winner() {
        let registry = Arc::new(registry());
        let owner = Uuid::new_v4();

        let spawn_create = |registry: Arc<LinkRegistry>| {
            tokio::spawn(async move {
                registry
                    .create(
                        owner,
                        owner,
                        PlatformType::Strava,
                        "https://strava.com/athletes/1",
                        PrivacyLevel::Public,
                        None,
                    )
                    .await
            })
        };

        let a = spawn_create(registry.clone());
        let b = spawn_create(registry.clone());
        let (ra, rb) = (a.await.unwrap(), b.await.unwrap());

        assert_eq!(
            ra.is_ok() as u8 + rb.is_ok() as u8,
            1,
            "exactly one of two racing creates must win"
        );
        let loser = if ra.is_err() { ra } else { rb };
        assert!(matches!(
            loser,
            Err(LinksError::Registry(RegistryError::DuplicatePlatform {
                platform: PlatformType::Strava
            }))
        ));
        assert_eq!(registry.list_all(owner).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_requires_ownership() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::Portfolio,
                "https://me.example/",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let result = registry
            .update(
                link.id,
                Uuid::new_v4(),
                UpdateFields {
                    privacy_level: Some(PrivacyLevel::Hidden),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::Unauthorized { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_unknown_link_is_not_found() {
        let registry = registry();
        let result = registry
            .update(Uuid::new_v4(), Uuid::new_v4(), UpdateFields::default())
            .await;
        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::NotFound { .. }))
        ));
    }

    #[tokio::test]
    async fn test_update_resanitizes_new_url() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::Strava,
                "https://strava.com/athletes/1",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let result = registry
            .update(
                link.id,
                owner,
                UpdateFields {
                    url: Some("https://strava.evil.tld/athletes/1".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(LinksError::Sanitize(_))));

        // failed update left the record untouched
        let unchanged = &registry.list_all(owner).await.unwrap()[0];
        assert_eq!(unchanged.url, "https://strava.com/athletes/1");
    }

    #[tokio::test]
    async fn test_update_privacy_only_keeps_url() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::Blog,
                "https://medium.com/@me",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let updated = registry
            .update(
                link.id,
                owner,
                UpdateFields {
                    privacy_level: Some(PrivacyLevel::Mutual),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.url, link.url);
        assert_eq!(updated.privacy_level, PrivacyLevel::Mutual);
        assert!(updated.updated_at >= link.updated_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_label() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::CustomOne,
                "https://gamertag.example/me",
                PrivacyLevel::Public,
                Some("Gaming".to_string()),
            )
            .await
            .unwrap();

        // absent label leaves the stored one alone
        let kept = registry
            .update(link.id, owner, UpdateFields::default())
            .await
            .unwrap();
        assert_eq!(kept.label.as_deref(), Some("Gaming"));

        // explicit inner None clears it
        let cleared = registry
            .update(
                link.id,
                owner,
                UpdateFields {
                    label: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.label.is_none());
    }

    #[tokio::test]
    async fn test_update_with_no_fields_is_idempotent() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::Portfolio,
                "https://me.example/cv",
                PrivacyLevel::Community,
                None,
            )
            .await
            .unwrap();

        let updated = registry
            .update(link.id, owner, UpdateFields::default())
            .await
            .unwrap();

        assert_eq!(updated.url, link.url);
        assert_eq!(updated.privacy_level, link.privacy_level);
    }

    #[tokio::test]
    async fn test_delete_requires_ownership() {
        let registry = registry();
        let owner = Uuid::new_v4();

        let link = registry
            .create(
                owner,
                owner,
                PlatformType::Portfolio,
                "https://me.example/",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let result = registry.delete(link.id, Uuid::new_v4()).await;
        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::Unauthorized { .. }))
        ));

        registry.delete(link.id, owner).await.unwrap();
        assert!(registry.list_all(owner).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_limit_exceeded_on_seventh_link() {
        let registry = registry();
        let owner = Uuid::new_v4();

        for platform in PlatformType::ALL {
            registry
                .create(
                    owner,
                    owner,
                    platform,
                    match platform {
                        PlatformType::Instagram => "https://instagram.com/me",
                        PlatformType::Strava => "https://strava.com/athletes/1",
                        PlatformType::Blog => "https://medium.com/@me",
                        _ => "https://me.example/",
                    },
                    PrivacyLevel::Public,
                    None,
                )
                .await
                .unwrap();
        }

        // all six platform slots used; the cap and the platform uniqueness
        // now coincide, and the cap is checked first
        let result = registry
            .create(
                owner,
                owner,
                PlatformType::Portfolio,
                "https://me.example/other",
                PrivacyLevel::Public,
                None,
            )
            .await;

        assert!(matches!(
            result,
            Err(LinksError::Registry(RegistryError::LimitExceeded { limit: 6 }))
        ));
    }

    #[tokio::test]
    async fn test_list_all_is_display_ordered_and_includes_hidden() {
        let registry = registry();
        let owner = Uuid::new_v4();

        registry
            .create(
                owner,
                owner,
                PlatformType::Portfolio,
                "https://me.example/",
                PrivacyLevel::Hidden,
                None,
            )
            .await
            .unwrap();
        registry
            .create(
                owner,
                owner,
                PlatformType::Instagram,
                "https://instagram.com/me",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let links = registry.list_all(owner).await.unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].platform_type, PlatformType::Instagram);
        assert_eq!(links[1].platform_type, PlatformType::Portfolio);
    }

    #[tokio::test]
    async fn test_delete_all_for_owner() {
        let registry = registry();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        registry
            .create(
                owner,
                owner,
                PlatformType::Portfolio,
                "https://me.example/",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();
        registry
            .create(
                other,
                other,
                PlatformType::Portfolio,
                "https://other.example/",
                PrivacyLevel::Public,
                None,
            )
            .await
            .unwrap();

        let removed = registry.delete_all_for_owner(owner).await.unwrap();
        assert_eq!(removed, 1);
        assert!(registry.list_all(owner).await.unwrap().is_empty());
        assert_eq!(registry.list_all(other).await.unwrap().len(), 1);
    }
}
