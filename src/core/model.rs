//! Domain model for profile links
//!
//! A [`SocialLink`] attaches one external identity (a photo-sharing account,
//! an activity tracker, a blog, ...) to a profile. Each link carries its own
//! [`PrivacyLevel`], so visibility is decided per link rather than per
//! profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The platform category a link belongs to.
///
/// Each variant maps to a domain policy in the sanitizer:
/// - `Instagram` and `Strava` are strict platforms with a single canonical
///   domain each
/// - `Blog` accepts a configurable allowlist of known hosting providers
/// - `Portfolio` accepts any well-formed http(s) URL
/// - `CustomOne` / `CustomTwo` are user-defined slots with no domain
///   restriction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformType {
    Instagram,
    Strava,
    Blog,
    Portfolio,
    CustomOne,
    CustomTwo,
}

impl PlatformType {
    /// All platform types, in display order.
    pub const ALL: [PlatformType; 6] = [
        PlatformType::Instagram,
        PlatformType::Strava,
        PlatformType::Blog,
        PlatformType::Portfolio,
        PlatformType::CustomOne,
        PlatformType::CustomTwo,
    ];

    /// Fixed total-order ranking used to sort every listing.
    ///
    /// The same owner's links render in the same sequence regardless of
    /// viewer or insertion order.
    pub fn display_rank(&self) -> u8 {
        match self {
            PlatformType::Instagram => 0,
            PlatformType::Strava => 1,
            PlatformType::Blog => 2,
            PlatformType::Portfolio => 3,
            PlatformType::CustomOne => 4,
            PlatformType::CustomTwo => 5,
        }
    }

    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Instagram => "instagram",
            PlatformType::Strava => "strava",
            PlatformType::Blog => "blog",
            PlatformType::Portfolio => "portfolio",
            PlatformType::CustomOne => "custom_one",
            PlatformType::CustomTwo => "custom_two",
        }
    }
}

impl std::str::FromStr for PlatformType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlatformType::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown platform type '{}'", s))
    }
}

/// Visibility scope attached to a single link.
///
/// There is no ordering or transition restriction between levels: any value
/// may change to any other at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivacyLevel {
    /// Visible to everyone, including anonymous viewers
    Public,
    /// Visible to any authenticated viewer
    Community,
    /// Visible only to viewers with a mutual follow relationship
    Mutual,
    /// Visible only to the owner
    Hidden,
}

impl PrivacyLevel {
    /// Stable string form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyLevel::Public => "public",
            PrivacyLevel::Community => "community",
            PrivacyLevel::Mutual => "mutual",
            PrivacyLevel::Hidden => "hidden",
        }
    }
}

impl std::str::FromStr for PrivacyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(PrivacyLevel::Public),
            "community" => Ok(PrivacyLevel::Community),
            "mutual" => Ok(PrivacyLevel::Mutual),
            "hidden" => Ok(PrivacyLevel::Hidden),
            other => Err(format!("unknown privacy level '{}'", other)),
        }
    }
}

/// One owner's link to one external platform category.
///
/// Mutated only by its owner; cascade-deleted with the owning account.
/// The `(owner_id, platform_type)` pair is unique per owner, enforced at
/// the storage level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    /// Unique identifier for this link
    pub id: Uuid,

    /// The account that owns and may mutate this record
    pub owner_id: Uuid,

    /// The platform category this link belongs to
    pub platform_type: PlatformType,

    /// Sanitized URL. Always the sanitizer's output, never raw user input.
    pub url: String,

    /// Visibility scope for this link
    pub privacy_level: PrivacyLevel,

    /// Display label, mainly for the custom slots
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// When this link was created
    pub created_at: DateTime<Utc>,

    /// When this link was last mutated
    pub updated_at: DateTime<Utc>,
}

impl SocialLink {
    /// Create a new link with both timestamps set to now.
    ///
    /// `url` must already have passed through the sanitizer; the registry is
    /// the only place this constructor is called on user input.
    pub fn new(
        owner_id: Uuid,
        platform_type: PlatformType,
        url: impl Into<String>,
        privacy_level: PrivacyLevel,
        label: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            platform_type,
            url: url.into(),
            privacy_level,
            label,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`. Called on every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
