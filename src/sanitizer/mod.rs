//! URL validation and sanitization pipeline
//!
//! Transforms a candidate URL plus a platform category into either a safe,
//! normalized URL or a typed rejection. This runs before every persist, on
//! create and on every update, so it is deterministic and free of side
//! effects: same input, same output, no I/O.
//!
//! The per-platform domain rules are data, not branches: a policy table maps
//! each [`PlatformType`] to a [`DomainPolicy`] variant, and the table is
//! injected at construction rather than read from global configuration.

use crate::core::error::SanitizeError;
use crate::core::model::PlatformType;
use std::collections::HashMap;
use url::Url;

/// Maximum accepted URL length, checked before any parsing.
pub const MAX_URL_LENGTH: usize = 2000;

/// Domain rule for one platform category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPolicy {
    /// Host must exactly equal one of at most two canonical domains.
    ///
    /// Exact equality, no subdomain matching: `evil.strava.com.attacker.tld`
    /// and `sub.strava.com` both fail.
    Strict(Vec<String>),

    /// Host must exactly equal one entry of a configurable allowlist of
    /// known providers.
    Flexible(Vec<String>),

    /// No domain restriction; format validity is the only gate.
    Open,
}

/// Pure URL sanitizer driven by an injected policy table.
#[derive(Debug, Clone)]
pub struct UrlSanitizer {
    policies: HashMap<PlatformType, DomainPolicy>,
}

impl UrlSanitizer {
    /// Create a sanitizer from an explicit policy table.
    ///
    /// Platforms missing from the table are treated as [`DomainPolicy::Open`].
    pub fn new(policies: HashMap<PlatformType, DomainPolicy>) -> Self {
        Self { policies }
    }

    /// Build a sanitizer from a policy configuration.
    pub fn from_config(config: crate::config::PolicyConfig) -> Self {
        Self::new(config.into_policies())
    }

    /// Validate and normalize `raw_url` for `platform`.
    ///
    /// Returns the normalized URL string to store, or the first rejection
    /// encountered:
    /// 1. length bound (cheap check before parsing)
    /// 2. URI structure and http/https scheme
    /// 3. per-platform domain policy
    ///
    /// For strict platforms the stored URL additionally loses its query
    /// string and fragment, so tracking or injection payloads cannot ride
    /// along in them.
    pub fn sanitize(&self, raw_url: &str, platform: PlatformType) -> Result<String, SanitizeError> {
        if raw_url.len() > MAX_URL_LENGTH {
            return Err(SanitizeError::InvalidFormat {
                message: format!("URL exceeds {} characters", MAX_URL_LENGTH),
            });
        }

        let mut parsed = Url::parse(raw_url).map_err(|e| SanitizeError::InvalidFormat {
            message: e.to_string(),
        })?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(SanitizeError::DisallowedScheme {
                scheme: scheme.to_string(),
            });
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| SanitizeError::InvalidFormat {
                message: "URL has no host".to_string(),
            })?;

        // Lower-cased, www-stripped form used for comparison only; the
        // stored URL keeps the host as the url crate normalized it.
        let compare_host = host.to_ascii_lowercase();
        let compare_host = compare_host
            .strip_prefix("www.")
            .unwrap_or(&compare_host)
            .to_string();

        let policy = self.policies.get(&platform).unwrap_or(&DomainPolicy::Open);

        match policy {
            DomainPolicy::Strict(domains) => {
                if !domains.iter().any(|d| d == &compare_host) {
                    return Err(SanitizeError::DomainNotAllowed {
                        host: host.to_string(),
                        platform,
                    });
                }
                parsed.set_query(None);
                parsed.set_fragment(None);
            }
            DomainPolicy::Flexible(allowlist) => {
                if !allowlist.iter().any(|d| d == &compare_host) {
                    return Err(SanitizeError::DomainNotAllowed {
                        host: host.to_string(),
                        platform,
                    });
                }
            }
            DomainPolicy::Open => {}
        }

        // Percent-encoding during parsing can grow the URL, so the bound is
        // re-checked on what would actually be stored.
        let normalized = parsed.to_string();
        if normalized.len() > MAX_URL_LENGTH {
            return Err(SanitizeError::InvalidFormat {
                message: format!("normalized URL exceeds {} characters", MAX_URL_LENGTH),
            });
        }

        Ok(normalized)
    }
}
