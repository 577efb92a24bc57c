//! # Social Links
//!
//! Profile link management with URL sanitization and per-link privacy.
//!
//! ## Features
//!
//! - **Platform-Aware Sanitization**: URLs are parsed, normalized, and checked
//!   against per-platform domain policies before anything is stored
//! - **Per-Link Privacy**: Each link carries its own visibility level
//!   (public, community, mutual, hidden)
//! - **Mutual-Follow Tier**: Links at the mutual level are revealed only when
//!   the follow graph confirms a reciprocal follow
//! - **One Link Per Platform**: At most one link per (owner, platform) pair,
//!   enforced atomically at the storage level
//! - **Pluggable Storage**: In-memory backend by default, PostgreSQL behind
//!   the `postgres` feature
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use social_links::prelude::*;
//!
//! let store = Arc::new(InMemoryLinkStore::new());
//! let graph = Arc::new(InMemoryFollowGraph::new());
//!
//! let registry = Arc::new(LinkRegistry::new(
//!     store.clone(),
//!     UrlSanitizer::new(PolicyConfig::default_config().into_policies()),
//! ));
//! let engine = Arc::new(VisibilityEngine::new(store, graph));
//!
//! let app = build_router(AppState { registry, engine });
//! ```

pub mod config;
pub mod core;
pub mod registry;
pub mod sanitizer;
pub mod server;
pub mod storage;
pub mod visibility;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{
            ConfigError, ErrorResponse, LinksError, LinksResult, RegistryError, RequestError,
            SanitizeError, StoreError,
        },
        model::{PlatformType, PrivacyLevel, SocialLink},
        relationship::{NoFollowGraph, RelationshipOracle},
        store::LinkStore,
    };

    // === Sanitization ===
    pub use crate::sanitizer::{DomainPolicy, MAX_URL_LENGTH, UrlSanitizer};

    // === Registry & Visibility ===
    pub use crate::registry::{
        LinkRegistry, MAX_LABEL_LENGTH, MAX_LINKS_PER_OWNER, UpdateFields,
    };
    pub use crate::visibility::VisibilityEngine;

    // === Storage ===
    pub use crate::storage::{InMemoryFollowGraph, InMemoryLinkStore};
    #[cfg(feature = "postgres")]
    pub use crate::storage::{PostgresFollowGraph, PostgresLinkStore};

    // === Config ===
    pub use crate::config::{PolicyConfig, PolicyEntry, PolicyRule};

    // === Server ===
    pub use crate::server::{AppState, USER_ID_HEADER, build_router};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}
