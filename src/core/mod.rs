//! Core module containing the domain model, error taxonomy, and the two
//! seams this crate depends on: persistence and the follow graph

pub mod error;
pub mod model;
pub mod relationship;
pub mod store;

pub use error::{
    ConfigError, ErrorResponse, LinksError, LinksResult, RegistryError, RequestError,
    SanitizeError, StoreError,
};
pub use model::{PlatformType, PrivacyLevel, SocialLink};
pub use relationship::{NoFollowGraph, RelationshipOracle};
pub use store::LinkStore;
