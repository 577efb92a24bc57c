//! Storage backends for link records and the follow graph

pub mod in_memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::{InMemoryFollowGraph, InMemoryLinkStore};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresFollowGraph, PostgresLinkStore};
