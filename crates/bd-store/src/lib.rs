//! # bd-store
//!
//! Client-side entity cache and the persistence collaborator boundary
//! for the BackDesk core.
//!
//! The [`EntityStore`] holds the authoritative local list for each of the
//! four entity kinds. Lists are replaced wholesale by [`EntityCache::load`]
//! and patched record-by-record by the mutation coordinator's reconcile
//! step — nothing else writes to them.
//!
//! ## Key components
//!
//! - [`EntityCache`] — one kind's list, with load/patch/delete semantics
//! - [`EntityStore`] — the four caches under one roof
//! - [`EntityService`] — the async persistence collaborator contract
//! - [`InMemoryService`] — reference backend used by tests and demos

pub mod cache;
pub mod error;
pub mod service;
pub mod store;

pub use cache::EntityCache;
pub use error::{ServiceError, StoreError};
pub use service::{EntityService, InMemoryService};
pub use store::EntityStore;
