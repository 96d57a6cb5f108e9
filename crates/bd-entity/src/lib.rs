//! # bd-entity
//!
//! Entity records and task lifecycle types for the BackDesk core.
//!
//! Four entity kinds flow through the system: [`User`], [`Company`],
//! [`Area`], and [`Task`]. A Task references one record of each of the
//! other three kinds; those references are what the mutation layer
//! protects. The [`Entity`] trait gives the store and coordinator a
//! uniform id/kind surface over all four record types.
//!
//! ## Key components
//!
//! - [`EntityKind`] — which of the four lists a record belongs to
//! - [`Role`] / [`Principal`] — the acting identity and its privilege level
//! - [`TaskStatus`] — the forward-only task lifecycle (in_progress → completed)
//! - [`TaskDraft`] — the raw form payload before validation/normalization

pub mod area;
pub mod company;
pub mod kind;
pub mod principal;
pub mod task;
pub mod user;

pub use area::Area;
pub use company::{Company, CompanyType};
pub use kind::{Entity, EntityKind};
pub use principal::{Principal, Role};
pub use task::{Task, TaskDraft, TaskStatus};
pub use user::User;
