//! `portico-core` — shared primitives for the admin dashboard client.
//!
//! This crate contains **pure domain** building blocks (no IO, no HTTP):
//! strongly-typed identifiers and the domain error model.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{BranchId, MenuItemId, RegionId, RoleId, UserId};
