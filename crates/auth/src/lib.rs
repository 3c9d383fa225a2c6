//! `portico-auth` — pure authentication/authorization logic (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage: claim models,
//! unverified token inspection, and role/permission/region access evaluation.
//! The server remains the authority on every decision made here.

pub mod claims;
pub mod permissions;
pub mod regions;
pub mod roles;
pub mod token;
pub mod user;

pub use claims::TokenClaims;
pub use regions::{BranchGrant, RegionGrant};
pub use user::{Role, UserProfile};
