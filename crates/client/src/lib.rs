//! Portico API client: session lifecycle, transparent re-authentication,
//! and typed wrappers over the dashboard's REST endpoints.
//!
//! The crate is organized around one [`PorticoClient`]:
//!
//! - [`session::Session`] drives login/refresh/logout and exposes the
//!   observable [`state::SessionState`] plus a broadcast event stream.
//! - [`gateway::HttpGateway`] sends authenticated requests and retries once
//!   through the single-flight refresher when the server answers 401.
//! - [`api`] holds the per-resource endpoint groups (auth accounts, users,
//!   regions, branches, menus).
//!
//! Token *contents* are never trusted here: claims decoded client-side (via
//! `portico-auth`) only steer UX, and every permission is re-checked by the
//! server.

pub mod api;
pub mod backend;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod refresh;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use client::PorticoClient;
pub use config::ClientConfig;
pub use envelope::{ApiResponse, Paginated, PaginationMeta, PaginationParams, SortOrder};
pub use error::{ApiError, ApiErrorKind};
pub use session::Session;
pub use state::{SessionEvent, SessionState};
pub use store::{CredentialStore, Durability};
