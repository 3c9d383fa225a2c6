//! Typed endpoint groups over the HTTP gateway.

pub mod auth;
pub mod branches;
pub mod menus;
pub mod regions;
pub mod users;

pub use auth::AuthApi;
pub use branches::BranchesApi;
pub use menus::MenusApi;
pub use regions::RegionsApi;
pub use users::UsersApi;
