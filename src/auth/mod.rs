//! Authentication and authorization for the expense tracker server.
//!
//! Covers credential registration, password hashing, bearer token
//! issuance/verification, and the request guard that scopes every
//! protected operation to the authenticated caller.

pub mod guard;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use guard::AuthenticatedUser;
pub use service::{AuthService, LoginOutcome};
pub use token::{Claims, TokenIssuer};
