//! Domain route handlers. Everything except the reference-data reads
//! takes an [`crate::auth::AuthenticatedUser`] and is scoped to the
//! caller resolved from the bearer token.

pub mod budgets;
pub mod expenses;
pub mod reference;
pub mod reports;
pub mod users;
