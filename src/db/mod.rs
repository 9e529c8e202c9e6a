//! Database module for the expense tracker server.
//!
//! Holds the row/DTO models, the `UserStore` boundary the
//! authenticator talks to, and the Postgres data access layer.

pub mod models;
pub mod operations;
pub mod store;

pub use models::{Budget, Category, Expense, PaymentMethod, PublicUser, User};
pub use operations::DbOperations;
pub use store::UserStore;
