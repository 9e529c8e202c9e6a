use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account row. `password_hash` is an opaque PHC string and must never
/// leave the server; responses use [`PublicUser`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub password_hash: String,
    pub user_email: String,
    pub contact_num_1: String,
    pub contact_num_2: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            user_email: self.user_email.clone(),
            contact_num_1: self.contact_num_1.clone(),
            contact_num_2: self.contact_num_2.clone(),
        }
    }
}

/// Account fields safe to return to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicUser {
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub contact_num_1: String,
    pub contact_num_2: Option<String>,
}

/// Registration payload. The plaintext password only exists in this
/// struct for the duration of the request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub user_name: String,
    pub password: String,
    pub user_email: String,
    pub contact_num_1: String,
    pub contact_num_2: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentMethod {
    pub payment_id: i64,
    pub payment_type: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub expense_id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub payment_id: i64,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Budget {
    pub budget_id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount_limit: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Owner ids are deliberately absent from the create/update payloads
// below: ownership is always taken from the authenticated caller.

#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseCreate {
    pub category_id: i64,
    pub payment_id: i64,
    pub amount: f64,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseUpdate {
    pub category_id: Option<i64>,
    pub payment_id: Option<i64>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BudgetCreate {
    pub category_id: i64,
    pub amount_limit: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetUpdate {
    pub category_id: Option<i64>,
    pub amount_limit: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Per-category spending aggregate for the report endpoints.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategorySpending {
    pub category_name: String,
    pub total: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MonthlySpending {
    pub month: String,
    pub total: f64,
}
