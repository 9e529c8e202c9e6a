use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::db::models::{
    Budget, BudgetCreate, BudgetUpdate, Category, CategorySpending, Expense, ExpenseCreate,
    ExpenseUpdate, MonthlySpending, NewUser, PaymentMethod, User,
};
use crate::db::store::UserStore;
use crate::error::{AppError, DatabaseError};

pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub fn pool(&self) -> &PgPool {
        self.pool.as_ref()
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Postgres>, AppError> {
        Ok(self.pool.as_ref().begin().await?)
    }

    /// Deletes an account together with everything it owns. The three
    /// deletes run in one transaction so a crash cannot leave orphaned
    /// expenses or budgets behind.
    pub async fn delete_user_cascade(&self, user_id: i64) -> Result<(), AppError> {
        let mut transaction = self.begin_transaction().await?;

        let result: Result<u64, sqlx::Error> = async {
            sqlx::query("DELETE FROM expenses WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *transaction)
                .await?;

            sqlx::query("DELETE FROM budgets WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *transaction)
                .await?;

            let deleted = sqlx::query("DELETE FROM users WHERE user_id = $1")
                .bind(user_id)
                .execute(&mut *transaction)
                .await?;

            Ok(deleted.rows_affected())
        }
        .await;

        match result {
            Ok(0) => {
                transaction.rollback().await?;
                Err(AppError::DatabaseError(DatabaseError::NotFound))
            }
            Ok(_) => {
                transaction.commit().await?;
                Ok(())
            }
            Err(e) => {
                transaction.rollback().await?;
                Err(e.into())
            }
        }
    }

    // ---------- Expenses (always scoped by owner) ----------

    pub async fn create_expense(
        &self,
        user_id: i64,
        expense: &ExpenseCreate,
    ) -> Result<Expense, AppError> {
        let created = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (user_id, category_id, payment_id, date, amount, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING expense_id, user_id, category_id, payment_id, date, amount, description
            "#,
        )
        .bind(user_id)
        .bind(expense.category_id)
        .bind(expense.payment_id)
        .bind(expense.date.unwrap_or_else(Utc::now))
        .bind(expense.amount)
        .bind(expense.description.as_deref())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(created)
    }

    pub async fn list_expenses(&self, user_id: i64) -> Result<Vec<Expense>, AppError> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT expense_id, user_id, category_id, payment_id, date, amount, description
            FROM expenses
            WHERE user_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(expenses)
    }

    /// The owner id is part of the WHERE clause, so a row owned by
    /// another account is indistinguishable from a missing row.
    pub async fn update_expense(
        &self,
        user_id: i64,
        expense_id: i64,
        update: &ExpenseUpdate,
    ) -> Result<Expense, AppError> {
        let updated = sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET category_id = COALESCE($3, category_id),
                payment_id = COALESCE($4, payment_id),
                amount = COALESCE($5, amount),
                date = COALESCE($6, date),
                description = COALESCE($7, description)
            WHERE expense_id = $1 AND user_id = $2
            RETURNING expense_id, user_id, category_id, payment_id, date, amount, description
            "#,
        )
        .bind(expense_id)
        .bind(user_id)
        .bind(update.category_id)
        .bind(update.payment_id)
        .bind(update.amount)
        .bind(update.date)
        .bind(update.description.as_deref())
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

        Ok(updated)
    }

    pub async fn delete_expense(&self, user_id: i64, expense_id: i64) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM expenses WHERE expense_id = $1 AND user_id = $2")
            .bind(expense_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::DatabaseError(DatabaseError::NotFound));
        }
        Ok(())
    }

    // ---------- Budgets ----------

    pub async fn create_budget(
        &self,
        user_id: i64,
        budget: &BudgetCreate,
    ) -> Result<Budget, AppError> {
        let created = sqlx::query_as::<_, Budget>(
            r#"
            INSERT INTO budgets (user_id, category_id, amount_limit, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING budget_id, user_id, category_id, amount_limit, start_date, end_date
            "#,
        )
        .bind(user_id)
        .bind(budget.category_id)
        .bind(budget.amount_limit)
        .bind(budget.start_date)
        .bind(budget.end_date)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(created)
    }

    pub async fn list_budgets(&self, user_id: i64) -> Result<Vec<Budget>, AppError> {
        let budgets = sqlx::query_as::<_, Budget>(
            r#"
            SELECT budget_id, user_id, category_id, amount_limit, start_date, end_date
            FROM budgets
            WHERE user_id = $1
            ORDER BY start_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(budgets)
    }

    pub async fn update_budget(
        &self,
        user_id: i64,
        budget_id: i64,
        update: &BudgetUpdate,
    ) -> Result<Budget, AppError> {
        let updated = sqlx::query_as::<_, Budget>(
            r#"
            UPDATE budgets
            SET category_id = COALESCE($3, category_id),
                amount_limit = COALESCE($4, amount_limit),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date)
            WHERE budget_id = $1 AND user_id = $2
            RETURNING budget_id, user_id, category_id, amount_limit, start_date, end_date
            "#,
        )
        .bind(budget_id)
        .bind(user_id)
        .bind(update.category_id)
        .bind(update.amount_limit)
        .bind(update.start_date)
        .bind(update.end_date)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

        Ok(updated)
    }

    pub async fn delete_budget(&self, user_id: i64, budget_id: i64) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM budgets WHERE budget_id = $1 AND user_id = $2")
            .bind(budget_id)
            .bind(user_id)
            .execute(self.pool.as_ref())
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(AppError::DatabaseError(DatabaseError::NotFound));
        }
        Ok(())
    }

    // ---------- Reports ----------

    pub async fn spending_by_category(
        &self,
        user_id: i64,
    ) -> Result<Vec<CategorySpending>, AppError> {
        let rows = sqlx::query_as::<_, CategorySpending>(
            r#"
            SELECT c.category_name, COALESCE(SUM(e.amount), 0)::float8 AS total
            FROM categories c
            JOIN expenses e ON e.category_id = c.category_id
            WHERE e.user_id = $1
            GROUP BY c.category_name
            ORDER BY total DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    pub async fn total_spent(&self, user_id: i64) -> Result<f64, AppError> {
        let total: Option<f64> =
            sqlx::query_scalar("SELECT SUM(amount)::float8 FROM expenses WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(total.unwrap_or(0.0))
    }

    pub async fn monthly_spending(&self, user_id: i64) -> Result<Vec<MonthlySpending>, AppError> {
        let rows = sqlx::query_as::<_, MonthlySpending>(
            r#"
            SELECT to_char(date_trunc('month', date), 'YYYY-MM') AS month,
                   SUM(amount)::float8 AS total
            FROM expenses
            WHERE user_id = $1
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows)
    }

    // ---------- Reference data ----------

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT category_id, category_name FROM categories ORDER BY category_name",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(categories)
    }

    pub async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, AppError> {
        let methods = sqlx::query_as::<_, PaymentMethod>(
            "SELECT payment_id, payment_type FROM payment_methods ORDER BY payment_type",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(methods)
    }

    pub async fn seed_defaults(&self) -> Result<(), AppError> {
        const CATEGORIES: [&str; 7] = [
            "Food", "Transport", "Entertainment", "Bills", "Health", "Shopping", "Education",
        ];
        const PAYMENT_METHODS: [&str; 5] =
            ["Cash", "Credit Card", "Debit Card", "UPI", "Net Banking"];

        for name in CATEGORIES {
            sqlx::query(
                "INSERT INTO categories (category_name) VALUES ($1) ON CONFLICT (category_name) DO NOTHING",
            )
            .bind(name)
            .execute(self.pool.as_ref())
            .await?;
        }

        for method in PAYMENT_METHODS {
            sqlx::query(
                "INSERT INTO payment_methods (payment_type) VALUES ($1) ON CONFLICT (payment_type) DO NOTHING",
            )
            .bind(method)
            .execute(self.pool.as_ref())
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl UserStore for DbOperations {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, password_hash, user_email,
                   contact_num_1, contact_num_2, created_at
            FROM users
            WHERE lower(user_name) = lower($1)
            "#,
        )
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, password_hash, user_email,
                   contact_num_1, contact_num_2, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: &NewUser, password_hash: &str) -> Result<User, AppError> {
        // The unique index on lower(user_name) is the authority for
        // uniqueness; a concurrent duplicate surfaces here as a
        // constraint violation, not as two successful inserts.
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_name, password_hash, user_email, contact_num_1, contact_num_2, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, user_name, password_hash, user_email,
                      contact_num_1, contact_num_2, created_at
            "#,
        )
        .bind(&user.user_name)
        .bind(password_hash)
        .bind(&user.user_email)
        .bind(&user.contact_num_1)
        .bind(user.contact_num_2.as_deref())
        .bind(Utc::now())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(created)
    }
}
