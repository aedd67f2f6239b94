//! Defines the expense store trait and implements it for SQLite.
//!
//! The store is the boundary to the persistence service: rows are validated
//! and normalized into [Expense] entities here so that malformed data never
//! reaches the aggregation layer, and failures are folded into the
//! [StoreUnavailable](Error::StoreUnavailable)/[WriteFailed](Error::WriteFailed)
//! taxonomy the session layer expects.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    category::{CategoryStore, default_categories, merge_with_defaults},
    date_key::{format_date_key, parse_date_key},
    expense::{Expense, ExpenseCollection, ExpenseId},
};

/// Stores the expenses recorded by each user.
///
/// Implementations assign each created expense a unique ID and keep rows
/// scoped to the user that created them.
pub trait ExpenseStore {
    /// Persist a new expense for `user_id` attributed to `date`, returning
    /// the persisted entity including its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [Error::WriteFailed] if the store rejects the write.
    fn create(
        &self,
        user_id: UserID,
        date: Date,
        amount: f64,
        category: &str,
        description: &str,
    ) -> Result<Expense, Error>;

    /// Every expense belonging to `user_id`, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns [Error::StoreUnavailable] if the store cannot be read.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error>;

    /// Delete the expense with `id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if no expense has `id` and
    /// [Error::WriteFailed] if the store rejects the delete.
    fn delete(&self, id: ExpenseId) -> Result<(), Error>;
}

/// Create the expense table and its user/date index.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES user(id),
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT
                )",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS expense_user_date ON expense (user_id, date)",
        (),
    )?;

    Ok(())
}

/// Creates, retrieves, and deletes expenses in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Map an `id, date, amount, category, description` row to an expense.
    ///
    /// Rows with an unparseable date or an amount that is not a finite,
    /// non-negative number are reported as errors so that callers can skip
    /// them instead of feeding garbage into the aggregation layer.
    fn map_row(row: &Row) -> Result<Result<Expense, Error>, rusqlite::Error> {
        let id = ExpenseId::new(row.get(0)?);
        let raw_date: String = row.get(1)?;
        let amount: f64 = row.get(2)?;
        let category: String = row.get(3)?;
        let description: Option<String> = row.get(4)?;

        let date = match parse_date_key(&raw_date) {
            Ok(date) => date,
            Err(error) => return Ok(Err(error)),
        };

        if !(amount.is_finite() && amount >= 0.0) {
            return Ok(Err(Error::InvalidAmount(amount)));
        }

        Ok(Ok(Expense {
            id,
            amount,
            category,
            description: description.unwrap_or_default(),
            date,
        }))
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn create(
        &self,
        user_id: UserID,
        date: Date,
        amount: f64,
        category: &str,
        description: &str,
    ) -> Result<Expense, Error> {
        let connection = self.connection.lock().unwrap();
        connection
            .execute(
                "INSERT INTO expense (user_id, date, amount, category, description)
                VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    user_id.as_i64(),
                    format_date_key(date),
                    amount,
                    category,
                    description,
                ),
            )
            .map_err(|error| Error::WriteFailed(error.to_string()))?;

        let id = ExpenseId::new(connection.last_insert_rowid());

        Ok(Expense {
            id,
            amount,
            category: category.to_owned(),
            description: description.to_owned(),
            date,
        })
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Expense>, Error> {
        let connection = self.connection.lock().unwrap();
        let mut statement = connection
            .prepare(
                "SELECT id, date, amount, category, description FROM expense
                WHERE user_id = :user_id ORDER BY date",
            )
            .map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        let rows = statement
            .query_map(&[(":user_id", &user_id.as_i64())], Self::map_row)
            .map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        let mut expenses = Vec::new();
        for row in rows {
            match row.map_err(|error| Error::StoreUnavailable(error.to_string()))? {
                Ok(expense) => expenses.push(expense),
                Err(error) => {
                    tracing::warn!("Skipping a malformed expense row: {error}");
                }
            }
        }

        Ok(expenses)
    }

    fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        let rows_affected = self
            .connection
            .lock()
            .unwrap()
            .execute("DELETE FROM expense WHERE id = :id", &[(":id", &id.as_i64())])
            .map_err(|error| Error::WriteFailed(error.to_string()))?;

        if rows_affected == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

/// Fetch everything the session needs for `user_id`: the expense collection
/// grouped by date key, and the default categories merged with the user's
/// custom ones.
///
/// Read failures degrade to an empty collection and the default category
/// set rather than propagating to the caller. The failure is logged.
pub fn fetch_all<E, C>(
    expense_store: &E,
    category_store: &C,
    user_id: UserID,
) -> (ExpenseCollection, Vec<String>)
where
    E: ExpenseStore,
    C: CategoryStore,
{
    let collection = match expense_store.get_by_user(user_id) {
        Ok(expenses) => ExpenseCollection::from_expenses(expenses),
        Err(error) => {
            tracing::warn!("Could not fetch expenses for user {user_id}: {error}");
            ExpenseCollection::new()
        }
    };

    let categories = match category_store.get_by_user(user_id) {
        Ok(custom) => merge_with_defaults(custom),
        Err(error) => {
            tracing::warn!("Could not fetch categories for user {user_id}: {error}");
            default_categories()
        }
    };

    (collection, categories)
}
