//! Expense categories: the fixed default set, the merge with user-defined
//! categories, and the category store trait with its SQLite implementation.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, auth::UserID};

/// The categories every user has, even with zero custom categories.
pub const DEFAULT_CATEGORIES: [&str; 4] = ["Food", "Transport", "Shopping", "Entertainment"];

/// The default category set as owned strings, in order.
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.map(String::from).to_vec()
}

/// The ordered union of the default categories and `custom`.
///
/// Defaults come first, then the custom categories in their given order.
/// Duplicates (case-sensitive exact matches) are dropped.
pub fn merge_with_defaults(custom: Vec<String>) -> Vec<String> {
    let mut categories = default_categories();

    for category in custom {
        if !categories.contains(&category) {
            categories.push(category);
        }
    }

    categories
}

/// Stores the custom categories each user has defined.
pub trait CategoryStore {
    /// The custom categories belonging to `user_id`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [Error::StoreUnavailable] if the store cannot be read.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<String>, Error>;

    /// Record a custom category for `user_id`.
    ///
    /// Recording a (user, category) pair that already exists is a no-op,
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [Error::WriteFailed] if the store rejects the write.
    fn create(&self, user_id: UserID, category: &str) -> Result<(), Error>;

    /// Record several custom categories for `user_id` in one batch,
    /// conflict-safe on each (user, category) pair.
    ///
    /// # Errors
    ///
    /// Returns [Error::WriteFailed] if the store rejects the write.
    fn create_many(&self, user_id: UserID, categories: &[String]) -> Result<(), Error>;
}

/// Create the user category table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user_category (
                user_id INTEGER NOT NULL REFERENCES user(id),
                category TEXT NOT NULL,
                UNIQUE (user_id, category)
                )",
        (),
    )?;

    Ok(())
}

/// Creates and retrieves custom categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<String>, Error> {
        let connection = self.connection.lock().unwrap();
        let mut statement = connection
            .prepare("SELECT category FROM user_category WHERE user_id = :user_id ORDER BY rowid")
            .map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        let rows = statement
            .query_map(&[(":user_id", &user_id.as_i64())], |row| row.get(0))
            .map_err(|error| Error::StoreUnavailable(error.to_string()))?;

        rows.collect::<Result<Vec<String>, _>>()
            .map_err(|error| Error::StoreUnavailable(error.to_string()))
    }

    fn create(&self, user_id: UserID, category: &str) -> Result<(), Error> {
        self.connection
            .lock()
            .unwrap()
            .execute(
                "INSERT OR IGNORE INTO user_category (user_id, category) VALUES (?1, ?2)",
                (user_id.as_i64(), category),
            )
            .map_err(|error| Error::WriteFailed(error.to_string()))?;

        Ok(())
    }

    fn create_many(&self, user_id: UserID, categories: &[String]) -> Result<(), Error> {
        let mut connection = self.connection.lock().unwrap();
        let transaction = connection
            .transaction()
            .map_err(|error| Error::WriteFailed(error.to_string()))?;

        for category in categories {
            transaction
                .execute(
                    "INSERT OR IGNORE INTO user_category (user_id, category) VALUES (?1, ?2)",
                    (user_id.as_i64(), category),
                )
                .map_err(|error| Error::WriteFailed(error.to_string()))?;
        }

        transaction
            .commit()
            .map_err(|error| Error::WriteFailed(error.to_string()))
    }
}
