//! Implements the struct that holds the state of the server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    auth::cookie::DEFAULT_COOKIE_DURATION,
    category::SQLiteCategoryStore,
    db::initialize,
    expense::SQLiteExpenseStore,
    migration::JsonFileCache,
    session::ExpenseSession,
};

/// The state of the server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store for the recorded expenses.
    pub expense_store: SQLiteExpenseStore,

    /// The store for the user-defined categories.
    pub category_store: SQLiteCategoryStore,

    /// The directory holding the legacy JSON cache to migrate, if any.
    pub cache_dir: PathBuf,

    /// The in-memory expense collection and categories for the signed-in
    /// user.
    pub session: ExpenseSession,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `local_timezone` should be a valid, canonical
    /// timezone name, e.g. "Pacific/Auckland".
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
        cache_dir: impl Into<PathBuf>,
    ) -> Result<Self, rusqlite::Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: connection.clone(),
            expense_store: SQLiteExpenseStore::new(connection.clone()),
            category_store: SQLiteCategoryStore::new(connection),
            cache_dir: cache_dir.into(),
            session: ExpenseSession::new(),
        })
    }

    /// The legacy cache for the migration sweep.
    pub fn local_cache(&self) -> JsonFileCache {
        JsonFileCache::new(&self.cache_dir)
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod app_state_tests {
    use rusqlite::Connection;

    use super::AppState;

    #[test]
    fn new_initializes_the_database() {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "a test secret",
            "Etc/UTC",
            "cache",
        )
        .unwrap();

        let count: i64 = state
            .db_connection
            .lock()
            .unwrap()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(count >= 3);
    }
}
