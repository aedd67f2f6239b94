//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{auth::create_user_table, category::create_category_table, expense::create_expense_table};

/// Create the tables for the application's domain models.
///
/// This function is idempotent: tables that already exist are left alone.
///
/// # Errors
///
/// This function will return an error if one of the table creation queries
/// failed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    create_user_table(connection)?;
    create_expense_table(connection)?;
    create_category_table(connection)?;

    Ok(())
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn initialize_creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let count: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                AND name IN ('user', 'expense', 'user_category')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn initialize_twice_is_idempotent() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();
        initialize(&connection).unwrap();
    }
}
