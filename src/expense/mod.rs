//! The expense entity, the date-keyed expense collection, and the store
//! trait with its SQLite implementation.

mod collection;
mod models;
mod store;

pub use collection::ExpenseCollection;
pub use models::{Expense, ExpenseId};
pub use store::{ExpenseStore, SQLiteExpenseStore, create_expense_table, fetch_all};
