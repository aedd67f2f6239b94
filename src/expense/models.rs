//! Defines the expense entity and its ID type.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::Date;

/// A newtype wrapper for integer expense IDs.
///
/// This helps disambiguate expense IDs from other types of IDs, leading to
/// better compile time errors and more flexible generics that can have
/// distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExpenseId(i64);

impl ExpenseId {
    /// Create a new expense ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the expense ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for ExpenseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A single recorded spend event.
///
/// The date is the calendar day the expense is attributed to, not the time
/// it was recorded. An expense always belongs to exactly one date bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The expense's ID in the store, assigned on insert.
    pub id: ExpenseId,
    /// How much was spent. Always a finite, non-negative number.
    pub amount: f64,
    /// The category label the expense is filed under.
    pub category: String,
    /// Free-form text describing the expense. May be empty.
    pub description: String,
    /// The calendar date the expense is attributed to.
    pub date: Date,
}
