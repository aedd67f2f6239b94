//! The in-memory mapping from date bucket keys to the expenses recorded on
//! that day.

use std::collections::BTreeMap;

use crate::{
    date_key::format_date_key,
    expense::{Expense, ExpenseId},
};

/// A mapping from `YYYY-MM-DD` date keys to the ordered expenses for that
/// date.
///
/// Buckets keep their expenses in insertion order, and a bucket is removed
/// as soon as its last expense is, so a key is present if and only if at
/// least one expense is filed under it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseCollection(BTreeMap<String, Vec<Expense>>);

impl ExpenseCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Group flat expense rows into a collection keyed by their date.
    ///
    /// Expenses keep their relative order within each bucket.
    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        let mut collection = Self::new();

        for expense in expenses {
            collection.insert(expense);
        }

        collection
    }

    /// The expenses recorded for `date_key`, empty if the bucket is absent.
    pub fn get(&self, date_key: &str) -> &[Expense] {
        self.0.get(date_key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether any expenses are recorded for `date_key`.
    pub fn contains_key(&self, date_key: &str) -> bool {
        self.0.contains_key(date_key)
    }

    /// File `expense` at the end of the bucket for its date, creating the
    /// bucket if it does not exist yet.
    pub fn insert(&mut self, expense: Expense) {
        self.0
            .entry(format_date_key(expense.date))
            .or_default()
            .push(expense);
    }

    /// Remove the expense with `id` from the bucket at `date_key`.
    ///
    /// Removes the bucket key entirely when its last expense goes, and
    /// returns the removed expense, or `None` if the bucket or the expense
    /// was not found.
    pub fn remove(&mut self, date_key: &str, id: ExpenseId) -> Option<Expense> {
        let bucket = self.0.get_mut(date_key)?;
        let index = bucket.iter().position(|expense| expense.id == id)?;
        let removed = bucket.remove(index);

        if bucket.is_empty() {
            self.0.remove(date_key);
        }

        Some(removed)
    }

    /// Iterate over the buckets in date key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Expense>)> {
        self.0.iter()
    }

    /// The number of non-empty date buckets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection holds no expenses at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod collection_tests {
    use time::{Date, macros::date};

    use crate::expense::{Expense, ExpenseId};

    use super::ExpenseCollection;

    fn create_test_expense(id: i64, amount: f64, date: Date) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            amount,
            category: "Food".to_owned(),
            description: String::new(),
            date,
        }
    }

    #[test]
    fn from_expenses_groups_by_date() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 100.0, date!(2024 - 06 - 01)),
            create_test_expense(2, 50.0, date!(2024 - 06 - 15)),
            create_test_expense(3, 25.0, date!(2024 - 06 - 01)),
        ]);

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("2024-06-01").len(), 2);
        assert_eq!(collection.get("2024-06-15").len(), 1);
    }

    #[test]
    fn buckets_preserve_insertion_order() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(7, 1.0, date!(2024 - 06 - 01)),
            create_test_expense(3, 2.0, date!(2024 - 06 - 01)),
            create_test_expense(5, 3.0, date!(2024 - 06 - 01)),
        ]);

        let ids: Vec<i64> = collection
            .get("2024-06-01")
            .iter()
            .map(|expense| expense.id.as_i64())
            .collect();

        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn get_missing_bucket_returns_empty_slice() {
        let collection = ExpenseCollection::new();

        assert!(collection.get("2024-06-01").is_empty());
    }

    #[test]
    fn insert_creates_bucket_on_demand() {
        let mut collection = ExpenseCollection::new();

        collection.insert(create_test_expense(1, 9.5, date!(2024 - 06 - 02)));

        assert!(collection.contains_key("2024-06-02"));
        assert_eq!(collection.get("2024-06-02").len(), 1);
    }

    #[test]
    fn removing_last_expense_drops_the_bucket() {
        let mut collection = ExpenseCollection::new();
        collection.insert(create_test_expense(1, 9.5, date!(2024 - 06 - 02)));

        let removed = collection.remove("2024-06-02", ExpenseId::new(1));

        assert_eq!(removed.map(|expense| expense.id), Some(ExpenseId::new(1)));
        assert!(
            !collection.contains_key("2024-06-02"),
            "an empty bucket must not linger in the collection"
        );
    }

    #[test]
    fn removing_one_of_many_keeps_the_bucket() {
        let mut collection = ExpenseCollection::new();
        collection.insert(create_test_expense(1, 9.5, date!(2024 - 06 - 02)));
        collection.insert(create_test_expense(2, 3.0, date!(2024 - 06 - 02)));

        collection.remove("2024-06-02", ExpenseId::new(1));

        let ids: Vec<i64> = collection
            .get("2024-06-02")
            .iter()
            .map(|expense| expense.id.as_i64())
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn remove_with_unknown_id_is_a_no_op() {
        let mut collection = ExpenseCollection::new();
        collection.insert(create_test_expense(1, 9.5, date!(2024 - 06 - 02)));

        let removed = collection.remove("2024-06-02", ExpenseId::new(42));

        assert_eq!(removed, None);
        assert_eq!(collection.get("2024-06-02").len(), 1);
    }
}
