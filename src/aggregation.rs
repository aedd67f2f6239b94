//! Pure rollups over an expense collection: daily totals, the fixed weekly
//! buckets, monthly totals, and per-category breakdowns.
//!
//! Nothing in here performs I/O or mutates state. Results are recomputed on
//! demand and never persisted.

use std::cmp::Ordering;

use time::Date;

use crate::{
    date_key::{format_date_key, parse_date_key},
    expense::ExpenseCollection,
};

/// One of the four fixed day-range buckets a month is split into.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    /// The first day of the range.
    pub start: Date,
    /// The last day of the range (inclusive).
    pub end: Date,
    /// The sum of daily totals over the range.
    pub total: f64,
}

/// The total spent on one category over a month.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category label.
    pub category: String,
    /// The sum of amounts filed under the category.
    pub amount: f64,
}

/// The sum of amounts recorded for the calendar day `date`, or 0 if the
/// collection has no bucket for it.
pub fn daily_total(collection: &ExpenseCollection, date: Date) -> f64 {
    collection
        .get(&format_date_key(date))
        .iter()
        .map(|expense| expense.amount)
        .sum()
}

/// Split the month containing `month` into its four fixed week buckets and
/// total each one.
///
/// The buckets cover days 1–7, 8–14, 15–21, and 22 through the last day of
/// the month, so the final bucket is 7 to 10 days long depending on the
/// month. This is deliberately not aligned to weekday boundaries, and no
/// day of an adjacent month ever leaks in.
pub fn weeks_in_month(collection: &ExpenseCollection, month: Date) -> [WeekBucket; 4] {
    let year = month.year();
    let last_day = month.month().length(year);

    [(1, 7), (8, 14), (15, 21), (22, last_day)].map(|(start_day, end_day)| {
        let start = Date::from_calendar_date(year, month.month(), start_day).unwrap();
        let end = Date::from_calendar_date(year, month.month(), end_day).unwrap();

        let total = (start_day..=end_day)
            .map(|day| {
                let date = Date::from_calendar_date(year, month.month(), day).unwrap();
                daily_total(collection, date)
            })
            .sum();

        WeekBucket { start, end, total }
    })
}

/// The sum of amounts for every bucket whose date key falls in the month
/// containing `month`.
pub fn monthly_total(collection: &ExpenseCollection, month: Date) -> f64 {
    buckets_in_month(collection, month)
        .flat_map(|(_, bucket)| bucket.iter())
        .map(|expense| expense.amount)
        .sum()
}

/// Per-category totals across the month containing `month`, sorted
/// descending by amount.
///
/// The sort is stable: categories with equal totals keep the order they
/// were first encountered in (bucket date order, then insertion order
/// within a bucket).
pub fn category_breakdown(collection: &ExpenseCollection, month: Date) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for (_, bucket) in buckets_in_month(collection, month) {
        for expense in bucket {
            match totals
                .iter_mut()
                .find(|total| total.category == expense.category)
            {
                Some(total) => total.amount += expense.amount,
                None => totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    amount: expense.amount,
                }),
            }
        }
    }

    totals.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));

    totals
}

/// `amount` as a percentage of `total`, or 0 when `total` is zero so that
/// the display layer never sees a NaN.
pub fn percent_of_total(amount: f64, total: f64) -> f64 {
    if total == 0.0 {
        return 0.0;
    }

    amount / total * 100.0
}

/// The collection's buckets whose date key falls in the month containing
/// `month`, in date order.
fn buckets_in_month<'a>(
    collection: &'a ExpenseCollection,
    month: Date,
) -> impl Iterator<Item = (Date, &'a [crate::expense::Expense])> {
    collection.iter().filter_map(move |(date_key, bucket)| {
        let date = parse_date_key(date_key).ok()?;

        if date.year() == month.year() && date.month() == month.month() {
            Some((date, bucket.as_slice()))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod aggregation_tests {
    use time::{Date, macros::date};

    use crate::expense::{Expense, ExpenseCollection, ExpenseId};

    use super::{
        category_breakdown, daily_total, monthly_total, percent_of_total, weeks_in_month,
    };

    fn create_test_expense(id: i64, amount: f64, category: &str, date: Date) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            amount,
            category: category.to_owned(),
            description: String::new(),
            date,
        }
    }

    #[test]
    fn daily_total_sums_the_bucket() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 100.0, "Food", date!(2024 - 06 - 01)),
            create_test_expense(2, 25.5, "Transport", date!(2024 - 06 - 01)),
            create_test_expense(3, 10.0, "Food", date!(2024 - 06 - 02)),
        ]);

        assert_eq!(daily_total(&collection, date!(2024 - 06 - 01)), 125.5);
    }

    #[test]
    fn daily_total_is_zero_for_an_absent_bucket() {
        let collection = ExpenseCollection::new();

        assert_eq!(daily_total(&collection, date!(2024 - 06 - 01)), 0.0);
    }

    #[test]
    fn weeks_in_non_leap_february_all_span_seven_days() {
        let collection = ExpenseCollection::new();

        let weeks = weeks_in_month(&collection, date!(2023 - 02 - 01));

        assert_eq!(weeks[0].start, date!(2023 - 02 - 01));
        assert_eq!(weeks[0].end, date!(2023 - 02 - 07));
        assert_eq!(weeks[1].start, date!(2023 - 02 - 08));
        assert_eq!(weeks[1].end, date!(2023 - 02 - 14));
        assert_eq!(weeks[2].start, date!(2023 - 02 - 15));
        assert_eq!(weeks[2].end, date!(2023 - 02 - 21));
        assert_eq!(weeks[3].start, date!(2023 - 02 - 22));
        assert_eq!(weeks[3].end, date!(2023 - 02 - 28));
    }

    #[test]
    fn last_week_of_a_31_day_month_spans_ten_days() {
        let collection = ExpenseCollection::new();

        let weeks = weeks_in_month(&collection, date!(2024 - 07 - 15));

        assert_eq!(weeks[3].start, date!(2024 - 07 - 22));
        assert_eq!(weeks[3].end, date!(2024 - 07 - 31));
    }

    #[test]
    fn week_totals_sum_to_the_monthly_total() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 10.0, "Food", date!(2024 - 07 - 01)),
            create_test_expense(2, 20.0, "Food", date!(2024 - 07 - 14)),
            create_test_expense(3, 30.0, "Food", date!(2024 - 07 - 21)),
            create_test_expense(4, 40.0, "Food", date!(2024 - 07 - 22)),
            create_test_expense(5, 50.0, "Food", date!(2024 - 07 - 31)),
        ]);

        let weeks = weeks_in_month(&collection, date!(2024 - 07 - 01));

        let week_sum: f64 = weeks.iter().map(|week| week.total).sum();
        assert_eq!(week_sum, monthly_total(&collection, date!(2024 - 07 - 01)));
        assert_eq!(weeks[3].total, 90.0);
    }

    #[test]
    fn weeks_do_not_include_adjacent_months() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 100.0, "Food", date!(2024 - 01 - 31)),
            create_test_expense(2, 50.0, "Food", date!(2024 - 03 - 01)),
            create_test_expense(3, 25.0, "Food", date!(2024 - 02 - 25)),
        ]);

        let weeks = weeks_in_month(&collection, date!(2024 - 02 - 01));

        let week_sum: f64 = weeks.iter().map(|week| week.total).sum();
        assert_eq!(week_sum, 25.0);
    }

    #[test]
    fn monthly_total_spans_the_whole_month() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 100.0, "Food", date!(2024 - 06 - 01)),
            create_test_expense(2, 50.0, "Transport", date!(2024 - 06 - 15)),
        ]);

        assert_eq!(monthly_total(&collection, date!(2024 - 06 - 20)), 150.0);
    }

    #[test]
    fn monthly_total_ignores_other_months() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 100.0, "Food", date!(2024 - 06 - 01)),
            create_test_expense(2, 50.0, "Food", date!(2024 - 07 - 01)),
            create_test_expense(3, 25.0, "Food", date!(2023 - 06 - 01)),
        ]);

        assert_eq!(monthly_total(&collection, date!(2024 - 06 - 01)), 100.0);
    }

    #[test]
    fn breakdown_sorts_descending_by_amount() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 100.0, "Food", date!(2024 - 06 - 01)),
            create_test_expense(2, 50.0, "Transport", date!(2024 - 06 - 15)),
        ]);

        let breakdown = category_breakdown(&collection, date!(2024 - 06 - 01));

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Food");
        assert_eq!(breakdown[0].amount, 100.0);
        assert_eq!(breakdown[1].category, "Transport");
        assert_eq!(breakdown[1].amount, 50.0);
    }

    #[test]
    fn breakdown_keeps_first_encountered_order_on_ties() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 50.0, "Food", date!(2024 - 06 - 01)),
            create_test_expense(2, 50.0, "Transport", date!(2024 - 06 - 01)),
            create_test_expense(3, 30.0, "Shopping", date!(2024 - 06 - 02)),
        ]);

        let breakdown = category_breakdown(&collection, date!(2024 - 06 - 01));

        let categories: Vec<&str> = breakdown
            .iter()
            .map(|total| total.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Food", "Transport", "Shopping"]);
    }

    #[test]
    fn breakdown_sums_across_days() {
        let collection = ExpenseCollection::from_expenses(vec![
            create_test_expense(1, 10.0, "Food", date!(2024 - 06 - 01)),
            create_test_expense(2, 15.0, "Food", date!(2024 - 06 - 20)),
        ]);

        let breakdown = category_breakdown(&collection, date!(2024 - 06 - 01));

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].amount, 25.0);
    }

    #[test]
    fn percent_of_a_zero_total_is_zero_not_nan() {
        assert_eq!(percent_of_total(50.0, 0.0), 0.0);
    }

    #[test]
    fn percent_of_total_scales_to_one_hundred() {
        assert_eq!(percent_of_total(50.0, 200.0), 25.0);
    }
}
