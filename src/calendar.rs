//! The month calendar view: one cell per day with that day's total, linked
//! to the day's expense page.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    aggregation::daily_total,
    auth::UserID,
    date_key::format_date_key,
    endpoints,
    html::{base, currency},
    month::{format_month_param, month_anchor, month_title, next_month, previous_month},
    navigation::NavBar,
    session::SessionSnapshot,
    timezone::local_today,
};

/// The month selection shared by the calendar and stats pages, as a
/// `YYYY-MM` string. Defaults to the current month.
#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// The selected month, e.g. `2024-06`.
    pub month: Option<String>,
}

impl MonthQuery {
    /// The first day of the selected month, falling back to today's month
    /// in `canonical_timezone`.
    pub fn resolve(&self, canonical_timezone: &str) -> Result<Date, Error> {
        if let Some(month) = self
            .month
            .as_deref()
            .and_then(crate::month::parse_month_param)
        {
            return Ok(month);
        }

        local_today(canonical_timezone)
            .map(month_anchor)
            .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
    }
}

/// Display the calendar for the selected month.
pub async fn get_calendar_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<MonthQuery>,
) -> Response {
    let mut cache = state.local_cache();
    state
        .session
        .ensure_user(user_id, &state.expense_store, &state.category_store, &mut cache)
        .await;

    let month = match query.resolve(&state.local_timezone) {
        Ok(month) => month,
        Err(error) => return error.into_response(),
    };
    let today = local_today(&state.local_timezone);
    let snapshot = state.session.snapshot();

    let content = html! {
        (NavBar::new(endpoints::CALENDAR_VIEW).into_html())

        section class="card"
        {
            (month_nav(endpoints::CALENDAR_VIEW, month))

            @if snapshot.loading {
                p class="loading-note" { "Loading expenses..." }
            }

            (calendar_grid(&snapshot, month, today))
        }
    };

    base("Calendar", &content).into_response()
}

/// The previous/next month navigation header shared with the stats page.
pub fn month_nav(view: &str, month: Date) -> Markup {
    html! {
        header class="month-nav"
        {
            a
                class="btn btn-secondary"
                href={ (view) "?month=" (format_month_param(previous_month(month))) }
            {
                "← Prev"
            }

            h1 { (month_title(month)) }

            a
                class="btn btn-secondary"
                href={ (view) "?month=" (format_month_param(next_month(month))) }
            {
                "Next →"
            }
        }
    }
}

const DAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn calendar_grid(snapshot: &SessionSnapshot, month: Date, today: Option<Date>) -> Markup {
    let first_day = month_anchor(month);
    let leading_blanks = first_day.weekday().number_days_from_sunday();
    let days_in_month = month.month().length(month.year());

    html! {
        div class="calendar-grid"
        {
            @for header in DAY_HEADERS {
                div class="calendar-header" { (header) }
            }

            @for _ in 0..leading_blanks {
                div class="calendar-cell calendar-cell-empty" {}
            }

            @for day in 1..=days_in_month {
                (calendar_cell(snapshot, first_day.replace_day(day).unwrap(), today))
            }
        }
    }
}

fn calendar_cell(snapshot: &SessionSnapshot, date: Date, today: Option<Date>) -> Markup {
    let total = daily_total(&snapshot.expenses, date);
    let is_today = today == Some(date);

    let mut class = String::from("calendar-cell");
    if total > 0.0 {
        class.push_str(" calendar-cell-spent");
    }
    if is_today {
        class.push_str(" calendar-cell-today");
    }

    html! {
        a class=(class) href=(endpoints::format_day_view(&format_date_key(date)))
        {
            span class="calendar-day" { (date.day()) }

            @if total > 0.0 {
                span class="calendar-total" { (currency(total)) }
            }
        }
    }
}

#[cfg(test)]
mod calendar_tests {
    use time::macros::date;

    use crate::{
        expense::{Expense, ExpenseCollection, ExpenseId},
        session::SessionSnapshot,
    };

    use super::{calendar_grid, month_nav};

    fn snapshot_with_expense() -> SessionSnapshot {
        SessionSnapshot {
            expenses: ExpenseCollection::from_expenses(vec![Expense {
                id: ExpenseId::new(1),
                amount: 42.0,
                category: "Food".to_owned(),
                description: String::new(),
                date: date!(2024 - 06 - 05),
            }]),
            categories: Vec::new(),
            loading: false,
        }
    }

    #[test]
    fn grid_has_a_cell_for_every_day_of_the_month() {
        let markup = calendar_grid(&snapshot_with_expense(), date!(2024 - 06 - 01), None)
            .into_string();

        assert_eq!(markup.matches("/days/2024-06-").count(), 30);
    }

    #[test]
    fn grid_pads_to_the_first_weekday() {
        // 2024-06-01 is a Saturday, so six leading blanks.
        let markup = calendar_grid(&snapshot_with_expense(), date!(2024 - 06 - 01), None)
            .into_string();

        assert_eq!(markup.matches("calendar-cell-empty").count(), 6);
    }

    #[test]
    fn cells_with_expenses_show_the_daily_total() {
        let markup = calendar_grid(&snapshot_with_expense(), date!(2024 - 06 - 01), None)
            .into_string();

        assert!(markup.contains("₱42.00"));
        assert_eq!(markup.matches("calendar-cell-spent").count(), 1);
    }

    #[test]
    fn todays_cell_is_highlighted() {
        let markup = calendar_grid(
            &snapshot_with_expense(),
            date!(2024 - 06 - 01),
            Some(date!(2024 - 06 - 10)),
        )
        .into_string();

        assert_eq!(markup.matches("calendar-cell-today").count(), 1);
    }

    #[test]
    fn month_nav_links_the_adjacent_months() {
        let markup = month_nav("/calendar", date!(2024 - 01 - 15)).into_string();

        assert!(markup.contains("/calendar?month=2023-12"));
        assert!(markup.contains("/calendar?month=2024-02"));
        assert!(markup.contains("January 2024"));
    }
}
