//! The statistics view: monthly total, the four fixed week buckets, and the
//! category breakdown with percentage bars.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::Date;

use crate::{
    AppState,
    aggregation::{category_breakdown, monthly_total, percent_of_total, weeks_in_month},
    auth::UserID,
    calendar::{MonthQuery, month_nav},
    endpoints,
    html::{base, currency},
    month::short_day_title,
    navigation::NavBar,
    session::SessionSnapshot,
};

/// Display the statistics for the selected month.
pub async fn get_stats_page(
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
    let snapshot = state.session.snapshot();

    let content = html! {
        (NavBar::new(endpoints::STATS_VIEW).into_html())

        section class="card"
        {
            (month_nav(endpoints::STATS_VIEW, month))
            (monthly_total_banner(&snapshot, month))
        }

        section class="card"
        {
            (weekly_breakdown(&snapshot, month))
        }

        (category_breakdown_card(&snapshot, month))
    };

    base("Stats", &content).into_response()
}

fn monthly_total_banner(snapshot: &SessionSnapshot, month: Date) -> Markup {
    let total = monthly_total(&snapshot.expenses, month);

    html! {
        div class="stats-banner"
        {
            p class="stats-banner-label" { "Monthly total" }
            p class="stats-banner-amount" { (currency(total)) }
        }
    }
}

fn weekly_breakdown(snapshot: &SessionSnapshot, month: Date) -> Markup {
    let weeks = weeks_in_month(&snapshot.expenses, month);

    html! {
        h2 { "Weekly breakdown" }

        ul class="week-list"
        {
            @for (index, week) in weeks.iter().enumerate() {
                li class="week-row"
                {
                    span
                    {
                        "Week " (index + 1) ": "
                        (short_day_title(week.start)) " – " (short_day_title(week.end))
                    }

                    strong { (currency(week.total)) }
                }
            }
        }
    }
}

fn category_breakdown_card(snapshot: &SessionSnapshot, month: Date) -> Markup {
    let breakdown = category_breakdown(&snapshot.expenses, month);
    let total = monthly_total(&snapshot.expenses, month);

    if breakdown.is_empty() {
        return html! {};
    }

    html! {
        section class="card"
        {
            h2 { "Spending by category" }

            div class="category-breakdown"
            {
                @for entry in &breakdown {
                    @let percentage = percent_of_total(entry.amount, total);

                    div class="category-row"
                    {
                        div class="category-row-header"
                        {
                            span { (entry.category) }
                            strong { (currency(entry.amount)) }
                        }

                        div class="meter"
                        {
                            div class="meter-fill" style={ "width: " (percentage) "%" } {}
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod stats_view_tests {
    use time::macros::date;

    use crate::{
        expense::{Expense, ExpenseCollection, ExpenseId},
        session::SessionSnapshot,
    };

    use super::{category_breakdown_card, monthly_total_banner, weekly_breakdown};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            expenses: ExpenseCollection::from_expenses(vec![
                Expense {
                    id: ExpenseId::new(1),
                    amount: 100.0,
                    category: "Food".to_owned(),
                    description: String::new(),
                    date: date!(2024 - 06 - 01),
                },
                Expense {
                    id: ExpenseId::new(2),
                    amount: 50.0,
                    category: "Transport".to_owned(),
                    description: String::new(),
                    date: date!(2024 - 06 - 15),
                },
            ]),
            categories: Vec::new(),
            loading: false,
        }
    }

    #[test]
    fn banner_shows_the_monthly_total() {
        let markup = monthly_total_banner(&snapshot(), date!(2024 - 06 - 01)).into_string();

        assert!(markup.contains("₱150.00"));
    }

    #[test]
    fn weekly_breakdown_renders_four_rows() {
        let markup = weekly_breakdown(&snapshot(), date!(2024 - 06 - 01)).into_string();

        assert_eq!(markup.matches("week-row").count(), 4);
        assert!(markup.contains("Week 1: Jun 1 – Jun 7"));
        assert!(markup.contains("Week 4: Jun 22 – Jun 30"));
    }

    #[test]
    fn categories_are_listed_largest_first() {
        let markup = category_breakdown_card(&snapshot(), date!(2024 - 06 - 01)).into_string();

        let food = markup.find("Food").unwrap();
        let transport = markup.find("Transport").unwrap();
        assert!(food < transport);
    }

    #[test]
    fn empty_month_hides_the_category_card() {
        let markup = category_breakdown_card(&snapshot(), date!(2020 - 01 - 01)).into_string();

        assert!(markup.is_empty());
    }

    #[test]
    fn percentage_bars_scale_to_the_monthly_total() {
        let markup = category_breakdown_card(&snapshot(), date!(2024 - 06 - 01)).into_string();

        assert!(markup.contains("width: 66.66666666666666%") || markup.contains("width: 66.66666666666667%"));
    }
}
