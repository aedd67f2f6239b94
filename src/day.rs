//! The daily expenses view: the add-expense form, the day's expense list,
//! and the endpoints that record, delete, and categorize expenses.

use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState,
    auth::UserID,
    date_key::parse_date_key,
    endpoints,
    expense::{Expense, ExpenseId},
    html::{base, currency},
    month::short_day_title,
    navigation::NavBar,
    session::SessionSnapshot,
};

/// Display the expenses recorded for one day.
pub async fn get_day_page(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(date_key): Path<String>,
) -> Response {
    let date = match parse_date_key(&date_key) {
        Ok(date) => date,
        Err(error) => return error.into_response(),
    };

    let mut cache = state.local_cache();
    state
        .session
        .ensure_user(user_id, &state.expense_store, &state.category_store, &mut cache)
        .await;
    let snapshot = state.session.snapshot();

    let title = short_day_title(date);
    let content = html! {
        (NavBar::new(endpoints::DAY_VIEW).into_html())

        section class="card"
        {
            header class="day-header"
            {
                h1 { (title) }
                a href=(endpoints::CALENDAR_VIEW) { "Back to calendar" }
            }

            @if snapshot.loading {
                p class="loading-note" { "Loading expenses..." }
            } @else {
                (add_expense_form(&snapshot, &date_key))
                (expense_list(&snapshot, &date_key))
            }
        }
    };

    base(&title, &content).into_response()
}

fn add_expense_form(snapshot: &SessionSnapshot, date_key: &str) -> Markup {
    html! {
        form
            method="post"
            action=(endpoints::format_create_expense_api(date_key))
            class="form-stack"
        {
            h2 { "Add Expense" }

            div class="form-row"
            {
                div class="form-field"
                {
                    label for="amount" { "Amount" }
                    input
                        type="number" name="amount" id="amount"
                        min="0" step="0.01" placeholder="0.00" required;
                }

                div class="form-field"
                {
                    label for="description" { "Description" }
                    input
                        type="text" name="description" id="description"
                        placeholder="Coffee, Gas...";
                }
            }

            fieldset class="category-chips"
            {
                legend { "Category" }

                @for (index, category) in snapshot.categories.iter().enumerate() {
                    label class="category-chip"
                    {
                        input
                            type="radio" name="category" value=(category)
                            checked[index == 0];
                        (category)
                    }
                }
            }

            button type="submit" class="btn btn-primary" { "Add" }
        }

        form
            method="post"
            action=(endpoints::CREATE_CATEGORY_API)
            class="form-stack form-inline"
        {
            input type="hidden" name="date" value=(date_key);
            input
                type="text" name="category"
                placeholder="New category" aria-label="New category";
            button type="submit" class="btn btn-secondary" { "+ Add category" }
        }
    }
}

fn expense_list(snapshot: &SessionSnapshot, date_key: &str) -> Markup {
    let expenses = snapshot.expenses.get(date_key);
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    html! {
        div class="expense-list"
        {
            h2 { "Expenses" }

            @if expenses.is_empty() {
                p class="empty-note" { "Nothing recorded for this day yet." }
            } @else {
                ul
                {
                    @for expense in expenses {
                        (expense_item(expense, date_key))
                    }
                }

                p class="day-total"
                {
                    "Total: "
                    strong { (currency(total)) }
                }
            }
        }
    }
}

fn expense_item(expense: &Expense, date_key: &str) -> Markup {
    html! {
        li class="expense-item"
        {
            div class="expense-item-details"
            {
                @if !expense.description.is_empty() {
                    span class="expense-description" { (expense.description) }
                }
                span class="category-badge" { (expense.category) }
            }

            span class="expense-amount" { (currency(expense.amount)) }

            button
                type="button"
                class="btn btn-delete"
                hx-delete=(endpoints::format_delete_expense_api(date_key, expense.id))
                hx-target="closest .expense-item"
                hx-swap="outerHTML"
            {
                "Delete"
            }
        }
    }
}

/// The form data for recording an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseForm {
    /// The amount as typed, parsed server-side.
    pub amount: String,
    /// The free-form description; may be empty.
    #[serde(default)]
    pub description: String,
    /// The selected category chip.
    pub category: String,
}

/// Record an expense for the day at `date_key` and redirect back to its
/// page.
///
/// A submission that fails (unparseable amount, store failure) is logged
/// and the redirect happens anyway: the day page simply renders without the
/// new expense rather than blocking on an error page.
pub async fn create_expense_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path(date_key): Path<String>,
    Form(form): Form<CreateExpenseForm>,
) -> Response {
    let mut cache = state.local_cache();
    state
        .session
        .ensure_user(user_id, &state.expense_store, &state.category_store, &mut cache)
        .await;

    match form.amount.trim().parse::<f64>() {
        Ok(amount) => {
            if let Err(error) = state
                .session
                .add_expense(
                    &state.expense_store,
                    &date_key,
                    amount,
                    &form.category,
                    form.description.trim(),
                )
                .await
            {
                tracing::warn!("Skipping an expense submission: {error}");
            }
        }
        Err(_) => {
            tracing::warn!("Skipping an expense submission with a non-numeric amount");
        }
    }

    Redirect::to(&endpoints::format_day_view(&date_key)).into_response()
}

/// Delete one of the day's expenses.
///
/// Called from the delete button via htmx: on success the response is an
/// empty fragment that replaces the expense's list item.
pub async fn delete_expense_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Path((date_key, expense_id)): Path<(String, ExpenseId)>,
) -> Response {
    let mut cache = state.local_cache();
    state
        .session
        .ensure_user(user_id, &state.expense_store, &state.category_store, &mut cache)
        .await;

    match state
        .session
        .delete_expense(&state.expense_store, &date_key, expense_id)
        .await
    {
        Ok(()) => html! {}.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// The form data for adding a custom category.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryForm {
    /// The new category name.
    pub category: String,
    /// The day page to return to.
    pub date: String,
}

/// Add a custom category and redirect back to the day page it was added
/// from.
///
/// Blank and duplicate names are silently ignored (see
/// [ExpenseSession::add_category](crate::session::ExpenseSession::add_category)).
pub async fn create_category_endpoint(
    State(state): State<AppState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<CreateCategoryForm>,
) -> Response {
    let mut cache = state.local_cache();
    state
        .session
        .ensure_user(user_id, &state.expense_store, &state.category_store, &mut cache)
        .await;

    if let Err(error) = state
        .session
        .add_category(&state.category_store, &form.category)
        .await
    {
        tracing::warn!("Skipping a category submission: {error}");
    }

    let target = match parse_date_key(&form.date) {
        Ok(_) => endpoints::format_day_view(&form.date),
        Err(_) => endpoints::CALENDAR_VIEW.to_owned(),
    };

    Redirect::to(&target).into_response()
}

#[cfg(test)]
mod day_view_tests {
    use time::macros::date;

    use crate::{
        category::default_categories,
        expense::{Expense, ExpenseCollection, ExpenseId},
        session::SessionSnapshot,
    };

    use super::{add_expense_form, expense_list};

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            expenses: ExpenseCollection::from_expenses(vec![
                Expense {
                    id: ExpenseId::new(1),
                    amount: 120.0,
                    category: "Food".to_owned(),
                    description: "lunch".to_owned(),
                    date: date!(2024 - 06 - 05),
                },
                Expense {
                    id: ExpenseId::new(2),
                    amount: 80.0,
                    category: "Transport".to_owned(),
                    description: String::new(),
                    date: date!(2024 - 06 - 05),
                },
            ]),
            categories: default_categories(),
            loading: false,
        }
    }

    #[test]
    fn form_renders_a_chip_per_category() {
        let markup = add_expense_form(&snapshot(), "2024-06-05").into_string();

        for category in default_categories() {
            assert!(markup.contains(&category));
        }
        assert_eq!(markup.matches("class=\"category-chip\"").count(), 4);
    }

    #[test]
    fn list_shows_each_expense_with_a_delete_button() {
        let markup = expense_list(&snapshot(), "2024-06-05").into_string();

        assert!(markup.contains("lunch"));
        assert!(markup.contains("₱120.00"));
        assert!(markup.contains("/api/days/2024-06-05/expenses/1"));
        assert!(markup.contains("/api/days/2024-06-05/expenses/2"));
    }

    #[test]
    fn list_totals_the_day() {
        let markup = expense_list(&snapshot(), "2024-06-05").into_string();

        assert!(markup.contains("₱200.00"));
    }

    #[test]
    fn empty_day_renders_the_placeholder() {
        let markup = expense_list(&snapshot(), "2024-06-06").into_string();

        assert!(markup.contains("Nothing recorded"));
    }
}
