//! The API endpoint URIs.
//!
//! For endpoints that take a date or expense ID parameter, use the
//! `format_*` helpers.

use crate::expense::ExpenseId;

/// The root route, which redirects to the calendar or log-in page.
pub const ROOT: &str = "/";
/// The landing page for signed-in users: the month calendar.
pub const CALENDAR_VIEW: &str = "/calendar";
/// The page listing and recording one day's expenses.
pub const DAY_VIEW: &str = "/days/{date}";
/// The monthly statistics page.
pub const STATS_VIEW: &str = "/stats";
/// The route for getting the log-in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering a user.
pub const USERS_API: &str = "/api/users";
/// The route to create an expense for a day.
pub const CREATE_EXPENSE_API: &str = "/api/days/{date}/expenses";
/// The route to delete one of a day's expenses.
pub const DELETE_EXPENSE_API: &str = "/api/days/{date}/expenses/{expense_id}";
/// The route to create a custom category.
pub const CREATE_CATEGORY_API: &str = "/api/categories";

/// The day view URI for `date_key`.
pub fn format_day_view(date_key: &str) -> String {
    DAY_VIEW.replace("{date}", date_key)
}

/// The create-expense URI for `date_key`.
pub fn format_create_expense_api(date_key: &str) -> String {
    CREATE_EXPENSE_API.replace("{date}", date_key)
}

/// The delete-expense URI for the expense `id` filed under `date_key`.
pub fn format_delete_expense_api(date_key: &str, id: ExpenseId) -> String {
    DELETE_EXPENSE_API
        .replace("{date}", date_key)
        .replace("{expense_id}", &id.as_i64().to_string())
}
