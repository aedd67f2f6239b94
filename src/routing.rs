//! Application router configuration with protected and unprotected route
//! definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, auth, calendar, day, endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    stats,
};

/// Return a router with all the app's routes.
///
/// Page and form routes are protected by the redirecting auth guard; the
/// htmx API routes use the `HX-Redirect` variant so a signed-out client
/// swaps the whole page to the log-in view.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::LOG_IN_VIEW, get(auth::get_log_in_page))
        .route(endpoints::LOG_IN_API, post(auth::post_log_in))
        .route(endpoints::REGISTER_VIEW, get(auth::get_register_page))
        .route(endpoints::USERS_API, post(auth::create_user_endpoint))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::CALENDAR_VIEW, get(calendar::get_calendar_page))
        .route(endpoints::DAY_VIEW, get(day::get_day_page))
        .route(endpoints::STATS_VIEW, get(stats::get_stats_page))
        .route(endpoints::LOG_OUT, get(auth::get_log_out))
        .route(
            endpoints::CREATE_EXPENSE_API,
            post(day::create_expense_endpoint),
        )
        .route(
            endpoints::CREATE_CATEGORY_API,
            post(day::create_category_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_guard,
        ));

    let protected_api_routes = Router::new()
        .route(
            endpoints::DELETE_EXPENSE_API,
            delete(day::delete_expense_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_guard_hx,
        ));

    Router::new()
        .merge(unprotected_routes)
        .merge(protected_routes)
        .merge(protected_api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Send clients at the root to the calendar; the auth guard bounces
/// signed-out clients on to the log-in page from there.
async fn get_root() -> Redirect {
    Redirect::to(endpoints::CALENDAR_VIEW)
}
