//! Expenseur is a web app for tracking day-to-day spending.
//!
//! Users sign in, record expenses against a calendar day with a category,
//! and view daily, weekly, monthly, and per-category totals. The server
//! renders HTML directly.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod calendar;
mod day;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod stats;
#[cfg(test)]
mod test_utils;

pub mod aggregation;
pub mod auth;
pub mod category;
pub mod date_key;
pub mod endpoints;
pub mod expense;
pub mod migration;
pub mod month;
pub mod session;
pub mod timezone;

mod db;
mod error;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
