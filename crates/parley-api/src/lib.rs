pub mod auth;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod notifications;
pub mod private_messages;
pub mod router;

use chrono::{DateTime, Utc};
use tracing::{error, warn};

use parley_db::Database;
use parley_types::time::parse_stored;

use crate::auth::AppState;
use crate::error::ApiError;

/// Run a store call off the async runtime.
///
/// Store errors are logged here and surface to the caller only as
/// [`ApiError::ServerFailure`].
pub(crate) async fn with_db<F, T>(state: &AppState, op: &'static str, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::ServerFailure
        })?
        .map_err(|e| {
            error!("{} failed: {:#}", op, e);
            ApiError::ServerFailure
        })
}

pub(crate) fn created_at(raw: &str, kind: &str, id: i64) -> DateTime<Utc> {
    parse_stored(raw).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on {} '{}'", raw, kind, id);
        DateTime::default()
    })
}
