//! Postgres repositories (sqlx).

mod clients;
mod contacts;
mod projects;
mod subscriptions;

pub use clients::PgClientRepository;
pub use contacts::PgContactRepository;
pub use projects::PgProjectRepository;
pub use subscriptions::PgSubscriptionRepository;

use landmark_core::models::PageRequest;
use landmark_core::AppError;

/// `LIMIT`/`OFFSET` bind values; a NULL limit returns every row.
pub(crate) fn window(page: Option<PageRequest>) -> (Option<i64>, i64) {
    match page {
        Some(page) => (Some(page.limit), page.offset()),
        None => (None, 0),
    }
}

/// Map a unique-constraint violation to a client error, anything else to `Database`.
pub(crate) fn unique_violation(err: sqlx::Error, message: &str) -> AppError {
    let is_unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23505");
    if is_unique {
        AppError::BadRequest(message.to_string())
    } else {
        AppError::Database(err)
    }
}
