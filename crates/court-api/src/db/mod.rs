//! # Database Persistence Layer
//!
//! Postgres persistence via SQLx, mirroring the in-memory stores.
//!
//! ## Architecture
//!
//! The database layer is **optional**. When `DATABASE_URL` is set, every
//! successful mutation is written through to Postgres and all rows are
//! loaded back into the arenas on boot. When absent, the API operates in
//! in-memory-only mode (suitable for development and testing).
//!
//! Reads always come from the in-memory stores; Postgres exists so state
//! survives restarts. The one table-level invariant, the
//! `uq_vote_once_per_case` unique constraint, backs up the ledger's own
//! duplicate-vote guard.

pub mod submissions;
pub mod users;
pub mod votes;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::state::AppState;

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        sqlx::Error::Configuration(format!("migration failed: {e}").into())
    })?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Load all persisted rows into the in-memory stores on boot.
///
/// Users load first so the foreign keys other rows reference are present
/// in the arena before anything points at them.
pub async fn load_stores(pool: &PgPool, state: &AppState) -> Result<(), sqlx::Error> {
    let users = users::load_all(pool).await?;
    let user_count = users.len();
    for user in users {
        state.users.hydrate(user);
    }

    let submissions = submissions::load_all(pool).await?;
    let submission_count = submissions.len();
    for submission in submissions {
        state.submissions.hydrate(submission);
    }

    let votes = votes::load_all(pool).await?;
    let vote_count = votes.len();
    for vote in votes {
        state.votes.hydrate(vote);
    }

    tracing::info!(
        users = user_count,
        submissions = submission_count,
        votes = vote_count,
        "state loaded from database"
    );
    Ok(())
}
