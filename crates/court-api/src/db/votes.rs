//! Vote persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `votes` table. The
//! `uq_vote_once_per_case` unique constraint makes the insert race-safe
//! even across multiple API processes sharing one database.

use sqlx::PgPool;

use chrono::{DateTime, Utc};
use court_core::VoteValue;
use court_state::Vote;

/// Insert a vote row.
///
/// `ON CONFLICT DO NOTHING` keeps a concurrent duplicate (from another
/// process) from failing the request whose ledger insert already won —
/// the constraint, not this statement, is the duplicate guard.
pub async fn insert(pool: &PgPool, vote: &Vote) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO votes (case_id, juror_user_id, vote, created_at)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT ON CONSTRAINT uq_vote_once_per_case DO NOTHING",
    )
    .bind(&vote.case_id)
    .bind(vote.juror_user_id)
    .bind(vote.vote.as_str())
    .bind(vote.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all votes from the database into the ledger on startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Vote>, sqlx::Error> {
    let rows = sqlx::query_as::<_, VoteRow>(
        "SELECT case_id, juror_user_id, vote, created_at FROM votes ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    let mut votes = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(vote) => votes.push(vote),
            None => {
                tracing::error!("skipping vote row with invalid vote value during load_all");
            }
        }
    }
    Ok(votes)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct VoteRow {
    case_id: String,
    juror_user_id: i64,
    vote: String,
    created_at: DateTime<Utc>,
}

impl VoteRow {
    fn into_record(self) -> Option<Vote> {
        let vote = match VoteValue::parse(&self.vote) {
            Ok(vote) => vote,
            Err(_) => {
                tracing::warn!(
                    case_id = %self.case_id,
                    juror = self.juror_user_id,
                    value = %self.vote,
                    "skipping vote row with invalid vote value"
                );
                return None;
            }
        };
        Some(Vote {
            case_id: self.case_id,
            juror_user_id: self.juror_user_id,
            vote,
            created_at: self.created_at,
        })
    }
}
