//! Case submission persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `case_submissions`
//! table.

use sqlx::PgPool;

use chrono::{DateTime, Utc};
use court_core::{Role, SubmissionStatus};
use court_state::Submission;

/// Insert a new submission row.
pub async fn insert(pool: &PgPool, submission: &Submission) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO case_submissions (id, case_id, submitted_by_user_id, submitted_by_role,
         plaintiff_name, defendant_name, argument_text, evidence_text, status, judge_notes,
         created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(submission.id)
    .bind(&submission.case_id)
    .bind(submission.submitted_by_user_id)
    .bind(submission.submitted_by_role.as_str())
    .bind(&submission.plaintiff_name)
    .bind(&submission.defendant_name)
    .bind(&submission.argument_text)
    .bind(&submission.evidence_text)
    .bind(submission.status.as_str())
    .bind(&submission.judge_notes)
    .bind(submission.created_at)
    .bind(submission.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Overwrite the mutable columns of a submission row.
///
/// The edit/approve/reject operations all funnel through here with the
/// full post-mutation record, so one statement covers every update shape.
pub async fn update(pool: &PgPool, submission: &Submission) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE case_submissions
         SET plaintiff_name = $1, defendant_name = $2, argument_text = $3,
             evidence_text = $4, status = $5, judge_notes = $6, updated_at = $7
         WHERE id = $8",
    )
    .bind(&submission.plaintiff_name)
    .bind(&submission.defendant_name)
    .bind(&submission.argument_text)
    .bind(&submission.evidence_text)
    .bind(submission.status.as_str())
    .bind(&submission.judge_notes)
    .bind(submission.updated_at)
    .bind(submission.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a submission row.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM case_submissions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all submissions from the database into the in-memory store on
/// startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<Submission>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SubmissionRow>(
        "SELECT id, case_id, submitted_by_user_id, submitted_by_role, plaintiff_name,
         defendant_name, argument_text, evidence_text, status, judge_notes,
         created_at, updated_at
         FROM case_submissions ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    let mut submissions = Vec::with_capacity(rows.len());
    for row in rows {
        match row.into_record() {
            Some(submission) => submissions.push(submission),
            None => {
                tracing::error!("skipping submission row with invalid enum during load_all");
            }
        }
    }
    Ok(submissions)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct SubmissionRow {
    id: i64,
    case_id: String,
    submitted_by_user_id: i64,
    submitted_by_role: String,
    plaintiff_name: String,
    defendant_name: String,
    argument_text: String,
    evidence_text: String,
    status: String,
    judge_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SubmissionRow {
    fn into_record(self) -> Option<Submission> {
        let submitted_by_role = match Role::parse(&self.submitted_by_role) {
            Ok(role) => role,
            Err(_) => {
                tracing::warn!(
                    id = self.id,
                    role = %self.submitted_by_role,
                    "skipping submission row with invalid role"
                );
                return None;
            }
        };
        let status = match SubmissionStatus::parse(&self.status) {
            Ok(status) => status,
            Err(_) => {
                tracing::warn!(
                    id = self.id,
                    status = %self.status,
                    "skipping submission row with invalid status"
                );
                return None;
            }
        };
        Some(Submission {
            id: self.id,
            case_id: self.case_id,
            submitted_by_user_id: self.submitted_by_user_id,
            submitted_by_role,
            plaintiff_name: self.plaintiff_name,
            defendant_name: self.defendant_name,
            argument_text: self.argument_text,
            evidence_text: self.evidence_text,
            status,
            judge_notes: self.judge_notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
