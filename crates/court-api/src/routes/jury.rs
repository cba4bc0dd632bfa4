//! # Jury Routes
//!
//! Vote casting and tally reads. The ledger owns the one-vote-per-case
//! constraint; a duplicate cast surfaces here as 400 with the CONFLICT
//! code. Case identifiers are taken as-is — a vote needs no matching
//! submission.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use court_core::VoteValue;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to cast a vote.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct VoteRequest {
    /// The verdict: `"GUILTY"` or `"NOT_GUILTY"`.
    #[schema(value_type = String, example = "GUILTY")]
    pub vote: VoteValue,
}

impl Validate for VoteRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Confirmation that a vote was recorded.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteConfirmation {
    pub message: String,
}

/// Aggregate vote counts for a case.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VoteResultResponse {
    pub case_id: String,
    pub guilty: u64,
    pub not_guilty: u64,
    pub total: u64,
}

// ── Router ──────────────────────────────────────────────────────

/// Build the jury router. All routes require authentication.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jury/vote/:case_id", post(vote))
        .route("/jury/results/:case_id", get(results))
}

// ── Handlers ────────────────────────────────────────────────────

/// POST /jury/vote/{case_id} — Cast a juror's vote.
///
/// One vote per (case, juror), enforced atomically in the ledger. There
/// is no way to change or retract a vote once cast.
#[utoipa::path(
    post,
    path = "/jury/vote/{case_id}",
    params(("case_id" = String, Path, description = "Case identifier")),
    request_body = VoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = VoteConfirmation),
        (status = 400, description = "Already voted for this case", body = crate::error::ErrorBody),
        (status = 403, description = "Role may not vote", body = crate::error::ErrorBody),
    ),
    tag = "jury"
)]
async fn vote(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(case_id): Path<String>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<VoteConfirmation>), AppError> {
    let req = extract_validated_json(body)?;
    let record = state.votes.cast(user.actor(), &case_id, req.vote)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::votes::insert(pool, &record).await {
            tracing::error!(case_id = %case_id, juror = user.id, error = %e, "failed to persist vote");
            return Err(AppError::Internal(
                "vote recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    tracing::info!(case_id = %case_id, juror = user.id, "vote recorded");
    Ok((
        StatusCode::CREATED,
        Json(VoteConfirmation { message: "Vote recorded".to_string() }),
    ))
}

/// GET /jury/results/{case_id} — Read the tally for a case.
///
/// Jurors and judges only. Unknown case ids tally to all zeros.
#[utoipa::path(
    get,
    path = "/jury/results/{case_id}",
    params(("case_id" = String, Path, description = "Case identifier")),
    responses(
        (status = 200, description = "Vote tally", body = VoteResultResponse),
        (status = 403, description = "Role may not view results", body = crate::error::ErrorBody),
    ),
    tag = "jury"
)]
async fn results(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(case_id): Path<String>,
) -> Result<Json<VoteResultResponse>, AppError> {
    let tally = state.votes.tally(user.actor(), &case_id)?;
    Ok(Json(VoteResultResponse {
        case_id: tally.case_id,
        guilty: tally.guilty,
        not_guilty: tally.not_guilty,
        total: tally.total,
    }))
}
