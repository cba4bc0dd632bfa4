//! # Case Submission Routes
//!
//! The submission workflow surface. Every handler receives the
//! authenticated principal from the auth middleware and forwards it to the
//! store, which owns the permission decision — no role comparison happens
//! here.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use court_core::{validate, Role, SubmissionStatus};
use court_state::{Submission, SubmissionDraft, SubmissionPatch};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to open a new case submission.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CaseSubmitRequest {
    /// Case identifier, 3–64 characters. Shared across related
    /// submissions; not unique.
    pub case_id: String,
    /// Plaintiff party name, 1–120 characters.
    pub plaintiff_name: String,
    /// Defendant party name, 1–120 characters.
    pub defendant_name: String,
    /// The narrative argument. Required non-empty.
    pub argument_text: String,
    /// Supporting evidence description. Required non-empty.
    pub evidence_text: String,
}

impl Validate for CaseSubmitRequest {
    fn validate(&self) -> Result<(), String> {
        validate::check_case_id(&self.case_id).map_err(|e| e.to_string())?;
        validate::check_name("plaintiff_name", &self.plaintiff_name).map_err(|e| e.to_string())?;
        validate::check_name("defendant_name", &self.defendant_name).map_err(|e| e.to_string())?;
        validate::check_non_empty("argument_text", &self.argument_text)
            .map_err(|e| e.to_string())?;
        validate::check_non_empty("evidence_text", &self.evidence_text)
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// Judge merge-patch: only fields present in the body are changed.
///
/// No length bounds apply on edits; only submit enforces the field
/// bounds.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmissionEditRequest {
    pub plaintiff_name: Option<String>,
    pub defendant_name: Option<String>,
    pub argument_text: Option<String>,
    pub evidence_text: Option<String>,
    pub judge_notes: Option<String>,
}

impl Validate for SubmissionEditRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl From<SubmissionEditRequest> for SubmissionPatch {
    fn from(req: SubmissionEditRequest) -> Self {
        Self {
            plaintiff_name: req.plaintiff_name,
            defendant_name: req.defendant_name,
            argument_text: req.argument_text,
            evidence_text: req.evidence_text,
            judge_notes: req.judge_notes,
        }
    }
}

/// Approve/reject body. Notes overwrite the stored notes only when
/// provided.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubmissionDecisionRequest {
    pub judge_notes: Option<String>,
}

impl Validate for SubmissionDecisionRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// A case submission as returned by the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResponse {
    pub id: i64,
    pub case_id: String,
    pub plaintiff_name: String,
    pub defendant_name: String,
    #[schema(value_type = String, example = "PLAINTIFF")]
    pub submitted_by_role: Role,
    pub argument_text: String,
    pub evidence_text: String,
    #[schema(value_type = String, example = "PENDING")]
    pub status: SubmissionStatus,
    pub judge_notes: Option<String>,
}

impl From<Submission> for SubmissionResponse {
    fn from(s: Submission) -> Self {
        Self {
            id: s.id,
            case_id: s.case_id,
            plaintiff_name: s.plaintiff_name,
            defendant_name: s.defendant_name,
            submitted_by_role: s.submitted_by_role,
            argument_text: s.argument_text,
            evidence_text: s.evidence_text,
            status: s.status,
            judge_notes: s.judge_notes,
        }
    }
}

// ── Router ──────────────────────────────────────────────────────

/// Build the case workflow router. All routes require authentication.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/case/submit", post(submit_case))
        .route("/case/all", get(get_all))
        .route("/case/by-name/:name", get(by_name))
        .route("/case/edit/:id", patch(edit_submission))
        .route("/case/delete/:id", delete(delete_submission))
        .route("/case/approve/:id", patch(approve_submission))
        .route("/case/reject/:id", patch(reject_submission))
}

// ── Handlers ────────────────────────────────────────────────────

/// Mirror a mutated submission to the database (write-through).
async fn persist_update(state: &AppState, submission: &Submission) -> Result<(), AppError> {
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::submissions::update(pool, submission).await {
            tracing::error!(submission_id = submission.id, error = %e, "failed to persist submission update");
            return Err(AppError::Internal(
                "submission updated in-memory but database persist failed".to_string(),
            ));
        }
    }
    Ok(())
}

/// POST /case/submit — Open a new case submission.
///
/// Litigants only; the new record always starts PENDING and snapshots the
/// creator's role.
#[utoipa::path(
    post,
    path = "/case/submit",
    request_body = CaseSubmitRequest,
    responses(
        (status = 201, description = "Submission created", body = SubmissionResponse),
        (status = 403, description = "Role may not submit", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn submit_case(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Result<Json<CaseSubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    let req = extract_validated_json(body)?;

    let submission = state.submissions.submit(
        user.actor(),
        SubmissionDraft {
            case_id: req.case_id,
            plaintiff_name: req.plaintiff_name,
            defendant_name: req.defendant_name,
            argument_text: req.argument_text,
            evidence_text: req.evidence_text,
        },
    )?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::submissions::insert(pool, &submission).await {
            tracing::error!(submission_id = submission.id, error = %e, "failed to persist submission");
            return Err(AppError::Internal(
                "submission recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    tracing::info!(
        submission_id = submission.id,
        case_id = %submission.case_id,
        "case submitted"
    );
    Ok((StatusCode::CREATED, Json(submission.into())))
}

/// GET /case/all — List submissions visible to the caller.
///
/// Judges see everything; litigants see their own plus everyone's
/// approved; jurors see approved only.
#[utoipa::path(
    get,
    path = "/case/all",
    responses(
        (status = 200, description = "Visible submissions", body = [SubmissionResponse]),
        (status = 401, description = "Unauthenticated", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn get_all(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Json<Vec<SubmissionResponse>> {
    let visible = state.submissions.list_visible_to(user.actor());
    Json(visible.into_iter().map(Into::into).collect())
}

/// GET /case/by-name/{name} — Juror name search over approved submissions.
#[utoipa::path(
    get,
    path = "/case/by-name/{name}",
    params(("name" = String, Path, description = "Substring to match against party names")),
    responses(
        (status = 200, description = "Matching approved submissions", body = [SubmissionResponse]),
        (status = 403, description = "Role may not search", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn by_name(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<Json<Vec<SubmissionResponse>>, AppError> {
    let matched = state.submissions.search_by_name(user.actor(), &name)?;
    Ok(Json(matched.into_iter().map(Into::into).collect()))
}

/// PATCH /case/edit/{id} — Judge merge-patch edit.
#[utoipa::path(
    patch,
    path = "/case/edit/{id}",
    params(("id" = i64, Path, description = "Submission id")),
    request_body = SubmissionEditRequest,
    responses(
        (status = 200, description = "Updated submission", body = SubmissionResponse),
        (status = 403, description = "Role may not edit", body = crate::error::ErrorBody),
        (status = 404, description = "Submission not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn edit_submission(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Result<Json<SubmissionEditRequest>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let submission = state.submissions.edit(user.actor(), id, req.into())?;
    persist_update(&state, &submission).await?;
    Ok(Json(submission.into()))
}

/// DELETE /case/delete/{id} — Judge-only permanent removal.
#[utoipa::path(
    delete,
    path = "/case/delete/{id}",
    params(("id" = i64, Path, description = "Submission id")),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 403, description = "Role may not delete", body = crate::error::ErrorBody),
        (status = 404, description = "Submission not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn delete_submission(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.submissions.delete(user.actor(), id)?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::submissions::delete(pool, id).await {
            tracing::error!(submission_id = id, error = %e, "failed to delete submission from database");
            return Err(AppError::Internal(
                "submission deleted in-memory but database delete failed".to_string(),
            ));
        }
    }

    tracing::info!(submission_id = id, "submission deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /case/approve/{id} — Set status to APPROVED.
///
/// No guard on the current status: re-approval and APPROVED→REJECTED
/// flips succeed silently (pinned behavior).
#[utoipa::path(
    patch,
    path = "/case/approve/{id}",
    params(("id" = i64, Path, description = "Submission id")),
    request_body = SubmissionDecisionRequest,
    responses(
        (status = 200, description = "Approved submission", body = SubmissionResponse),
        (status = 403, description = "Role may not approve", body = crate::error::ErrorBody),
        (status = 404, description = "Submission not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn approve_submission(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Result<Json<SubmissionDecisionRequest>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let submission = state.submissions.approve(user.actor(), id, req.judge_notes)?;
    persist_update(&state, &submission).await?;
    tracing::info!(submission_id = id, "submission approved");
    Ok(Json(submission.into()))
}

/// PATCH /case/reject/{id} — Set status to REJECTED. Symmetric to approve.
#[utoipa::path(
    patch,
    path = "/case/reject/{id}",
    params(("id" = i64, Path, description = "Submission id")),
    request_body = SubmissionDecisionRequest,
    responses(
        (status = 200, description = "Rejected submission", body = SubmissionResponse),
        (status = 403, description = "Role may not reject", body = crate::error::ErrorBody),
        (status = 404, description = "Submission not found", body = crate::error::ErrorBody),
    ),
    tag = "cases"
)]
async fn reject_submission(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
    body: Result<Json<SubmissionDecisionRequest>, JsonRejection>,
) -> Result<Json<SubmissionResponse>, AppError> {
    let req = extract_validated_json(body)?;
    let submission = state.submissions.reject(user.actor(), id, req.judge_notes)?;
    persist_update(&state, &submission).await?;
    tracing::info!(submission_id = id, "submission rejected");
    Ok(Json(submission.into()))
}
