//! # Identity Routes
//!
//! Signup and login. Both are mounted outside the auth middleware — they
//! are how a client obtains a token in the first place.
//!
//! Duplicate email returns 400 (CONFLICT code) and invalid credentials
//! return 401 with a deliberately non-specific message: whether the email
//! or the password was wrong is not disclosed.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use court_core::{validate, Role};
use court_state::User;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::AppState;

/// Request to create an account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    /// Display name, 1–120 characters.
    pub name: String,
    /// Email address; compared case-insensitively, must be unique.
    pub email: String,
    /// Password, 8–128 characters.
    pub password: String,
    /// Role, fixed for the lifetime of the account.
    #[schema(value_type = String, example = "JUROR")]
    pub role: Role,
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), String> {
        validate::check_name("name", &self.name).map_err(|e| e.to_string())?;
        validate::check_password(&self.password).map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// A user record as returned by the API. Never includes the credential
/// hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "JUROR")]
    pub role: Role,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name, email: user.email, role: user.role }
    }
}

/// Request to authenticate.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        if self.email.is_empty() || self.password.is_empty() {
            return Err("email and password are required".into());
        }
        Ok(())
    }
}

/// A freshly issued session token.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

// ── Router ──────────────────────────────────────────────────────

/// Build the identity router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

// ── Handlers ────────────────────────────────────────────────────

/// POST /auth/signup — Create an account.
///
/// The email is normalized to lowercase before the uniqueness check, so
/// `Ada@Example.com` and `ada@example.com` are the same account.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Email already registered", body = crate::error::ErrorBody),
        (status = 422, description = "Validation error", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let req = extract_validated_json(body)?;
    let email = validate::normalize_email(&req.email)?;
    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    let user = state.users.create(req.name, email, password_hash, req.role)?;

    // Persist to database (write-through). Failure is surfaced because the
    // in-memory record would be lost on restart.
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::users::insert(pool, &user).await {
            tracing::error!(user_id = user.id, error = %e, "failed to persist user to database");
            return Err(AppError::Internal(
                "user recorded in-memory but database persist failed".to_string(),
            ));
        }
    }

    tracing::info!(user_id = user.id, role = %user.role, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login — Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorBody),
    ),
    tag = "auth"
)]
async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let req = extract_validated_json(body)?;

    let user = state
        .users
        .find_by_email(&req.email)
        .filter(|user| verify_password(&req.password, &user.password_hash))
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    let access_token = issue_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.token_ttl_minutes,
    )
    .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

    Ok(Json(TokenResponse { access_token, token_type: "bearer".to_string() }))
}
