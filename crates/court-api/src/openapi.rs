//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Bearer token authentication. Obtain a token via POST /auth/login.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Court API — Role-Based Case Management",
        version = "0.2.3",
        description = "Role-based case management: users sign up as plaintiff, defendant, juror, or judge; litigants submit case narratives; judges edit, approve, reject, and delete them; jurors cast one vote per case and read tallies.\n\nAuthentication: Bearer token via `Authorization: Bearer <token>` header. The `/case/*` and `/jury/*` endpoints require authentication; `/auth/*`, health probes, and `/metrics` do not.",
        license(name = "Apache-2.0"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        // ── Identity ─────────────────────────────────────────────────────
        crate::routes::auth::signup,
        crate::routes::auth::login,
        // ── Case workflow ────────────────────────────────────────────────
        crate::routes::cases::submit_case,
        crate::routes::cases::get_all,
        crate::routes::cases::by_name,
        crate::routes::cases::edit_submission,
        crate::routes::cases::delete_submission,
        crate::routes::cases::approve_submission,
        crate::routes::cases::reject_submission,
        // ── Jury ─────────────────────────────────────────────────────────
        crate::routes::jury::vote,
        crate::routes::jury::results,
    ),
    components(
        schemas(
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            // ── Identity DTOs ───────────────────────────────────────────
            crate::routes::auth::SignupRequest,
            crate::routes::auth::UserResponse,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::TokenResponse,
            // ── Case DTOs ───────────────────────────────────────────────
            crate::routes::cases::CaseSubmitRequest,
            crate::routes::cases::SubmissionEditRequest,
            crate::routes::cases::SubmissionDecisionRequest,
            crate::routes::cases::SubmissionResponse,
            // ── Jury DTOs ───────────────────────────────────────────────
            crate::routes::jury::VoteRequest,
            crate::routes::jury::VoteConfirmation,
            crate::routes::jury::VoteResultResponse,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup and login — token issuance"),
        (name = "cases", description = "Case submission workflow: submit, list, search, and judge decisions"),
        (name = "jury", description = "Juror voting and vote tallies"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON spec at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_generates_successfully() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "Court API — Role-Based Case Management");
    }

    #[test]
    fn spec_has_all_routes() {
        let spec = ApiDoc::openapi();
        for path in [
            "/auth/signup",
            "/auth/login",
            "/case/submit",
            "/case/all",
            "/case/by-name/{name}",
            "/case/edit/{id}",
            "/case/delete/{id}",
            "/case/approve/{id}",
            "/case/reject/{id}",
            "/jury/vote/{case_id}",
            "/jury/results/{case_id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn spec_has_schemas() {
        let spec = ApiDoc::openapi();
        let schemas = &spec.components.as_ref().unwrap().schemas;
        for name in [
            "SignupRequest",
            "UserResponse",
            "TokenResponse",
            "CaseSubmitRequest",
            "SubmissionResponse",
            "VoteRequest",
            "VoteResultResponse",
            "ErrorBody",
        ] {
            assert!(schemas.contains_key(name), "missing {name} schema");
        }
    }

    #[test]
    fn spec_has_security_scheme() {
        let spec = ApiDoc::openapi();
        let components = spec.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn spec_serializes_to_json() {
        let json = serde_json::to_string(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("openapi"));
        assert!(json.contains("bearer_auth"));
    }

    #[test]
    fn router_builds_successfully() {
        let _router = router();
    }
}
