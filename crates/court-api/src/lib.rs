//! # court-api — Axum API Surface for the Court Stack
//!
//! Role-based case management: users sign up as plaintiff, defendant,
//! juror, or judge; litigants submit case narratives; judges decide them;
//! jurors vote. Authorization decisions live in `court-core`, records and
//! workflow in `court-state`; this crate is the request/response mapping
//! plus the ambient plumbing (auth tokens, metrics, persistence).
//!
//! ## API Surface
//!
//! | Route                    | Method | Module            | Auth            |
//! |--------------------------|--------|-------------------|-----------------|
//! | `/auth/signup`           | POST   | [`routes::auth`]  | none            |
//! | `/auth/login`            | POST   | [`routes::auth`]  | none            |
//! | `/case/submit`           | POST   | [`routes::cases`] | litigant        |
//! | `/case/all`              | GET    | [`routes::cases`] | any             |
//! | `/case/by-name/{name}`   | GET    | [`routes::cases`] | juror           |
//! | `/case/edit/{id}`        | PATCH  | [`routes::cases`] | judge           |
//! | `/case/delete/{id}`      | DELETE | [`routes::cases`] | judge           |
//! | `/case/approve/{id}`     | PATCH  | [`routes::cases`] | judge           |
//! | `/case/reject/{id}`      | PATCH  | [`routes::cases`] | judge           |
//! | `/jury/vote/{case_id}`   | POST   | [`routes::jury`]  | juror           |
//! | `/jury/results/{case_id}`| GET    | [`routes::jury`]  | juror or judge  |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`), `/metrics`, `/openapi.json`, and the
//! `/auth/*` routes are mounted outside the auth middleware.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use court_core::{Role, SubmissionStatus};

use crate::auth::AuthConfig;
use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// The `/case/*` and `/jury/*` routes sit behind the bearer-token
/// middleware; everything else (signup, login, health, metrics, OpenAPI)
/// is reachable without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig { jwt_secret: state.config.jwt_secret.clone() };
    let metrics = ApiMetrics::new();
    let metrics_on = state.config.metrics_enabled;

    // Authenticated API routes.
    //
    // Body size limit: 2 MiB, plenty for narrative text while bounding
    // memory per request.
    //
    // Middleware execution order (outermost → innermost):
    //   TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
    let mut api = Router::new()
        .merge(routes::cases::router())
        .merge(routes::jury::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(from_fn(auth::auth_middleware));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .layer(Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated routes: identity bootstrap, probes, spec.
    let mut unauthenticated = Router::new()
        .merge(routes::auth::router())
        .merge(openapi::router())
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    // Mount /metrics when enabled (unauthenticated, like health probes).
    if metrics_on {
        unauthenticated = unauthenticated
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates domain gauges from current `AppState` on each scrape (pull
/// model), then gathers and encodes all metrics in Prometheus text
/// exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    // -- Update domain gauges from AppState --

    // Users by role.
    let users = state.users.list();
    metrics.users_total().reset();
    for role in Role::ALL {
        let count = users.iter().filter(|u| u.role == role).count();
        metrics
            .users_total()
            .with_label_values(&[role.as_str()])
            .set(count as f64);
    }

    // Submissions by status.
    let submissions = state.submissions.list();
    metrics.submissions_total().reset();
    for status in SubmissionStatus::ALL {
        let count = submissions.iter().filter(|s| s.status == status).count();
        metrics
            .submissions_total()
            .with_label_values(&[status.as_str()])
            .set(count as f64);
    }

    // Total votes.
    metrics.votes_total().set(state.votes.len() as f64);

    // -- Gather and encode --
    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks:
/// - In-memory stores are accessible (locks acquirable).
/// - Database connection is healthy (when configured).
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Verify stores are accessible (read lock acquirable).
    let _ = state.users.len();
    let _ = state.submissions.len();
    let _ = state.votes.len();

    // Verify database connection (when configured).
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("Database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
