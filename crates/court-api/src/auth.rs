//! # Authentication
//!
//! Credential hashing (Argon2id), bearer token issuance and validation
//! (JWT, HS256), and the middleware that turns an `Authorization` header
//! into an [`AuthUser`] principal on the request.
//!
//! The token carries the user id and a role snapshot. Roles are immutable
//! after signup, so the snapshot cannot go stale.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use court_core::Role;

use crate::error::AppError;

/// A secret value that zeroizes its memory on drop and never appears in
/// debug output.
#[derive(Clone)]
pub struct SecretString(String);

impl SecretString {
    /// Wrap a secret.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the secret bytes. Keep the borrow short-lived.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString(****)")
    }
}

/// JWT claims for a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject — the user id, stringified per JWT convention.
    pub sub: String,
    /// Role snapshot at login.
    pub role: Role,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Verification material handed to the auth middleware via an Extension.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
}

/// The authenticated principal, attached to request extensions by
/// [`auth_middleware`] and consumed by handlers.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    /// The acting principal in the form the stores expect.
    pub fn actor(&self) -> court_core::Actor {
        court_core::Actor { id: self.id, role: self.role }
    }
}

// ── Passwords ────────────────────────────────────────────────────────

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns the PHC string form, which embeds algorithm, parameters, and
/// salt — everything `verify_password` needs.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// A hash that fails to parse counts as a verification failure (and is
/// logged) rather than an error the caller must branch on — login treats
/// both identically.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash failed to parse");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

// ── Tokens ───────────────────────────────────────────────────────────

/// Issue a signed session token for a user.
pub fn issue_token(
    user_id: i64,
    role: Role,
    secret: &SecretString,
    ttl_minutes: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iat,
        exp: iat + ttl_minutes * 60,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose().as_bytes()),
    )
}

/// Validate a token and return its claims. Expiry is enforced.
pub fn decode_token(
    token: &str,
    secret: &SecretString,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(secret.expose().as_bytes());
    Ok(decode::<Claims>(token, &key, &validation)?.claims)
}

// ── Middleware ───────────────────────────────────────────────────────

/// Middleware validating `Authorization: Bearer <token>` and attaching an
/// [`AuthUser`] to the request. Requests without a valid token are
/// rejected with 401 before reaching any handler.
pub async fn auth_middleware(
    axum::Extension(config): axum::Extension<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let Some(header) = header else {
        return AppError::Unauthorized("missing Authorization header".into()).into_response();
    };
    let Some(token) = header.strip_prefix("Bearer ") else {
        return AppError::Unauthorized("Authorization header must use Bearer scheme".into())
            .into_response();
    };

    let claims = match decode_token(token, &config.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "token validation failed");
            return AppError::Unauthorized("invalid or expired token".into()).into_response();
        }
    };

    // A malformed subject means the token was not issued by us, whatever
    // its signature says.
    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return AppError::Unauthorized("invalid token subject".into()).into_response();
    };

    request
        .extensions_mut()
        .insert(AuthUser { id: user_id, role: claims.role });
    next.run(request).await
}
