// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.
//!
//! Register and login issue a session JWT both in the response body and as
//! the `greenways_token` cookie that `require_auth` reads.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::credential::normalize_email;
use crate::models::{Credential, User};
use crate::routes::extract::ValidJson;
use crate::routes::views::UserResponse;
use crate::services::password::{hash_password_blocking, verify_password_blocking};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[validate(email, length(max = 254))]
    email: String,
    #[validate(length(min = 8, max = 128))]
    password: String,
}

#[derive(Deserialize, Validate)]
struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    email: String,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    /// Same JWT as the session cookie, for Bearer clients
    pub token: String,
    /// None if the account has no profile yet
    pub user: Option<UserResponse>,
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.frontend_url.starts_with("https://"))
        .build()
}

fn issue_session(state: &AppState, jar: CookieJar, user_id: &str) -> Result<(CookieJar, String)> {
    let token = create_jwt(user_id, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(state, token.clone()));
    Ok((jar, token))
}

/// Create an account and sign it in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let email = normalize_email(&req.email);
    // Emails key the credentials collection and document IDs cannot hold '/'.
    if email.contains('/') {
        return Err(AppError::BadRequest("email: invalid character".to_string()));
    }

    let credential = Credential {
        email: email.clone(),
        user_id: uuid::Uuid::new_v4().to_string(),
        password_hash: hash_password_blocking(req.password).await?,
    };

    if !state.db.create_credential(&credential).await? {
        tracing::info!(email = %email, "Registration for existing email");
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let now = format_utc_rfc3339(chrono::Utc::now());
    let profile = User {
        user_id: credential.user_id.clone(),
        name: req.name,
        email: Some(email),
        favorite_routes: vec![],
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_user(&profile).await?;

    tracing::info!(user_id = %profile.user_id, "Account registered");

    let (jar, token) = issue_session(&state, jar, &profile.user_id)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            token,
            user: Some(profile.into()),
        }),
    ))
}

/// Exchange email and password for a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let email = normalize_email(&req.email);

    let Some(credential) = state.db.get_credential(&email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(req.password, credential.password_hash).await? {
        tracing::info!(user_id = %credential.user_id, "Login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let profile = state.db.get_user(&credential.user_id).await?;
    tracing::info!(user_id = %credential.user_id, "Login successful");

    let (jar, token) = issue_session(&state, jar, &credential.user_id)?;
    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: profile.map(UserResponse::from),
        }),
    ))
}

/// Clear the session cookie.
///
/// Tokens are stateless, so a copied Bearer token stays valid until it expires.
async fn logout(jar: CookieJar) -> (StatusCode, CookieJar) {
    (
        StatusCode::NO_CONTENT,
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Database;

    #[test]
    fn test_session_cookie_attributes() {
        let state = AppState::new(Config::default(), Database::new_mock());
        let cookie = session_cookie(&state, "abc".to_string());

        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_session_cookie_secure_for_https_frontend() {
        let config = Config {
            frontend_url: "https://greenways.example".to_string(),
            ..Config::default()
        };
        let state = AppState::new(config, Database::new_mock());
        assert_eq!(session_cookie(&state, "abc".to_string()).secure(), Some(true));
    }
}
