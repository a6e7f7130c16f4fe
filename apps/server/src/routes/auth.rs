//! Registration and login: the only routes outside the auth middleware.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use gudang_core::validation::{validate_email, validate_name};
use gudang_core::UserSummary;

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, Envelope};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// `{ token, user }` — what both auth routes hand back.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: UserSummary,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> ApiResult<Json<Envelope<SessionResponse>>> {
    validate_name("name", &body.name).map_err(|e| ApiError::validation(e.to_string()))?;
    validate_email(&body.email).map_err(|e| ApiError::validation(e.to_string()))?;
    if body.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = hash_password(&body.password)?;
    let user = state
        .db
        .users()
        .insert(body.name.trim(), body.email.trim(), &password_hash, "ADMIN")
        .await?;

    info!(email = %user.email, "User registered");

    let token = state.tokens.generate(&user.id, &user.name)?;
    Ok(ok(SessionResponse {
        token,
        user: UserSummary {
            id: user.id,
            name: user.name,
        },
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> ApiResult<Json<Envelope<SessionResponse>>> {
    let user = state
        .db
        .users()
        .find_by_email(body.email.trim())
        .await?
        // Same answer for unknown email and wrong password.
        .ok_or(ApiError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::Unauthorized);
    }

    info!(email = %user.email, "User logged in");

    let token = state.tokens.generate(&user.id, &user.name)?;
    Ok(ok(SessionResponse {
        token,
        user: UserSummary {
            id: user.id,
            name: user.name,
        },
    }))
}
