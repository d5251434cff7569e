//! User registration.
//!
//! `POST /api/users` creates an account with an Argon2-hashed password.
//! There is no login or session handling; the consuming UI passes user
//! ids straight to the favorites endpoints.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::password;
use crate::store::{NewUser, NewsStore, PublicUser, SharedStore};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// `POST /api/users`
pub async fn register_user(
    State(store): State<SharedStore>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let username = body.username.as_deref().map(str::trim).unwrap_or("");
    let password = body.password.as_deref().unwrap_or("");

    let mut errors = Vec::new();
    if username.is_empty() {
        errors.push("username is required".to_string());
    }
    if password.len() < MIN_PASSWORD_LEN {
        errors.push(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation {
            message: "Validation error".to_string(),
            errors,
        });
    }

    let existing = store
        .get_user_by_username(username)
        .await
        .map_err(|err| ApiError::internal("Failed to create user", err))?;
    if existing.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }

    let hash = password::hash_password(password)
        .map_err(|err| ApiError::internal("Failed to create user", err))?;
    let user = store
        .create_user(NewUser {
            username: username.to_string(),
            password: hash,
        })
        .await
        .map_err(|err| ApiError::internal("Failed to create user", err))?;

    Ok((StatusCode::CREATED, Json(PublicUser::from(user))))
}
