use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use vellum_db::Database;
use vellum_engine::Storage;
use vellum_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::{ApiError, db_error, join_error};
use crate::middleware::Claims;
use crate::summarize::Summarizer;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub covers: Storage,
    pub jwt_secret: String,
    pub summarizer: Summarizer,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate input
    if req.username.len() < 3 || req.username.len() > 32 {
        return Err((
            StatusCode::BAD_REQUEST,
            "username must be 3-32 characters".into(),
        ));
    }
    if req.password.len() < 8 {
        return Err((
            StatusCode::BAD_REQUEST,
            "password must be at least 8 characters".into(),
        ));
    }

    // Check if username is taken
    let db = state.clone();
    let username = req.username.clone();
    if tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(join_error)?
        .map_err(db_error)?
        .is_some()
    {
        return Err((StatusCode::CONFLICT, "username already taken".into()));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
        })?
        .to_string();

    let user_id = Uuid::new_v4();

    let db = state.clone();
    let uid = user_id.to_string();
    let username = req.username.clone();
    tokio::task::spawn_blocking(move || {
        db.db
            .create_user(&uid, &username, &password_hash, &placeholder_avatar(&uid))
    })
    .await
    .map_err(join_error)?
    .map_err(db_error)?;

    let token = create_token(&state.jwt_secret, user_id, &req.username).map_err(db_error)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid = || (StatusCode::UNAUTHORIZED, "invalid credentials".into());

    let db = state.clone();
    let username = req.username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user_by_username(&username))
        .await
        .map_err(join_error)?
        .map_err(db_error)?
        .ok_or_else(invalid)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password).map_err(|e| {
        tracing::error!("Stored password hash unparseable for '{}': {}", user.username, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
    })?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| invalid())?;

    let user_id: Uuid = user.id.parse().map_err(|_| {
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
    })?;

    let db = state.clone();
    let uid = user.id.clone();
    tokio::task::spawn_blocking(move || db.db.touch_last_login(&uid))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let token = create_token(&state.jwt_secret, user_id, &user.username).map_err(db_error)?;

    Ok(Json(LoginResponse {
        user_id,
        username: user.username,
        token,
    }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Generated identicon keyed on the user id, assigned at registration
/// and replaced by the first avatar upload.
fn placeholder_avatar(user_id: &str) -> String {
    format!("https://api.dicebear.com/9.x/identicon/svg?seed={user_id}")
}
