use axum::{Extension, Json, extract::State, response::IntoResponse};

use vellum_types::api::ProfileUpdateRequest;

use crate::auth::AppState;
use crate::error::{ApiError, db_error, join_error, not_found};
use crate::middleware::Claims;
use crate::views::user_view;

/// PUT /profile — full overwrite of the editable fields. The profile
/// form submits every input, so a blank one clears the stored value.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let user = tokio::task::spawn_blocking(move || {
        db.db
            .update_profile(
                &uid,
                normalize(&req.nickname),
                normalize(&req.gender),
                normalize(&req.repo_link),
                normalize(&req.bio),
            )
            .map_err(db_error)?;
        db.db
            .get_user_by_id(&uid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("user"))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(user_view(user)))
}

fn normalize(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
