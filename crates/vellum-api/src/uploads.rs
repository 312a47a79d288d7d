//! Standalone image uploads: avatars and in-article editor images.
//! Covers ride with the article form instead (see `articles`).

use axum::{
    Extension, Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};

use vellum_engine::CoverStore;
use vellum_types::api::{AvatarResponse, UploadResponse};

use crate::auth::AppState;
use crate::error::{ApiError, bad_request, db_error, join_error};
use crate::middleware::Claims;

/// 5 MB upload limit for images.
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// POST /upload/avatar — stores the file under the caller's avatar
/// directory and points `avatar_url` at it.
pub async fn upload_avatar(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, data) = read_image(multipart).await?;
    let uid = claims.sub.to_string();
    let rel_path = format!("users/{uid}/avatar/avatar_{}", sanitize_filename(&filename));
    let url = format!("/uploads/{rel_path}");

    let db = state.clone();
    let avatar_url = url.clone();
    tokio::task::spawn_blocking(move || {
        db.covers.save(&rel_path, &data).map_err(|e| {
            tracing::error!("Avatar write failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to store uploaded file".to_string(),
            )
        })?;
        db.db.set_avatar_url(&uid, &avatar_url).map_err(db_error)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(AvatarResponse { avatar_url: url }))
}

/// POST /upload/editor-image — stores an image referenced from
/// article Markdown and returns its public URL for the editor.
pub async fn upload_editor_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (filename, data) = read_image(multipart).await?;
    let uid = claims.sub.to_string();
    let rel_path = format!("users/{uid}/articles/{}", sanitize_filename(&filename));
    let url = format!("/uploads/{rel_path}");

    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        db.covers.save(&rel_path, &data).map_err(|e| {
            tracing::error!("Editor image write failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to store uploaded file".to_string(),
            )
        })
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}

/// Takes the first file part of the multipart body, enforcing the
/// size cap.
async fn read_image(mut multipart: Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| bad_request(format!("failed to read upload: {e}")))?;
        if data.len() > MAX_IMAGE_SIZE {
            return Err((
                StatusCode::PAYLOAD_TOO_LARGE,
                "image exceeds the 5 MB limit".into(),
            ));
        }
        if data.is_empty() {
            return Err(bad_request("uploaded file is empty"));
        }
        return Ok((filename, data.to_vec()));
    }
    Err(bad_request("no file in request"))
}

/// Flattens an uploaded filename to a single safe path segment:
/// separators and shell-hostile characters become underscores, and
/// leading dots are dropped so nothing can climb out of the upload
/// root or hide itself.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "file".into()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("a/b\\c.png"), "a_b_c.png");
    }

    #[test]
    fn sanitize_drops_leading_dots() {
        assert_eq!(sanitize_filename(".bashrc"), "bashrc");
        assert_eq!(sanitize_filename("..."), "file");
    }

    #[test]
    fn sanitize_keeps_ordinary_names() {
        assert_eq!(sanitize_filename("photo-2026_01.PNG"), "photo-2026_01.PNG");
    }
}
