//! Article endpoints: public feed and detail, authenticated authoring,
//! and comment posting. The editor submits multipart forms so the
//! cover image rides along with the scalar fields.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use vellum_db::models::{CommentRow, UserRow};
use vellum_engine::{
    ArticleFields, CoverFile, PostStatus, compute_metrics, load_article_for_viewer,
};
use vellum_types::api::{ArticleDetail, CommentRequest};
use vellum_types::models::Article;

use crate::auth::AppState;
use crate::error::{ApiError, bad_request, db_error, engine_error, join_error, not_found};
use crate::middleware::{Claims, bearer_claims};
use crate::uploads::MAX_IMAGE_SIZE;
use crate::views::{article_summary, comment_view};

/// GET /articles — published feed, newest first.
pub async fn list_articles(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_published(100))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let feed: Vec<_> = rows.into_iter().map(article_summary).collect();
    Ok(Json(feed))
}

/// GET /articles/{id} — full detail. Drafts answer 404 to everyone
/// but their owner; an optional bearer token is honored.
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let claims = bearer_claims(&headers, &state.jwt_secret);

    let db = state.clone();
    let id = article_id.to_string();
    let detail = tokio::task::spawn_blocking(move || {
        let viewer = claims.map(|c| c.sub.to_string());
        let article = load_article_for_viewer(&db.db, &id, viewer.as_deref())
            .map_err(engine_error)?;
        assemble_detail(&db, article)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(detail))
}

/// POST /articles — multipart create. Returns the populated detail so
/// the editor can redirect straight to the new article.
pub async fn create_article(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (fields, cover) = read_article_form(multipart).await?;

    let db = state.clone();
    let owner_id = claims.sub.to_string();
    let detail = tokio::task::spawn_blocking(move || {
        let article = vellum_engine::create_article(&db.db, &db.covers, &owner_id, fields, cover)
            .map_err(engine_error)?;
        assemble_detail(&db, article)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// PUT /articles/{id} — multipart full update.
pub async fn update_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (fields, cover) = read_article_form(multipart).await?;

    let db = state.clone();
    let owner_id = claims.sub.to_string();
    let id = article_id.to_string();
    let detail = tokio::task::spawn_blocking(move || {
        let article =
            vellum_engine::update_article(&db.db, &db.covers, &owner_id, &id, fields, cover)
                .map_err(engine_error)?;
        assemble_detail(&db, article)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(detail))
}

/// DELETE /articles/{id} — owner only; cascades to comments.
pub async fn delete_article(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let owner_id = claims.sub.to_string();
    let id = article_id.to_string();
    tokio::task::spawn_blocking(move || vellum_engine::delete_article(&db.db, &owner_id, &id))
        .await
        .map_err(join_error)?
        .map_err(engine_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /articles/{id}/comments
pub async fn post_comment(
    State(state): State<AppState>,
    Path(article_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = req.content.trim().to_string();
    if content.is_empty() {
        return Err(bad_request("comment content must not be empty"));
    }

    let db = state.clone();
    let aid = article_id.to_string();
    let author_id = claims.sub.to_string();
    let comment = tokio::task::spawn_blocking(move || {
        db.db
            .get_article(&aid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("article"))?;

        let comment_id = Uuid::new_v4().to_string();
        db.db
            .insert_comment(&comment_id, &aid, &author_id, &content)
            .map_err(db_error)?;
        db.db
            .get_comment(&comment_id)
            .map_err(db_error)?
            .ok_or_else(|| not_found("comment"))
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(comment_view(comment))))
}

/// Joins the engine's article with its author row and comments.
/// Runs on the blocking pool with the engine calls.
fn assemble_detail(state: &AppState, article: Article) -> Result<ArticleDetail, ApiError> {
    let owner_id = article.owner_id.to_string();
    let author = state
        .db
        .get_user_by_id(&owner_id)
        .map_err(db_error)?
        .ok_or_else(|| not_found("article"))?;
    let comments = state
        .db
        .comments_for_article(&article.id.to_string())
        .map_err(db_error)?;
    Ok(detail_view(article, author, comments))
}

fn detail_view(article: Article, author: UserRow, comments: Vec<CommentRow>) -> ArticleDetail {
    let metrics = compute_metrics(&article.content);
    ArticleDetail {
        id: article.id,
        owner_id: article.owner_id,
        author_username: author.username,
        author_avatar_url: author.avatar_url,
        title: article.title,
        summary: article.summary,
        content: article.content,
        category: article.category,
        tags: article.tags,
        is_draft: article.is_draft,
        cover_url: article.cover_url,
        update_time: article.update_time,
        created_at: article.created_at,
        word_count: metrics.word_count,
        read_minutes: metrics.read_minutes,
        comments: comments.into_iter().map(comment_view).collect(),
    }
}

/// Pulls the editor's form fields out of the multipart body. Unknown
/// fields are ignored; an empty or nameless cover part means no cover.
async fn read_article_form(
    mut multipart: Multipart,
) -> Result<(ArticleFields, Option<CoverFile>), ApiError> {
    let mut fields = ArticleFields::default();
    let mut cover = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => fields.title = text(field).await?,
            "summary" => fields.summary = Some(text(field).await?),
            "content" => fields.content = text(field).await?,
            "category" => fields.category = text(field).await?,
            "tags" => fields.tags = text(field).await?,
            "post_status" => fields.post_status = PostStatus::parse(&text(field).await?),
            "cover_file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| bad_request(format!("failed to read cover upload: {e}")))?;
                if data.len() > MAX_IMAGE_SIZE {
                    return Err((
                        StatusCode::PAYLOAD_TOO_LARGE,
                        "cover image exceeds the 5 MB limit".into(),
                    ));
                }
                if !filename.is_empty() && !data.is_empty() {
                    cover = Some(CoverFile {
                        filename,
                        data: data.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok((fields, cover))
}

async fn text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| bad_request(format!("malformed form field: {e}")))
}
