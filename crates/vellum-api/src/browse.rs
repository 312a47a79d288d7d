//! Read-only browsing: public profiles, archives, taxonomy filters,
//! search, and the owner's dashboard.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use vellum_types::api::{
    ArchiveResponse, DashboardResponse, FilteredArticlesResponse, SearchResponse,
    UserProfileResponse,
};

use crate::auth::AppState;
use crate::error::{ApiError, db_error, join_error, not_found};
use crate::middleware::Claims;
use crate::views::{archive_entry, article_summary, category_view, tag_view, user_view};

/// GET /users/{id} — public profile with published articles only.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let response = tokio::task::spawn_blocking(move || {
        let user = db
            .db
            .get_user_by_id(&uid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("user"))?;
        let article_count = db.db.count_articles(&uid, false).map_err(db_error)?;
        let category_count = db.db.count_categories(&uid).map_err(db_error)?;
        let tag_count = db.db.count_tags(&uid).map_err(db_error)?;
        let articles = db.db.list_by_owner(&uid, false).map_err(db_error)?;

        Ok(UserProfileResponse {
            user: user_view(user),
            article_count,
            category_count,
            tag_count,
            articles: articles.into_iter().map(article_summary).collect(),
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

/// GET /users/{id}/archive — taxonomy entities with at least one
/// published article, with counts.
pub async fn archive(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let response = tokio::task::spawn_blocking(move || {
        db.db
            .get_user_by_id(&uid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("user"))?;
        let categories = db.db.archive_categories(&uid).map_err(db_error)?;
        let tags = db.db.archive_tags(&uid).map_err(db_error)?;

        Ok(ArchiveResponse {
            categories: categories.into_iter().map(archive_entry).collect(),
            tags: tags.into_iter().map(archive_entry).collect(),
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

/// GET /users/{id}/categories/{category_id}/articles
pub async fn articles_by_category(
    State(state): State<AppState>,
    Path((user_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let cid = category_id.to_string();
    let response = tokio::task::spawn_blocking(move || {
        db.db
            .get_user_by_id(&uid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("user"))?;
        let category = db
            .db
            .get_category(&cid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("category"))?;
        let articles = db.db.list_by_category(&uid, &cid).map_err(db_error)?;

        Ok(FilteredArticlesResponse {
            filter_name: category.name,
            kind: "category".into(),
            articles: articles.into_iter().map(article_summary).collect(),
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

/// GET /users/{id}/tags/{tag_id}/articles
pub async fn articles_by_tag(
    State(state): State<AppState>,
    Path((user_id, tag_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = user_id.to_string();
    let tid = tag_id.to_string();
    let response = tokio::task::spawn_blocking(move || {
        db.db
            .get_user_by_id(&uid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("user"))?;
        let tag = db
            .db
            .get_tag(&tid)
            .map_err(db_error)?
            .ok_or_else(|| not_found("tag"))?;
        let articles = db.db.list_by_tag(&uid, &tid).map_err(db_error)?;

        Ok(FilteredArticlesResponse {
            filter_name: tag.name,
            kind: "tag".into(),
            articles: articles.into_iter().map(article_summary).collect(),
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_kind")]
    pub kind: String,
}

fn default_kind() -> String {
    "article".into()
}

/// GET /search?q=…&kind=article|user — title substring search over
/// published articles, or username/nickname search. A blank query
/// returns empty results rather than everything.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let q = query.q.trim().to_string();
    let kind = query.kind;

    let db = state.clone();
    let (articles, users) = {
        let q = q.clone();
        let kind = kind.clone();
        tokio::task::spawn_blocking(move || {
            if q.is_empty() {
                return Ok((vec![], vec![]));
            }
            match kind.as_str() {
                "user" => {
                    let users = db.db.search_users(&q).map_err(db_error)?;
                    Ok((vec![], users))
                }
                _ => {
                    let articles = db.db.search_articles(&q).map_err(db_error)?;
                    Ok((articles, vec![]))
                }
            }
        })
        .await
        .map_err(join_error)??
    };

    Ok(Json(SearchResponse {
        query: q,
        kind,
        articles: articles.into_iter().map(article_summary).collect(),
        users: users.into_iter().map(user_view).collect(),
    }))
}

/// GET /dashboard — the caller's own stats and articles, drafts
/// included.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let response = tokio::task::spawn_blocking(move || {
        let article_count = db.db.count_articles(&uid, true).map_err(db_error)?;
        let category_count = db.db.count_categories(&uid).map_err(db_error)?;
        let tag_count = db.db.count_tags(&uid).map_err(db_error)?;
        let articles = db.db.list_by_owner(&uid, true).map_err(db_error)?;

        Ok(DashboardResponse {
            article_count,
            category_count,
            tag_count,
            articles: articles.into_iter().map(article_summary).collect(),
        })
    })
    .await
    .map_err(join_error)??;

    Ok(Json(response))
}

/// GET /categories — the caller's categories, for the editor dropdown.
pub async fn my_categories(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let rows = tokio::task::spawn_blocking(move || db.db.list_categories(&uid))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let categories: Vec<_> = rows.into_iter().map(category_view).collect();
    Ok(Json(categories))
}

/// GET /tags — the caller's tags.
pub async fn my_tags(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let uid = claims.sub.to_string();
    let rows = tokio::task::spawn_blocking(move || db.db.list_tags(&uid))
        .await
        .map_err(join_error)?
        .map_err(db_error)?;

    let tags: Vec<_> = rows.into_iter().map(tag_view).collect();
    Ok(Json(tags))
}
