use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Category, Tag, User};

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

// -- Articles --

/// List-view projection of an article. Word count and read time are
/// recomputed from the Markdown source on every render.
#[derive(Debug, Serialize)]
pub struct ArticleSummary {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub author_username: String,
    pub title: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub cover_url: Option<String>,
    pub is_draft: bool,
    pub update_time: DateTime<Utc>,
    pub word_count: usize,
    pub read_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub author_username: String,
    pub author_avatar_url: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub is_draft: bool,
    pub cover_url: Option<String>,
    pub update_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub word_count: usize,
    pub read_minutes: u32,
    pub comments: Vec<CommentView>,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// -- Profiles --

/// Full overwrite of the editable profile fields — absent fields clear
/// the stored value, mirroring the profile form submitting every input.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdateRequest {
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub repo_link: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub user: User,
    pub article_count: i64,
    pub category_count: i64,
    pub tag_count: i64,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub article_count: i64,
    pub category_count: i64,
    pub tag_count: i64,
    pub articles: Vec<ArticleSummary>,
}

// -- Browsing --

#[derive(Debug, Serialize)]
pub struct ArchiveEntry {
    pub id: Uuid,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct ArchiveResponse {
    pub categories: Vec<ArchiveEntry>,
    pub tags: Vec<ArchiveEntry>,
}

#[derive(Debug, Serialize)]
pub struct FilteredArticlesResponse {
    pub filter_name: String,
    pub kind: String,
    pub articles: Vec<ArticleSummary>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub kind: String,
    pub articles: Vec<ArticleSummary>,
    pub users: Vec<User>,
}

// -- Uploads --

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar_url: String,
}

// -- Summarization --

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}
