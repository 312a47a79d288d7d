use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered author. The password hash never leaves vellum-db,
/// so this model is safe to serialize into responses as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub repo_link: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Single-select classification, scoped to its owner: two users may
/// each have a category with the same name and those are distinct rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
}

/// Multi-select label, same per-owner scoping as [`Category`] but a
/// separate namespace — a tag and a category may share a literal name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
}

/// A fully populated article: category and tags resolved, cover URL
/// attached. `owner_id` never changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub category: Option<Category>,
    pub tags: Vec<Tag>,
    pub is_draft: bool,
    pub cover_url: Option<String>,
    pub update_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
