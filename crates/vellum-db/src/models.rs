//! Database row types that map directly to SQLite rows.
//! Distinct from the vellum-types API models to keep the DB layer
//! independent; ids and timestamps stay as the TEXT SQLite stores.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub nickname: Option<String>,
    pub gender: Option<String>,
    pub repo_link: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: String,
    pub last_login: Option<String>,
    pub created_at: String,
}

pub struct CategoryRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
}

pub struct TagRow {
    pub id: String,
    pub owner_id: String,
    pub name: String,
}

pub struct ArticleRow {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub category_id: Option<String>,
    pub is_draft: bool,
    pub cover_url: Option<String>,
    pub update_time: String,
    pub created_at: String,
}

/// Feed/list projection: article joined with its author's username and
/// its category name, so list endpoints need a single query.
pub struct ArticleListRow {
    pub id: String,
    pub owner_id: String,
    pub author_username: String,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    pub category_name: Option<String>,
    pub is_draft: bool,
    pub cover_url: Option<String>,
    pub update_time: String,
}

pub struct CommentRow {
    pub id: String,
    pub article_id: String,
    pub author_id: String,
    pub author_username: String,
    pub content: String,
    pub created_at: String,
}

/// Archive aggregation: taxonomy entity plus its published-article count.
pub struct ArchiveRow {
    pub id: String,
    pub name: String,
    pub count: i64,
}

/// Parse a SQLite timestamp. SQLite's datetime('now') stores
/// "YYYY-MM-DD HH:MM:SS" without a timezone, so fall back to naive UTC
/// when the RFC 3339 parse fails.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", s, e);
            DateTime::default()
        })
}

/// Ids are stored as TEXT uuids. A corrupt value is logged and zeroed
/// rather than failing the whole response.
pub fn parse_uuid(s: &str) -> Uuid {
    s.parse().unwrap_or_else(|e| {
        warn!("Corrupt uuid '{}': {}", s, e);
        Uuid::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_datetime_format() {
        let dt = parse_datetime("2026-03-14 09:26:53");
        assert_eq!(dt.to_rfc3339(), "2026-03-14T09:26:53+00:00");
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_datetime("2026-03-14T09:26:53Z");
        assert_eq!(dt.to_rfc3339(), "2026-03-14T09:26:53+00:00");
    }

    #[test]
    fn corrupt_uuid_becomes_nil() {
        assert_eq!(parse_uuid("not-a-uuid"), Uuid::default());
    }
}
