//! Row-to-DTO mapping. Text metrics are recomputed from the Markdown
//! source on every render; nothing derived is stored.

use vellum_db::models::{
    ArchiveRow, ArticleListRow, CategoryRow, CommentRow, TagRow, UserRow, parse_datetime,
    parse_uuid,
};
use vellum_engine::compute_metrics;
use vellum_types::api::{ArchiveEntry, ArticleSummary, CommentView};
use vellum_types::models::{Category, Tag, User};

pub fn user_view(row: UserRow) -> User {
    User {
        id: parse_uuid(&row.id),
        username: row.username,
        nickname: row.nickname,
        gender: row.gender,
        repo_link: row.repo_link,
        bio: row.bio,
        avatar_url: row.avatar_url,
        last_login: row.last_login.as_deref().map(parse_datetime),
        created_at: parse_datetime(&row.created_at),
    }
}

pub fn article_summary(row: ArticleListRow) -> ArticleSummary {
    let metrics = compute_metrics(&row.content);
    ArticleSummary {
        id: parse_uuid(&row.id),
        owner_id: parse_uuid(&row.owner_id),
        author_username: row.author_username,
        title: row.title,
        summary: row.summary,
        category: row.category_name,
        cover_url: row.cover_url,
        is_draft: row.is_draft,
        update_time: parse_datetime(&row.update_time),
        word_count: metrics.word_count,
        read_minutes: metrics.read_minutes,
    }
}

pub fn comment_view(row: CommentRow) -> CommentView {
    CommentView {
        id: parse_uuid(&row.id),
        author_id: parse_uuid(&row.author_id),
        author_username: row.author_username,
        content: row.content,
        created_at: parse_datetime(&row.created_at),
    }
}

pub fn category_view(row: CategoryRow) -> Category {
    Category {
        id: parse_uuid(&row.id),
        owner_id: parse_uuid(&row.owner_id),
        name: row.name,
    }
}

pub fn tag_view(row: TagRow) -> Tag {
    Tag {
        id: parse_uuid(&row.id),
        owner_id: parse_uuid(&row.owner_id),
        name: row.name,
    }
}

pub fn archive_entry(row: ArchiveRow) -> ArchiveEntry {
    ArchiveEntry {
        id: parse_uuid(&row.id),
        name: row.name,
        count: row.count,
    }
}
