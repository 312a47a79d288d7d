//! Article lifecycle: create, update, delete.
//!
//! Creation is two-phase. The scalar fields and taxonomy commit first
//! so the row has a stable id, then the cover file is written under a
//! path derived from that id and the reference is filled in. A cover
//! write failure surfaces as an error but leaves the committed article
//! in place; the two phases are not one transaction.

use tracing::debug;
use uuid::Uuid;
use vellum_db::models::{ArticleRow, CategoryRow, TagRow, parse_datetime, parse_uuid};
use vellum_db::{Database, queries};
use vellum_types::models::{Article, Category, Tag};

use crate::EngineError;
use crate::storage::{CoverStore, file_ext};
use crate::taxonomy::{resolve_category, resolve_tags};

const UNTITLED: &str = "Untitled Draft";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostStatus {
    Draft,
    #[default]
    Published,
}

impl PostStatus {
    /// Editor form value. Anything other than "draft" publishes,
    /// matching the form's default submit.
    pub fn parse(s: &str) -> Self {
        if s == "draft" {
            PostStatus::Draft
        } else {
            PostStatus::Published
        }
    }

    pub fn is_draft(self) -> bool {
        self == PostStatus::Draft
    }
}

/// The complete editor submission. Update overwrites every scalar
/// field from this struct; there are no partial updates.
#[derive(Debug, Clone, Default)]
pub struct ArticleFields {
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
    /// Free-text category name; blank means no category.
    pub category: String,
    /// Comma-separated tag names; both comma widths accepted.
    pub tags: String,
    pub post_status: PostStatus,
}

/// An uploaded cover image. Only the extension of the original
/// filename survives into the stored path.
#[derive(Debug, Clone)]
pub struct CoverFile {
    pub filename: String,
    pub data: Vec<u8>,
}

pub fn create_article(
    db: &Database,
    covers: &dyn CoverStore,
    owner_id: &str,
    fields: ArticleFields,
    cover: Option<CoverFile>,
) -> Result<Article, EngineError> {
    let (title, summary) = normalize_scalars(&fields)?;
    let article_id = Uuid::new_v4().to_string();

    // Phase one: scalars and taxonomy in a single transaction. The id
    // is stable once this commits.
    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        let category = resolve_category(&*tx, owner_id, &fields.category)?;
        queries::insert_article(
            &tx,
            &article_id,
            owner_id,
            &title,
            summary,
            fields.content.trim(),
            category.as_ref().map(|c| c.id.as_str()),
            fields.post_status.is_draft(),
        )?;
        let tags = resolve_tags(&*tx, owner_id, &fields.tags)?;
        for tag in &tags {
            queries::link_tag(&tx, &article_id, &tag.id)?;
        }
        tx.commit()?;
        Ok(())
    })?;
    debug!("Article {} created for user {}", article_id, owner_id);

    // Phase two: the cover path embeds the generated id.
    if let Some(cover) = cover {
        attach_cover(db, covers, owner_id, &article_id, &cover)?;
    }

    load_article(db, &article_id)
}

pub fn update_article(
    db: &Database,
    covers: &dyn CoverStore,
    owner_id: &str,
    article_id: &str,
    fields: ArticleFields,
    cover: Option<CoverFile>,
) -> Result<Article, EngineError> {
    db.get_article_owned(article_id, owner_id)?
        .ok_or(EngineError::NotFound("article"))?;
    let (title, summary) = normalize_scalars(&fields)?;

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        // Blank category input clears the reference.
        let category = resolve_category(&*tx, owner_id, &fields.category)?;
        queries::update_article_row(
            &tx,
            article_id,
            &title,
            summary,
            fields.content.trim(),
            category.as_ref().map(|c| c.id.as_str()),
            fields.post_status.is_draft(),
        )?;
        // Tags are fully replaced, not merged. Detached tag rows stay
        // around for the owner's future articles.
        queries::clear_article_tags(&tx, article_id)?;
        let tags = resolve_tags(&*tx, owner_id, &fields.tags)?;
        for tag in &tags {
            queries::link_tag(&tx, article_id, &tag.id)?;
        }
        tx.commit()?;
        Ok(())
    })?;
    debug!("Article {} updated", article_id);

    // The existing cover survives unless a new file arrived.
    if let Some(cover) = cover {
        attach_cover(db, covers, owner_id, article_id, &cover)?;
    }

    load_article(db, article_id)
}

pub fn delete_article(db: &Database, owner_id: &str, article_id: &str) -> Result<(), EngineError> {
    // Same NotFound whether the id is unknown or owned by someone
    // else, so deletion attempts cannot probe for existence.
    db.get_article_owned(article_id, owner_id)?
        .ok_or(EngineError::NotFound("article"))?;

    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;
        queries::delete_comments_for_article(&tx, article_id)?;
        queries::clear_article_tags(&tx, article_id)?;
        queries::delete_article_row(&tx, article_id)?;
        tx.commit()?;
        Ok(())
    })?;
    debug!("Article {} deleted", article_id);
    Ok(())
}

/// Viewer-scoped fetch for read endpoints: drafts answer the same
/// NotFound to everyone but their owner, so a draft's id reveals
/// nothing to other viewers.
pub fn load_article_for_viewer(
    db: &Database,
    article_id: &str,
    viewer_id: Option<&str>,
) -> Result<Article, EngineError> {
    let article = load_article(db, article_id)?;
    if article.is_draft && viewer_id != Some(article.owner_id.to_string().as_str()) {
        return Err(EngineError::NotFound("article"));
    }
    Ok(article)
}

/// Fetches an article with its category and tags resolved.
pub fn load_article(db: &Database, article_id: &str) -> Result<Article, EngineError> {
    let row = db
        .get_article(article_id)?
        .ok_or(EngineError::NotFound("article"))?;
    let category = match row.category_id.as_deref() {
        Some(category_id) => db.get_category(category_id)?.map(category_model),
        None => None,
    };
    let tags = db
        .article_tags(&row.id)?
        .into_iter()
        .map(tag_model)
        .collect();
    Ok(article_model(row, category, tags))
}

/// Title falls back to a placeholder when blank; content is required.
/// Returns the effective title and a blank-collapsed summary.
fn normalize_scalars(fields: &ArticleFields) -> Result<(String, Option<&str>), EngineError> {
    if fields.content.trim().is_empty() {
        return Err(EngineError::Validation(
            "article content must not be empty".into(),
        ));
    }
    let title = fields.title.trim();
    let title = if title.is_empty() { UNTITLED } else { title };
    let summary = fields
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    Ok((title.to_string(), summary))
}

fn attach_cover(
    db: &Database,
    covers: &dyn CoverStore,
    owner_id: &str,
    article_id: &str,
    cover: &CoverFile,
) -> Result<(), EngineError> {
    let rel_path = format!(
        "users/{owner_id}/covers/{article_id}{}",
        file_ext(&cover.filename)
    );
    covers
        .save(&rel_path, &cover.data)
        .map_err(EngineError::Storage)?;
    db.set_cover(article_id, &format!("/uploads/{rel_path}"))?;
    Ok(())
}

fn category_model(row: CategoryRow) -> Category {
    Category {
        id: parse_uuid(&row.id),
        owner_id: parse_uuid(&row.owner_id),
        name: row.name,
    }
}

fn tag_model(row: TagRow) -> Tag {
    Tag {
        id: parse_uuid(&row.id),
        owner_id: parse_uuid(&row.owner_id),
        name: row.name,
    }
}

fn article_model(row: ArticleRow, category: Option<Category>, tags: Vec<Tag>) -> Article {
    Article {
        id: parse_uuid(&row.id),
        owner_id: parse_uuid(&row.owner_id),
        title: row.title,
        summary: row.summary,
        content: row.content,
        category,
        tags,
        is_draft: row.is_draft,
        cover_url: row.cover_url,
        update_time: parse_datetime(&row.update_time),
        created_at: parse_datetime(&row.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    /// Records saved paths instead of touching the filesystem.
    #[derive(Default)]
    struct MemStore {
        saved: Mutex<Vec<(String, usize)>>,
    }

    impl CoverStore for MemStore {
        fn save(&self, rel_path: &str, data: &[u8]) -> io::Result<()> {
            self.saved
                .lock()
                .unwrap()
                .push((rel_path.to_string(), data.len()));
            Ok(())
        }
    }

    struct FailingStore;

    impl CoverStore for FailingStore {
        fn save(&self, _rel_path: &str, _data: &[u8]) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.create_user("u1", "ada", "hash", "url").unwrap();
        db.create_user("u2", "grace", "hash", "url").unwrap();
        db
    }

    fn fields(title: &str, content: &str, category: &str, tags: &str) -> ArticleFields {
        ArticleFields {
            title: title.into(),
            summary: None,
            content: content.into(),
            category: category.into(),
            tags: tags.into(),
            post_status: PostStatus::Published,
        }
    }

    #[test]
    fn blank_title_gets_placeholder() {
        let db = test_db();
        let article =
            create_article(&db, &MemStore::default(), "u1", fields("  ", "body", "", ""), None)
                .unwrap();
        assert_eq!(article.title, "Untitled Draft");
    }

    #[test]
    fn blank_content_is_rejected() {
        let db = test_db();
        let err = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Title", "  \n ", "", ""),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
        assert_eq!(db.count_articles("u1", true).unwrap(), 0);
    }

    #[test]
    fn create_resolves_category_and_tags() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "Travel", "rust, web"),
            None,
        )
        .unwrap();

        assert_eq!(article.category.as_ref().unwrap().name, "Travel");
        let names: Vec<&str> = article.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["rust", "web"]);
        assert!(!article.is_draft);
    }

    #[test]
    fn draft_status_is_stored() {
        let db = test_db();
        let mut f = fields("Draft", "body", "", "");
        f.post_status = PostStatus::parse("draft");
        let article = create_article(&db, &MemStore::default(), "u1", f, None).unwrap();
        assert!(article.is_draft);
    }

    #[test]
    fn cover_path_embeds_generated_id() {
        let db = test_db();
        let store = MemStore::default();
        let cover = CoverFile {
            filename: "photo.png".into(),
            data: vec![1, 2, 3],
        };
        let article =
            create_article(&db, &store, "u1", fields("Post", "body", "", ""), Some(cover))
                .unwrap();

        let expected = format!("users/u1/covers/{}.png", article.id);
        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.as_slice(), [(expected.clone(), 3)]);
        assert_eq!(article.cover_url.unwrap(), format!("/uploads/{expected}"));
    }

    #[test]
    fn storage_failure_leaves_article_committed() {
        let db = test_db();
        let cover = CoverFile {
            filename: "photo.png".into(),
            data: vec![1],
        };
        let err = create_article(
            &db,
            &FailingStore,
            "u1",
            fields("Post", "body", "Travel", "rust"),
            Some(cover),
        )
        .unwrap_err();

        assert!(matches!(err, EngineError::Storage(_)));
        // Phase one committed: the article and its taxonomy exist,
        // just without a cover reference.
        assert_eq!(db.count_articles("u1", true).unwrap(), 1);
        assert_eq!(db.list_categories("u1").unwrap().len(), 1);
        let feed = db.list_published(10).unwrap();
        assert!(feed[0].cover_url.is_none());
    }

    #[test]
    fn update_overwrites_scalars() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Old", "old body", "", ""),
            None,
        )
        .unwrap();

        let mut f = fields("New", "new body", "", "");
        f.summary = Some("short".into());
        let updated = update_article(
            &db,
            &MemStore::default(),
            "u1",
            &article.id.to_string(),
            f,
            None,
        )
        .unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "new body");
        assert_eq!(updated.summary.as_deref(), Some("short"));
    }

    #[test]
    fn update_with_blank_category_clears_reference() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "Travel", ""),
            None,
        )
        .unwrap();
        assert!(article.category.is_some());

        let updated = update_article(
            &db,
            &MemStore::default(),
            "u1",
            &article.id.to_string(),
            fields("Post", "body", "", ""),
            None,
        )
        .unwrap();

        assert!(updated.category.is_none());
        // The category row itself survives, now with zero articles.
        assert_eq!(db.list_categories("u1").unwrap().len(), 1);
    }

    #[test]
    fn update_replaces_tag_set() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "", "rust, web"),
            None,
        )
        .unwrap();

        let updated = update_article(
            &db,
            &MemStore::default(),
            "u1",
            &article.id.to_string(),
            fields("Post", "body", "", "web, cli"),
            None,
        )
        .unwrap();

        let names: Vec<&str> = updated.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["web", "cli"]);
        // "rust" is detached from the article but the tag row persists.
        assert_eq!(db.list_tags("u1").unwrap().len(), 3);
    }

    #[test]
    fn update_without_new_cover_keeps_existing() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "", ""),
            Some(CoverFile {
                filename: "c.jpg".into(),
                data: vec![1],
            }),
        )
        .unwrap();
        let original_cover = article.cover_url.clone().unwrap();

        let updated = update_article(
            &db,
            &MemStore::default(),
            "u1",
            &article.id.to_string(),
            fields("Post", "edited", "", ""),
            None,
        )
        .unwrap();

        assert_eq!(updated.cover_url.as_deref(), Some(original_cover.as_str()));
    }

    #[test]
    fn update_rejects_other_owners() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "", ""),
            None,
        )
        .unwrap();

        let err = update_article(
            &db,
            &MemStore::default(),
            "u2",
            &article.id.to_string(),
            fields("Hijack", "body", "", ""),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::NotFound("article")));
    }

    #[test]
    fn draft_visible_to_owner_only() {
        let db = test_db();
        let mut f = fields("Secret", "body", "", "");
        f.post_status = PostStatus::Draft;
        let article = create_article(&db, &MemStore::default(), "u1", f, None).unwrap();
        let id = article.id.to_string();

        let seen = load_article_for_viewer(&db, &id, Some("u1")).unwrap();
        assert_eq!(seen.title, "Secret");

        let foreign = load_article_for_viewer(&db, &id, Some("u2")).unwrap_err();
        let anonymous = load_article_for_viewer(&db, &id, None).unwrap_err();
        // Same NotFound as an unknown id: the draft's existence leaks
        // to no one.
        assert!(matches!(foreign, EngineError::NotFound("article")));
        assert!(matches!(anonymous, EngineError::NotFound("article")));
    }

    #[test]
    fn published_article_visible_to_everyone() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Public", "body", "", ""),
            None,
        )
        .unwrap();
        let id = article.id.to_string();

        assert!(load_article_for_viewer(&db, &id, Some("u2")).is_ok());
        assert!(load_article_for_viewer(&db, &id, None).is_ok());
    }

    #[test]
    fn delete_cascades_comments() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "", "rust"),
            None,
        )
        .unwrap();
        let article_id = article.id.to_string();
        db.insert_comment("cm1", &article_id, "u2", "first").unwrap();
        db.insert_comment("cm2", &article_id, "u1", "reply").unwrap();

        delete_article(&db, "u1", &article_id).unwrap();

        assert!(db.get_article(&article_id).unwrap().is_none());
        assert!(db.get_comment("cm1").unwrap().is_none());
        assert!(db.get_comment("cm2").unwrap().is_none());
        // Taxonomy rows are untouched by article deletion.
        assert_eq!(db.list_tags("u1").unwrap().len(), 1);
    }

    #[test]
    fn delete_rejects_other_owners_and_unknown_ids() {
        let db = test_db();
        let article = create_article(
            &db,
            &MemStore::default(),
            "u1",
            fields("Post", "body", "", ""),
            None,
        )
        .unwrap();

        let foreign = delete_article(&db, "u2", &article.id.to_string()).unwrap_err();
        let missing = delete_article(&db, "u1", "no-such-id").unwrap_err();
        // Identical errors: no existence leak.
        assert_eq!(foreign.to_string(), missing.to_string());
        assert!(db.get_article(&article.id.to_string()).unwrap().is_some());
    }
}
