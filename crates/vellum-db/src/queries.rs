use crate::Database;
use crate::models::{
    ArchiveRow, ArticleListRow, ArticleRow, CategoryRow, CommentRow, TagRow, UserRow,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

const USER_COLS: &str = "id, username, password, nickname, gender, repo_link, bio, avatar_url, last_login, created_at";
const ARTICLE_COLS: &str =
    "id, owner_id, title, summary, content, category_id, is_draft, cover_url, update_time, created_at";
const LIST_COLS: &str = "a.id, a.owner_id, u.username, a.title, a.summary, a.content, c.name, a.is_draft, a.cover_url, a.update_time";
const LIST_JOINS: &str =
    "FROM articles a JOIN users u ON a.owner_id = u.id LEFT JOIN categories c ON a.category_id = c.id";

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        password_hash: &str,
        avatar_url: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, password, avatar_url) VALUES (?1, ?2, ?3, ?4)",
                (id, username, password_hash, avatar_url),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLS} FROM users WHERE username = ?1"
            ))?;
            stmt.query_row([username], map_user).optional()
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("SELECT {USER_COLS} FROM users WHERE id = ?1"))?;
            stmt.query_row([id], map_user).optional()
        })
    }

    pub fn touch_last_login(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET last_login = datetime('now') WHERE id = ?1",
                [id],
            )?;
            Ok(())
        })
    }

    /// Full overwrite of the editable profile fields (None clears).
    pub fn update_profile(
        &self,
        id: &str,
        nickname: Option<&str>,
        gender: Option<&str>,
        repo_link: Option<&str>,
        bio: Option<&str>,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET nickname = ?2, gender = ?3, repo_link = ?4, bio = ?5 WHERE id = ?1",
                (id, nickname, gender, repo_link, bio),
            )?;
            Ok(())
        })
    }

    pub fn set_avatar_url(&self, id: &str, avatar_url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE users SET avatar_url = ?2 WHERE id = ?1",
                (id, avatar_url),
            )?;
            Ok(())
        })
    }

    pub fn search_users(&self, query: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLS} FROM users
                 WHERE username LIKE '%' || ?1 || '%' OR nickname LIKE '%' || ?1 || '%'
                 ORDER BY username"
            ))?;
            let rows = stmt
                .query_map([query], map_user)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_articles(&self, owner_id: &str, include_drafts: bool) -> Result<i64> {
        self.with_conn(|conn| {
            let sql = if include_drafts {
                "SELECT COUNT(*) FROM articles WHERE owner_id = ?1"
            } else {
                "SELECT COUNT(*) FROM articles WHERE owner_id = ?1 AND is_draft = 0"
            };
            conn.query_row(sql, [owner_id], |row| row.get(0))
                .map_err(Into::into)
        })
    }

    pub fn count_categories(&self, owner_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM categories WHERE owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
        })
    }

    pub fn count_tags(&self, owner_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM tags WHERE owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )
            .map_err(Into::into)
        })
    }

    // -- Taxonomy --

    pub fn list_categories(&self, owner_id: &str) -> Result<Vec<CategoryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, owner_id, name FROM categories WHERE owner_id = ?1 ORDER BY name",
            )?;
            let rows = stmt
                .query_map([owner_id], map_category)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_tags(&self, owner_id: &str) -> Result<Vec<TagRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, owner_id, name FROM tags WHERE owner_id = ?1 ORDER BY name")?;
            let rows = stmt
                .query_map([owner_id], map_tag)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_category(&self, id: &str) -> Result<Option<CategoryRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, owner_id, name FROM categories WHERE id = ?1")?;
            stmt.query_row([id], map_category).optional()
        })
    }

    pub fn get_tag(&self, id: &str) -> Result<Option<TagRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, owner_id, name FROM tags WHERE id = ?1")?;
            stmt.query_row([id], map_tag).optional()
        })
    }

    /// Categories with at least one published article, with counts.
    pub fn archive_categories(&self, owner_id: &str) -> Result<Vec<ArchiveRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.name, COUNT(a.id) AS article_count
                 FROM categories c
                 JOIN articles a ON a.category_id = c.id AND a.is_draft = 0
                 WHERE c.owner_id = ?1
                 GROUP BY c.id, c.name
                 ORDER BY article_count DESC, c.name",
            )?;
            let rows = stmt
                .query_map([owner_id], map_archive)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Tags with at least one published article, with counts.
    pub fn archive_tags(&self, owner_id: &str) -> Result<Vec<ArchiveRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.name, COUNT(a.id) AS article_count
                 FROM tags t
                 JOIN article_tags at ON at.tag_id = t.id
                 JOIN articles a ON a.id = at.article_id AND a.is_draft = 0
                 WHERE t.owner_id = ?1
                 GROUP BY t.id, t.name
                 ORDER BY article_count DESC, t.name",
            )?;
            let rows = stmt
                .query_map([owner_id], map_archive)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Articles --

    pub fn get_article(&self, id: &str) -> Result<Option<ArticleRow>> {
        self.with_conn(|conn| article_by_id(conn, id))
    }

    /// Ownership-scoped lookup: misses both when the id is unknown and
    /// when the article belongs to someone else, so callers cannot leak
    /// existence through error differentiation.
    pub fn get_article_owned(&self, id: &str, owner_id: &str) -> Result<Option<ArticleRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ARTICLE_COLS} FROM articles WHERE id = ?1 AND owner_id = ?2"
            ))?;
            stmt.query_row((id, owner_id), map_article).optional()
        })
    }

    pub fn set_cover(&self, article_id: &str, cover_url: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "UPDATE articles SET cover_url = ?2, update_time = datetime('now') WHERE id = ?1",
                (article_id, cover_url),
            )?;
            Ok(())
        })
    }

    pub fn article_tags(&self, article_id: &str) -> Result<Vec<TagRow>> {
        self.with_conn(|conn| tags_for_article(conn, article_id))
    }

    pub fn list_published(&self, limit: u32) -> Result<Vec<ArticleListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LIST_COLS} {LIST_JOINS}
                 WHERE a.is_draft = 0
                 ORDER BY a.update_time DESC
                 LIMIT ?1"
            ))?;
            let rows = stmt
                .query_map([limit], map_list_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_by_owner(
        &self,
        owner_id: &str,
        include_drafts: bool,
    ) -> Result<Vec<ArticleListRow>> {
        self.with_conn(|conn| {
            let filter = if include_drafts {
                ""
            } else {
                " AND a.is_draft = 0"
            };
            let mut stmt = conn.prepare(&format!(
                "SELECT {LIST_COLS} {LIST_JOINS}
                 WHERE a.owner_id = ?1{filter}
                 ORDER BY a.update_time DESC"
            ))?;
            let rows = stmt
                .query_map([owner_id], map_list_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_by_category(
        &self,
        owner_id: &str,
        category_id: &str,
    ) -> Result<Vec<ArticleListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LIST_COLS} {LIST_JOINS}
                 WHERE a.owner_id = ?1 AND a.category_id = ?2 AND a.is_draft = 0
                 ORDER BY a.update_time DESC"
            ))?;
            let rows = stmt
                .query_map((owner_id, category_id), map_list_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_by_tag(&self, owner_id: &str, tag_id: &str) -> Result<Vec<ArticleListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LIST_COLS}
                 FROM articles a
                 JOIN article_tags at ON at.article_id = a.id
                 JOIN users u ON a.owner_id = u.id
                 LEFT JOIN categories c ON a.category_id = c.id
                 WHERE a.owner_id = ?1 AND at.tag_id = ?2 AND a.is_draft = 0
                 ORDER BY a.update_time DESC"
            ))?;
            let rows = stmt
                .query_map((owner_id, tag_id), map_list_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Title substring search over published articles.
    pub fn search_articles(&self, query: &str) -> Result<Vec<ArticleListRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {LIST_COLS} {LIST_JOINS}
                 WHERE a.is_draft = 0 AND a.title LIKE '%' || ?1 || '%'
                 ORDER BY a.update_time DESC"
            ))?;
            let rows = stmt
                .query_map([query], map_list_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Comments --

    pub fn insert_comment(
        &self,
        id: &str,
        article_id: &str,
        author_id: &str,
        content: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO comments (id, article_id, author_id, content) VALUES (?1, ?2, ?3, ?4)",
                (id, article_id, author_id, content),
            )?;
            Ok(())
        })
    }

    pub fn comments_for_article(&self, article_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.article_id, c.author_id, u.username, c.content, c.created_at
                 FROM comments c
                 JOIN users u ON c.author_id = u.id
                 WHERE c.article_id = ?1
                 ORDER BY c.created_at",
            )?;
            let rows = stmt
                .query_map([article_id], map_comment)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.article_id, c.author_id, u.username, c.content, c.created_at
                 FROM comments c
                 JOIN users u ON c.author_id = u.id
                 WHERE c.id = ?1",
            )?;
            stmt.query_row([id], map_comment).optional()
        })
    }
}

// -- Connection-level helpers --
//
// These run inside lifecycle transactions in vellum-engine, so they take
// a plain &Connection (a rusqlite Transaction derefs to one).

pub fn find_category(
    conn: &Connection,
    owner_id: &str,
    name: &str,
) -> Result<Option<CategoryRow>> {
    let mut stmt = conn
        .prepare("SELECT id, owner_id, name FROM categories WHERE owner_id = ?1 AND name = ?2")?;
    stmt.query_row((owner_id, name), map_category).optional()
}

/// Insert-or-ignore keyed on UNIQUE(owner_id, name), then re-select so a
/// concurrent creator's row wins over ours.
pub fn create_category(
    conn: &Connection,
    id: &str,
    owner_id: &str,
    name: &str,
) -> Result<CategoryRow> {
    conn.execute(
        "INSERT INTO categories (id, owner_id, name) VALUES (?1, ?2, ?3)
         ON CONFLICT(owner_id, name) DO NOTHING",
        (id, owner_id, name),
    )?;
    find_category(conn, owner_id, name)?
        .ok_or_else(|| anyhow!("category '{}' missing after insert", name))
}

pub fn find_tag(conn: &Connection, owner_id: &str, name: &str) -> Result<Option<TagRow>> {
    let mut stmt =
        conn.prepare("SELECT id, owner_id, name FROM tags WHERE owner_id = ?1 AND name = ?2")?;
    stmt.query_row((owner_id, name), map_tag).optional()
}

pub fn create_tag(conn: &Connection, id: &str, owner_id: &str, name: &str) -> Result<TagRow> {
    conn.execute(
        "INSERT INTO tags (id, owner_id, name) VALUES (?1, ?2, ?3)
         ON CONFLICT(owner_id, name) DO NOTHING",
        (id, owner_id, name),
    )?;
    find_tag(conn, owner_id, name)?.ok_or_else(|| anyhow!("tag '{}' missing after insert", name))
}

pub fn insert_article(
    conn: &Connection,
    id: &str,
    owner_id: &str,
    title: &str,
    summary: Option<&str>,
    content: &str,
    category_id: Option<&str>,
    is_draft: bool,
) -> Result<()> {
    conn.execute(
        "INSERT INTO articles (id, owner_id, title, summary, content, category_id, is_draft)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![id, owner_id, title, summary, content, category_id, is_draft],
    )?;
    Ok(())
}

/// Overwrites every scalar field and refreshes update_time.
pub fn update_article_row(
    conn: &Connection,
    id: &str,
    title: &str,
    summary: Option<&str>,
    content: &str,
    category_id: Option<&str>,
    is_draft: bool,
) -> Result<()> {
    conn.execute(
        "UPDATE articles
         SET title = ?2, summary = ?3, content = ?4, category_id = ?5, is_draft = ?6,
             update_time = datetime('now')
         WHERE id = ?1",
        rusqlite::params![id, title, summary, content, category_id, is_draft],
    )?;
    Ok(())
}

pub fn article_by_id(conn: &Connection, id: &str) -> Result<Option<ArticleRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {ARTICLE_COLS} FROM articles WHERE id = ?1"))?;
    stmt.query_row([id], map_article).optional()
}

pub fn clear_article_tags(conn: &Connection, article_id: &str) -> Result<()> {
    conn.execute("DELETE FROM article_tags WHERE article_id = ?1", [article_id])?;
    Ok(())
}

pub fn link_tag(conn: &Connection, article_id: &str, tag_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO article_tags (article_id, tag_id) VALUES (?1, ?2)",
        (article_id, tag_id),
    )?;
    Ok(())
}

pub fn tags_for_article(conn: &Connection, article_id: &str) -> Result<Vec<TagRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.owner_id, t.name
         FROM tags t
         JOIN article_tags at ON at.tag_id = t.id
         WHERE at.article_id = ?1
         ORDER BY t.name",
    )?;
    let rows = stmt
        .query_map([article_id], map_tag)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn delete_comments_for_article(conn: &Connection, article_id: &str) -> Result<()> {
    conn.execute("DELETE FROM comments WHERE article_id = ?1", [article_id])?;
    Ok(())
}

pub fn delete_article_row(conn: &Connection, article_id: &str) -> Result<()> {
    conn.execute("DELETE FROM articles WHERE id = ?1", [article_id])?;
    Ok(())
}

// -- Row mappers --

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        nickname: row.get(3)?,
        gender: row.get(4)?,
        repo_link: row.get(5)?,
        bio: row.get(6)?,
        avatar_url: row.get(7)?,
        last_login: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<CategoryRow> {
    Ok(CategoryRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
    })
}

fn map_tag(row: &rusqlite::Row<'_>) -> rusqlite::Result<TagRow> {
    Ok(TagRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        name: row.get(2)?,
    })
}

fn map_article(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArticleRow> {
    Ok(ArticleRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        title: row.get(2)?,
        summary: row.get(3)?,
        content: row.get(4)?,
        category_id: row.get(5)?,
        is_draft: row.get(6)?,
        cover_url: row.get(7)?,
        update_time: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn map_list_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArticleListRow> {
    Ok(ArticleListRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        author_username: row.get(2)?,
        title: row.get(3)?,
        summary: row.get(4)?,
        content: row.get(5)?,
        category_name: row.get(6)?,
        is_draft: row.get(7)?,
        cover_url: row.get(8)?,
        update_time: row.get(9)?,
    })
}

fn map_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        article_id: row.get(1)?,
        author_id: row.get(2)?,
        author_username: row.get(3)?,
        content: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_archive(row: &rusqlite::Row<'_>) -> rusqlite::Result<ArchiveRow> {
    Ok(ArchiveRow {
        id: row.get(0)?,
        name: row.get(1)?,
        count: row.get(2)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed_user(db: &Database, id: &str, username: &str) {
        db.create_user(id, username, "hash", "https://example.com/avatar.svg")
            .unwrap();
    }

    #[test]
    fn duplicate_usernames_rejected() {
        let db = test_db();
        seed_user(&db, "u1", "ada");
        let err = db.create_user("u2", "ada", "hash", "url");
        assert!(err.is_err());
    }

    #[test]
    fn create_category_is_conflict_safe() {
        let db = test_db();
        seed_user(&db, "u1", "ada");

        let (first, second) = db
            .with_conn(|conn| {
                let first = create_category(conn, "c1", "u1", "Travel")?;
                // Losing id: the unique constraint swallows the insert and
                // the re-select returns the original row.
                let second = create_category(conn, "c2", "u1", "Travel")?;
                Ok((first, second))
            })
            .unwrap();

        assert_eq!(first.id, "c1");
        assert_eq!(second.id, "c1");
    }

    #[test]
    fn category_names_scoped_per_owner() {
        let db = test_db();
        seed_user(&db, "u1", "ada");
        seed_user(&db, "u2", "grace");

        db.with_conn(|conn| {
            let a = create_category(conn, "c1", "u1", "Travel")?;
            let b = create_category(conn, "c2", "u2", "Travel")?;
            assert_ne!(a.id, b.id);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn feed_excludes_drafts() {
        let db = test_db();
        seed_user(&db, "u1", "ada");

        db.with_conn(|conn| {
            insert_article(conn, "a1", "u1", "Published", None, "body", None, false)?;
            insert_article(conn, "a2", "u1", "Draft", None, "body", None, true)?;
            Ok(())
        })
        .unwrap();

        let feed = db.list_published(50).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "Published");
        assert_eq!(feed[0].author_username, "ada");
    }

    #[test]
    fn feed_orders_newest_first() {
        let db = test_db();
        seed_user(&db, "u1", "ada");

        db.with_conn(|conn| {
            insert_article(conn, "a1", "u1", "Old", None, "body", None, false)?;
            insert_article(conn, "a2", "u1", "New", None, "body", None, false)?;
            conn.execute(
                "UPDATE articles SET update_time = '2026-01-01 00:00:00' WHERE id = 'a1'",
                [],
            )?;
            conn.execute(
                "UPDATE articles SET update_time = '2026-02-01 00:00:00' WHERE id = 'a2'",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let feed = db.list_published(50).unwrap();
        assert_eq!(feed[0].title, "New");
        assert_eq!(feed[1].title, "Old");
    }

    #[test]
    fn tag_links_ignore_duplicates() {
        let db = test_db();
        seed_user(&db, "u1", "ada");

        db.with_conn(|conn| {
            insert_article(conn, "a1", "u1", "Post", None, "body", None, false)?;
            let tag = create_tag(conn, "t1", "u1", "rust")?;
            link_tag(conn, "a1", &tag.id)?;
            link_tag(conn, "a1", &tag.id)?;
            Ok(())
        })
        .unwrap();

        let tags = db.article_tags("a1").unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "rust");
    }

    #[test]
    fn comments_carry_author_username() {
        let db = test_db();
        seed_user(&db, "u1", "ada");
        seed_user(&db, "u2", "grace");

        db.with_conn(|conn| {
            insert_article(conn, "a1", "u1", "Post", None, "body", None, false)?;
            Ok(())
        })
        .unwrap();
        db.insert_comment("cm1", "a1", "u2", "nice post").unwrap();

        let comments = db.comments_for_article("a1").unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author_username, "grace");
    }

    #[test]
    fn owned_lookup_misses_other_owners() {
        let db = test_db();
        seed_user(&db, "u1", "ada");
        seed_user(&db, "u2", "grace");

        db.with_conn(|conn| {
            insert_article(conn, "a1", "u1", "Post", None, "body", None, false)?;
            Ok(())
        })
        .unwrap();

        assert!(db.get_article_owned("a1", "u1").unwrap().is_some());
        assert!(db.get_article_owned("a1", "u2").unwrap().is_none());
        assert!(db.get_article_owned("missing", "u1").unwrap().is_none());
    }

    #[test]
    fn archive_counts_published_only() {
        let db = test_db();
        seed_user(&db, "u1", "ada");

        db.with_conn(|conn| {
            let cat = create_category(conn, "c1", "u1", "Travel")?;
            let empty = create_category(conn, "c2", "u1", "Empty")?;
            insert_article(conn, "a1", "u1", "One", None, "body", Some(&cat.id), false)?;
            insert_article(conn, "a2", "u1", "Two", None, "body", Some(&cat.id), false)?;
            insert_article(conn, "a3", "u1", "Hidden", None, "body", Some(&empty.id), true)?;
            Ok(())
        })
        .unwrap();

        let archive = db.archive_categories("u1").unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive[0].name, "Travel");
        assert_eq!(archive[0].count, 2);
    }
}
