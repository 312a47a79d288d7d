use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            nickname    TEXT,
            gender      TEXT,
            repo_link   TEXT,
            bio         TEXT,
            avatar_url  TEXT NOT NULL,
            last_login  TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Taxonomy names are unique per owner, not globally; the UNIQUE
        -- constraint also serializes concurrent resolve-or-create calls.
        CREATE TABLE IF NOT EXISTS categories (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL REFERENCES users(id),
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(owner_id, name)
        );

        CREATE TABLE IF NOT EXISTS tags (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL REFERENCES users(id),
            name        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(owner_id, name)
        );

        CREATE TABLE IF NOT EXISTS articles (
            id          TEXT PRIMARY KEY,
            owner_id    TEXT NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            summary     TEXT,
            content     TEXT NOT NULL,
            category_id TEXT REFERENCES categories(id),
            is_draft    INTEGER NOT NULL DEFAULT 0,
            cover_url   TEXT,
            update_time TEXT NOT NULL DEFAULT (datetime('now')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_articles_owner
            ON articles(owner_id, update_time);

        CREATE INDEX IF NOT EXISTS idx_articles_feed
            ON articles(is_draft, update_time);

        CREATE TABLE IF NOT EXISTS article_tags (
            article_id  TEXT NOT NULL REFERENCES articles(id),
            tag_id      TEXT NOT NULL REFERENCES tags(id),
            PRIMARY KEY (article_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            article_id  TEXT NOT NULL REFERENCES articles(id),
            author_id   TEXT NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_comments_article
            ON comments(article_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
