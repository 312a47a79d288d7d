//! Per-owner taxonomy reconciliation.
//!
//! Categories and tags arrive from the editor as free text. Each name
//! resolves to the owner's existing row when one exists and is created
//! otherwise, so the same name never forks into duplicates for one
//! owner while staying fully independent across owners.

use anyhow::Result;
use rusqlite::Connection;
use uuid::Uuid;
use vellum_db::models::{CategoryRow, TagRow};
use vellum_db::queries;

/// Storage seam for resolve-or-create. Implemented for rusqlite
/// connections so lifecycle transactions can pass themselves in.
pub trait TaxonomyStore {
    fn find_category(&self, owner_id: &str, name: &str) -> Result<Option<CategoryRow>>;
    fn create_category(&self, id: &str, owner_id: &str, name: &str) -> Result<CategoryRow>;
    fn find_tag(&self, owner_id: &str, name: &str) -> Result<Option<TagRow>>;
    fn create_tag(&self, id: &str, owner_id: &str, name: &str) -> Result<TagRow>;
}

impl TaxonomyStore for Connection {
    fn find_category(&self, owner_id: &str, name: &str) -> Result<Option<CategoryRow>> {
        queries::find_category(self, owner_id, name)
    }

    fn create_category(&self, id: &str, owner_id: &str, name: &str) -> Result<CategoryRow> {
        queries::create_category(self, id, owner_id, name)
    }

    fn find_tag(&self, owner_id: &str, name: &str) -> Result<Option<TagRow>> {
        queries::find_tag(self, owner_id, name)
    }

    fn create_tag(&self, id: &str, owner_id: &str, name: &str) -> Result<TagRow> {
        queries::create_tag(self, id, owner_id, name)
    }
}

/// Resolves free-text category input to the owner's category row,
/// creating the row on first use. Blank input means "no category".
pub fn resolve_category(
    store: &dyn TaxonomyStore,
    owner_id: &str,
    raw: &str,
) -> Result<Option<CategoryRow>> {
    let name = raw.trim();
    if name.is_empty() {
        return Ok(None);
    }
    if let Some(existing) = store.find_category(owner_id, name)? {
        return Ok(Some(existing));
    }
    let id = Uuid::new_v4().to_string();
    Ok(Some(store.create_category(&id, owner_id, name)?))
}

/// Splits comma-separated tag input, trims each name, drops empties,
/// and resolves each distinct name to the owner's tag row. Full-width
/// commas count as separators; duplicates keep their first position.
pub fn resolve_tags(store: &dyn TaxonomyStore, owner_id: &str, raw: &str) -> Result<Vec<TagRow>> {
    let normalized = raw.replace('，', ",");
    let mut seen: Vec<&str> = Vec::new();
    let mut tags = Vec::new();
    for name in normalized.split(',') {
        let name = name.trim();
        if name.is_empty() || seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let tag = match store.find_tag(owner_id, name)? {
            Some(existing) => existing,
            None => {
                let id = Uuid::new_v4().to_string();
                store.create_tag(&id, owner_id, name)?
            }
        };
        tags.push(tag);
    }
    Ok(tags)
}
