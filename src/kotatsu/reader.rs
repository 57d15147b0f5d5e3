use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::backup::{Backup, Category, HistoryEntry, Manga};
use crate::categories::{MIGRATED_CATEGORY_PREFIX, MIGRATED_CATEGORY_SOURCE};
use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::sources::{LOCAL_SOURCE_ID, SourceRegistry};
use crate::status::Status;
use crate::util::strip_bom;

use super::records::{RawCategory, RawFavourite, RawHistory, RawTag};

/// Resource name aliases, exact-match candidates in priority order.
const FAVOURITES_ALIASES: &[&str] = &["favourites.json", "favourites", "manga.json"];
const CATEGORIES_ALIASES: &[&str] = &["categories.json", "categories"];
const HISTORY_ALIASES: &[&str] = &["history.json", "history"];

/// Read a Kotatsu backup archive into a [`Backup`].
///
/// The favourites resource is required; categories and history degrade to
/// empty collections with a warning when missing or malformed. Source names
/// are resolved to canonical ids through the registry as entries are
/// adapted, so the normalized model never carries free text sources.
pub fn read_kotatsu(
    bytes: &[u8],
    sources: &SourceRegistry,
    diag: &mut Diagnostics,
) -> Result<Backup> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let names: Vec<String> = archive.file_names().map(String::from).collect();

    let favourites_path = locate(&names, FAVOURITES_ALIASES).ok_or_else(|| {
        Error::MissingResource {
            wanted: "favourites".into(),
            found: names.clone(),
        }
    })?;

    let favourites_text = read_entry(&mut archive, &favourites_path)?;
    let raw_favourites: Vec<RawFavourite> = serde_json::from_str(&favourites_text)
        .map_err(|e| Error::InvalidKotatsu(format!("failed to parse favourites: {e}")))?;

    let raw_categories = match locate(&names, CATEGORIES_ALIASES) {
        Some(path) => {
            let text = read_entry(&mut archive, &path)?;
            match serde_json::from_str::<Vec<RawCategory>>(&text) {
                Ok(cats) => cats,
                Err(e) => {
                    diag.warn(format!("malformed categories resource, ignoring: {e}"));
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    let raw_history = match locate(&names, HISTORY_ALIASES) {
        Some(path) => {
            let text = read_entry(&mut archive, &path)?;
            match serde_json::from_str::<Vec<RawHistory>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    diag.warn(format!("malformed history resource, ignoring: {e}"));
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    let mut backup = Backup::new();
    backup.categories = adapt_categories(raw_categories);

    // Joining keys for history entries.
    let mut by_manga_id: HashMap<i64, usize> = HashMap::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for raw in &raw_favourites {
        let manga = adapt_favourite(raw, &backup.categories, sources, diag);
        let idx = backup.manga.len();
        if let Some(id) = raw.manga_id.or(raw.payload().id) {
            by_manga_id.entry(id).or_insert(idx);
        }
        if !manga.title.is_empty() {
            by_title.entry(manga.title.clone()).or_insert(idx);
        }
        backup.manga.push(manga);
    }

    if backup.manga.is_empty() {
        return Err(Error::EmptyBackup);
    }

    for entry in raw_history {
        let target = entry
            .manga_id
            .and_then(|id| by_manga_id.get(&id))
            .or_else(|| entry.manga_title.as_ref().and_then(|t| by_title.get(t)));
        match target {
            Some(&idx) => backup.manga[idx].history.push(HistoryEntry {
                url: entry.url.clone().unwrap_or_default(),
                last_read: entry.timestamp(),
                read_duration: 0,
            }),
            None => diag.warn("history entry references a manga not in favourites, dropping"),
        }
    }

    Ok(backup)
}

fn adapt_categories(raw: Vec<RawCategory>) -> Vec<Category> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, cat)| match cat {
            RawCategory::Name(name) => Category::new(name, idx as i64, idx as i64 + 1),
            RawCategory::Record {
                name,
                category_id,
                id,
                sort_key,
                order,
            } => {
                // Numeric position: modern sort_key, else a numeric order
                // value from old exports, else file position.
                let position = sort_key
                    .or_else(|| order.as_ref().and_then(|v| v.as_i64()))
                    .unwrap_or(idx as i64);
                let native_id = category_id.or(id).unwrap_or(idx as i64 + 1);
                let name = name.unwrap_or_else(|| format!("Category {}", idx + 1));
                Category::new(name, position, native_id)
            }
        })
        .collect()
}

fn adapt_favourite(
    raw: &RawFavourite,
    categories: &[Category],
    sources: &SourceRegistry,
    diag: &mut Diagnostics,
) -> Manga {
    let payload = raw.payload();

    let source_name = payload.source.as_deref().unwrap_or_default();
    // UNKNOWN_<id> labels are what our own Mihon-to-Kotatsu direction writes
    // for unregistered ids; recovering the id keeps round trips lossless.
    let source_id = match source_name
        .strip_prefix("UNKNOWN_")
        .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    {
        Some(id) => id.to_string(),
        None => {
            let id = sources.resolve_id(source_name);
            if id == LOCAL_SOURCE_ID && !source_name.is_empty() && source_name != "LOCAL" {
                diag.warn(format!(
                    "unresolved source name '{source_name}', using local source"
                ));
            }
            id.to_string()
        }
    };

    let url = payload
        .url
        .clone()
        .or_else(|| payload.public_url.clone())
        .unwrap_or_default();

    let state = payload.state.as_deref().unwrap_or_default();
    let status = Status::from_kotatsu(state);
    if status == Status::Unknown && !state.is_empty() {
        diag.warn(format!("unrecognized status '{state}', using unknown"));
    }

    // Tags split three ways: genre, and categories that were degraded to
    // tags by a previous single-category conversion, which get promoted
    // back into real memberships when the named category still exists.
    let mut genre: Vec<String> = Vec::new();
    let mut migrated: Vec<&str> = Vec::new();
    for tag in payload.tags.as_deref().unwrap_or_default() {
        if is_migrated_category(tag) {
            migrated.push(tag.title());
        } else if !tag.title().is_empty() {
            genre.push(tag.title().to_string());
        }
    }
    // An explicit genre field wins over tag titles.
    if let Some(field) = &payload.genre {
        genre = field.to_list();
    }

    let mut category_refs: Vec<i64> = Vec::new();
    if let Some(id) = raw.category_id
        && id != 0
    {
        category_refs.push(id);
    }
    if let Some(ids) = &raw.categories {
        category_refs.extend(ids.iter().copied().filter(|&id| id != 0));
    }
    for name in migrated {
        match categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
        {
            Some(cat) => category_refs.push(cat.id),
            None => diag.warn(format!(
                "migrated category tag '{name}' has no matching category, keeping as genre"
            )),
        }
    }

    Manga {
        source: source_id,
        url,
        title: payload.title.clone().unwrap_or_default(),
        author: payload.author.clone().unwrap_or_default(),
        artist: payload.artist.clone().unwrap_or_default(),
        description: payload.description.clone().unwrap_or_default(),
        genre,
        status,
        thumbnail_url: payload.cover.clone().unwrap_or_default(),
        date_added: raw.created_at.or(payload.date_added).unwrap_or(0),
        category_refs,
        history: Vec::new(),
    }
}

fn is_migrated_category(tag: &RawTag) -> bool {
    tag.source() == MIGRATED_CATEGORY_SOURCE || tag.key().starts_with(MIGRATED_CATEGORY_PREFIX)
}

/// Locate a resource by basename: exact match against the alias list first,
/// then a case-insensitive suffix match to tolerate naming drift. Directory
/// prefixes are ignored because some exports nest resources.
fn locate(names: &[String], aliases: &[&str]) -> Option<String> {
    for &alias in aliases {
        if let Some(name) = names
            .iter()
            .find(|n| basename(n).eq_ignore_ascii_case(alias))
        {
            return Some(name.clone());
        }
    }
    for &alias in aliases {
        if let Some(name) = names.iter().find(|n| {
            let base = basename(n).to_ascii_lowercase();
            base.ends_with(&alias.to_ascii_lowercase())
        }) {
            return Some(name.clone());
        }
    }
    None
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(String::from_utf8_lossy(strip_bom(&contents)).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename() {
        assert_eq!(basename("favourites.json"), "favourites.json");
        assert_eq!(basename("backup/favourites.json"), "favourites.json");
        assert_eq!(basename("a/b/history"), "history");
    }

    #[test]
    fn test_locate_prefers_exact_over_suffix() {
        let names = vec![
            "old_favourites.json".to_string(),
            "backup/favourites.json".to_string(),
        ];
        assert_eq!(
            locate(&names, FAVOURITES_ALIASES),
            Some("backup/favourites.json".to_string())
        );
    }

    #[test]
    fn test_locate_suffix_fallback() {
        let names = vec!["my-favourites.json".to_string()];
        assert_eq!(
            locate(&names, FAVOURITES_ALIASES),
            Some("my-favourites.json".to_string())
        );
        assert_eq!(locate(&names, HISTORY_ALIASES), None);
    }

    #[test]
    fn test_adapt_categories_mixed_shapes() {
        let raw: Vec<RawCategory> =
            serde_json::from_str(r#"["Reading", {"category_id": 9, "title": "Done", "sort_key": 4}]"#)
                .unwrap();
        let cats = adapt_categories(raw);
        assert_eq!(cats[0], Category::new("Reading", 0, 1));
        assert_eq!(cats[1], Category::new("Done", 4, 9));
    }
}
