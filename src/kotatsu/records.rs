//! Raw JSON record shapes for the Kotatsu backup format.
//!
//! Kotatsu's resources are loosely typed and have drifted across app
//! versions: favourites may nest the manga payload under a `manga` key or
//! inline it, categories may be objects or bare strings, field names vary
//! (`title`/`name`/`label`, `cover_url`/`thumbnailUrl`). All of that alias
//! resolution happens here, once, at the serde boundary; the reader adapter
//! converts these into the normalized model and nothing downstream ever
//! touches a raw shape again.

use serde::{Deserialize, Serialize};

/// One entry of `favourites.json`. Newer backups wrap the manga payload in a
/// `manga` object with membership data alongside; older ones inline it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawFavourite {
    pub manga_id: Option<i64>,
    pub category_id: Option<i64>,
    /// Some backup versions carry an array instead of a single id.
    pub categories: Option<Vec<i64>>,
    pub created_at: Option<i64>,
    pub manga: Option<RawManga>,
    #[serde(flatten)]
    pub inline: RawManga,
}

impl RawFavourite {
    /// The manga payload, wherever this backup version put it.
    pub fn payload(&self) -> &RawManga {
        self.manga.as_ref().unwrap_or(&self.inline)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawManga {
    pub id: Option<i64>,
    #[serde(alias = "name")]
    pub title: Option<String>,
    pub url: Option<String>,
    pub public_url: Option<String>,
    #[serde(
        alias = "cover_url",
        alias = "coverUrl",
        alias = "thumbnail_url",
        alias = "thumbnailUrl",
        alias = "large_cover_url"
    )]
    pub cover: Option<String>,
    #[serde(alias = "status")]
    pub state: Option<String>,
    pub author: Option<String>,
    pub artist: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub tags: Option<Vec<RawTag>>,
    pub genre: Option<RawGenre>,
    #[serde(alias = "dateAdded")]
    pub date_added: Option<i64>,
}

/// A tag: either a bare string or a `{title, key, source}` object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTag {
    Text(String),
    Record {
        #[serde(default, alias = "name")]
        title: Option<String>,
        #[serde(default)]
        key: Option<String>,
        #[serde(default)]
        source: Option<String>,
    },
}

impl RawTag {
    pub fn title(&self) -> &str {
        match self {
            RawTag::Text(s) => s,
            RawTag::Record { title, .. } => title.as_deref().unwrap_or_default(),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            RawTag::Text(_) => "",
            RawTag::Record { source, .. } => source.as_deref().unwrap_or_default(),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            RawTag::Text(s) => s,
            RawTag::Record { key, .. } => key.as_deref().unwrap_or_default(),
        }
    }
}

/// Genre: an array of strings, or one comma-joined string in old exports.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawGenre {
    List(Vec<String>),
    Joined(String),
}

impl RawGenre {
    pub fn to_list(&self) -> Vec<String> {
        match self {
            RawGenre::List(list) => list.clone(),
            RawGenre::Joined(s) => s
                .split(',')
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }
}

/// One entry of `categories.json`: an object or a bare name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawCategory {
    Name(String),
    Record {
        #[serde(default, alias = "title", alias = "label")]
        name: Option<String>,
        #[serde(default)]
        category_id: Option<i64>,
        #[serde(default)]
        id: Option<i64>,
        /// Numeric display position in modern backups.
        #[serde(default)]
        sort_key: Option<i64>,
        /// Kotatsu reuses `order` for a string sort mode ("NEWEST"); only old
        /// exports put the numeric position here, so it must stay untyped.
        #[serde(default)]
        order: Option<serde_json::Value>,
    },
}

/// One entry of `history.json`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawHistory {
    #[serde(alias = "mangaId")]
    pub manga_id: Option<i64>,
    #[serde(alias = "mangaTitle")]
    pub manga_title: Option<String>,
    #[serde(alias = "chapter_url")]
    pub url: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    #[serde(alias = "lastRead")]
    pub last_read: Option<i64>,
}

impl RawHistory {
    /// Most recent timestamp this entry carries, preferring `updated_at`.
    pub fn timestamp(&self) -> i64 {
        self.updated_at
            .or(self.created_at)
            .or(self.last_read)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Egress shapes: what the Kotatsu writer emits. These mirror what the app
// itself exports so a produced archive imports cleanly.
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct KotatsuCategory {
    pub category_id: i64,
    pub title: String,
    /// Kotatsu's per-category sort mode, not a position.
    pub order: &'static str,
    pub show_in_lib: bool,
    pub track: bool,
    pub created_at: i64,
    pub sort_key: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct KotatsuFavourite {
    pub manga_id: i64,
    pub category_id: i64,
    pub sort_key: i64,
    pub pinned: bool,
    pub created_at: i64,
    pub manga: KotatsuManga,
}

#[derive(Debug, Serialize)]
pub(crate) struct KotatsuManga {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub public_url: String,
    pub cover_url: String,
    pub state: &'static str,
    pub author: String,
    pub source: String,
    pub tags: Vec<KotatsuTag>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KotatsuTag {
    pub title: String,
    pub key: String,
    pub source: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct KotatsuHistory {
    pub manga_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub chapter_id: i64,
    pub scroll: i64,
    pub percent: f64,
    pub page: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_favourite_nested_and_flat() {
        let nested: RawFavourite = serde_json::from_str(
            r#"{"manga_id": 5, "category_id": 1,
                "manga": {"title": "Nested", "url": "/n", "source": "MangaDex"}}"#,
        )
        .unwrap();
        assert_eq!(nested.payload().title.as_deref(), Some("Nested"));
        assert_eq!(nested.category_id, Some(1));

        let flat: RawFavourite = serde_json::from_str(
            r#"{"title": "Flat", "url": "/f", "source": "Bato.to", "status": "ONGOING"}"#,
        )
        .unwrap();
        assert_eq!(flat.payload().title.as_deref(), Some("Flat"));
        assert_eq!(flat.payload().state.as_deref(), Some("ONGOING"));
    }

    #[test]
    fn test_cover_aliases() {
        let a: RawManga = serde_json::from_str(r#"{"cover_url": "x"}"#).unwrap();
        let b: RawManga = serde_json::from_str(r#"{"thumbnailUrl": "x"}"#).unwrap();
        assert_eq!(a.cover.as_deref(), Some("x"));
        assert_eq!(b.cover.as_deref(), Some("x"));
    }

    #[test]
    fn test_category_shapes() {
        let bare: RawCategory = serde_json::from_str(r#""Reading""#).unwrap();
        assert!(matches!(bare, RawCategory::Name(ref n) if n == "Reading"));

        let object: RawCategory = serde_json::from_str(
            r#"{"category_id": 3, "title": "Plan", "order": "NEWEST", "sort_key": 2}"#,
        )
        .unwrap();
        match object {
            RawCategory::Record {
                name,
                category_id,
                sort_key,
                ..
            } => {
                assert_eq!(name.as_deref(), Some("Plan"));
                assert_eq!(category_id, Some(3));
                assert_eq!(sort_key, Some(2));
            }
            _ => panic!("expected object category"),
        }
    }

    #[test]
    fn test_genre_joined_string() {
        let genre: RawGenre = serde_json::from_str(r#""Action, Fantasy , ""#).unwrap();
        assert_eq!(genre.to_list(), vec!["Action", "Fantasy"]);
    }

    #[test]
    fn test_history_timestamp_preference() {
        let h: RawHistory =
            serde_json::from_str(r#"{"manga_id": 1, "created_at": 10, "updated_at": 20}"#).unwrap();
        assert_eq!(h.timestamp(), 20);

        let old: RawHistory = serde_json::from_str(r#"{"mangaId": 1, "lastRead": 7}"#).unwrap();
        assert_eq!(old.timestamp(), 7);
        assert_eq!(old.manga_id, Some(1));
    }
}
