use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::backup::Backup;
use crate::categories::{
    CategoryIndex, MIGRATED_CATEGORY_SOURCE, migrated_tag_key, primary_and_extras,
};
use crate::diag::Diagnostics;
use crate::error::Result;
use crate::ident;
use crate::sources::SourceRegistry;
use crate::util::now_millis;

use super::records::{
    KotatsuCategory, KotatsuFavourite, KotatsuHistory, KotatsuManga, KotatsuTag,
};

/// Name of the default category manga with no resolvable membership land in.
const DEFAULT_CATEGORY: &str = "Library";

/// Write a [`Backup`] as a Kotatsu archive.
///
/// Kotatsu models one folder per library entry, so the first resolved
/// category becomes the entry's folder and any further memberships degrade
/// to provenance-marked tags. Entries with no resolvable membership are
/// assigned a synthesized default category; Kotatsu renders uncategorized
/// entries poorly and the membership would otherwise be lost on a round
/// trip.
///
/// The archive is always structurally complete: empty collections still
/// produce valid empty-array resources, because the app rejects backups
/// missing expected files. Apart from `created_at` wall-clock stamps the
/// output is a pure function of the input.
pub fn write_kotatsu(
    backup: &Backup,
    sources: &SourceRegistry,
    diag: &mut Diagnostics,
) -> Result<Vec<u8>> {
    let timestamp = now_millis();
    let index = CategoryIndex::build(&backup.categories);

    // Kotatsu wants dense 1-based category ids; the emitted list parallels
    // the normalized list, so normalized index i becomes category_id i + 1.
    let mut categories: Vec<KotatsuCategory> = backup
        .categories
        .iter()
        .enumerate()
        .map(|(idx, cat)| KotatsuCategory {
            category_id: idx as i64 + 1,
            title: cat.name.clone(),
            order: "NEWEST",
            show_in_lib: true,
            track: true,
            created_at: timestamp,
            sort_key: cat.order,
        })
        .collect();

    let mut default_category_id: Option<i64> = None;
    let mut favourites: Vec<KotatsuFavourite> = Vec::with_capacity(backup.manga.len());
    let mut history: Vec<KotatsuHistory> = Vec::new();

    for manga in &backup.manga {
        let resolved = index.locate_refs(&manga.category_refs, diag);
        let split = primary_and_extras(resolved);

        let category_id = match split.primary {
            Some(idx) => idx as i64 + 1,
            None => *default_category_id.get_or_insert_with(|| {
                let id = categories.len() as i64 + 1;
                categories.push(KotatsuCategory {
                    category_id: id,
                    title: DEFAULT_CATEGORY.to_string(),
                    order: "NEWEST",
                    show_in_lib: true,
                    track: true,
                    created_at: timestamp,
                    sort_key: categories.len() as i64,
                });
                id
            }),
        };

        let source_name = sources.resolve_name(&manga.source);
        if source_name.starts_with("UNKNOWN_") {
            diag.warn(format!(
                "no registered name for source id {}, labelling '{source_name}'",
                manga.source
            ));
        }

        let mut tags: Vec<KotatsuTag> = manga
            .genre
            .iter()
            .map(|g| KotatsuTag {
                title: g.clone(),
                key: g.clone(),
                source: source_name.clone(),
            })
            .collect();
        for idx in split.extras {
            let name = &index.categories()[idx].name;
            tags.push(KotatsuTag {
                title: name.clone(),
                key: migrated_tag_key(name),
                source: MIGRATED_CATEGORY_SOURCE.to_string(),
            });
        }

        let manga_id = ident::manga_id_i64(&manga.url, &manga.source);

        for entry in &manga.history {
            let last_read = if entry.last_read != 0 {
                entry.last_read
            } else {
                timestamp
            };
            history.push(KotatsuHistory {
                manga_id,
                created_at: last_read,
                updated_at: last_read,
                chapter_id: ident::tag_id_i64(&entry.url, &manga.source),
                scroll: 0,
                percent: 0.0,
                page: 0,
            });
        }

        favourites.push(KotatsuFavourite {
            manga_id,
            category_id,
            sort_key: 0,
            pinned: false,
            created_at: if manga.date_added != 0 {
                manga.date_added
            } else {
                timestamp
            },
            manga: KotatsuManga {
                id: manga_id,
                title: manga.title.clone(),
                url: manga.url.clone(),
                public_url: manga.url.clone(),
                cover_url: manga.thumbnail_url.clone(),
                state: manga.status.to_kotatsu(),
                author: manga.author.clone(),
                source: source_name,
                tags,
            },
        });
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file("categories.json", options)?;
    zip.write_all(serde_json::to_string(&categories)?.as_bytes())?;

    zip.start_file("favourites.json", options)?;
    zip.write_all(serde_json::to_string(&favourites)?.as_bytes())?;

    zip.start_file("history.json", options)?;
    zip.write_all(serde_json::to_string(&history)?.as_bytes())?;

    // Resources the app expects to exist even when we have nothing for them.
    zip.start_file("bookmarks.json", options)?;
    zip.write_all(b"[]")?;

    zip.start_file("settings.json", options)?;
    zip.write_all(b"{}")?;

    zip.start_file("index", options)?;
    zip.write_all(br#"{"version":1}"#)?;

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::{Category, Manga};
    use crate::kotatsu::read_kotatsu;
    use crate::status::Status;
    use zip::ZipArchive;

    fn sample() -> Backup {
        let mut backup = Backup::new();
        backup.categories = vec![
            Category::new("Reading", 0, 10),
            Category::new("Plan", 1, 20),
        ];
        backup.manga.push(
            Manga::new("2499283573021220255", "/title/1", "Alpha")
                .with_status(Status::Ongoing)
                .with_category_refs([10, 20]),
        );
        backup
            .manga
            .push(Manga::new("0", "/title/2", "Beta").with_status(Status::Completed));
        backup
    }

    #[test]
    fn test_archive_is_structurally_complete_when_empty_collections() {
        let mut backup = Backup::new();
        backup.manga.push(Manga::new("0", "/x", "X"));
        let mut diag = Diagnostics::new();
        let registry = SourceRegistry::new();

        let bytes = write_kotatsu(&backup, &registry, &mut diag).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        for name in [
            "categories.json",
            "favourites.json",
            "history.json",
            "bookmarks.json",
            "settings.json",
            "index",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_multi_category_degrades_to_tag() {
        let backup = sample();
        let registry = SourceRegistry::new();
        let mut diag = Diagnostics::new();

        let bytes = write_kotatsu(&backup, &registry, &mut diag).unwrap();
        let reread = read_kotatsu(&bytes, &registry, &mut diag).unwrap();

        // The dual-category manga keeps its folder and re-promotes the
        // degraded tag back into a second membership.
        assert_eq!(reread.manga[0].category_refs.len(), 2);
        // The uncategorized manga is assigned the synthesized default.
        assert_eq!(reread.manga[1].category_refs.len(), 1);
        let default_ref = reread.manga[1].category_refs[0];
        let default = reread
            .categories
            .iter()
            .find(|c| c.id == default_ref)
            .expect("default category present");
        assert_eq!(default.name, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_output_deterministic_except_timestamps() {
        let backup = sample();
        let registry = SourceRegistry::new();

        let a = write_kotatsu(&backup, &registry, &mut Diagnostics::new()).unwrap();
        let b = write_kotatsu(&backup, &registry, &mut Diagnostics::new()).unwrap();

        // Compare the favourites payloads with created_at stripped.
        let strip = |bytes: &[u8]| -> Vec<serde_json::Value> {
            let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
            let mut text = String::new();
            std::io::Read::read_to_string(
                &mut archive.by_name("favourites.json").unwrap(),
                &mut text,
            )
            .unwrap();
            let mut entries: Vec<serde_json::Value> = serde_json::from_str(&text).unwrap();
            for entry in &mut entries {
                entry.as_object_mut().unwrap().remove("created_at");
            }
            entries
        };
        assert_eq!(strip(&a), strip(&b));
    }
}
