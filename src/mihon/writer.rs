use std::collections::HashSet;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use prost::Message;

use crate::backup::Backup;
use crate::categories::CategoryIndex;
use crate::diag::Diagnostics;
use crate::error::Result;
use crate::sources::SourceRegistry;

use super::proto;

/// Write a [`Backup`] as a gzip-wrapped Mihon `.tachibk` payload.
///
/// Mihon assumes categories are densely numbered, so the normalized list is
/// re-numbered with `order = id = index` and each manga's id references are
/// rewritten to those indices. Every entry is marked
/// favorite (a non-favorite entry would silently vanish on import), and a
/// deduplicated source table is emitted so the app can label entries whose
/// extension is not installed.
pub fn write_mihon(
    backup: &Backup,
    sources: &SourceRegistry,
    diag: &mut Diagnostics,
) -> Result<Vec<u8>> {
    let index = CategoryIndex::build(&backup.categories);

    let backup_categories: Vec<proto::BackupCategory> = backup
        .categories
        .iter()
        .enumerate()
        .map(|(idx, cat)| proto::BackupCategory {
            name: Some(cat.name.clone()),
            order: Some(idx as i64),
            id: Some(idx as i64),
            flags: Some(0),
        })
        .collect();

    let mut seen_sources = HashSet::new();
    let mut backup_sources: Vec<proto::BackupSource> = Vec::new();
    let mut backup_manga: Vec<proto::BackupManga> = Vec::with_capacity(backup.manga.len());

    for manga in &backup.manga {
        let source_id: i64 = match manga.source.parse() {
            Ok(id) => id,
            Err(_) => {
                diag.warn(format!(
                    "non-numeric source identity '{}' on '{}', using local source",
                    manga.source, manga.url
                ));
                0
            }
        };

        if seen_sources.insert(source_id) {
            backup_sources.push(proto::BackupSource {
                name: Some(sources.resolve_name(&source_id.to_string())),
                source_id: Some(source_id),
            });
        }

        let categories: Vec<i64> = index
            .locate_refs(&manga.category_refs, diag)
            .into_iter()
            .map(|idx| idx as i64)
            .collect();

        backup_manga.push(proto::BackupManga {
            source: Some(source_id),
            url: Some(manga.url.clone()),
            title: Some(manga.title.clone()),
            artist: Some(manga.artist.clone()),
            author: Some(manga.author.clone()),
            description: Some(manga.description.clone()),
            genre: manga.genre.clone(),
            status: Some(manga.status.code()),
            thumbnail_url: Some(manga.thumbnail_url.clone()),
            date_added: Some(manga.date_added),
            chapters: Vec::new(),
            categories,
            favorite: Some(true),
            history: manga
                .history
                .iter()
                .map(|h| proto::BackupHistory {
                    url: Some(h.url.clone()),
                    last_read: Some(h.last_read),
                    read_duration: Some(h.read_duration),
                })
                .collect(),
        });
    }

    let message = proto::Backup {
        backup_manga,
        backup_categories,
        backup_sources,
    };

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&message.encode_to_vec())?;
    Ok(encoder.finish()?)
}
