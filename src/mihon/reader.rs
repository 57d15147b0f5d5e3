use std::io::Read;

use flate2::read::GzDecoder;
use prost::Message;

use crate::backup::{Backup, Category, HistoryEntry, Manga};
use crate::categories::CategoryIndex;
use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::status::Status;

use super::proto;

/// Read a Mihon `.tachibk` backup into a [`Backup`].
///
/// The payload is normally gzip-wrapped; a bare protobuf message is accepted
/// too since some exports skip compression. A manga record without a url is
/// a fatal schema error (the field is required by the backup schema and an
/// entry without it cannot be re-imported anywhere). Wire category
/// references are ambiguous (order values in modern backups, ids in old
/// forks), so they are reconciled here into category ids before they enter
/// the normalized model.
pub fn read_mihon(bytes: &[u8], diag: &mut Diagnostics) -> Result<Backup> {
    let raw = decompress(bytes)?;
    let decoded = proto::Backup::decode(raw.as_slice())?;

    let categories: Vec<Category> = decoded
        .backup_categories
        .into_iter()
        .enumerate()
        .map(|(idx, cat)| {
            let order = cat.order.unwrap_or(idx as i64);
            Category {
                name: cat
                    .name
                    .unwrap_or_else(|| format!("Category {}", idx + 1)),
                order,
                id: cat.id.unwrap_or(order),
            }
        })
        .collect();
    let index = CategoryIndex::build(&categories);

    let mut entries: Vec<Manga> = Vec::with_capacity(decoded.backup_manga.len());
    for (idx, manga) in decoded.backup_manga.into_iter().enumerate() {
        let url = manga.url.ok_or_else(|| {
            Error::InvalidMihon(format!("manga record {idx} is missing its url"))
        })?;

        if !manga.chapters.is_empty() {
            // Chapter lists cannot be represented in the other direction;
            // history survives, chapter read-state does not.
            tracing::debug!(
                target: "baku",
                "dropping {} chapter records for '{url}'",
                manga.chapters.len()
            );
        }

        let status_code = manga.status.unwrap_or(0);
        let status = Status::from_code(status_code);
        if status == Status::Unknown && status_code != 0 {
            diag.warn(format!(
                "unrecognized status code {status_code} on '{url}', using unknown"
            ));
        }
        if manga.favorite == Some(false) {
            diag.warn(format!(
                "'{url}' is not marked favorite in the source backup; keeping it in the library"
            ));
        }

        let category_refs: Vec<i64> = index
            .resolve_refs(&manga.categories, diag)
            .into_iter()
            .map(|i| categories[i].id)
            .collect();

        entries.push(Manga {
            source: manga.source.unwrap_or(0).to_string(),
            url,
            title: manga.title.unwrap_or_default(),
            author: manga.author.unwrap_or_default(),
            artist: manga.artist.unwrap_or_default(),
            description: manga.description.unwrap_or_default(),
            genre: manga.genre,
            status,
            thumbnail_url: manga.thumbnail_url.unwrap_or_default(),
            date_added: manga.date_added.unwrap_or(0),
            category_refs,
            history: manga
                .history
                .into_iter()
                .map(|h| HistoryEntry {
                    url: h.url.unwrap_or_default(),
                    last_read: h.last_read.unwrap_or(0),
                    read_duration: h.read_duration.unwrap_or(0),
                })
                .collect(),
        });
    }

    if entries.is_empty() {
        return Err(Error::EmptyBackup);
    }

    // backup_sources only duplicates names the registry already knows; ids
    // the registry does not know keep their numeric form either way.
    tracing::debug!(
        target: "baku",
        "decoded {} manga, {} categories, {} source records",
        entries.len(),
        categories.len(),
        decoded.backup_sources.len()
    );

    Ok(Backup {
        manga: entries,
        categories,
    })
}

/// Un-gzip when the magic bytes say so, pass through otherwise.
fn decompress(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b {
        let mut decoder = GzDecoder::new(bytes);
        let mut raw = Vec::new();
        decoder.read_to_end(&mut raw)?;
        Ok(raw)
    } else {
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mihon::write_mihon;
    use crate::sources::SourceRegistry;

    #[test]
    fn test_accepts_uncompressed_payload() {
        let message = proto::Backup {
            backup_manga: vec![proto::BackupManga {
                source: Some(9),
                url: Some("/m".into()),
                title: Some("T".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let bytes = message.encode_to_vec();

        let backup = read_mihon(&bytes, &mut Diagnostics::new()).unwrap();
        assert_eq!(backup.manga.len(), 1);
        assert_eq!(backup.manga[0].source, "9");
    }

    #[test]
    fn test_gzip_round_trip() {
        let mut backup = Backup::new();
        backup
            .manga
            .push(Manga::new("9", "/m", "T").with_status(Status::Hiatus));
        let registry = SourceRegistry::new();

        let bytes = write_mihon(&backup, &registry, &mut Diagnostics::new()).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);

        let reread = read_mihon(&bytes, &mut Diagnostics::new()).unwrap();
        assert_eq!(reread.manga[0].title, "T");
        assert_eq!(reread.manga[0].status, Status::Hiatus);
    }

    #[test]
    fn test_wire_refs_reconciled_to_category_ids() {
        let message = proto::Backup {
            backup_manga: vec![proto::BackupManga {
                source: Some(9),
                url: Some("/m".into()),
                title: Some("T".into()),
                categories: vec![1],
                ..Default::default()
            }],
            backup_categories: vec![
                proto::BackupCategory {
                    name: Some("Reading".into()),
                    order: Some(0),
                    id: Some(5),
                    flags: Some(0),
                },
                proto::BackupCategory {
                    name: Some("Done".into()),
                    order: Some(1),
                    id: Some(6),
                    flags: Some(0),
                },
            ],
            ..Default::default()
        };

        let backup = read_mihon(&message.encode_to_vec(), &mut Diagnostics::new()).unwrap();
        // Wire ref 1 matches Done's order; the model carries Done's id.
        assert_eq!(backup.manga[0].category_refs, vec![6]);
    }

    #[test]
    fn test_missing_url_is_fatal() {
        let message = proto::Backup {
            backup_manga: vec![proto::BackupManga {
                source: Some(9),
                title: Some("No url".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = read_mihon(&message.encode_to_vec(), &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidMihon(_)));
    }

    #[test]
    fn test_empty_backup_is_fatal() {
        let bytes = proto::Backup::default().encode_to_vec();
        let err = read_mihon(&bytes, &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyBackup));
    }

    #[test]
    fn test_corrupt_payload_is_fatal() {
        let err = read_mihon(&[0x08, 0xff, 0xff], &mut Diagnostics::new()).unwrap_err();
        assert!(matches!(err, Error::ProtoDecode(_)));
    }
}
