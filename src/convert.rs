//! The conversion pipeline: read, write, verify.

use crate::backup::Backup;
use crate::diag::Diagnostics;
use crate::error::{Error, Result};
use crate::kotatsu::{read_kotatsu, write_kotatsu};
use crate::mihon::{read_mihon, write_mihon};
use crate::sources::SourceRegistry;
use crate::verify::{Verification, verify};

/// A supported backup format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// ZIP archive of JSON resources (`.bk.zip`).
    Kotatsu,
    /// Gzip-wrapped protobuf message (`.tachibk`).
    Mihon,
}

impl Format {
    /// Detect a format from leading magic bytes.
    ///
    /// ZIP archives start with `PK`; Mihon payloads start with the gzip
    /// magic, or with the tag byte of the first repeated manga field when
    /// the export skipped compression.
    pub fn sniff(bytes: &[u8]) -> Option<Format> {
        match bytes {
            [b'P', b'K', ..] => Some(Format::Kotatsu),
            [0x1f, 0x8b, ..] => Some(Format::Mihon),
            [0x0a, ..] => Some(Format::Mihon),
            _ => None,
        }
    }

    /// Guess a format from a file name, for CLI ergonomics.
    pub fn from_path(path: &str) -> Option<Format> {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".tachibk") || lower.ends_with(".proto.gz") {
            Some(Format::Mihon)
        } else if lower.ends_with(".zip") || lower.ends_with(".bk.zip") {
            Some(Format::Kotatsu)
        } else {
            None
        }
    }

    /// The other format.
    pub fn counterpart(self) -> Format {
        match self {
            Format::Kotatsu => Format::Mihon,
            Format::Mihon => Format::Kotatsu,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Kotatsu => "Kotatsu",
            Format::Mihon => "Mihon",
        }
    }

    /// Parse raw bytes of this format into the normalized model.
    pub fn read(
        self,
        bytes: &[u8],
        sources: &SourceRegistry,
        diag: &mut Diagnostics,
    ) -> Result<Backup> {
        match self {
            Format::Kotatsu => read_kotatsu(bytes, sources, diag),
            Format::Mihon => read_mihon(bytes, diag),
        }
    }

    /// Serialize the normalized model into raw bytes of this format.
    pub fn write(
        self,
        backup: &Backup,
        sources: &SourceRegistry,
        diag: &mut Diagnostics,
    ) -> Result<Vec<u8>> {
        match self {
            Format::Kotatsu => write_kotatsu(backup, sources, diag),
            Format::Mihon => write_mihon(backup, sources, diag),
        }
    }
}

/// Result of a successful conversion.
#[derive(Debug)]
pub struct Conversion {
    /// The produced backup, ready to write to disk.
    pub bytes: Vec<u8>,
    /// Entry counts of the input, for display.
    pub manga: usize,
    pub categories: usize,
    pub history: usize,
    /// Soft warnings collected across reading and writing.
    pub diagnostics: Diagnostics,
    /// Structural re-parse check of the produced bytes.
    pub verification: Verification,
}

/// Convert a backup between formats.
///
/// Fatal errors (corrupt container, missing required resource, empty
/// library) abort with an [`Error`]; anything recoverable degrades with a
/// warning in [`Conversion::diagnostics`]. On success the produced bytes are
/// always complete; there is no partial output.
pub fn convert(
    bytes: &[u8],
    from: Format,
    to: Format,
    sources: &SourceRegistry,
) -> Result<Conversion> {
    if from == to {
        return Err(Error::SameFormat);
    }

    let mut diagnostics = Diagnostics::new();
    let backup = from.read(bytes, sources, &mut diagnostics)?;

    let manga = backup.manga.len();
    let categories = backup.categories.len();
    let history = backup.history_len();

    let output = to.write(&backup, sources, &mut diagnostics)?;
    let verification = verify(&output, to, manga, sources);

    Ok(Conversion {
        bytes: output,
        manga,
        categories,
        history,
        diagnostics,
        verification,
    })
}
