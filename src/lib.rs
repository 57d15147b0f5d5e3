//! # baku
//!
//! A fast, lightweight library for converting manga library backups between
//! the Kotatsu and Mihon/Tachiyomi formats.
//!
//! ## Features
//!
//! - Read and write Kotatsu backup archives (ZIP of JSON resources)
//! - Read and write Mihon `.tachibk` backups (gzip-wrapped protobuf)
//! - Convert between formats via an intermediate [`Backup`] representation
//! - Reconciles source identities, status vocabularies, and category
//!   memberships across the two data models
//! - Collects non-fatal warnings in [`Diagnostics`] and structurally
//!   verifies produced output
//!
//! ## Quick Start
//!
//! ```no_run
//! use baku::{Format, SourceRegistry, convert};
//!
//! let registry = SourceRegistry::new();
//! let input = std::fs::read("backup.bk.zip")?;
//!
//! let result = convert(&input, Format::Kotatsu, Format::Mihon, &registry)?;
//! std::fs::write("backup.tachibk", &result.bytes)?;
//!
//! println!("{} manga converted", result.manga);
//! for warning in result.diagnostics.warnings() {
//!     eprintln!("warning: {warning}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Working with the normalized model
//!
//! The [`Backup`] struct is the central data type, representing a library in
//! a format-agnostic way. Readers and writers are also available directly
//! when one side of the conversion lives elsewhere:
//!
//! ```no_run
//! use baku::{Diagnostics, SourceRegistry, read_kotatsu, write_mihon};
//!
//! let registry = SourceRegistry::new();
//! let mut diag = Diagnostics::new();
//!
//! let input = std::fs::read("backup.bk.zip")?;
//! let backup = read_kotatsu(&input, &registry, &mut diag)?;
//! let bytes = write_mihon(&backup, &registry, &mut diag)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
pub mod categories;
pub mod convert;
pub mod diag;
pub mod error;
pub mod ident;
pub mod kotatsu;
pub mod mihon;
pub mod sources;
pub mod status;
pub mod verify;
pub(crate) mod util;

pub use backup::{Backup, Category, HistoryEntry, Manga};
pub use convert::{Conversion, Format, convert};
pub use diag::Diagnostics;
pub use error::{Error, Result};
pub use kotatsu::{read_kotatsu, write_kotatsu};
pub use mihon::{read_mihon, write_mihon};
pub use sources::{LOCAL_SOURCE_ID, SourceRegistry};
pub use status::Status;
pub use verify::Verification;
