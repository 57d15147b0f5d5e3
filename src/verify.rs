//! Post-write verification.
//!
//! A cheap structural sanity check, not a semantic diff: re-parse the bytes
//! a writer just produced and compare entry counts with the input. Nothing
//! in here can fail a conversion; a verification that cannot complete is
//! reported as unavailable instead of propagated.

use crate::convert::Format;
use crate::diag::Diagnostics;
use crate::sources::SourceRegistry;

/// Outcome of re-parsing freshly written output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Output parses and its manga count matches the input.
    Verified { manga: usize },
    /// Output parses but the counts disagree.
    CountMismatch { expected: usize, actual: usize },
    /// Output could not be re-parsed; the conversion result stands anyway.
    Unavailable { reason: String },
}

impl Verification {
    pub fn is_verified(&self) -> bool {
        matches!(self, Verification::Verified { .. })
    }

    /// Signed difference between produced and expected counts, when known.
    pub fn delta(&self) -> Option<i64> {
        match self {
            Verification::Verified { .. } => Some(0),
            Verification::CountMismatch { expected, actual } => {
                Some(*actual as i64 - *expected as i64)
            }
            Verification::Unavailable { .. } => None,
        }
    }
}

/// Re-parse `bytes` as `format` and compare the manga count to `expected`.
pub fn verify(
    bytes: &[u8],
    format: Format,
    expected: usize,
    sources: &SourceRegistry,
) -> Verification {
    // Warnings raised during re-parsing would duplicate what the writer
    // already reported, so they go to a scratch list.
    let mut scratch = Diagnostics::new();
    match format.read(bytes, sources, &mut scratch) {
        Ok(reparsed) => {
            let actual = reparsed.manga.len();
            if actual == expected {
                Verification::Verified { manga: actual }
            } else {
                Verification::CountMismatch { expected, actual }
            }
        }
        Err(e) => Verification::Unavailable {
            reason: e.to_string(),
        },
    }
}
