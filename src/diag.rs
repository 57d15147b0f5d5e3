//! Non-fatal warning accumulation.
//!
//! Fatal problems abort a conversion through [`crate::Error`]; everything
//! recoverable (unresolved source name, dangling category reference,
//! malformed optional resource) lands here and rides along with the result.

/// A growable list of human-readable warnings collected during one conversion.
///
/// Readers and writers take `&mut Diagnostics` and keep going after anything
/// recoverable. Each warning is also emitted via [`tracing::warn!`] so
/// embedders with a subscriber installed see problems as they happen.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(target: "baku", "{message}");
        self.warnings.push(message);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_accumulate_in_order() {
        let mut diag = Diagnostics::new();
        assert!(diag.is_empty());

        diag.warn("first");
        diag.warn(String::from("second"));

        assert_eq!(diag.len(), 2);
        assert_eq!(diag.warnings(), &["first", "second"]);
    }
}
