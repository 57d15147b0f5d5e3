use crate::status::Status;

/// Intermediate representation of a manga library backup.
/// Format-agnostic structure that Kotatsu and Mihon backups convert to/from.
///
/// A `Backup` is owned exclusively by the conversion that created it: readers
/// build one per call, writers consume it by reference, nothing is shared or
/// persisted across calls.
#[derive(Debug, Clone, Default)]
pub struct Backup {
    /// Library entries in source-file order.
    pub manga: Vec<Manga>,
    /// User categories in source-file order.
    pub categories: Vec<Category>,
}

/// One library entry plus its metadata, category assignments, and history.
#[derive(Debug, Clone, Default)]
pub struct Manga {
    /// Canonical numeric source id, carried as a decimal string because the
    /// underlying value is a full 64-bit integer. `"0"` means local/unknown.
    pub source: String,
    pub url: String,
    pub title: String,
    pub author: String,
    pub artist: String,
    pub description: String,
    /// Free-text tags, insertion order preserved, not deduplicated.
    pub genre: Vec<String>,
    pub status: Status,
    pub thumbnail_url: String,
    /// Epoch milliseconds, 0 if the source format did not record it.
    pub date_added: i64,
    /// References into [`Backup::categories`] by [`Category::id`]. Readers
    /// reconcile whatever their source format encodes (order values or native
    /// ids) into id references before the model leaves them.
    pub category_refs: Vec<i64>,
    /// Reading history embedded with its owning entry.
    pub history: Vec<HistoryEntry>,
}

/// A user-defined folder for organizing library entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Display sort position.
    pub order: i64,
    /// Format-native identifier if one existed, else synthesized.
    pub id: i64,
}

/// One reading-history record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Chapter url; empty when the source format only tracks chapter ids.
    pub url: String,
    /// Epoch milliseconds of the last read.
    pub last_read: i64,
    /// Total reading duration in milliseconds.
    pub read_duration: i64,
}

impl Backup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of history entries across all manga.
    pub fn history_len(&self) -> usize {
        self.manga.iter().map(|m| m.history.len()).sum()
    }
}

impl Manga {
    pub fn new(source: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            url: url.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_category_refs(mut self, refs: impl IntoIterator<Item = i64>) -> Self {
        self.category_refs = refs.into_iter().collect();
        self
    }
}

impl Category {
    pub fn new(name: impl Into<String>, order: i64, id: i64) -> Self {
        Self {
            name: name.into(),
            order,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_len_sums_across_manga() {
        let mut backup = Backup::new();
        let mut a = Manga::new("0", "/a", "A");
        a.history.push(HistoryEntry {
            url: "/a/1".into(),
            last_read: 1,
            read_duration: 0,
        });
        a.history.push(HistoryEntry {
            url: "/a/2".into(),
            last_read: 2,
            read_duration: 0,
        });
        let b = Manga::new("0", "/b", "B");
        backup.manga.push(a);
        backup.manga.push(b);

        assert_eq!(backup.history_len(), 2);
    }
}
