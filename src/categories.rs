//! Category reference reconciliation.
//!
//! Backup formats disagree on what a manga's category reference encodes:
//! modern Mihon stores the category's positional `order` value, older forks
//! its native `id`, and there is no schema marker saying which. The
//! reconciler builds both lookup tables. Wire references coming off a Mihon
//! payload are tried order first, then id; references already normalized
//! (which are category ids by contract) are tried id first, then order.
//! Either way an unresolvable reference warns and falls back to the first
//! category, and a dangling reference is never carried into the output.

use crate::backup::Category;
use crate::diag::Diagnostics;
use std::collections::HashMap;

/// Tag source marker for categories degraded to tags when writing a
/// single-category format. Lets the reverse direction promote them back.
pub const MIGRATED_CATEGORY_SOURCE: &str = "MIGRATE_CAT";

/// Key prefix for migrated-category tags.
pub const MIGRATED_CATEGORY_PREFIX: &str = "category:";

/// Lookup tables over a normalized category list, built once per write.
#[derive(Debug)]
pub struct CategoryIndex<'a> {
    categories: &'a [Category],
    by_order: HashMap<i64, usize>,
    by_id: HashMap<i64, usize>,
}

impl<'a> CategoryIndex<'a> {
    pub fn build(categories: &'a [Category]) -> Self {
        let mut by_order = HashMap::new();
        let mut by_id = HashMap::new();
        for (idx, cat) in categories.iter().enumerate() {
            by_order.entry(cat.order).or_insert(idx);
            by_id.entry(cat.id).or_insert(idx);
        }
        Self {
            categories,
            by_order,
            by_id,
        }
    }

    pub fn categories(&self) -> &'a [Category] {
        self.categories
    }

    /// Resolve one wire reference to an index into the category list.
    ///
    /// Order-match first, then id-match, then first-category fallback with a
    /// warning. Returns `None` only when there are no categories at all.
    pub fn resolve(&self, reference: i64, diag: &mut Diagnostics) -> Option<usize> {
        self.lookup(
            reference,
            self.by_order.get(&reference).or_else(|| self.by_id.get(&reference)),
            diag,
        )
    }

    /// Resolve one normalized id reference to an index into the category
    /// list. Id-match first, order-match as a lenient fallback, then
    /// first-category fallback with a warning.
    pub fn locate(&self, reference: i64, diag: &mut Diagnostics) -> Option<usize> {
        self.lookup(
            reference,
            self.by_id.get(&reference).or_else(|| self.by_order.get(&reference)),
            diag,
        )
    }

    fn lookup(
        &self,
        reference: i64,
        hit: Option<&usize>,
        diag: &mut Diagnostics,
    ) -> Option<usize> {
        if let Some(&idx) = hit {
            return Some(idx);
        }
        if self.categories.is_empty() {
            diag.warn(format!(
                "dropping category reference {reference}: backup has no categories"
            ));
            return None;
        }
        diag.warn(format!(
            "category reference {reference} matches no order or id; \
             falling back to '{}'",
            self.categories[0].name
        ));
        Some(0)
    }

    /// Resolve a manga's full wire reference list, deduplicating resolved
    /// indices while preserving first-seen order.
    pub fn resolve_refs(&self, refs: &[i64], diag: &mut Diagnostics) -> Vec<usize> {
        let mut resolved = Vec::new();
        for &reference in refs {
            if let Some(idx) = self.resolve(reference, diag)
                && !resolved.contains(&idx)
            {
                resolved.push(idx);
            }
        }
        resolved
    }

    /// Resolve a manga's full normalized reference list, deduplicating
    /// resolved indices while preserving first-seen order.
    pub fn locate_refs(&self, refs: &[i64], diag: &mut Diagnostics) -> Vec<usize> {
        let mut located = Vec::new();
        for &reference in refs {
            if let Some(idx) = self.locate(reference, diag)
                && !located.contains(&idx)
            {
                located.push(idx);
            }
        }
        located
    }
}

/// A multi-category membership split for a single-category target format:
/// the first resolved category becomes the folder, the rest degrade to tags.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PrimaryAndExtras {
    pub primary: Option<usize>,
    pub extras: Vec<usize>,
}

/// Split resolved memberships for a target that models one folder per entry.
pub fn primary_and_extras(resolved: Vec<usize>) -> PrimaryAndExtras {
    let mut iter = resolved.into_iter();
    PrimaryAndExtras {
        primary: iter.next(),
        extras: iter.collect(),
    }
}

/// The tag key a degraded category membership is written with.
pub fn migrated_tag_key(name: &str) -> String {
    format!("{MIGRATED_CATEGORY_PREFIX}{}", name.to_lowercase())
}
