//! Exact-phrase match selection.
//!
//! Walks the catalog in priority order and picks at most one descriptor
//! whose candidate phrase set contains the normalized term. Matching is
//! exact string equality per phrase — never substring containment.

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::models::FeatureDescriptor;

/// Selects the descriptor to suggest for `term`, if any.
///
/// Returns the first descriptor (catalog order) whose phrase set contains
/// `term`. If that descriptor has been dismissed the result is `None` —
/// there is no fallback to later matches, mirroring a user's "hide this
/// suggestion" intent for the feature the query most clearly names.
/// An empty term never matches.
pub fn select<'a>(
    term: &str,
    catalog: &'a Catalog,
    dismissed: &HashSet<String>,
) -> Option<&'a FeatureDescriptor> {
    if term.is_empty() {
        return None;
    }

    let entry = catalog
        .entries()
        .iter()
        .find(|e| e.phrases.iter().any(|p| p == term))?;

    if dismissed.contains(&entry.descriptor.id) {
        return None;
    }

    Some(&entry.descriptor)
}
