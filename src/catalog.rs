//! Priority-ordered feature catalog.
//!
//! Wraps the configured descriptor list in a read-only view sorted by
//! `sort_rank` (stable, so registration order breaks ties — iteration
//! order decides which descriptor wins a multi-match). The engine's own
//! module id is excluded so the suggestion system never suggests itself.

use anyhow::Result;
use std::collections::HashSet;

use crate::models::FeatureDescriptor;

/// Identifier of the suggestion engine itself; never eligible as a match.
pub const SELF_MODULE_ID: &str = "plugin-hints";

/// One catalog slot: the descriptor plus its precomputed candidate phrase
/// set (`search_terms` plus the lowercased name).
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub descriptor: FeatureDescriptor,
    pub phrases: Vec<String>,
}

/// Read-only, priority-ordered collection of feature descriptors.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Builds a catalog from the configured descriptor list.
    ///
    /// Search terms are lowercased here, at registration; the matcher
    /// compares against them verbatim. Fails on duplicate ids.
    pub fn new(modules: Vec<FeatureDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for module in &modules {
            if !seen.insert(module.id.clone()) {
                anyhow::bail!("Duplicate module id in catalog: '{}'", module.id);
            }
        }

        let mut entries: Vec<CatalogEntry> = modules
            .into_iter()
            .filter(|m| m.id != SELF_MODULE_ID)
            .map(|mut descriptor| {
                for term in &mut descriptor.search_terms {
                    *term = term.to_ascii_lowercase();
                }
                let mut phrases = descriptor.search_terms.clone();
                phrases.push(descriptor.name.to_ascii_lowercase());
                CatalogEntry {
                    descriptor,
                    phrases,
                }
            })
            .collect();

        // Vec::sort_by_key is stable: equal ranks keep registration order.
        entries.sort_by_key(|e| e.descriptor.sort_rank);

        Ok(Self { entries })
    }

    /// Descriptors in match-priority order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Whether `id` names a registered descriptor. Used by the dismissal
    /// endpoint to validate `hint` before touching any state.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.descriptor.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(id: &str, rank: i64) -> FeatureDescriptor {
        FeatureDescriptor {
            id: id.to_string(),
            name: id.to_uppercase(),
            short_description: format!("{id} feature"),
            search_terms: vec![format!("{id} Terms")],
            sort_rank: rank,
            requires_connection: false,
            configure_url: None,
            learn_more_url: None,
        }
    }

    #[test]
    fn sorts_ascending_by_rank() {
        let catalog = Catalog::new(vec![
            descriptor("c", 30),
            descriptor("a", 10),
            descriptor("b", 20),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.descriptor.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn equal_ranks_keep_registration_order() {
        let catalog = Catalog::new(vec![
            descriptor("first", 5),
            descriptor("second", 5),
            descriptor("third", 5),
        ])
        .unwrap();

        let ids: Vec<&str> = catalog
            .entries()
            .iter()
            .map(|e| e.descriptor.id.as_str())
            .collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn excludes_own_module_id() {
        let catalog =
            Catalog::new(vec![descriptor(SELF_MODULE_ID, 1), descriptor("backup", 2)]).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains(SELF_MODULE_ID));
        assert!(catalog.contains("backup"));
    }

    #[test]
    fn lowercases_terms_and_adds_name_phrase() {
        let catalog = Catalog::new(vec![descriptor("backup", 1)]).unwrap();
        let entry = &catalog.entries()[0];
        assert_eq!(entry.descriptor.search_terms, ["backup terms"]);
        assert!(entry.phrases.contains(&"backup".to_string()));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Catalog::new(vec![descriptor("backup", 1), descriptor("backup", 2)]);
        assert!(result.is_err());
    }
}
