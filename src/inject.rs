//! Suggestion-card composition and result-list injection.
//!
//! Builds the card by layering, lowest to highest precedence: the remote
//! listing template, the matched descriptor's own fields, and a fixed set
//! of overrides that mark the entry as a suite-provided suggestion. The
//! card is prepended at index 0; nothing else in the list moves.

use serde_json::{Map, Value};

use crate::config::SuiteConfig;
use crate::models::{FeatureDescriptor, ResultList};

/// Marker field flagging the entry as injected rather than a real
/// marketplace listing.
pub const INJECTED_MARKER: &str = "injected";

/// Composes the suggestion card and prepends it to `results`.
pub fn inject(
    mut results: ResultList,
    descriptor: &FeatureDescriptor,
    template: Map<String, Value>,
    suite: &SuiteConfig,
) -> ResultList {
    let mut card = template;

    // Middle layer: the descriptor's own fields, so configure/learn-more
    // URLs and search metadata ride along on the card.
    if let Ok(Value::Object(fields)) = serde_json::to_value(descriptor) {
        for (key, value) in fields {
            card.insert(key, value);
        }
    }

    // Fixed overrides, highest precedence.
    card.insert(INJECTED_MARKER.to_string(), Value::Bool(true));
    card.insert(
        "name".to_string(),
        Value::String(format!("{}: {}", suite.name, descriptor.name)),
    );
    card.insert(
        "short_description".to_string(),
        Value::String(descriptor.short_description.clone()),
    );
    card.insert(
        "requires_connection".to_string(),
        Value::Bool(descriptor.requires_connection),
    );
    card.insert("slug".to_string(), Value::String(suite.slug.clone()));
    card.insert(
        "version".to_string(),
        Value::String(env!("CARGO_PKG_VERSION").to_string()),
    );
    if !suite.icons.is_empty() {
        let icons: Map<String, Value> = suite
            .icons
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        card.insert("icons".to_string(), Value::Object(icons));
    }

    results.insert(0, Value::Object(card));
    results
}
