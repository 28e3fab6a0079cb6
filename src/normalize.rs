//! Search-term normalization.
//!
//! Reduces a raw marketplace search string to the canonical form used for
//! exact-phrase matching: URL-decoded, ASCII-lowercased, stripped to
//! `[a-z ]`, with the suite's noise tokens removed, and trimmed. Two raw
//! queries that normalize identically are indistinguishable to the matcher.

use crate::config::SuiteConfig;

/// Normalizes raw search queries against a fixed noise-token list.
///
/// The noise list is derived once from the suite configuration: the brand
/// name, its abbreviation, the literal `"free"`, and the host platform
/// name. These are removed anywhere they occur as substrings, matching the
/// behavior users expect when they search for e.g. "acme backup free".
#[derive(Debug, Clone)]
pub struct TermNormalizer {
    noise: Vec<String>,
}

impl TermNormalizer {
    pub fn new(suite: &SuiteConfig) -> Self {
        let noise = [
            suite.brand.as_str(),
            suite.abbreviation.as_str(),
            "free",
            suite.platform.as_str(),
        ]
        .iter()
        .map(|t| t.to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

        Self { noise }
    }

    /// Produces the canonical comparison form of a raw query.
    ///
    /// Pure and total: malformed percent-escapes fall back to the raw
    /// input instead of failing. Step order matters — decode, lowercase,
    /// strip to `[a-z ]`, remove noise substrings, trim.
    pub fn normalize(&self, raw: &str) -> String {
        let decoded = url_decode(raw).unwrap_or_else(|| raw.to_string());

        let mut term: String = decoded
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || *c == ' ')
            .collect();

        for token in &self.noise {
            term = term.replace(token.as_str(), "");
        }

        term.trim().to_string()
    }
}

/// Decodes `%XX` escapes and `+` as space. Returns `None` on truncated
/// escapes or invalid UTF-8 so the caller can keep the raw string.
fn url_decode(value: &str) -> Option<String> {
    if !value.as_bytes().contains(&b'%') && !value.as_bytes().contains(&b'+') {
        return Some(value.to_string());
    }

    let mut out = Vec::with_capacity(value.len());
    let mut bytes = value.as_bytes().iter().copied();
    while let Some(b) = bytes.next() {
        match b {
            b'+' => out.push(b' '),
            b'%' => {
                let hi = bytes.next()?;
                let lo = bytes.next()?;
                let hex = [hi, lo];
                let hex = std::str::from_utf8(&hex).ok()?;
                let decoded = u8::from_str_radix(hex, 16).ok()?;
                out.push(decoded);
            }
            other => out.push(other),
        }
    }

    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn normalizer() -> TermNormalizer {
        TermNormalizer::new(&SuiteConfig {
            name: "Acme Suite".to_string(),
            brand: "acme".to_string(),
            abbreviation: "acm".to_string(),
            platform: "wordpress".to_string(),
            slug: "acme-suite-hints".to_string(),
            icons: BTreeMap::new(),
        })
    }

    #[test]
    fn lowercases_and_strips_punctuation() {
        let n = normalizer();
        assert_eq!(n.normalize("Backup!!"), "backup");
        assert_eq!(n.normalize("  Related   Posts?"), "related   posts");
    }

    #[test]
    fn decodes_url_escapes() {
        let n = normalizer();
        assert_eq!(n.normalize("contact%20form"), "contact form");
        assert_eq!(n.normalize("contact+form"), "contact form");
    }

    #[test]
    fn malformed_escape_falls_back_to_raw() {
        let n = normalizer();
        // "%zz" is not a valid escape; raw text survives minus the
        // non-alpha characters.
        assert_eq!(n.normalize("backup%zz"), "backupzz");
    }

    #[test]
    fn removes_noise_tokens_as_substrings() {
        let n = normalizer();
        assert_eq!(n.normalize("acme backup"), "backup");
        assert_eq!(n.normalize("free backup for wordpress"), "backup for");
        assert_eq!(n.normalize("acm backup"), "backup");
    }

    #[test]
    fn noise_only_query_normalizes_to_empty() {
        let n = normalizer();
        assert_eq!(n.normalize("Acme free"), "");
        assert_eq!(n.normalize(""), "");
    }

    #[test]
    fn idempotent_on_canonical_forms() {
        let n = normalizer();
        for raw in [
            "Backup!!",
            "contact%20form",
            "free SEO tools for WordPress",
            "related posts",
            "",
        ] {
            let once = n.normalize(raw);
            assert_eq!(n.normalize(&once), once, "input: {raw:?}");
        }
    }

    #[test]
    fn stripped_noise_equivalence() {
        let n = normalizer();
        assert_eq!(n.normalize("acme backup free"), n.normalize("backup"));
        assert_eq!(n.normalize("wordpress seo"), n.normalize("seo"));
    }
}
