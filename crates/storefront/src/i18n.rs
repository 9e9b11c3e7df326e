//! Localization: language negotiation and key → string lookup.
//!
//! Translation tables are `<lang>.json` files (flat string maps) loaded once
//! at start-up. English is compiled in so a missing directory or a missing key
//! still renders something readable. Lookups fall back from the requested
//! language to English, then to the key itself.
//!
//! The store holds no "current" language. Each request resolves its own (see
//! `middleware::language`), so one shopper's choice never leaks into another's
//! pages.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// Language used when the request names none.
pub const DEFAULT_LANGUAGE: &str = "en";

/// A selectable language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages the storefront offers.
pub const LANGUAGES: &[Language] = &[
    Language { code: "en", name: "English" },
    Language { code: "hi", name: "हिन्दी" },
    Language { code: "bn", name: "বাংলা" },
    Language { code: "ta", name: "தமிழ்" },
    Language { code: "te", name: "తెలుగు" },
    Language { code: "kn", name: "ಕನ್ನಡ" },
    Language { code: "ml", name: "മലയാളം" },
];

/// Built-in English strings.
const BUILTIN_EN: &[(&str, &str)] = &[
    ("nav.home", "Home"),
    ("nav.search", "Search"),
    ("nav.account", "My Account"),
    ("mode.jewellery", "Jewellery"),
    ("mode.gifts", "Gifts"),
    ("home.categories", "Shop by Category"),
    ("home.deal_of_the_day", "Deal of the Day"),
    ("home.special_deal", "Special Deal"),
    ("home.curated", "Curated for You"),
    ("home.bestsellers", "Bestsellers"),
    ("home.buying_guide", "Gift Buying Guide"),
    ("home.most_loved", "Most Loved Gifts"),
    ("search.placeholder", "Search for rings, necklaces, gifts..."),
    ("search.results_for", "Results for"),
    ("search.no_results", "No products found"),
    ("search.max_price", "Max price"),
    ("product.in_stock", "In stock"),
    ("product.out_of_stock", "Out of stock"),
    ("profile.addresses", "Saved Addresses"),
    ("profile.add_address", "Add New Address"),
    ("profile.default", "Default"),
    ("profile.set_default", "Set as default"),
    ("toast.address_saved", "Address saved"),
    ("toast.address_deleted", "Address deleted"),
    ("toast.profile_updated", "Profile updated"),
    ("toast.try_again", "Something went wrong, please try again"),
];

/// Errors from loading tables or choosing a language.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// The language code is not offered.
    #[error("Unsupported language: {0}")]
    UnknownLanguage(String),

    /// Reading a translation file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A translation file is not valid JSON.
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Cloneable handle to the loaded translation tables.
#[derive(Clone)]
pub struct LocalizationStore {
    tables: Arc<HashMap<&'static str, HashMap<String, String>>>,
}

impl LocalizationStore {
    /// Load translation tables from `locales_dir`.
    ///
    /// Unreadable or malformed table files are logged and skipped.
    #[must_use]
    pub fn load(locales_dir: &Path) -> Self {
        let tables = load_tables(locales_dir);
        tracing::info!(languages = tables.len(), "Localization tables loaded");
        Self {
            tables: Arc::new(tables),
        }
    }

    /// The offered languages.
    #[must_use]
    pub const fn languages() -> &'static [Language] {
        LANGUAGES
    }

    /// Normalize a requested language code.
    ///
    /// # Errors
    ///
    /// Returns `UnknownLanguage` for codes not in [`LANGUAGES`].
    pub fn resolve(code: &str) -> Result<&'static str, LocalizationError> {
        find_language(code)
            .map(|language| language.code)
            .ok_or_else(|| LocalizationError::UnknownLanguage(code.to_string()))
    }

    /// Translate `key` into `language`.
    #[must_use]
    pub fn t(&self, language: &str, key: &str) -> String {
        self.lookup(language, key)
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .unwrap_or(key)
            .to_string()
    }

    /// Every known key resolved for `language`.
    #[must_use]
    pub fn table(&self, language: &str) -> HashMap<String, String> {
        let mut merged = self
            .tables
            .get(DEFAULT_LANGUAGE)
            .cloned()
            .unwrap_or_default();
        if language != DEFAULT_LANGUAGE
            && let Some(table) = self.tables.get(language)
        {
            merged.extend(table.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        merged
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.tables
            .get(language)
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }
}

/// Pick the best offered language from an `Accept-Language` header value.
///
/// Region subtags are ignored (`hi-IN` matches `hi`). Among equal weights the
/// first listed wins; `q=0` entries are skipped.
#[must_use]
pub fn negotiate(accept_language: &str) -> Option<&'static str> {
    let mut candidates: Vec<(f32, &'static str)> = accept_language
        .split(',')
        .filter_map(|entry| {
            let mut params = entry.split(';');
            let tag = params.next()?.trim();
            let primary = tag.split('-').next()?;
            let language = find_language(primary)?;
            let weight = params
                .find_map(|p| p.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())?;
            (weight > 0.0).then_some((weight, language.code))
        })
        .collect();
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
    candidates.first().map(|(_, code)| *code)
}

/// Find an offered language by code (case-insensitive, surrounding whitespace ignored).
fn find_language(code: &str) -> Option<&'static Language> {
    let code = code.trim();
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

fn builtin_english() -> HashMap<String, String> {
    BUILTIN_EN
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Load every `<lang>.json` table in `dir` on top of the built-in English.
fn load_tables(dir: &Path) -> HashMap<&'static str, HashMap<String, String>> {
    let mut tables = HashMap::new();
    tables.insert(DEFAULT_LANGUAGE, builtin_english());

    if !dir.exists() {
        tracing::warn!("Locales directory does not exist: {:?}", dir);
        return tables;
    }

    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::error!("Failed to read locales directory {:?}: {}", dir, e);
            return tables;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        let Some(language) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(find_language)
        else {
            tracing::warn!("Skipping table for unsupported language: {:?}", path);
            continue;
        };

        match load_table(&path) {
            Ok(table) => {
                tracing::info!(language = language.code, keys = table.len(), "Loaded table");
                tables.entry(language.code).or_default().extend(table);
            }
            Err(e) => {
                tracing::error!("Failed to load table {:?}: {}", path, e);
            }
        }
    }

    tables
}

fn load_table(path: &Path) -> Result<HashMap<String, String>, LocalizationError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| LocalizationError::Parse {
        file: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_with_hindi(dir: &tempfile::TempDir) -> LocalizationStore {
        let locales = dir.path().join("locales");
        std::fs::create_dir_all(&locales).unwrap();
        std::fs::write(
            locales.join("hi.json"),
            r#"{"nav.home": "होम", "mode.gifts": "उपहार"}"#,
        )
        .unwrap();
        std::fs::write(locales.join("xx.json"), r#"{"nav.home": "??"}"#).unwrap();
        std::fs::write(locales.join("ta.json"), "not json").unwrap();
        LocalizationStore::load(&locales)
    }

    #[test]
    fn test_missing_directory_uses_builtin_english() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalizationStore::load(&dir.path().join("nope"));
        assert_eq!(store.t(DEFAULT_LANGUAGE, "nav.home"), "Home");
    }

    #[test]
    fn test_lookup_falls_back_to_english_then_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_hindi(&dir);

        assert_eq!(store.t("hi", "nav.home"), "होम");
        assert_eq!(store.t("hi", "nav.search"), "Search");
        assert_eq!(store.t("hi", "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_languages_do_not_share_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_hindi(&dir);

        assert_eq!(store.t("hi", "nav.home"), "होम");
        assert_eq!(store.t("en", "nav.home"), "Home");
        assert_eq!(store.t("hi", "nav.home"), "होम");
    }

    #[test]
    fn test_resolve_normalizes_and_rejects() {
        assert_eq!(LocalizationStore::resolve(" HI ").unwrap(), "hi");
        let err = LocalizationStore::resolve("xx").unwrap_err();
        assert!(matches!(err, LocalizationError::UnknownLanguage(_)));
    }

    #[test]
    fn test_table_merges_language_over_english() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_hindi(&dir);

        let table = store.table("hi");
        assert_eq!(table.get("mode.gifts").map(String::as_str), Some("उपहार"));
        assert_eq!(table.get("mode.jewellery").map(String::as_str), Some("Jewellery"));
    }

    #[test]
    fn test_language_without_table_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with_hindi(&dir);
        assert_eq!(store.t("kn", "nav.home"), "Home");
        assert_eq!(store.t("ta", "nav.home"), "Home");
    }

    #[test]
    fn test_negotiate_accept_language() {
        assert_eq!(negotiate("ta-IN,ta;q=0.9,en;q=0.8"), Some("ta"));
        assert_eq!(negotiate("fr-FR, hi;q=0.5, en;q=0.7"), Some("en"));
        assert_eq!(negotiate("bn;q=0.5, ml;q=0.5"), Some("bn"));
        assert_eq!(negotiate("hi;q=0, fr"), None);
        assert_eq!(negotiate("de;q=abc, te"), Some("te"));
        assert_eq!(negotiate(""), None);
    }
}
