//! Translation catalogs and dotted-key lookup.
//!
//! Each locale has one catalog: a nested dictionary of strings loaded from a
//! JSON document at startup and never modified afterwards. A key such as
//! `"home.features.cost.title"` is resolved by walking the nested maps one
//! segment at a time.
//!
//! Lookups never fail. When a key cannot be resolved to a string, the key
//! itself is returned so the gap is visible on the rendered page.

use rust_embed::RustEmbed;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use crate::i18n::{Locale, LocaleSet};

/// Catalogs bundled into the binary, one `<code>.json` per locale.
#[derive(RustEmbed)]
#[folder = "messages/"]
#[include = "*.json"]
struct BundledMessages;

// ---------------------------------------------------------------------------
// Catalog nodes
// ---------------------------------------------------------------------------

/// One node of a catalog tree.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogNode {
    /// A translated string.
    Text(String),
    /// A nested group of keys.
    Map(BTreeMap<String, CatalogNode>),
    /// Numbers, booleans, null or arrays. Never returned by a lookup.
    Other,
}

impl From<Value> for CatalogNode {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => CatalogNode::Text(s),
            Value::Object(map) => CatalogNode::Map(
                map.into_iter()
                    .map(|(k, v)| (k, CatalogNode::from(v)))
                    .collect(),
            ),
            _ => CatalogNode::Other,
        }
    }
}

/// Result of walking a dotted key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The key resolved to a string.
    Found(&'a str),
    /// Some segment was absent, or the final node is not a string.
    Missing,
}

impl<'a> Lookup<'a> {
    /// The found string, or `key` on a miss.
    pub fn or_key<'k>(self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        match self {
            Lookup::Found(text) => text,
            Lookup::Missing => key,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Errors raised while parsing a single catalog document.
#[derive(Debug)]
pub enum CatalogError {
    /// The document is not valid JSON.
    Json(serde_json::Error),
    /// The document's root is not a JSON object.
    NotAnObject,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Json(e) => write!(f, "invalid JSON: {}", e),
            CatalogError::NotAnObject => write!(f, "root is not an object"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// The translations for one locale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogNode>,
}

static EMPTY_CATALOG: Catalog = Catalog {
    entries: BTreeMap::new(),
};

impl Catalog {
    /// Parses a JSON document whose root must be an object.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let value: Value = serde_json::from_str(text).map_err(CatalogError::Json)?;
        match CatalogNode::from(value) {
            CatalogNode::Map(entries) => Ok(Self { entries }),
            _ => Err(CatalogError::NotAnObject),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walks `key` segment by segment.
    pub fn lookup(&self, key: &str) -> Lookup<'_> {
        let mut segments = key.split('.');
        let Some(first) = segments.next() else {
            return Lookup::Missing;
        };
        let Some(mut node) = self.entries.get(first) else {
            return Lookup::Missing;
        };

        for segment in segments {
            node = match node {
                CatalogNode::Map(children) => match children.get(segment) {
                    Some(child) => child,
                    None => return Lookup::Missing,
                },
                CatalogNode::Text(_) | CatalogNode::Other => return Lookup::Missing,
            };
        }

        match node {
            CatalogNode::Text(text) => Lookup::Found(text),
            CatalogNode::Map(_) | CatalogNode::Other => Lookup::Missing,
        }
    }

    /// Every dotted key that resolves to a string.
    pub fn text_keys(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        let mut stack: Vec<(String, &CatalogNode)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v))
            .collect();

        while let Some((path, node)) = stack.pop() {
            match node {
                CatalogNode::Text(_) => {
                    keys.insert(path);
                }
                CatalogNode::Map(children) => {
                    for (k, v) in children {
                        stack.push((format!("{}.{}", path, k), v));
                    }
                }
                CatalogNode::Other => {}
            }
        }
        keys
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Where catalog documents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// The `messages/` directory compiled into the binary.
    Bundled,
    /// A directory on disk holding `<code>.json` files.
    Directory(PathBuf),
}

impl CatalogSource {
    /// Reads the document for `locale`. `Ok(None)` means it does not exist.
    fn read(&self, locale: Locale) -> Result<Option<String>, String> {
        let file_name = format!("{}.json", locale.code());
        match self {
            CatalogSource::Bundled => match BundledMessages::get(&file_name) {
                Some(file) => String::from_utf8(file.data.into_owned())
                    .map(Some)
                    .map_err(|e| format!("not UTF-8: {}", e)),
                None => Ok(None),
            },
            CatalogSource::Directory(dir) => {
                let path = dir.join(&file_name);
                match std::fs::read_to_string(&path) {
                    Ok(text) => Ok(Some(text)),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(format!("failed to read {}: {}", path.display(), e)),
                }
            }
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogSource::Bundled => write!(f, "bundled messages"),
            CatalogSource::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// A load-time problem with one locale's catalog.
///
/// The affected locale is served with an empty catalog, so its lookups
/// return keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    /// No document exists for a declared locale.
    Missing { locale: Locale },
    /// The document exists but could not be read.
    Unreadable { locale: Locale, reason: String },
    /// The document is not a JSON object.
    Malformed { locale: Locale, reason: String },
    /// The document has no keys.
    Empty { locale: Locale },
}

impl CatalogIssue {
    pub fn locale(&self) -> Locale {
        match self {
            CatalogIssue::Missing { locale }
            | CatalogIssue::Unreadable { locale, .. }
            | CatalogIssue::Malformed { locale, .. }
            | CatalogIssue::Empty { locale } => *locale,
        }
    }

    /// Empty catalogs are a warning; everything else is a configuration error.
    pub fn is_error(&self) -> bool {
        !matches!(self, CatalogIssue::Empty { .. })
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::Missing { locale } => {
                write!(f, "{}: no catalog document", locale)
            }
            CatalogIssue::Unreadable { locale, reason } => {
                write!(f, "{}: {}", locale, reason)
            }
            CatalogIssue::Malformed { locale, reason } => {
                write!(f, "{}: malformed catalog ({})", locale, reason)
            }
            CatalogIssue::Empty { locale } => write!(f, "{}: catalog is empty", locale),
        }
    }
}

/// Keys that differ between the default catalog and another locale's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParity {
    pub locale: Locale,
    /// Present in the default catalog, absent here.
    pub missing: Vec<String>,
    /// Present here, absent from the default catalog.
    pub extra: Vec<String>,
}

impl KeyParity {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Catalogs
// ---------------------------------------------------------------------------

/// The catalogs of every declared locale.
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Debug, Clone)]
pub struct Catalogs {
    locales: LocaleSet,
    catalogs: BTreeMap<Locale, Catalog>,
    issues: Vec<CatalogIssue>,
}

impl Catalogs {
    /// Loads one catalog per locale in `locales` from `source`.
    pub fn load(source: &CatalogSource, locales: &LocaleSet) -> Self {
        Self::build(locales, |locale| source.read(locale))
    }

    /// Builds catalogs from in-memory documents. Locales without a document
    /// are reported as [`CatalogIssue::Missing`].
    pub fn from_documents<'a>(
        locales: &LocaleSet,
        documents: impl IntoIterator<Item = (Locale, &'a str)>,
    ) -> Self {
        let documents: BTreeMap<Locale, &str> = documents.into_iter().collect();
        Self::build(locales, |locale| {
            Ok(documents.get(&locale).map(|text| text.to_string()))
        })
    }

    fn build(
        locales: &LocaleSet,
        mut read: impl FnMut(Locale) -> Result<Option<String>, String>,
    ) -> Self {
        let mut catalogs = BTreeMap::new();
        let mut issues = Vec::new();

        for &locale in locales.locales() {
            let catalog = match read(locale) {
                Ok(Some(text)) => match Catalog::from_json(&text) {
                    Ok(catalog) => {
                        if catalog.is_empty() {
                            issues.push(CatalogIssue::Empty { locale });
                        }
                        catalog
                    }
                    Err(e) => {
                        issues.push(CatalogIssue::Malformed {
                            locale,
                            reason: e.to_string(),
                        });
                        Catalog::default()
                    }
                },
                Ok(None) => {
                    issues.push(CatalogIssue::Missing { locale });
                    Catalog::default()
                }
                Err(reason) => {
                    issues.push(CatalogIssue::Unreadable { locale, reason });
                    Catalog::default()
                }
            };
            catalogs.insert(locale, catalog);
        }

        Self {
            locales: locales.clone(),
            catalogs,
            issues,
        }
    }

    /// Problems found while loading.
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    /// Writes every load issue to the log.
    pub fn log_issues(&self) {
        for issue in &self.issues {
            if issue.is_error() {
                log::error!("Translation catalog issue: {}", issue);
            } else {
                log::warn!("Translation catalog issue: {}", issue);
            }
        }
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    /// The catalog for `locale`; locales outside the set use the default.
    pub fn catalog(&self, locale: Locale) -> &Catalog {
        let locale = if self.locales.contains(locale) {
            locale
        } else {
            self.locales.default_locale()
        };
        self.catalogs.get(&locale).unwrap_or(&EMPTY_CATALOG)
    }

    /// Resolves `key` in `locale`'s catalog.
    pub fn lookup(&self, locale: Locale, key: &str) -> Lookup<'_> {
        self.catalog(locale).lookup(key)
    }

    /// Resolves `key`, returning the key itself on a miss.
    pub fn t<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.lookup(locale, key).or_key(key)
    }

    /// Like [`Catalogs::t`] with a raw locale code. Unsupported codes are
    /// served from the default locale.
    pub fn t_code<'a>(&'a self, code: &str, key: &'a str) -> &'a str {
        self.t(self.locale_for_code(code), key)
    }

    /// Maps a raw code onto the set, coercing unknown codes to the default.
    pub fn locale_for_code(&self, code: &str) -> Locale {
        match Locale::from_code(code).filter(|l| self.locales.contains(*l)) {
            Some(locale) => locale,
            None => {
                let default = self.locales.default_locale();
                log::warn!("Invalid locale: {}, using default: {}", code, default);
                default
            }
        }
    }

    /// A translator bound to one locale, for render code.
    pub fn translator(&self, locale: Locale) -> Translator<'_> {
        Translator {
            catalogs: self,
            locale,
        }
    }

    /// Compares every non-default catalog's keys with the default's.
    pub fn key_parity(&self) -> Vec<KeyParity> {
        let default = self.locales.default_locale();
        let reference = self.catalog(default).text_keys();

        self.locales
            .locales()
            .iter()
            .copied()
            .filter(|&locale| locale != default)
            .map(|locale| {
                let keys = self.catalog(locale).text_keys();
                KeyParity {
                    locale,
                    missing: reference.difference(&keys).cloned().collect(),
                    extra: keys.difference(&reference).cloned().collect(),
                }
            })
            .collect()
    }
}

/// A locale paired with the catalogs, passed explicitly through rendering.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    catalogs: &'a Catalogs,
    locale: Locale,
}

impl<'a> Translator<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Translates `key`, or returns it unchanged on a miss.
    pub fn t<'k>(&self, key: &'k str) -> &'k str
    where
        'a: 'k,
    {
        self.catalogs.lookup(self.locale, key).or_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FR: &str = r#"{
        "common": { "home": "Accueil" },
        "models": { "range": "Autonomie", "seats": 5 },
        "home": { "features": { "cost": { "title": "Coût énergétique réduit" } } }
    }"#;
    const EN: &str = r#"{
        "common": { "home": "Home" },
        "models": { "range": "Range" }
    }"#;

    fn sample() -> Catalogs {
        Catalogs::from_documents(
            &LocaleSet::site(),
            [(Locale::Fr, FR), (Locale::Ar, "{}"), (Locale::En, EN)],
        )
    }

    #[test]
    fn test_lookup_found() {
        let catalogs = sample();
        assert_eq!(catalogs.lookup(Locale::Fr, "models.range"), Lookup::Found("Autonomie"));
        assert_eq!(
            catalogs.t(Locale::Fr, "home.features.cost.title"),
            "Coût énergétique réduit"
        );
        assert_eq!(catalogs.t(Locale::En, "common.home"), "Home");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let catalogs = sample();
        assert_eq!(catalogs.t(Locale::Fr, "models.nonexistent.key"), "models.nonexistent.key");
        assert_eq!(catalogs.t(Locale::En, "nope"), "nope");
    }

    #[test]
    fn test_non_text_final_node_is_a_miss() {
        let catalogs = sample();
        assert_eq!(catalogs.lookup(Locale::Fr, "home.features"), Lookup::Missing);
        assert_eq!(catalogs.t(Locale::Fr, "home.features"), "home.features");
        assert_eq!(catalogs.t(Locale::Fr, "models.seats"), "models.seats");
    }

    #[test]
    fn test_walk_through_text_is_a_miss() {
        let catalogs = sample();
        assert_eq!(catalogs.t(Locale::Fr, "models.range.value"), "models.range.value");
    }

    #[test]
    fn test_empty_key_and_empty_segments() {
        let catalogs = sample();
        assert_eq!(catalogs.t(Locale::Fr, ""), "");
        assert_eq!(catalogs.t(Locale::Fr, "models..range"), "models..range");
        assert_eq!(catalogs.t(Locale::Fr, "models.range."), "models.range.");
    }

    #[test]
    fn test_unsupported_locale_uses_default() {
        let catalogs = sample();
        for key in ["models.range", "common.home", "missing.key"] {
            assert_eq!(catalogs.t_code("de", key), catalogs.t(Locale::Fr, key));
        }
        assert_eq!(catalogs.t_code("en", "common.home"), "Home");

        let fr_ar = LocaleSet::new(vec![Locale::Fr, Locale::Ar], Locale::Fr).unwrap();
        let catalogs = Catalogs::from_documents(&fr_ar, [(Locale::Fr, FR), (Locale::Ar, FR)]);
        assert_eq!(catalogs.t(Locale::En, "models.range"), "Autonomie");
    }

    #[test]
    fn test_empty_catalog_degrades_to_keys() {
        let catalogs = sample();
        assert_eq!(catalogs.t(Locale::Ar, "models.range"), "models.range");
        assert_eq!(catalogs.issues(), &[CatalogIssue::Empty { locale: Locale::Ar }]);
    }

    #[test]
    fn test_load_issues() {
        let catalogs = Catalogs::from_documents(
            &LocaleSet::site(),
            [(Locale::Fr, FR), (Locale::Ar, "{ not json")],
        );
        let issues = catalogs.issues();
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], CatalogIssue::Malformed { locale: Locale::Ar, .. }));
        assert_eq!(issues[1], CatalogIssue::Missing { locale: Locale::En });
        assert!(issues.iter().all(CatalogIssue::is_error));
        assert_eq!(catalogs.t(Locale::En, "models.range"), "models.range");

        let catalogs = Catalogs::from_documents(
            &LocaleSet::site(),
            [(Locale::Fr, "[1, 2]"), (Locale::Ar, FR), (Locale::En, FR)],
        );
        assert!(matches!(
            &catalogs.issues()[0],
            CatalogIssue::Malformed { locale: Locale::Fr, reason } if reason.contains("not an object")
        ));
    }

    #[test]
    fn test_key_parity() {
        let catalogs = sample();
        let parity = catalogs.key_parity();
        assert_eq!(parity.len(), 2);

        let ar = &parity[0];
        assert_eq!(ar.locale, Locale::Ar);
        assert_eq!(ar.missing.len(), 3);

        let en = &parity[1];
        assert_eq!(en.locale, Locale::En);
        assert_eq!(en.missing, vec!["home.features.cost.title".to_string()]);
        assert!(en.extra.is_empty());
    }

    #[test]
    fn test_translator_carries_locale() {
        let catalogs = sample();
        let tr = catalogs.translator(Locale::En);
        assert_eq!(tr.locale(), Locale::En);
        assert_eq!(tr.t("models.range"), "Range");
        let dynamic = format!("common.{}", "home");
        assert_eq!(tr.t(&dynamic), "Home");
    }

    #[test]
    fn test_bundled_catalogs_are_complete() {
        let catalogs = Catalogs::load(&CatalogSource::Bundled, &LocaleSet::site());
        assert!(catalogs.issues().is_empty(), "{:?}", catalogs.issues());
        for parity in catalogs.key_parity() {
            assert!(parity.is_clean(), "{:?}", parity);
        }
    }

    #[test]
    fn test_bundled_keys_translate_in_every_locale() {
        let catalogs = Catalogs::load(&CatalogSource::Bundled, &LocaleSet::site());
        let keys = catalogs.catalog(Locale::Fr).text_keys();
        assert!(!keys.is_empty());
        for &locale in crate::i18n::SUPPORTED_LOCALES {
            for key in &keys {
                let text = catalogs.t(locale, key);
                assert!(!text.is_empty(), "{}:{}", locale, key);
                assert_ne!(text, key, "{}:{}", locale, key);
            }
        }
        assert_eq!(catalogs.t(Locale::Fr, "models.range"), "Autonomie");
        assert_eq!(
            catalogs.t(Locale::Fr, "models.nonexistent.key"),
            "models.nonexistent.key"
        );
    }

    fn temp_messages_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jmev_messages_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_directory_source_reports_missing_locale() {
        let dir = temp_messages_dir();
        std::fs::write(dir.join("fr.json"), FR).unwrap();
        std::fs::write(dir.join("ar.json"), r#"{ "models": { "range": "المدى" } }"#).unwrap();

        let source = CatalogSource::Directory(dir.clone());
        let catalogs = Catalogs::load(&source, &LocaleSet::site());
        assert_eq!(catalogs.issues(), &[CatalogIssue::Missing { locale: Locale::En }]);
        assert!(catalogs.issues()[0].is_error());

        assert_eq!(catalogs.t(Locale::Fr, "models.range"), "Autonomie");
        assert_eq!(catalogs.t(Locale::Ar, "models.range"), "المدى");
        assert_eq!(catalogs.t(Locale::En, "models.range"), "models.range");

        // A directory where the file should be cannot be read.
        std::fs::create_dir(dir.join("en.json")).unwrap();
        let catalogs = Catalogs::load(&source, &LocaleSet::site());
        assert_eq!(catalogs.issues().len(), 1);
        assert!(matches!(
            &catalogs.issues()[0],
            CatalogIssue::Unreadable { locale: Locale::En, .. }
        ));
        assert_eq!(catalogs.t(Locale::Fr, "common.home"), "Accueil");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
