//! Locale definitions for the JMEV site.
//!
//! The site ships in a closed set of locales: `fr` (default), `ar` and `en`,
//! declared in that order. The declared order matters: it is the order in
//! which the language-preference header is probed when a request carries no
//! locale prefix.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// A supported site locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// French, the default locale.
    Fr,
    /// Arabic, rendered right-to-left.
    Ar,
    /// English.
    En,
}

/// All locales in declared order.
pub const SUPPORTED_LOCALES: &[Locale] = &[Locale::Fr, Locale::Ar, Locale::En];

/// The locale used when nothing else matches.
pub const DEFAULT_LOCALE: Locale = Locale::Fr;

impl Locale {
    /// The two-letter code used in URLs and catalog file names.
    pub fn code(self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    /// The locale's name written in its own language.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::Fr => "Français",
            Locale::Ar => "العربية",
            Locale::En => "English",
        }
    }

    /// Value for the HTML `dir` attribute.
    pub fn direction(self) -> &'static str {
        match self {
            Locale::Ar => "rtl",
            Locale::Fr | Locale::En => "ltr",
        }
    }

    /// Open Graph locale tag (`fr_TN`, ...).
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::Fr => "fr_TN",
            Locale::Ar => "ar_TN",
            Locale::En => "en_TN",
        }
    }

    /// Parses an exact locale code. Only the three lowercase codes match.
    pub fn from_code(code: &str) -> Option<Locale> {
        SUPPORTED_LOCALES.iter().copied().find(|l| l.code() == code)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// An ordered set of supported locales with a designated default.
///
/// The production set is [`LocaleSet::site`]. Other orderings exist so the
/// header precedence can be configured and tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    order: Vec<Locale>,
    default: Locale,
}

impl LocaleSet {
    /// Builds a set. Returns `None` when `order` is empty, contains
    /// duplicates, or does not contain `default`.
    pub fn new(order: Vec<Locale>, default: Locale) -> Option<Self> {
        if order.is_empty() || !order.contains(&default) {
            return None;
        }
        for (i, locale) in order.iter().enumerate() {
            if order[..i].contains(locale) {
                return None;
            }
        }
        Some(Self { order, default })
    }

    /// The site's locale set: `fr`, `ar`, `en` with `fr` as default.
    pub fn site() -> Self {
        Self {
            order: SUPPORTED_LOCALES.to_vec(),
            default: DEFAULT_LOCALE,
        }
    }

    pub fn locales(&self) -> &[Locale] {
        &self.order
    }

    pub fn default_locale(&self) -> Locale {
        self.default
    }

    pub fn contains(&self, locale: Locale) -> bool {
        self.order.contains(&locale)
    }
}

impl Default for LocaleSet {
    fn default() -> Self {
        Self::site()
    }
}

/// Detects the best locale for CLI output from the environment.
///
/// Priority:
/// 1. `JMEV_LANG` environment variable
/// 2. System locale (via `sys-locale` crate)
/// 3. Fallback to the default locale
pub fn detect_system_locale() -> Locale {
    if let Ok(lang) = std::env::var("JMEV_LANG")
        && let Some(locale) = normalize_locale(&lang)
    {
        return locale;
    }

    if let Some(locale_str) = sys_locale::get_locale()
        && let Some(locale) = normalize_locale(&locale_str)
    {
        return locale;
    }

    DEFAULT_LOCALE
}

/// Normalizes a free-form locale string to one of the supported locales.
///
/// Accepts common formats: "fr-TN", "ar_TN.UTF-8", "EN", etc.
/// Returns `None` if the language is not supported.
pub fn normalize_locale(input: &str) -> Option<Locale> {
    let lower = input.trim().to_lowercase();
    // Strip encoding suffix (e.g. ".utf-8")
    let tag = lower.split('.').next().unwrap_or(&lower);
    let primary = tag.split(['-', '_']).next().unwrap_or(tag);
    Locale::from_code(primary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order_and_default() {
        assert_eq!(SUPPORTED_LOCALES, &[Locale::Fr, Locale::Ar, Locale::En]);
        assert_eq!(DEFAULT_LOCALE, Locale::Fr);
        assert_eq!(LocaleSet::site().locales(), SUPPORTED_LOCALES);
    }

    #[test]
    fn test_from_code_is_exact() {
        assert_eq!(Locale::from_code("ar"), Some(Locale::Ar));
        assert_eq!(Locale::from_code("AR"), None);
        assert_eq!(Locale::from_code("de"), None);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Locale::Ar.direction(), "rtl");
        assert_eq!(Locale::Fr.direction(), "ltr");
        assert_eq!(Locale::En.direction(), "ltr");
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en-US"), Some(Locale::En));
        assert_eq!(normalize_locale("ar_TN.UTF-8"), Some(Locale::Ar));
        assert_eq!(normalize_locale(" FR "), Some(Locale::Fr));
        assert_eq!(normalize_locale("de_DE"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_locale_set_validation() {
        assert!(LocaleSet::new(vec![], Locale::Fr).is_none());
        assert!(LocaleSet::new(vec![Locale::Ar, Locale::En], Locale::Fr).is_none());
        assert!(LocaleSet::new(vec![Locale::Ar, Locale::Ar], Locale::Ar).is_none());

        let set = LocaleSet::new(vec![Locale::Ar, Locale::Fr], Locale::Fr).unwrap();
        assert_eq!(set.locales(), &[Locale::Ar, Locale::Fr]);
        assert!(!set.contains(Locale::En));
    }

    #[test]
    fn test_serde_codes() {
        assert_eq!(serde_json::to_string(&Locale::Ar).unwrap(), "\"ar\"");
        let locale: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(locale, Locale::En);
    }
}
