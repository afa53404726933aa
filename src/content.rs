//! Site content: vehicle models, news articles and commercial offers.
//!
//! Content ships as JSON documents under `content/`, compiled into the
//! binary. Text that differs per locale is stored as a [`Localized`] value
//! holding one entry for each of `fr`, `ar` and `en`.

use rust_embed::RustEmbed;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::i18n::Locale;

#[derive(RustEmbed)]
#[folder = "content/"]
#[include = "*.json"]
struct BundledContent;

/// A value given once per locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub fr: T,
    pub ar: T,
    pub en: T,
}

impl<T> Localized<T> {
    pub fn get(&self, locale: Locale) -> &T {
        match locale {
            Locale::Fr => &self.fr,
            Locale::Ar => &self.ar,
            Locale::En => &self.en,
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicle models
// ---------------------------------------------------------------------------

/// Model range segment, used by the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Urban,
    Family,
    Utility,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Urban, Category::Family, Category::Utility];

    /// Parses a filter value. Anything unknown (including `"all"`) is `None`.
    pub fn from_filter(value: &str) -> Option<Category> {
        match value {
            "urban" => Some(Category::Urban),
            "family" => Some(Category::Family),
            "utility" => Some(Category::Utility),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Urban => "urban",
            Category::Family => "family",
            Category::Utility => "utility",
        }
    }

    /// Catalog key of the category's label.
    pub fn label_key(self) -> &'static str {
        match self {
            Category::Urban => "common.urban",
            Category::Family => "common.family",
            Category::Utility => "common.utility",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: String,
    pub width: String,
    pub height: String,
    pub wheelbase: String,
}

/// Range figures by driving profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeProfile {
    pub city: String,
    pub highway: String,
    pub mixed: String,
    pub note: Localized<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    pub range: String,
    pub battery: String,
    pub power: String,
    pub max_speed: String,
    pub acceleration: Localized<String>,
    pub charging_home: Localized<String>,
    pub charging_fast: Localized<String>,
    pub dimensions: Dimensions,
    pub weight: String,
    pub seats: String,
    pub safety: Localized<Vec<String>>,
    pub ranges: RangeProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOfOwnership {
    pub purchase: Localized<String>,
    pub annual_energy: Localized<String>,
    pub maintenance: Localized<String>,
    pub total_5_years: Localized<String>,
    pub note: Localized<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleModel {
    pub slug: String,
    pub name: String,
    pub category: Category,
    pub hero_image: String,
    pub description: Localized<String>,
    pub target_customer: Localized<String>,
    pub usage: Localized<String>,
    pub specifications: Specifications,
    pub gallery: Vec<String>,
    pub price: Localized<String>,
    pub cost_of_ownership: CostOfOwnership,
}

// ---------------------------------------------------------------------------
// News and offers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub slug: String,
    pub image: String,
    pub date: Localized<String>,
    pub category: Localized<String>,
    pub title: Localized<String>,
    pub excerpt: Localized<String>,
    pub content: Localized<Vec<String>>,
}

/// A time-limited promotion shown on the offers page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOffer {
    pub title: Localized<String>,
    pub description: Localized<String>,
    pub valid_until: Localized<String>,
    pub badge: Localized<String>,
}

/// Who a financing plan is for. Selects the plan's catalog keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Individual,
    Business,
}

impl Audience {
    /// Catalog group holding this plan's title and description.
    pub fn catalog_group(self) -> &'static str {
        match self {
            Audience::Individual => "offers.individual",
            Audience::Business => "offers.business",
        }
    }
}

/// A worked financing example for one model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingPlan {
    pub audience: Audience,
    pub model: String,
    pub price: Localized<String>,
    pub down_payment: Localized<String>,
    pub monthly: Localized<String>,
    pub duration: Localized<String>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Errors raised while loading bundled content.
#[derive(Debug)]
pub enum ContentError {
    Missing(&'static str),
    Parse {
        file: &'static str,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Missing(file) => write!(f, "content file {} is missing", file),
            ContentError::Parse { file, source } => {
                write!(f, "content file {} is invalid: {}", file, source)
            }
            ContentError::Invalid(msg) => write!(f, "invalid content: {}", msg),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Everything the pages and the API display besides catalog text.
#[derive(Debug, Clone)]
pub struct SiteContent {
    pub models: Vec<VehicleModel>,
    pub news: Vec<NewsArticle>,
    pub offers: Vec<SpecialOffer>,
    pub financing: Vec<FinancingPlan>,
}

impl SiteContent {
    /// Loads and validates the content compiled into the binary.
    pub fn load_bundled() -> Result<Self, ContentError> {
        let content = Self {
            models: parse_bundled("models.json")?,
            news: parse_bundled("news.json")?,
            offers: parse_bundled("offers.json")?,
            financing: parse_bundled("financing.json")?,
        };
        content.validate()?;
        log::debug!(
            "Loaded {} models, {} articles, {} offers",
            content.models.len(),
            content.news.len(),
            content.offers.len()
        );
        Ok(content)
    }

    /// Slugs must be unique and financing plans must name known models.
    fn validate(&self) -> Result<(), ContentError> {
        let mut seen = HashSet::new();
        for model in &self.models {
            if !seen.insert(model.slug.as_str()) {
                return Err(ContentError::Invalid(format!("duplicate model slug '{}'", model.slug)));
            }
        }
        for plan in &self.financing {
            if !seen.contains(plan.model.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "financing plan references unknown model '{}'",
                    plan.model
                )));
            }
        }

        let mut seen = HashSet::new();
        for article in &self.news {
            if !seen.insert(article.slug.as_str()) {
                return Err(ContentError::Invalid(format!(
                    "duplicate article slug '{}'",
                    article.slug
                )));
            }
        }
        Ok(())
    }

    pub fn model(&self, slug: &str) -> Option<&VehicleModel> {
        self.models.iter().find(|m| m.slug == slug)
    }

    /// Models in catalog order, optionally restricted to one category.
    pub fn models_in(&self, category: Option<Category>) -> impl Iterator<Item = &VehicleModel> {
        self.models
            .iter()
            .filter(move |m| category.is_none_or(|c| m.category == c))
    }

    pub fn article(&self, slug: &str) -> Option<&NewsArticle> {
        self.news.iter().find(|a| a.slug == slug)
    }
}

fn parse_bundled<T: DeserializeOwned>(file: &'static str) -> Result<T, ContentError> {
    let data = BundledContent::get(file).ok_or(ContentError::Missing(file))?;
    serde_json::from_slice(&data.data).map_err(|source| ContentError::Parse { file, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> SiteContent {
        SiteContent::load_bundled().unwrap()
    }

    #[test]
    fn test_bundled_content_loads() {
        let content = content();
        assert_eq!(content.models.len(), 3);
        assert!(!content.news.is_empty());
        assert!(!content.offers.is_empty());
        assert_eq!(content.financing.len(), 2);
    }

    #[test]
    fn test_model_lookup_by_slug() {
        let content = content();
        let ev3 = content.model("ev3").unwrap();
        assert_eq!(ev3.name, "EV3");
        assert_eq!(ev3.category, Category::Family);
        assert!(content.model("ev9").is_none());
    }

    #[test]
    fn test_category_filter() {
        let content = content();
        assert_eq!(content.models_in(None).count(), 3);
        let urban: Vec<_> = content.models_in(Some(Category::Urban)).collect();
        assert_eq!(urban.len(), 1);
        assert_eq!(urban[0].slug, "elight");
    }

    #[test]
    fn test_category_from_filter() {
        assert_eq!(Category::from_filter("family"), Some(Category::Family));
        assert_eq!(Category::from_filter("all"), None);
        assert_eq!(Category::from_filter("Family"), None);
    }

    #[test]
    fn test_localized_text_differs_per_locale() {
        let content = content();
        let elight = content.model("elight").unwrap();
        assert_ne!(elight.description.get(Locale::Fr), elight.description.get(Locale::En));
        assert_eq!(elight.specifications.safety.get(Locale::Ar).len(), 5);
    }

    #[test]
    fn test_article_lookup() {
        let content = content();
        let article = content.article("nouveau-showroom-sfax").unwrap();
        assert!(article.title.get(Locale::Fr).contains("Sfax"));
        assert!(!article.content.get(Locale::En).is_empty());
        assert!(content.article("unknown").is_none());
    }
}
