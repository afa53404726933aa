//! Request and response types for the JSON API.
//!
//! Content structures hold every locale's text; these types carry the text
//! of a single locale, chosen per request.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::content::{NewsArticle, VehicleModel};
use crate::i18n::Locale;

/// Error response for the API.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message describing what went wrong.
    pub error: String,
}

/// Query string shared by the content endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    /// Locale code; unsupported codes fall back to the default locale.
    pub locale: Option<String>,
    /// Model category filter (`urban`, `family`, `utility`).
    pub category: Option<String>,
}

/// Catalog card for one model.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelSummary {
    pub slug: String,
    pub name: String,
    /// `urban`, `family` or `utility`.
    pub category: String,
    pub description: String,
    pub image: String,
    pub range: String,
    pub battery: String,
    pub power: String,
    pub price: String,
}

impl ModelSummary {
    pub fn new(model: &VehicleModel, locale: Locale) -> Self {
        Self {
            slug: model.slug.clone(),
            name: model.name.clone(),
            category: model.category.as_str().to_string(),
            description: model.description.get(locale).clone(),
            image: model.hero_image.clone(),
            range: model.specifications.range.clone(),
            battery: model.specifications.battery.clone(),
            power: model.specifications.power.clone(),
            price: model.price.get(locale).clone(),
        }
    }
}

/// All models, optionally filtered.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelListResponse {
    pub locale: Locale,
    pub models: Vec<ModelSummary>,
    pub total: usize,
}

/// Five-year ownership estimate.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CostOfOwnershipJson {
    pub purchase: String,
    pub annual_energy: String,
    pub maintenance: String,
    pub total_5_years: String,
    pub note: String,
}

/// Full model sheet.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelDetailResponse {
    pub locale: Locale,
    #[serde(flatten)]
    pub summary: ModelSummary,
    pub target_customer: String,
    pub usage: String,
    pub max_speed: String,
    pub acceleration: String,
    pub charging_home: String,
    pub charging_fast: String,
    /// Length, width, height and wheelbase.
    pub dimensions: Vec<String>,
    pub weight: String,
    pub seats: String,
    pub safety: Vec<String>,
    pub gallery: Vec<String>,
    pub cost_of_ownership: CostOfOwnershipJson,
}

impl ModelDetailResponse {
    pub fn new(model: &VehicleModel, locale: Locale) -> Self {
        let specs = &model.specifications;
        let cost = &model.cost_of_ownership;
        Self {
            locale,
            summary: ModelSummary::new(model, locale),
            target_customer: model.target_customer.get(locale).clone(),
            usage: model.usage.get(locale).clone(),
            max_speed: specs.max_speed.clone(),
            acceleration: specs.acceleration.get(locale).clone(),
            charging_home: specs.charging_home.get(locale).clone(),
            charging_fast: specs.charging_fast.get(locale).clone(),
            dimensions: vec![
                specs.dimensions.length.clone(),
                specs.dimensions.width.clone(),
                specs.dimensions.height.clone(),
                specs.dimensions.wheelbase.clone(),
            ],
            weight: specs.weight.clone(),
            seats: specs.seats.clone(),
            safety: specs.safety.get(locale).clone(),
            gallery: model.gallery.clone(),
            cost_of_ownership: CostOfOwnershipJson {
                purchase: cost.purchase.get(locale).clone(),
                annual_energy: cost.annual_energy.get(locale).clone(),
                maintenance: cost.maintenance.get(locale).clone(),
                total_5_years: cost.total_5_years.get(locale).clone(),
                note: cost.note.get(locale).clone(),
            },
        }
    }
}

/// News card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewsSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub date: String,
    pub category: String,
}

impl NewsSummary {
    pub fn new(article: &NewsArticle, locale: Locale) -> Self {
        Self {
            slug: article.slug.clone(),
            title: article.title.get(locale).clone(),
            excerpt: article.excerpt.get(locale).clone(),
            image: article.image.clone(),
            date: article.date.get(locale).clone(),
            category: article.category.get(locale).clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewsListResponse {
    pub locale: Locale,
    pub articles: Vec<NewsSummary>,
    pub total: usize,
}

/// A full article.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewsArticleResponse {
    pub locale: Locale,
    #[serde(flatten)]
    pub summary: NewsSummary,
    /// Body paragraphs.
    pub content: Vec<String>,
}

/// Query for `/api/translate`.
#[derive(Debug, Deserialize)]
pub struct TranslateQuery {
    pub locale: Option<String>,
    pub key: String,
}

/// Result of a translation lookup.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranslateResponse {
    /// The locale actually used, after coercion to a supported one.
    pub locale: Locale,
    pub key: String,
    /// The translation, or the key itself when it is missing.
    pub value: String,
    pub found: bool,
}

/// Query for `/api/locale`.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: Option<String>,
}

/// Result of applying the locale rules to a path.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LocaleResolutionResponse {
    pub path: String,
    pub locale: Locale,
    pub needs_redirect: bool,
    /// Where the request would be redirected, if it would be.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// One rejected contact form field.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorJson {
    pub field: String,
    pub message: String,
}

/// Outcome of a contact submission.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    /// Reference number of an accepted request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub errors: Vec<FieldErrorJson>,
}
