//! JSON API for the JMEV site.
//!
//! Read-only access to the model catalog and news, the translation lookup
//! and the locale rules, plus the simulated contact submission. Every
//! endpoint takes an optional `locale` query parameter; without it the
//! request's `Accept-Language` header decides.
//!
//! The API is documented with OpenAPI/Swagger via `utoipa`.
//! Swagger UI is available at `/swagger-ui/`.

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use utoipa::OpenApi;

use crate::catalog::Catalogs;
use crate::contact::{self, ContactForm};
use crate::content::{Category, SiteContent};
use crate::i18n::Locale;
use crate::routing::{redirect_target, resolve_locale};
use crate::types::*;

/// Shared application state.
///
/// Built once at startup, wrapped in `web::Data` (an `Arc`) and read by
/// every HTTP handler without locking.
pub struct AppState {
    /// Translation catalogs for every locale.
    pub catalogs: Catalogs,
    /// Models, news and offers.
    pub content: SiteContent,
    /// Public origin used for canonical and alternate links.
    pub base_url: String,
}

impl AppState {
    pub fn new(catalogs: Catalogs, content: SiteContent, base_url: &str) -> Self {
        Self {
            catalogs,
            content,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The locale for an API request: the explicit `locale` parameter if
    /// given, else the `Accept-Language` header, else the default.
    fn request_locale(&self, req: &HttpRequest, code: Option<&str>) -> Locale {
        match code {
            Some(code) => self.catalogs.locale_for_code(code),
            None => {
                let accept_language = req
                    .headers()
                    .get(header::ACCEPT_LANGUAGE)
                    .and_then(|v| v.to_str().ok());
                resolve_locale("/", accept_language, self.catalogs.locales()).locale
            }
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAPI definition
// ---------------------------------------------------------------------------

/// OpenAPI documentation for the JMEV site API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "JMEV Tunisia Site API",
        version = "0.1.0",
        description = "Localized model catalog, news, translation lookup and contact \
            requests for the JMEV Tunisia website. Locales: fr (default), ar, en.",
        license(name = "MIT")
    ),
    paths(
        list_models,
        get_model,
        list_news,
        get_article,
        translate,
        resolve,
        submit_contact,
    ),
    components(schemas(
        ErrorResponse,
        Locale,
        ModelSummary,
        ModelListResponse,
        ModelDetailResponse,
        CostOfOwnershipJson,
        NewsSummary,
        NewsListResponse,
        NewsArticleResponse,
        TranslateResponse,
        LocaleResolutionResponse,
        ContactForm,
        ContactResponse,
        FieldErrorJson,
    )),
    tags(
        (name = "models", description = "Vehicle model catalog"),
        (name = "news", description = "News articles"),
        (name = "i18n", description = "Translation lookup and locale resolution"),
        (name = "contact", description = "Contact requests"),
    )
)]
pub struct ApiDoc;

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// List vehicle models.
///
/// Returns every model in catalog order. An unknown `category` is ignored.
#[utoipa::path(
    get,
    path = "/api/models",
    tag = "models",
    params(
        ("locale" = Option<String>, Query, description = "fr, ar or en"),
        ("category" = Option<String>, Query, description = "urban, family or utility"),
    ),
    responses(
        (status = 200, description = "List of models", body = ModelListResponse),
    )
)]
pub async fn list_models(
    req: HttpRequest,
    query: web::Query<LocaleQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let locale = data.request_locale(&req, query.locale.as_deref());
    let category = query.category.as_deref().and_then(Category::from_filter);

    let models: Vec<ModelSummary> = data
        .content
        .models_in(category)
        .map(|m| ModelSummary::new(m, locale))
        .collect();

    let total = models.len();
    HttpResponse::Ok().json(ModelListResponse {
        locale,
        models,
        total,
    })
}

/// Get one model's full sheet.
#[utoipa::path(
    get,
    path = "/api/models/{slug}",
    tag = "models",
    params(
        ("slug" = String, Path, description = "Model slug, e.g. ev3"),
        ("locale" = Option<String>, Query, description = "fr, ar or en"),
    ),
    responses(
        (status = 200, description = "Model details", body = ModelDetailResponse),
        (status = 404, description = "Model not found", body = ErrorResponse),
    )
)]
pub async fn get_model(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<LocaleQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let slug = path.into_inner();
    let locale = data.request_locale(&req, query.locale.as_deref());

    match data.content.model(&slug) {
        Some(model) => HttpResponse::Ok().json(ModelDetailResponse::new(model, locale)),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("{}: {}", data.catalogs.t(locale, "errors.modelNotFound"), slug),
        }),
    }
}

/// List news articles, newest first.
#[utoipa::path(
    get,
    path = "/api/news",
    tag = "news",
    params(
        ("locale" = Option<String>, Query, description = "fr, ar or en"),
    ),
    responses(
        (status = 200, description = "List of articles", body = NewsListResponse),
    )
)]
pub async fn list_news(
    req: HttpRequest,
    query: web::Query<LocaleQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let locale = data.request_locale(&req, query.locale.as_deref());
    let articles: Vec<NewsSummary> = data
        .content
        .news
        .iter()
        .map(|a| NewsSummary::new(a, locale))
        .collect();

    let total = articles.len();
    HttpResponse::Ok().json(NewsListResponse {
        locale,
        articles,
        total,
    })
}

/// Get one article.
#[utoipa::path(
    get,
    path = "/api/news/{slug}",
    tag = "news",
    params(
        ("slug" = String, Path, description = "Article slug"),
        ("locale" = Option<String>, Query, description = "fr, ar or en"),
    ),
    responses(
        (status = 200, description = "Article", body = NewsArticleResponse),
        (status = 404, description = "Article not found", body = ErrorResponse),
    )
)]
pub async fn get_article(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<LocaleQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let slug = path.into_inner();
    let locale = data.request_locale(&req, query.locale.as_deref());

    match data.content.article(&slug) {
        Some(article) => HttpResponse::Ok().json(NewsArticleResponse {
            locale,
            summary: NewsSummary::new(article, locale),
            content: article.content.get(locale).clone(),
        }),
        None => HttpResponse::NotFound().json(ErrorResponse {
            error: format!("{}: {}", data.catalogs.t(locale, "errors.articleNotFound"), slug),
        }),
    }
}

/// Look up a dotted translation key.
///
/// Never fails: a missing key comes back as its own value with
/// `found: false`, and an unsupported locale is served from the default.
#[utoipa::path(
    get,
    path = "/api/translate",
    tag = "i18n",
    params(
        ("key" = String, Query, description = "Dotted key, e.g. models.range"),
        ("locale" = Option<String>, Query, description = "fr, ar or en"),
    ),
    responses(
        (status = 200, description = "Lookup result", body = TranslateResponse),
    )
)]
pub async fn translate(
    req: HttpRequest,
    query: web::Query<TranslateQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let locale = data.request_locale(&req, query.locale.as_deref());
    let lookup = data.catalogs.lookup(locale, &query.key);

    HttpResponse::Ok().json(TranslateResponse {
        locale,
        key: query.key.clone(),
        value: lookup.or_key(&query.key).to_string(),
        found: lookup.is_found(),
    })
}

/// Apply the locale rules to a path.
///
/// Uses the request's `Accept-Language` header, exactly as the page
/// router would for a request to `path`.
#[utoipa::path(
    get,
    path = "/api/locale",
    tag = "i18n",
    params(
        ("path" = Option<String>, Query, description = "Request path, defaults to /"),
    ),
    responses(
        (status = 200, description = "Resolution", body = LocaleResolutionResponse),
    )
)]
pub async fn resolve(
    req: HttpRequest,
    query: web::Query<ResolveQuery>,
    data: web::Data<AppState>,
) -> impl Responder {
    let path = query.path.clone().unwrap_or_else(|| "/".to_string());
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let resolution = resolve_locale(&path, accept_language, data.catalogs.locales());

    HttpResponse::Ok().json(LocaleResolutionResponse {
        redirect_to: resolution
            .needs_redirect
            .then(|| redirect_target(resolution.locale, &path, "")),
        path,
        locale: resolution.locale,
        needs_redirect: resolution.needs_redirect,
    })
}

/// Submit a contact request.
///
/// The request is validated and logged; nothing is forwarded. Messages are
/// translated into the request locale.
#[utoipa::path(
    post,
    path = "/api/contact",
    tag = "contact",
    params(
        ("locale" = Option<String>, Query, description = "fr, ar or en"),
    ),
    request_body = ContactForm,
    responses(
        (status = 200, description = "Request accepted", body = ContactResponse),
        (status = 422, description = "Invalid fields", body = ContactResponse),
    )
)]
pub async fn submit_contact(
    req: HttpRequest,
    query: web::Query<LocaleQuery>,
    body: web::Json<ContactForm>,
    data: web::Data<AppState>,
) -> impl Responder {
    let locale = data.request_locale(&req, query.locale.as_deref());
    let tr = data.catalogs.translator(locale);

    match contact::validate(&body, &data.content) {
        Ok(request) => {
            let reference = contact::submit(&request);
            HttpResponse::Ok().json(ContactResponse {
                success: true,
                message: tr.t("contact.success").to_string(),
                reference: Some(reference.to_string()),
                errors: Vec::new(),
            })
        }
        Err(errors) => {
            log::warn!("Rejected contact request: {} invalid field(s)", errors.len());
            HttpResponse::UnprocessableEntity().json(ContactResponse {
                success: false,
                message: tr.t("contact.invalid").to_string(),
                reference: None,
                errors: errors
                    .iter()
                    .map(|e| FieldErrorJson {
                        field: e.field.to_string(),
                        message: tr.t(e.key).to_string(),
                    })
                    .collect(),
            })
        }
    }
}

/// Configures all API routes under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let cors = Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .max_age(3600);

    cfg.service(
        web::scope("/api")
            .wrap(cors)
            .route("/models", web::get().to(list_models))
            .route("/models/{slug}", web::get().to(get_model))
            .route("/news", web::get().to(list_news))
            .route("/news/{slug}", web::get().to(get_article))
            .route("/translate", web::get().to(translate))
            .route("/locale", web::get().to(resolve))
            .route("/contact", web::post().to(submit_contact)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogSource;
    use crate::i18n::LocaleSet;
    use actix_web::{App, test};
    use serde_json::Value;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState::new(
            Catalogs::load(&CatalogSource::Bundled, &LocaleSet::site()),
            SiteContent::load_bundled().unwrap(),
            "https://jmev-tunisia.tn/",
        ))
    }

    #[actix_web::test]
    async fn test_list_models_with_filter_and_locale() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/models?locale=en&category=family")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["locale"], "en");
        assert_eq!(body["total"], 1);
        assert_eq!(body["models"][0]["slug"], "ev3");
        assert_eq!(body["models"][0]["price"], "From 75,000 TND");
    }

    #[actix_web::test]
    async fn test_list_models_uses_accept_language() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/models?category=everything")
            .insert_header((header::ACCEPT_LANGUAGE, "ar-TN"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["locale"], "ar");
        assert_eq!(body["total"], 3);
    }

    #[actix_web::test]
    async fn test_get_model_not_found() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/models/ev9").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 404);
    }

    #[actix_web::test]
    async fn test_get_model_detail() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/models/ev2?locale=fr").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "EV2");
        assert_eq!(body["max_speed"], "160 km/h");
        assert_eq!(body["safety"].as_array().unwrap().len(), 7);
    }

    #[actix_web::test]
    async fn test_translate_found_missing_and_unsupported() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/translate?locale=fr&key=models.range")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["value"], "Autonomie");
        assert_eq!(body["found"], true);

        let req = test::TestRequest::get()
            .uri("/api/translate?locale=fr&key=models.nonexistent.key")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["value"], "models.nonexistent.key");
        assert_eq!(body["found"], false);

        let req = test::TestRequest::get()
            .uri("/api/translate?locale=de&key=models.range")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["locale"], "fr");
        assert_eq!(body["value"], "Autonomie");
    }

    #[actix_web::test]
    async fn test_resolve_endpoint() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::get()
            .uri("/api/locale?path=/models")
            .insert_header((header::ACCEPT_LANGUAGE, "en-GB"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["locale"], "en");
        assert_eq!(body["needs_redirect"], true);
        assert_eq!(body["redirect_to"], "/en/models");

        let req = test::TestRequest::get().uri("/api/locale?path=/ar/news").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["locale"], "ar");
        assert_eq!(body["needs_redirect"], false);
        assert!(body.get("redirect_to").is_none());
    }

    #[actix_web::test]
    async fn test_submit_contact() {
        let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/contact?locale=en")
            .set_json(serde_json::json!({
                "name": "Karim",
                "email": "karim@example.tn",
                "phone": "+216 20 000 000",
                "city": "Tunis",
                "purpose": "quotation",
                "model": "elight",
                "message": "Price for ELIGHT?"
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], true);
        assert!(body["reference"].as_str().is_some());

        let req = test::TestRequest::post()
            .uri("/api/contact?locale=en")
            .set_json(serde_json::json!({ "name": "Karim" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), 422);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0]["field"], "email");
        assert_ne!(body["errors"][0]["message"], "contact.errors.required");
    }
}
