//! Locale routing: every page lives under a `/<locale>` prefix.
//!
//! [`resolve_locale`] is the pure decision function. [`locale_routing`] is
//! the actix middleware that applies it to each request, redirecting
//! non-localized paths and attaching the resolved locale to localized ones.
//! Handlers read the locale back with the [`ResolvedLocale`] extractor.

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Payload, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderName, HeaderValue};
use actix_web::middleware::Next;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, HttpResponse, web};
use std::future::{Ready, ready};

use crate::i18n::{Locale, LocaleSet, SUPPORTED_LOCALES};

/// Path prefixes the locale layer never touches.
pub const EXEMPT_PREFIXES: &[&str] = &["/api", "/images", "/static", "/swagger-ui", "/api-docs"];

/// Outcome of [`resolve_locale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleResolution {
    /// The locale that applies to the request.
    pub locale: Locale,
    /// True when the request path lacked a locale prefix.
    pub needs_redirect: bool,
}

/// Returns the locale whose segment prefixes `path`, if any.
///
/// The segment must be followed by `/` or end the path: `/fr` and `/fr/x`
/// match, `/frabc` does not.
pub fn locale_prefix(path: &str, locales: &LocaleSet) -> Option<Locale> {
    let rest = path.strip_prefix('/')?;
    locales.locales().iter().copied().find(|locale| {
        rest.strip_prefix(locale.code())
            .is_some_and(|tail| tail.is_empty() || tail.starts_with('/'))
    })
}

/// Resolves the locale for a request.
///
/// Precedence, first match wins:
/// 1. a locale prefix in the path (no redirect needed),
/// 2. the first locale, in declared order, whose code occurs anywhere in the
///    language-preference header,
/// 3. the default locale.
pub fn resolve_locale(
    path: &str,
    accept_language: Option<&str>,
    locales: &LocaleSet,
) -> LocaleResolution {
    let path = if path.is_empty() { "/" } else { path };

    if let Some(locale) = locale_prefix(path, locales) {
        return LocaleResolution {
            locale,
            needs_redirect: false,
        };
    }

    // Plain substring match against the raw header, quality values ignored.
    let from_header = accept_language
        .filter(|value| !value.is_empty())
        .and_then(|value| {
            locales
                .locales()
                .iter()
                .copied()
                .find(|locale| value.contains(locale.code()))
        });

    LocaleResolution {
        locale: from_header.unwrap_or(locales.default_locale()),
        needs_redirect: true,
    }
}

/// Builds the redirect location `/<locale><path>[?query]`.
pub fn redirect_target(locale: Locale, path: &str, query: &str) -> String {
    let mut target = String::with_capacity(path.len() + query.len() + 4);
    target.push('/');
    target.push_str(locale.code());
    if !path.starts_with('/') {
        target.push('/');
    }
    target.push_str(path);
    if !query.is_empty() {
        target.push('?');
        target.push_str(query);
    }
    target
}

/// Whether the locale layer should leave `path` alone: API and asset
/// prefixes, and anything that looks like a file name.
pub fn is_exempt_path(path: &str) -> bool {
    if path.contains('.') {
        return true;
    }
    EXEMPT_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|tail| tail.is_empty() || tail.starts_with('/'))
    })
}

/// Rewrites `path` so it lives under `locale`, replacing any existing
/// locale prefix. `"/fr/models"` becomes `"/en/models"`, `"/"` becomes `"/en"`.
pub fn localized_path(path: &str, locale: Locale) -> String {
    let clean = path.strip_prefix('/').unwrap_or(path);
    let rest = SUPPORTED_LOCALES
        .iter()
        .find_map(|l| {
            let tail = clean.strip_prefix(l.code())?;
            if tail.is_empty() {
                Some("")
            } else {
                tail.strip_prefix('/')
            }
        })
        .unwrap_or(clean);

    if rest.is_empty() {
        format!("/{}", locale.code())
    } else {
        format!("/{}/{}", locale.code(), rest)
    }
}

/// The locale attached to a request by [`locale_routing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocale(pub Locale);

impl FromRequest for ResolvedLocale {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let attached = req.extensions().get::<ResolvedLocale>().copied();
        let locale = attached.unwrap_or_else(|| {
            // Not routed through the middleware; apply the same rules.
            let site = LocaleSet::site();
            let locales = req
                .app_data::<web::Data<LocaleSet>>()
                .map(|data| data.get_ref())
                .unwrap_or(&site);
            let accept_language = req
                .headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok());
            ResolvedLocale(resolve_locale(req.path(), accept_language, locales).locale)
        });
        ready(Ok(locale))
    }
}

/// Middleware applying [`resolve_locale`] to every non-exempt request.
///
/// Requests without a locale prefix get a `307` to the localized URL with
/// the query string preserved. Localized requests continue with
/// [`ResolvedLocale`] in their extensions, and the response carries
/// `x-locale` and `x-pathname` headers.
pub async fn locale_routing(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let path = req.path().to_owned();
    if is_exempt_path(&path) {
        return Ok(next.call(req).await?.map_into_boxed_body());
    }

    let locales = req
        .app_data::<web::Data<LocaleSet>>()
        .cloned()
        .unwrap_or_else(|| web::Data::new(LocaleSet::site()));
    let accept_language = req
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let resolution = resolve_locale(&path, accept_language, &locales);

    if resolution.needs_redirect {
        let target = redirect_target(resolution.locale, &path, req.query_string());
        log::debug!("Redirecting {} to {}", path, target);
        let response = HttpResponse::TemporaryRedirect()
            .insert_header((header::LOCATION, target))
            .finish();
        return Ok(req.into_response(response).map_into_boxed_body());
    }

    req.extensions_mut().insert(ResolvedLocale(resolution.locale));
    let mut res = next.call(req).await?;
    let headers = res.headers_mut();
    headers.insert(
        HeaderName::from_static("x-locale"),
        HeaderValue::from_static(resolution.locale.code()),
    );
    if let Ok(value) = HeaderValue::from_str(&path) {
        headers.insert(HeaderName::from_static("x-pathname"), value);
    }
    Ok(res.map_into_boxed_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{App, test as actix_test};

    fn site() -> LocaleSet {
        LocaleSet::site()
    }

    #[test]
    fn test_prefixed_paths_need_no_redirect() {
        for (path, locale) in [
            ("/en/models", Locale::En),
            ("/en", Locale::En),
            ("/ar/", Locale::Ar),
            ("/fr/models/ev3", Locale::Fr),
        ] {
            let res = resolve_locale(path, Some("ar"), &site());
            assert_eq!(res.locale, locale, "path {}", path);
            assert!(!res.needs_redirect, "path {}", path);
        }
    }

    #[test]
    fn test_locale_code_inside_longer_segment_is_not_a_prefix() {
        let res = resolve_locale("/frabc", None, &site());
        assert!(res.needs_redirect);
        assert_eq!(res.locale, Locale::Fr);

        let res = resolve_locale("/english", Some("ar-TN"), &site());
        assert!(res.needs_redirect);
        assert_eq!(res.locale, Locale::Ar);
    }

    #[test]
    fn test_header_match_follows_declared_order() {
        let res = resolve_locale("/models", Some("ar-TN,en;q=0.8"), &site());
        assert_eq!(res.locale, Locale::Ar);
        assert!(res.needs_redirect);

        // fr is declared before ar, so it wins even with a lower quality.
        let res = resolve_locale("/models", Some("fr-FR,ar;q=0.8"), &site());
        assert_eq!(res.locale, Locale::Fr);

        let ar_first = LocaleSet::new(vec![Locale::Ar, Locale::Fr, Locale::En], Locale::Fr).unwrap();
        let res = resolve_locale("/models", Some("fr-FR,ar;q=0.8"), &ar_first);
        assert_eq!(res.locale, Locale::Ar);
        assert!(res.needs_redirect);
    }

    #[test]
    fn test_header_match_is_substring() {
        // "en" occurs inside "gen"; the crude matcher accepts it.
        let res = resolve_locale("/", Some("x-gen"), &site());
        assert_eq!(res.locale, Locale::En);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        for header in [None, Some(""), Some("de-DE,es;q=0.5")] {
            let res = resolve_locale("/offers", header, &site());
            assert_eq!(res.locale, Locale::Fr);
            assert!(res.needs_redirect);
        }
    }

    #[test]
    fn test_empty_path_is_root() {
        let res = resolve_locale("", None, &site());
        assert_eq!(res.locale, Locale::Fr);
        assert!(res.needs_redirect);
        assert_eq!(redirect_target(res.locale, "", ""), "/fr/");
    }

    #[test]
    fn test_redirect_target_preserves_query() {
        assert_eq!(
            redirect_target(Locale::Ar, "/contact", "purpose=test-drive&model=ev3"),
            "/ar/contact?purpose=test-drive&model=ev3"
        );
        assert_eq!(redirect_target(Locale::En, "/", ""), "/en/");
    }

    #[test]
    fn test_resolution_is_idempotent_after_redirect() {
        for (path, header) in [
            ("/", None),
            ("/models", Some("en-GB")),
            ("/frabc", Some("ar")),
            ("/news/x", Some("de")),
        ] {
            let first = resolve_locale(path, header, &site());
            assert!(first.needs_redirect);
            let target = redirect_target(first.locale, path, "");
            let second = resolve_locale(&target, header, &site());
            assert_eq!(second.locale, first.locale);
            assert!(!second.needs_redirect, "target {}", target);
        }
    }

    #[test]
    fn test_exempt_paths() {
        assert!(is_exempt_path("/api/models"));
        assert!(is_exempt_path("/api"));
        assert!(is_exempt_path("/images/models/ev3-main.jpg"));
        assert!(is_exempt_path("/favicon.ico"));
        assert!(is_exempt_path("/swagger-ui/"));
        assert!(!is_exempt_path("/apiary"));
        assert!(!is_exempt_path("/models"));
        assert!(!is_exempt_path("/"));
    }

    #[test]
    fn test_localized_path() {
        assert_eq!(localized_path("/fr/models", Locale::En), "/en/models");
        assert_eq!(localized_path("/models/ev3", Locale::Ar), "/ar/models/ev3");
        assert_eq!(localized_path("/", Locale::En), "/en");
        assert_eq!(localized_path("/fr", Locale::Ar), "/ar");
        assert_eq!(localized_path("contact", Locale::Fr), "/fr/contact");
        assert_eq!(localized_path("/frabc", Locale::En), "/en/frabc");
    }

    async fn echo_locale(locale: ResolvedLocale) -> HttpResponse {
        HttpResponse::Ok().body(locale.0.code())
    }

    #[actix_web::test]
    async fn test_middleware_redirects_unprefixed_paths() {
        let app = actix_test::init_service(
            App::new()
                .wrap(from_fn(locale_routing))
                .default_service(web::to(echo_locale)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/models?category=urban")
            .insert_header((header::ACCEPT_LANGUAGE, "en-US,en;q=0.9"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), 307);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "/en/models?category=urban"
        );
    }

    #[actix_web::test]
    async fn test_middleware_passes_localized_paths() {
        let app = actix_test::init_service(
            App::new()
                .wrap(from_fn(locale_routing))
                .default_service(web::to(echo_locale)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/ar/news")
            .insert_header((header::ACCEPT_LANGUAGE, "en"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        assert_eq!(res.headers().get("x-locale").unwrap(), "ar");
        assert_eq!(res.headers().get("x-pathname").unwrap(), "/ar/news");
        let body = actix_test::read_body(res).await;
        assert_eq!(&body[..], b"ar");
    }

    #[actix_web::test]
    async fn test_middleware_skips_exempt_paths() {
        let app = actix_test::init_service(
            App::new()
                .wrap(from_fn(locale_routing))
                .default_service(web::to(echo_locale)),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/robots.txt").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), 200);
        assert!(res.headers().get("x-locale").is_none());
    }

    #[actix_web::test]
    async fn test_extractor_uses_configured_locale_set() {
        let ar_first = LocaleSet::new(vec![Locale::Ar, Locale::Fr, Locale::En], Locale::Fr).unwrap();
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ar_first))
                .default_service(web::to(echo_locale)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/models")
            .insert_header((header::ACCEPT_LANGUAGE, "fr-FR,ar;q=0.8"))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(&body[..], b"ar");

        let req = actix_test::TestRequest::get()
            .uri("/en/models")
            .insert_header((header::ACCEPT_LANGUAGE, "ar"))
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(&body[..], b"en");
    }
}
