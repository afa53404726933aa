//! HTML output: escaping, the shared page layout and small markup helpers.
//!
//! Every function takes the [`Translator`] it needs; the locale is never
//! read from ambient state.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use std::borrow::Cow;
use std::fmt::Write;

use crate::catalog::Translator;
use crate::i18n::SUPPORTED_LOCALES;
use crate::routing::localized_path;

/// Site-wide name used in titles.
pub const SITE_NAME: &str = "JMEV Tunisia";

/// Navigation entries: path below the locale prefix and label key.
pub const NAV_LINKS: &[(&str, &str)] = &[
    ("/", "common.home"),
    ("/models", "common.models"),
    ("/offers", "common.offers"),
    ("/charging", "common.charging"),
    ("/about", "common.about"),
    ("/news", "common.news"),
    ("/contact", "common.contact"),
];

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    let need_escape_from = s
        .char_indices()
        .find(|(_, c)| matches!(c, '<' | '>' | '"' | '\'' | '&'))
        .map(|(i, _)| i);
    match need_escape_from {
        None => Cow::Borrowed(s),
        Some(p) => {
            let mut ret = String::with_capacity(s.len() + 8);
            ret.push_str(&s[..p]);
            for c in s[p..].chars() {
                match c {
                    '<' => ret += "&lt;",
                    '>' => ret += "&gt;",
                    '"' => ret += "&quot;",
                    '\'' => ret += "&#39;",
                    '&' => ret += "&amp;",
                    _ => ret.push(c),
                }
            }
            Cow::Owned(ret)
        }
    }
}

/// A rendered page body with its metadata.
pub struct Page {
    pub title: String,
    pub description: String,
    pub body: String,
}

/// Where the page sits, for canonical and alternate links.
pub struct PageContext<'a> {
    pub tr: Translator<'a>,
    /// Public origin, without trailing slash.
    pub base_url: &'a str,
    /// The request path, with or without locale prefix.
    pub path: &'a str,
}

impl PageContext<'_> {
    /// Path of `target` (given below the locale prefix) in the current locale.
    pub fn href(&self, target: &str) -> String {
        localized_path(target, self.tr.locale())
    }

    /// Wraps `page` in the full document: head metadata, header with
    /// navigation and language switcher, footer.
    pub fn render(&self, page: &Page) -> String {
        let tr = self.tr;
        let locale = tr.locale();
        let mut html = String::with_capacity(page.body.len() + 4096);

        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"{}\" dir=\"{}\">\n<head>\n\
             <meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{} | {}</title>\n\
             <meta name=\"description\" content=\"{}\">\n\
             <meta property=\"og:title\" content=\"{}\">\n\
             <meta property=\"og:locale\" content=\"{}\">\n\
             <link rel=\"canonical\" href=\"{}{}\">\n",
            locale.code(),
            locale.direction(),
            escape_html(&page.title),
            SITE_NAME,
            escape_html(&page.description),
            escape_html(&page.title),
            locale.og_locale(),
            self.base_url,
            escape_html(&localized_path(self.path, locale)),
        );
        for &alt in SUPPORTED_LOCALES {
            let _ = writeln!(
                html,
                "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}{}\">",
                alt.code(),
                self.base_url,
                escape_html(&localized_path(self.path, alt)),
            );
        }
        html.push_str("<link rel=\"stylesheet\" href=\"/static/site.css\">\n</head>\n<body>\n");

        // Header
        let _ = write!(
            html,
            "<header class=\"site-header\">\n<a class=\"logo\" href=\"{}\">JMEV <span>Tunisia</span></a>\n<nav>\n",
            self.href("/")
        );
        for (target, key) in NAV_LINKS {
            let _ = writeln!(
                html,
                "<a href=\"{}\">{}</a>",
                self.href(target),
                escape_html(tr.t(key))
            );
        }
        html.push_str("</nav>\n<div class=\"languages\">\n");
        for &alt in SUPPORTED_LOCALES {
            let current = if alt == locale { " aria-current=\"true\"" } else { "" };
            let _ = writeln!(
                html,
                "<a href=\"{}\" hreflang=\"{}\"{}>{}</a>",
                escape_html(&localized_path(self.path, alt)),
                alt.code(),
                current,
                alt.native_name()
            );
        }
        let _ = write!(
            html,
            "</div>\n<a class=\"cta\" href=\"{}?purpose=test-drive\">{}</a>\n</header>\n",
            self.href("/contact"),
            escape_html(tr.t("common.testDrive"))
        );

        html.push_str("<main>\n");
        html.push_str(&page.body);
        html.push_str("</main>\n");

        let _ = write!(
            html,
            "<footer class=\"site-footer\">\n<p>{}</p>\n<p>&copy; {} · {}</p>\n</footer>\n</body>\n</html>\n",
            escape_html(tr.t("footer.tagline")),
            SITE_NAME,
            escape_html(tr.t("footer.rights"))
        );
        html
    }
}

/// A hero section with a heading and a subtitle.
pub fn hero(title: &str, subtitle: &str) -> String {
    format!(
        "<section class=\"hero\">\n<h1>{}</h1>\n<p>{}</p>\n</section>\n",
        escape_html(title),
        escape_html(subtitle)
    )
}

/// A `<ul>` of escaped items.
pub fn list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let mut html = String::from("<ul>\n");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", escape_html(item));
    }
    html.push_str("</ul>\n");
    html
}

/// A link styled as a button.
pub fn button(href: &str, label: &str) -> String {
    format!(
        "<a class=\"button\" href=\"{}\">{}</a>\n",
        escape_html(href),
        escape_html(label)
    )
}

/// Builds an HTML response.
pub fn html_response(status: StatusCode, html: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalogs;
    use crate::i18n::{Locale, LocaleSet};

    #[test]
    fn test_escape_html() {
        assert!(matches!(escape_html("plain text"), Cow::Borrowed(_)));
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_html("l'EV3"), "l&#39;EV3");
        assert_eq!(escape_html("مرحبا <b>"), "مرحبا &lt;b&gt;");
    }

    #[test]
    fn test_layout_sets_direction_and_alternates() {
        let catalogs = Catalogs::from_documents(
            &LocaleSet::site(),
            [
                (Locale::Fr, r#"{"common":{"home":"Accueil"}}"#),
                (Locale::Ar, r#"{"common":{"home":"الرئيسية"}}"#),
                (Locale::En, r#"{"common":{"home":"Home"}}"#),
            ],
        );
        let ctx = PageContext {
            tr: catalogs.translator(Locale::Ar),
            base_url: "https://example.tn",
            path: "/ar/models",
        };
        let html = ctx.render(&Page {
            title: "T".into(),
            description: "D".into(),
            body: "<p>body</p>".into(),
        });

        assert!(html.contains("<html lang=\"ar\" dir=\"rtl\">"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://example.tn/ar/models\">"));
        assert!(html.contains("hreflang=\"fr\" href=\"https://example.tn/fr/models\""));
        assert!(html.contains("<a href=\"/ar\">الرئيسية</a>"));
        assert!(html.contains("<a href=\"/en/models\" hreflang=\"en\">English</a>"));
        // Keys absent from the catalog show up verbatim.
        assert!(html.contains("common.models"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_list_escapes_items() {
        assert_eq!(list(["a", "<b>"]), "<ul>\n<li>a</li>\n<li>&lt;b&gt;</li>\n</ul>\n");
    }
}
