//! HTML pages served under `/{locale}`.
//!
//! Handlers receive their locale through [`ResolvedLocale`], build the page
//! body with the request's [`Translator`](crate::catalog::Translator) and
//! wrap it in the shared layout from [`crate::render`].

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Route, guard, web};
use serde::Deserialize;
use std::fmt::Write;
use uuid::Uuid;

use crate::api::AppState;
use crate::contact::{self, ContactForm, FieldError, Purpose, TUNISIAN_CITIES};
use crate::content::{Category, VehicleModel};
use crate::render::{Page, PageContext, button, escape_html, hero, html_response, list};
use crate::routing::ResolvedLocale;
use crate::types::ErrorResponse;

/// `?category=` on the models page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// `?purpose=&model=` on the contact page.
#[derive(Debug, Default, Deserialize)]
pub struct ContactQuery {
    pub purpose: Option<String>,
    pub model: Option<String>,
}

fn context<'a>(req: &'a HttpRequest, data: &'a AppState, locale: ResolvedLocale) -> PageContext<'a> {
    PageContext {
        tr: data.catalogs.translator(locale.0),
        base_url: &data.base_url,
        path: req.path(),
    }
}

/// A page whose title and description are the `title`/`subtitle` keys of
/// `group`, opened by the matching hero section.
fn titled_page(ctx: &PageContext, group: &str, body: String) -> Page {
    let title = ctx.tr.t(&format!("{}.title", group)).to_string();
    let description = ctx.tr.t(&format!("{}.subtitle", group)).to_string();
    Page {
        body: hero(&title, &description) + &body,
        title,
        description,
    }
}

fn model_card(ctx: &PageContext, model: &VehicleModel) -> String {
    let tr = ctx.tr;
    let locale = tr.locale();
    format!(
        "<article class=\"model-card\">\n\
         <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n\
         <span class=\"badge\">{}</span>\n\
         <h3>{}</h3>\n<p>{}</p>\n\
         <dl>\n<dt>{}</dt><dd>{}</dd>\n<dt>{}</dt><dd>{}</dd>\n<dt>{}</dt><dd>{}</dd>\n</dl>\n\
         <p class=\"price\">{}</p>\n{}</article>\n",
        escape_html(&model.hero_image),
        escape_html(&model.name),
        escape_html(tr.t(model.category.label_key())),
        escape_html(&model.name),
        escape_html(model.description.get(locale)),
        escape_html(tr.t("models.range")),
        escape_html(&model.specifications.range),
        escape_html(tr.t("models.battery")),
        escape_html(&model.specifications.battery),
        escape_html(tr.t("models.power")),
        escape_html(&model.specifications.power),
        escape_html(model.price.get(locale)),
        button(&ctx.href(&format!("/models/{}", model.slug)), tr.t("common.viewDetails")),
    )
}

/// A two-column table of label keys and values.
fn spec_table<'a>(ctx: &PageContext, rows: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut html = String::from("<table class=\"specs\">\n");
    for (key, value) in rows {
        let _ = writeln!(
            html,
            "<tr><th>{}</th><td>{}</td></tr>",
            escape_html(ctx.tr.t(key)),
            escape_html(value)
        );
    }
    html.push_str("</table>\n");
    html
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn home(req: HttpRequest, locale: ResolvedLocale, data: web::Data<AppState>) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let tr = ctx.tr;
    let mut body = String::new();

    body.push_str("<div class=\"actions\">\n");
    body.push_str(&button(&ctx.href("/models"), tr.t("common.discoverModels")));
    body.push_str(&button(
        &format!("{}?purpose=test-drive", ctx.href("/contact")),
        tr.t("common.bookTestDrive"),
    ));
    body.push_str("</div>\n");

    let _ = writeln!(
        body,
        "<section class=\"features\">\n<h2>{}</h2>",
        escape_html(tr.t("home.features.title"))
    );
    for feature in ["cost", "eco", "service", "network"] {
        let _ = writeln!(
            body,
            "<div class=\"feature\"><h3>{}</h3><p>{}</p></div>",
            escape_html(tr.t(&format!("home.features.{}.title", feature))),
            escape_html(tr.t(&format!("home.features.{}.description", feature)))
        );
    }
    body.push_str("</section>\n");

    let _ = writeln!(
        body,
        "<section class=\"models\">\n<h2>{}</h2>",
        escape_html(tr.t("home.featuredModels"))
    );
    for model in &data.content.models {
        body.push_str(&model_card(&ctx, model));
    }
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section class=\"financing\">\n<h2>{}</h2>\n<p>{}</p>\n{}</section>\n",
        escape_html(tr.t("home.financing.title")),
        escape_html(tr.t("home.financing.description")),
        button(&ctx.href("/offers"), tr.t("common.learnMore"))
    );

    let _ = writeln!(
        body,
        "<section class=\"news\">\n<h2>{}</h2>",
        escape_html(tr.t("home.latestNews"))
    );
    for article in data.content.news.iter().take(3) {
        let _ = write!(
            body,
            "<article><h3>{}</h3><p>{}</p>{}</article>\n",
            escape_html(article.title.get(tr.locale())),
            escape_html(article.excerpt.get(tr.locale())),
            button(&ctx.href(&format!("/news/{}", article.slug)), tr.t("common.readMore"))
        );
    }
    body.push_str("</section>\n");

    let page = titled_page(&ctx, "home", body);
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn models(
    req: HttpRequest,
    locale: ResolvedLocale,
    query: web::Query<CategoryQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let tr = ctx.tr;
    let selected = query.category.as_deref().and_then(Category::from_filter);
    let mut body = String::from("<nav class=\"filters\">\n");

    let base = ctx.href("/models");
    let all_current = if selected.is_none() { " aria-current=\"true\"" } else { "" };
    let _ = writeln!(
        body,
        "<a href=\"{}\"{}>{}</a>",
        base,
        all_current,
        escape_html(tr.t("common.allModels"))
    );
    for category in Category::ALL {
        let current = if selected == Some(category) { " aria-current=\"true\"" } else { "" };
        let _ = writeln!(
            body,
            "<a href=\"{}?category={}\"{}>{}</a>",
            base,
            category.as_str(),
            current,
            escape_html(tr.t(category.label_key()))
        );
    }
    body.push_str("</nav>\n<section class=\"models\">\n");

    let mut shown = 0;
    for model in data.content.models_in(selected) {
        body.push_str(&model_card(&ctx, model));
        shown += 1;
    }
    if shown == 0 {
        let _ = writeln!(body, "<p>{}</p>", escape_html(tr.t("common.noResults")));
    }
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section class=\"help\">\n<h2>{}</h2>\n<p>{}</p>\n{}</section>\n",
        escape_html(tr.t("models.needHelp")),
        escape_html(tr.t("models.needHelpSubtitle")),
        button(&ctx.href("/contact"), tr.t("common.contactUs"))
    );

    let page = titled_page(&ctx, "models", body);
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn model_detail(
    req: HttpRequest,
    locale: ResolvedLocale,
    path: web::Path<(String, String)>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let (_, slug) = path.into_inner();
    let ctx = context(&req, &data, locale);
    let Some(model) = data.content.model(&slug) else {
        return not_found_page(&ctx);
    };
    let tr = ctx.tr;
    let locale = tr.locale();
    let specs = &model.specifications;
    let cost = &model.cost_of_ownership;
    let contact = ctx.href("/contact");

    let mut body = format!(
        "<section class=\"model-hero\">\n<img src=\"{}\" alt=\"{}\">\n\
         <span class=\"badge\">{}</span>\n<h1>{}</h1>\n<p>{}</p>\n<p class=\"price\">{}</p>\n",
        escape_html(&model.hero_image),
        escape_html(&model.name),
        escape_html(tr.t(model.category.label_key())),
        escape_html(&model.name),
        escape_html(model.description.get(locale)),
        escape_html(model.price.get(locale)),
    );
    body.push_str(&button(
        &format!("{}?purpose=test-drive&model={}", contact, model.slug),
        tr.t("common.bookTestDrive"),
    ));
    body.push_str(&button(
        &format!("{}?purpose=quotation&model={}", contact, model.slug),
        tr.t("common.requestQuote"),
    ));
    body.push_str("</section>\n");

    let _ = writeln!(body, "<section>\n<h2>{}</h2>", escape_html(tr.t("models.specifications")));
    body.push_str(&spec_table(
        &ctx,
        [
            ("models.range", specs.range.as_str()),
            ("models.battery", specs.battery.as_str()),
            ("models.power", specs.power.as_str()),
            ("models.maxSpeed", specs.max_speed.as_str()),
            ("models.acceleration", specs.acceleration.get(locale).as_str()),
            ("models.chargingHome", specs.charging_home.get(locale).as_str()),
            ("models.chargingFast", specs.charging_fast.get(locale).as_str()),
            ("models.weight", specs.weight.as_str()),
            ("models.seats", specs.seats.as_str()),
        ],
    ));
    let _ = writeln!(body, "<h3>{}</h3>", escape_html(tr.t("models.dimensions")));
    body.push_str(&spec_table(
        &ctx,
        [
            ("models.length", specs.dimensions.length.as_str()),
            ("models.width", specs.dimensions.width.as_str()),
            ("models.height", specs.dimensions.height.as_str()),
            ("models.wheelbase", specs.dimensions.wheelbase.as_str()),
        ],
    ));
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section>\n<h2>{}</h2>\n<p>{}</p>\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
        escape_html(tr.t("models.targetCustomer")),
        escape_html(model.target_customer.get(locale)),
        escape_html(tr.t("models.usage")),
        escape_html(model.usage.get(locale)),
    );

    let _ = writeln!(body, "<section>\n<h2>{}</h2>", escape_html(tr.t("models.safety")));
    body.push_str(&list(specs.safety.get(locale).iter().map(String::as_str)));
    body.push_str("</section>\n");

    let _ = writeln!(body, "<section>\n<h2>{}</h2>", escape_html(tr.t("models.realRange")));
    body.push_str(&spec_table(
        &ctx,
        [
            ("charging.ranges.city", specs.ranges.city.as_str()),
            ("charging.ranges.highway", specs.ranges.highway.as_str()),
            ("charging.ranges.mixed", specs.ranges.mixed.as_str()),
        ],
    ));
    let _ = writeln!(body, "<p>{}</p>\n</section>", escape_html(specs.ranges.note.get(locale)));

    let _ = writeln!(body, "<section>\n<h2>{}</h2>", escape_html(tr.t("models.costOfOwnership")));
    body.push_str(&spec_table(
        &ctx,
        [
            ("models.purchase", cost.purchase.get(locale).as_str()),
            ("models.annualEnergy", cost.annual_energy.get(locale).as_str()),
            ("models.maintenance", cost.maintenance.get(locale).as_str()),
            ("models.total5Years", cost.total_5_years.get(locale).as_str()),
        ],
    ));
    let _ = writeln!(body, "<p>{}</p>\n</section>", escape_html(cost.note.get(locale)));

    let _ = writeln!(body, "<section class=\"gallery\">\n<h2>{}</h2>", escape_html(tr.t("models.gallery")));
    for image in &model.gallery {
        let _ = writeln!(
            body,
            "<img src=\"{}\" alt=\"{}\" loading=\"lazy\">",
            escape_html(image),
            escape_html(&model.name)
        );
    }
    body.push_str("</section>\n");
    body.push_str(&button(&ctx.href("/models"), tr.t("common.backToModels")));

    let page = Page {
        title: model.name.clone(),
        description: model.description.get(locale).clone(),
        body,
    };
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn offers(req: HttpRequest, locale: ResolvedLocale, data: web::Data<AppState>) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let tr = ctx.tr;
    let locale = tr.locale();

    let mut body = format!(
        "<section class=\"financing\">\n<h2>{}</h2>\n",
        escape_html(tr.t("offers.financing"))
    );
    for plan in &data.content.financing {
        let group = plan.audience.catalog_group();
        let model_name = data
            .content
            .model(&plan.model)
            .map(|m| m.name.as_str())
            .unwrap_or(plan.model.as_str());
        let _ = write!(
            body,
            "<article class=\"plan\">\n<h3>{}</h3>\n<p>{}</p>\n",
            escape_html(tr.t(&format!("{}.title", group))),
            escape_html(tr.t(&format!("{}.description", group))),
        );
        body.push_str(&spec_table(
            &ctx,
            [
                ("offers.model", model_name),
                ("offers.price", plan.price.get(locale).as_str()),
                ("offers.downPayment", plan.down_payment.get(locale).as_str()),
                ("offers.monthly", plan.monthly.get(locale).as_str()),
                ("offers.duration", plan.duration.get(locale).as_str()),
            ],
        ));
        body.push_str("</article>\n");
    }
    body.push_str("</section>\n");

    let _ = writeln!(
        body,
        "<section class=\"special-offers\">\n<h2>{}</h2>",
        escape_html(tr.t("offers.special"))
    );
    for offer in &data.content.offers {
        let _ = writeln!(
            body,
            "<article class=\"offer\">\n<span class=\"badge\">{}</span>\n<h3>{}</h3>\n<p>{}</p>\n<p>{} {}</p>\n</article>",
            escape_html(offer.badge.get(locale)),
            escape_html(offer.title.get(locale)),
            escape_html(offer.description.get(locale)),
            escape_html(tr.t("offers.validUntil")),
            escape_html(offer.valid_until.get(locale)),
        );
    }
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section class=\"cta\">\n<h2>{}</h2>\n{}{}</section>\n",
        escape_html(tr.t("offers.ready")),
        button(&format!("{}?purpose=financing", ctx.href("/contact")), tr.t("common.contactUs")),
        button(&format!("{}?purpose=quotation", ctx.href("/contact")), tr.t("common.getQuote")),
    );

    let page = titled_page(&ctx, "offers", body);
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn charging(req: HttpRequest, locale: ResolvedLocale, data: web::Data<AppState>) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let tr = ctx.tr;

    let mut body = format!(
        "<section class=\"methods\">\n<h2>{}</h2>\n",
        escape_html(tr.t("charging.methods"))
    );
    for method in ["home", "public", "fast"] {
        let _ = writeln!(
            body,
            "<div class=\"method\"><h3>{}</h3><p>{}</p></div>",
            escape_html(tr.t(&format!("charging.{}.title", method))),
            escape_html(tr.t(&format!("charging.{}.description", method)))
        );
    }
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section class=\"ranges\">\n<h2>{}</h2>\n<table>\n<tr><th></th><th>{}</th><th>{}</th><th>{}</th></tr>\n",
        escape_html(tr.t("charging.ranges.title")),
        escape_html(tr.t("charging.ranges.city")),
        escape_html(tr.t("charging.ranges.highway")),
        escape_html(tr.t("charging.ranges.mixed")),
    );
    for model in &data.content.models {
        let ranges = &model.specifications.ranges;
        let _ = writeln!(
            body,
            "<tr><th>{}</th><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&model.name),
            escape_html(&ranges.city),
            escape_html(&ranges.highway),
            escape_html(&ranges.mixed),
        );
    }
    body.push_str("</table>\n</section>\n");

    let _ = writeln!(body, "<section class=\"tips\">\n<h2>{}</h2>", escape_html(tr.t("charging.tips.title")));
    body.push_str(&list(
        ["charging.tips.one", "charging.tips.two", "charging.tips.three", "charging.tips.four"]
            .into_iter()
            .map(|key| tr.t(key)),
    ));
    body.push_str("</section>\n");

    let _ = write!(
        body,
        "<section class=\"cost\">\n<h2>{}</h2>\n<p>{}</p>\n</section>\n",
        escape_html(tr.t("charging.cost.title")),
        escape_html(tr.t("charging.cost.description")),
    );

    let page = titled_page(&ctx, "charging", body);
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn about(req: HttpRequest, locale: ResolvedLocale, data: web::Data<AppState>) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let tr = ctx.tr;

    let mut body = format!(
        "<section>\n<h2>{}</h2>\n<p>{}</p>\n</section>\n<section class=\"values\">\n<h2>{}</h2>\n",
        escape_html(tr.t("about.mission.title")),
        escape_html(tr.t("about.mission.description")),
        escape_html(tr.t("about.values.title")),
    );
    for value in ["quality", "innovation", "proximity"] {
        let _ = writeln!(
            body,
            "<div class=\"value\"><h3>{}</h3><p>{}</p></div>",
            escape_html(tr.t(&format!("about.values.{}.title", value))),
            escape_html(tr.t(&format!("about.values.{}.description", value)))
        );
    }
    let _ = write!(
        body,
        "</section>\n<section>\n<h2>{}</h2>\n<p>{}</p>\n{}</section>\n",
        escape_html(tr.t("about.network.title")),
        escape_html(tr.t("about.network.description")),
        button(&ctx.href("/contact"), tr.t("common.contactUs")),
    );

    let page = titled_page(&ctx, "about", body);
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn news(req: HttpRequest, locale: ResolvedLocale, data: web::Data<AppState>) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let tr = ctx.tr;
    let locale = tr.locale();

    let mut body = String::from("<section class=\"news\">\n");
    for article in &data.content.news {
        let _ = write!(
            body,
            "<article>\n<img src=\"{}\" alt=\"\" loading=\"lazy\">\n\
             <p class=\"meta\">{} · {}</p>\n<h2>{}</h2>\n<p>{}</p>\n{}</article>\n",
            escape_html(&article.image),
            escape_html(article.date.get(locale)),
            escape_html(article.category.get(locale)),
            escape_html(article.title.get(locale)),
            escape_html(article.excerpt.get(locale)),
            button(&ctx.href(&format!("/news/{}", article.slug)), tr.t("common.readMore")),
        );
    }
    body.push_str("</section>\n");

    let page = titled_page(&ctx, "news", body);
    html_response(StatusCode::OK, ctx.render(&page))
}

pub async fn news_article(
    req: HttpRequest,
    locale: ResolvedLocale,
    path: web::Path<(String, String)>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let (_, slug) = path.into_inner();
    let ctx = context(&req, &data, locale);
    let Some(article) = data.content.article(&slug) else {
        return not_found_page(&ctx);
    };
    let tr = ctx.tr;
    let locale = tr.locale();

    let mut body = format!(
        "<article class=\"news-article\">\n<p class=\"meta\">{} · {}</p>\n<h1>{}</h1>\n<img src=\"{}\" alt=\"\">\n",
        escape_html(article.date.get(locale)),
        escape_html(article.category.get(locale)),
        escape_html(article.title.get(locale)),
        escape_html(&article.image),
    );
    for paragraph in article.content.get(locale) {
        let _ = writeln!(body, "<p>{}</p>", escape_html(paragraph));
    }
    body.push_str("</article>\n");
    body.push_str(&button(&ctx.href("/news"), tr.t("common.backToNews")));

    let page = Page {
        title: article.title.get(locale).clone(),
        description: article.excerpt.get(locale).clone(),
        body,
    };
    html_response(StatusCode::OK, ctx.render(&page))
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// What the contact page shows above the form.
enum FormOutcome {
    Blank,
    Sent(Uuid),
    Invalid(Vec<FieldError>),
}

pub async fn contact_form(
    req: HttpRequest,
    locale: ResolvedLocale,
    query: web::Query<ContactQuery>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    let form = ContactForm::prefilled(query.purpose.as_deref(), query.model.as_deref());
    contact_page(&ctx, &data, &form, FormOutcome::Blank)
}

pub async fn contact_submit(
    req: HttpRequest,
    locale: ResolvedLocale,
    form: web::Form<ContactForm>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let ctx = context(&req, &data, locale);
    match contact::validate(&form, &data.content) {
        Ok(request) => {
            let reference = contact::submit(&request);
            contact_page(&ctx, &data, &ContactForm::default(), FormOutcome::Sent(reference))
        }
        Err(errors) => contact_page(&ctx, &data, &form, FormOutcome::Invalid(errors)),
    }
}

fn contact_page(ctx: &PageContext, data: &AppState, form: &ContactForm, outcome: FormOutcome) -> HttpResponse {
    let tr = ctx.tr;
    let mut body = String::new();

    let (status, errors) = match outcome {
        FormOutcome::Blank => (StatusCode::OK, Vec::new()),
        FormOutcome::Sent(reference) => {
            let _ = writeln!(
                body,
                "<div class=\"notice success\" role=\"status\"><p>{}</p><p>{}: {}</p></div>",
                escape_html(tr.t("contact.success")),
                escape_html(tr.t("contact.reference")),
                reference
            );
            (StatusCode::OK, Vec::new())
        }
        FormOutcome::Invalid(errors) => {
            let _ = writeln!(
                body,
                "<div class=\"notice error\" role=\"alert\"><p>{}</p></div>",
                escape_html(tr.t("contact.invalid"))
            );
            (StatusCode::UNPROCESSABLE_ENTITY, errors)
        }
    };
    let field_error = |field: &str| -> String {
        errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| format!("<p class=\"field-error\">{}</p>\n", escape_html(tr.t(e.key))))
            .unwrap_or_default()
    };
    let input = |field: &str, kind: &str, value: &str| -> String {
        format!(
            "<label for=\"{field}\">{} *</label>\n<input id=\"{field}\" name=\"{field}\" type=\"{kind}\" value=\"{}\" required>\n{}",
            escape_html(tr.t(&format!("contact.{}", field))),
            escape_html(value),
            field_error(field),
        )
    };

    let _ = writeln!(body, "<form method=\"post\" action=\"{}\" class=\"contact-form\">", ctx.href("/contact"));
    body.push_str(&input("name", "text", &form.name));
    body.push_str(&input("email", "email", &form.email));
    body.push_str(&input("phone", "tel", &form.phone));

    let _ = write!(
        body,
        "<label for=\"city\">{} *</label>\n<select id=\"city\" name=\"city\" required>\n<option value=\"\">{}</option>\n",
        escape_html(tr.t("contact.city")),
        escape_html(tr.t("common.selectCity"))
    );
    for city in TUNISIAN_CITIES {
        let selected = if form.city == *city { " selected" } else { "" };
        let _ = writeln!(body, "<option value=\"{0}\"{1}>{0}</option>", escape_html(city), selected);
    }
    body.push_str("</select>\n");
    body.push_str(&field_error("city"));

    let _ = write!(
        body,
        "<label for=\"purpose\">{} *</label>\n<select id=\"purpose\" name=\"purpose\" required>\n<option value=\"\">{}</option>\n",
        escape_html(tr.t("contact.purpose")),
        escape_html(tr.t("common.selectPurpose"))
    );
    for purpose in Purpose::ALL {
        let selected = if form.purpose == purpose.as_str() { " selected" } else { "" };
        let _ = writeln!(
            body,
            "<option value=\"{}\"{}>{}</option>",
            purpose.as_str(),
            selected,
            escape_html(tr.t(purpose.label_key()))
        );
    }
    body.push_str("</select>\n");
    body.push_str(&field_error("purpose"));

    let _ = write!(
        body,
        "<label for=\"model\">{}</label>\n<select id=\"model\" name=\"model\">\n<option value=\"\">{}</option>\n",
        escape_html(tr.t("contact.model")),
        escape_html(tr.t("common.selectModel"))
    );
    for model in &data.content.models {
        let selected = if form.model == model.slug { " selected" } else { "" };
        let _ = writeln!(
            body,
            "<option value=\"{}\"{}>{}</option>",
            escape_html(&model.slug),
            selected,
            escape_html(&model.name)
        );
    }
    body.push_str("</select>\n");
    body.push_str(&field_error("model"));

    let _ = write!(
        body,
        "<label for=\"message\">{} *</label>\n<textarea id=\"message\" name=\"message\" maxlength=\"{}\" required>{}</textarea>\n{}",
        escape_html(tr.t("contact.message")),
        contact::MAX_MESSAGE_CHARS,
        escape_html(&form.message),
        field_error("message"),
    );
    let _ = write!(
        body,
        "<p class=\"hint\">* {}</p>\n<button type=\"submit\">{}</button>\n</form>\n",
        escape_html(tr.t("common.required")),
        escape_html(tr.t("common.send"))
    );

    let _ = write!(
        body,
        "<aside class=\"contact-info\">\n<h2>{}</h2>\n<p>{}</p>\n<p>{}</p>\n</aside>\n",
        escape_html(tr.t("contact.info.title")),
        escape_html(tr.t("contact.info.address")),
        escape_html(tr.t("contact.info.hours")),
    );

    let page = titled_page(ctx, "contact", body);
    html_response(status, ctx.render(&page))
}

// ---------------------------------------------------------------------------
// Not found
// ---------------------------------------------------------------------------

fn not_found_page(ctx: &PageContext) -> HttpResponse {
    let tr = ctx.tr;
    let title = tr.t("common.notFound").to_string();
    let description = tr.t("common.notFoundText").to_string();
    let body = hero(&title, &description) + &button(&ctx.href("/"), tr.t("common.home"));
    let page = Page {
        title,
        description,
        body,
    };
    html_response(StatusCode::NOT_FOUND, ctx.render(&page))
}

/// Default service: a JSON error under `/api`, the localized 404 page
/// everywhere else.
pub async fn not_found(req: HttpRequest, locale: ResolvedLocale, data: web::Data<AppState>) -> HttpResponse {
    if req.path() == "/api" || req.path().starts_with("/api/") {
        return HttpResponse::NotFound().json(ErrorResponse {
            error: format!("No route for {} {}", req.method(), req.path()),
        });
    }
    let ctx = context(&req, &data, locale);
    not_found_page(&ctx)
}

/// A route answering `GET` and `HEAD`.
fn read() -> Route {
    web::route().guard(guard::Any(guard::Get()).or(guard::Head()))
}

/// Configures the localized page routes under `/{locale}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/{locale}")
            .route("", read().to(home))
            .route("/", read().to(home))
            .route("/models", read().to(models))
            .route("/models/{slug}", read().to(model_detail))
            .route("/offers", read().to(offers))
            .route("/charging", read().to(charging))
            .route("/about", read().to(about))
            .route("/news", read().to(news))
            .route("/news/{slug}", read().to(news_article))
            .route("/contact", read().to(contact_form))
            .route("/contact", web::post().to(contact_submit)),
    );
}
