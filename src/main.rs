//! # JMEV Site: localized website for JMEV Tunisia
//!
//! Serves the JMEV Tunisia electric vehicle website in French, Arabic and
//! English, plus a small JSON API over the same content.
//!
//! ## Features
//!
//! - **Locale routing**: every page lives under `/fr`, `/ar` or `/en`.
//!   Requests without a prefix are redirected, choosing the locale from
//!   the `Accept-Language` header or falling back to French.
//!
//! - **Translation catalogs**: nested JSON catalogs per locale, compiled
//!   into the binary or read from a directory. A missing key renders as
//!   the key itself.
//!
//! - **Pages**: home, model catalog and detail sheets, offers and
//!   financing, charging, about, news and a contact form.
//!
//! - **REST API**: models, news, translation lookup and locale resolution
//!   as JSON, documented at `/swagger-ui/`.
//!
//! ## Usage
//!
//! ```bash
//! # Start the server (default: http://0.0.0.0:8080)
//! jmev-site serve
//!
//! # Validate catalogs and key parity
//! jmev-site check --messages-dir messages
//!
//! # Translate a key, or see how a path would be routed
//! jmev-site lookup models.range --locale ar
//! jmev-site resolve /models --accept-language "en-US,en;q=0.9"
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path                   | Description                      |
//! |--------|------------------------|----------------------------------|
//! | GET    | `/api/models`          | List models                      |
//! | GET    | `/api/models/{slug}`   | Model details                    |
//! | GET    | `/api/news`            | List news articles               |
//! | GET    | `/api/news/{slug}`     | Article                          |
//! | GET    | `/api/translate`       | Translation lookup               |
//! | GET    | `/api/locale`          | Locale resolution for a path     |
//! | POST   | `/api/contact`         | Contact request                  |
//! | GET    | `/swagger-ui/`         | Swagger UI documentation         |

pub mod api;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod content;
pub mod i18n;
pub mod pages;
pub mod render;
pub mod routing;
pub mod types;

use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, middleware, web};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{ApiDoc, AppState};
use crate::catalog::{CatalogSource, Catalogs};
use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::i18n::{LocaleSet, detect_system_locale};
use crate::routing::{locale_routing, redirect_target, resolve_locale};

/// JMEV Site: localized website server for JMEV Tunisia.
///
/// Serves the French, Arabic and English site with a JSON API and
/// Swagger documentation, and offers catalog maintenance commands.
#[derive(Parser, Debug)]
#[command(name = "jmev-site")]
#[command(about = "Localized website server for JMEV Tunisia (fr / ar / en)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,

        /// Host address to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Read catalogs from this directory instead of the bundled ones.
        #[arg(long)]
        messages_dir: Option<PathBuf>,

        /// Directory holding `images/` and `static/`.
        #[arg(long, default_value = "public")]
        public_dir: PathBuf,

        /// Public origin for canonical links (default: $JMEV_BASE_URL).
        #[arg(long)]
        base_url: Option<String>,

        /// Refuse to start if any catalog is missing, malformed or empty.
        #[arg(long)]
        strict: bool,
    },

    /// Check translation catalogs for load issues and missing keys.
    Check {
        /// Catalog directory (default: the bundled catalogs).
        #[arg(long)]
        messages_dir: Option<PathBuf>,
    },

    /// Print the translation of a dotted key.
    Lookup {
        /// Dotted key, e.g. `models.range`.
        key: String,

        /// Locale code (default: $JMEV_LANG, then the system locale).
        #[arg(short, long)]
        locale: Option<String>,

        /// Catalog directory (default: the bundled catalogs).
        #[arg(long)]
        messages_dir: Option<PathBuf>,
    },

    /// Show how a request path would be routed.
    Resolve {
        /// Request path, e.g. `/models`.
        path: String,

        /// Value of the `Accept-Language` header.
        #[arg(short, long)]
        accept_language: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            messages_dir,
            public_dir,
            base_url,
            strict,
        } => {
            let config = SiteConfig::new(host, port, messages_dir, public_dir, base_url, strict);
            run_server(config).await
        }
        Commands::Check { messages_dir } => run_check(&catalog_source(messages_dir)),
        Commands::Lookup {
            key,
            locale,
            messages_dir,
        } => {
            let catalogs = Catalogs::load(&catalog_source(messages_dir), &LocaleSet::site());
            catalogs.log_issues();
            let code = locale.unwrap_or_else(|| detect_system_locale().code().to_string());
            println!("{}", catalogs.t_code(&code, &key));
            Ok(())
        }
        Commands::Resolve {
            path,
            accept_language,
        } => {
            let (path, query) = path.split_once('?').unwrap_or((path.as_str(), ""));
            let resolution = resolve_locale(path, accept_language.as_deref(), &LocaleSet::site());
            println!("{} {}", "Locale:".bold(), resolution.locale.code().cyan());
            if resolution.needs_redirect {
                println!(
                    "{} {}",
                    "Redirect:".bold(),
                    redirect_target(resolution.locale, path, query).yellow()
                );
            } else {
                println!("{} {}", "Redirect:".bold(), "none".green());
            }
            Ok(())
        }
    }
}

fn catalog_source(messages_dir: Option<PathBuf>) -> CatalogSource {
    match messages_dir {
        Some(dir) => CatalogSource::Directory(dir),
        None => CatalogSource::Bundled,
    }
}

/// Loads every catalog, prints issues and key parity, and fails if
/// anything needs fixing.
fn run_check(source: &CatalogSource) -> std::io::Result<()> {
    let catalogs = Catalogs::load(source, &LocaleSet::site());
    println!("{} {}", "Checking catalogs from".bold(), source.to_string().cyan());

    for issue in catalogs.issues() {
        if issue.is_error() {
            println!("  {} {}", "error:".red().bold(), issue);
        } else {
            println!("  {} {}", "warning:".yellow().bold(), issue);
        }
    }

    let default = catalogs.locales().default_locale();
    let mut gaps = 0;
    for parity in catalogs.key_parity() {
        if parity.is_clean() {
            println!("  {} {} matches {}", "ok".green().bold(), parity.locale, default);
            continue;
        }
        for key in &parity.missing {
            println!("  {} {} lacks {}", "missing".red(), parity.locale, key);
        }
        for key in &parity.extra {
            println!("  {} {} has {} (not in {})", "extra".yellow(), parity.locale, key, default);
        }
        gaps += parity.missing.len() + parity.extra.len();
    }

    let issues = catalogs.issues().len();
    if issues == 0 && gaps == 0 {
        println!("{}", "All catalogs are complete.".green().bold());
        Ok(())
    } else {
        Err(std::io::Error::other(format!(
            "{} catalog issue(s), {} key parity gap(s)",
            issues, gaps
        )))
    }
}

/// Starts the HTTP server with locale routing, pages, the API and Swagger UI.
async fn run_server(config: SiteConfig) -> std::io::Result<()> {
    let openapi = ApiDoc::openapi();
    let locales = LocaleSet::site();

    let catalogs = Catalogs::load(&config.catalog_source(), &locales);
    catalogs.log_issues();
    if config.strict && !catalogs.issues().is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "refusing to start: {} translation catalog issue(s)",
                catalogs.issues().len()
            ),
        ));
    }

    let content = SiteContent::load_bundled()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let state = web::Data::new(AppState::new(catalogs, content, &config.base_url));
    let locales = web::Data::new(locales);
    let (host, port) = config.bind_address();
    let public_dir = config.public_dir.clone();

    log::info!("Starting JMEV site on {}:{}", host, port);
    log::info!("Translation catalogs: {}", config.catalog_source());
    log::info!("Public directory: {}", public_dir.display());
    log::info!("Canonical base URL: {}", config.base_url);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(locale_routing))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(locales.clone())
            .configure(api::configure_routes)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .service(actix_files::Files::new("/images", public_dir.join("images")))
            .service(actix_files::Files::new("/static", public_dir.join("static")))
            .configure(pages::configure_routes)
            .default_service(web::to(pages::not_found))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
