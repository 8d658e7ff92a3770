//! HTTP routes.
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /` | search form, or `303` to the company page for `?searchBox=` |
//! | `GET /companies/{ticker}` | company page |
//! | `/public/*` | static files |
//!
//! Unknown paths answer `404`, other methods on known routes `405` and
//! undecodable query strings `400`, all through the error template.

use std::path::Path;

use actix_files::Files;
use actix_web::error::{InternalError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{debug, error};

use cfd_core::Ticker;

use crate::controller::CompanyPages;
use crate::views::Views;

/// Shared application state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Company page pipeline.
    pub pages: CompanyPages,
    /// Compiled templates.
    pub views: Views,
}

impl AppState {
    /// Bundle the controller with the templates.
    #[must_use]
    pub const fn new(pages: CompanyPages, views: Views) -> Self {
        Self { pages, views }
    }
}

/// Query string of the search form.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Ticker typed into the search box.
    #[serde(rename = "searchBox")]
    pub search_box: Option<String>,
}

/// Register the routes, the static file service under `/public`, the `404`
/// fallback and the `400` page for bad query strings.
///
/// Expects a `web::Data<AppState>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig, public_dir: &Path) {
    cfg.app_data(web::QueryConfig::default().error_handler(bad_query))
        .service(
            web::resource("/")
                .route(web::get().to(index))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/companies/{ticker}")
                .route(web::get().to(company))
                .default_service(web::to(method_not_allowed)),
        )
        .service(Files::new("/public", public_dir))
        .default_service(web::to(not_found));
}

async fn index(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> HttpResponse {
    let search = query
        .search_box
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match search {
        Some(search) => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, format!("/companies/{}", Ticker::new(search))))
            .finish(),
        None => html(StatusCode::OK, state.views.index()),
    }
}

async fn company(state: web::Data<AppState>, ticker: web::Path<String>) -> HttpResponse {
    match state.pages.company_page(&ticker).await {
        Ok(page) => html(StatusCode::OK, state.views.company(&page)),
        Err(e) => error_page(&state.views, e.status_code(), &e.public_message()),
    }
}

async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    error_page(&state.views, StatusCode::NOT_FOUND, "Page not found.")
}

async fn method_not_allowed(state: web::Data<AppState>) -> HttpResponse {
    error_page(
        &state.views,
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed.",
    )
}

fn bad_query(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, query = req.query_string(), "Rejected query string");
    let response = match req.app_data::<web::Data<AppState>>() {
        Some(state) => error_page(&state.views, StatusCode::BAD_REQUEST, "Bad request."),
        None => HttpResponse::BadRequest().finish(),
    };
    InternalError::from_response(err, response).into()
}

fn error_page(views: &Views, status: StatusCode, message: &str) -> HttpResponse {
    html(status, views.error(status, message))
}

fn html(status: StatusCode, rendered: tera::Result<String>) -> HttpResponse {
    match rendered {
        Ok(body) => HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(body),
        Err(e) => {
            error!(error = ?e, "Failed to render template");
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body("Internal Server Error")
        }
    }
}
