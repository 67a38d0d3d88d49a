use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use metrics::counter;

use crate::{
    application::{
        careers::CareersService,
        chrome::ChromeService,
        error::{HttpError, repo_error_to_http},
        job_page::JobPageService,
        sitemap::{SitemapError, SitemapService},
    },
    presentation::views::{
        CareersTemplate, JobTemplate, LayoutContext, render_not_found_response,
        render_template_response,
    },
};

use super::middleware::{log_responses, set_request_context};

#[derive(Clone)]
pub struct HttpState {
    pub chrome: Arc<ChromeService>,
    pub careers: Arc<CareersService>,
    pub job_page: Arc<JobPageService>,
    pub sitemap: Arc<SitemapService>,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/careers", get(careers_index))
        .route("/careers/{*slug}", get(job_detail))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots_txt))
        .route("/_health", get(health))
        .fallback(fallback_router)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn root() -> Redirect {
    Redirect::permanent("/careers")
}

async fn health() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn careers_index(State(state): State<HttpState>) -> Response {
    let chrome = match state.chrome.load().await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.careers.index_context().await {
        Ok(content) => {
            counter!("mestiere_careers_index_render_total").increment(1);
            let canonical = canonical_url(&chrome.meta.canonical, "/careers");
            let view = LayoutContext::new(chrome.with_canonical(canonical), content);
            render_template_response(CareersTemplate { view }, StatusCode::OK)
        }
        Err(err) => {
            repo_error_to_http("infra::http::public::careers_index", err).into_response()
        }
    }
}

async fn job_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    let chrome = match state.chrome.load().await {
        Ok(chrome) => chrome,
        Err(err) => return err.into_response(),
    };

    match state.job_page.page_bundle(&slug).await {
        Ok(Some(bundle)) => {
            counter!("mestiere_job_page_render_total").increment(1);
            let canonical = canonical_url(&chrome.meta.canonical, &bundle.path);
            let chrome = chrome
                .with_page(bundle.seo_title, Some(bundle.og_image))
                .with_canonical(canonical);
            let view = LayoutContext::new(chrome, bundle.content);
            render_template_response(JobTemplate { view }, StatusCode::OK)
        }
        Ok(None) => {
            counter!("mestiere_page_not_found_total").increment(1);
            render_not_found_response(chrome)
        }
        Err(err) => HttpError::from(err).into_response(),
    }
}

async fn sitemap(State(state): State<HttpState>) -> Response {
    match state.sitemap.sitemap_xml().await {
        Ok(xml) => ([(CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(err) => sitemap_error_to_response(err),
    }
}

async fn robots_txt(State(state): State<HttpState>) -> Response {
    match state.sitemap.robots_txt().await {
        Ok(body) => ([(CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response(),
        Err(err) => sitemap_error_to_response(err),
    }
}

fn sitemap_error_to_response(err: SitemapError) -> Response {
    HttpError::from_error(
        "infra::http::public::sitemap",
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to generate sitemap",
        &err,
    )
    .into_response()
}

async fn fallback_router(State(state): State<HttpState>) -> Response {
    match state.chrome.load().await {
        Ok(chrome) => {
            counter!("mestiere_page_not_found_total").increment(1);
            render_not_found_response(chrome)
        }
        Err(err) => err.into_response(),
    }
}

fn canonical_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
