use std::sync::Arc;

use axum::http::StatusCode;

use crate::application::error::HttpError;
use crate::application::repos::{JobsRepo, RepoError, SiteRepo};
use crate::presentation::views::{
    BrandView, FooterView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
};

const SOURCE: &str = "application::chrome::ChromeService";

/// Assembles the layout chrome shared by every page: brand, navigation
/// (including the "Open roles" submenu), footer, and default page metadata.
#[derive(Clone)]
pub struct ChromeService {
    site: Arc<dyn SiteRepo>,
    jobs: Arc<dyn JobsRepo>,
}

impl ChromeService {
    pub fn new(site: Arc<dyn SiteRepo>, jobs: Arc<dyn JobsRepo>) -> Self {
        Self { site, jobs }
    }

    pub async fn load(&self) -> Result<LayoutChrome, HttpError> {
        let site = self
            .site
            .load_site()
            .await
            .map_err(|err| repo_failure("load_site", err))?;

        let postings = self
            .jobs
            .list_postings()
            .await
            .map_err(|err| repo_failure("list_postings", err))?;

        let open_roles = postings
            .into_iter()
            .map(|posting| {
                NavigationLinkView::link(posting.title, format!("/careers/{}", posting.slug))
            })
            .collect();

        let entries = vec![
            NavigationLinkView::heading(format!("Work at {}", site.company_name)),
            NavigationLinkView::link("Careers home", "/careers"),
            NavigationLinkView::link("About us", site.about_url.clone()),
            NavigationLinkView::submenu("Open roles", open_roles),
        ];

        let chrome = LayoutChrome {
            brand: BrandView {
                title: site.company_name.clone(),
                href: "/careers".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: site.footer_copy.clone(),
            },
            meta: PageMetaView {
                title: format!("Careers - {}", site.company_name),
                description: format!("Open roles at {}", site.company_name),
                og_image: None,
                canonical: site.public_base_url.clone(),
            },
        };

        Ok(chrome)
    }
}

fn repo_failure(operation: &'static str, err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to load site chrome",
        format!("{operation} failed: {err}"),
    )
}
