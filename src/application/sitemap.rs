//! Sitemap service for sitemap.xml and robots.txt generation.
//!
//! This service encapsulates the business logic for generating sitemap and
//! robots.txt, keeping the HTTP layer focused on request/response handling.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{JobsRepo, RepoError, SiteRepo};

/// Service for generating sitemap.xml and robots.txt.
#[derive(Clone)]
pub struct SitemapService {
    jobs: Arc<dyn JobsRepo>,
    site: Arc<dyn SiteRepo>,
}

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("failed to load site content: {0}")]
    Site(String),
    #[error("failed to list postings: {0}")]
    Postings(String),
}

impl From<RepoError> for SitemapError {
    fn from(err: RepoError) -> Self {
        SitemapError::Postings(err.to_string())
    }
}

impl SitemapService {
    pub fn new(jobs: Arc<dyn JobsRepo>, site: Arc<dyn SiteRepo>) -> Self {
        Self { jobs, site }
    }

    /// Generate sitemap.xml content: the careers home plus every posting.
    pub async fn sitemap_xml(&self) -> Result<String, SitemapError> {
        let site = self
            .site
            .load_site()
            .await
            .map_err(|err| SitemapError::Site(err.to_string()))?;

        let base = site.public_base_url.trim_end_matches('/');
        let mut entries = Vec::new();
        entries.push(sitemap_entry(base, "/careers"));

        for posting in self.jobs.list_postings().await? {
            entries.push(sitemap_entry(base, &format!("/careers/{}", posting.slug)));
        }

        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
        );
        for entry in entries {
            xml.push_str(&entry);
        }
        xml.push_str("</urlset>\n");
        Ok(xml)
    }

    /// Generate robots.txt content.
    pub async fn robots_txt(&self) -> Result<String, SitemapError> {
        let site = self
            .site
            .load_site()
            .await
            .map_err(|err| SitemapError::Site(err.to_string()))?;

        let base = site.public_base_url.trim_end_matches('/');
        let body = format!("User-agent: *\nAllow: /\nSitemap: {base}/sitemap.xml\n");
        Ok(body)
    }
}

fn sitemap_entry(base: &str, path: &str) -> String {
    format!("  <url><loc>{base}{path}</loc></url>\n")
}
