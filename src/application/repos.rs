//! Repository traits describing the resolved-content source.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::jobs::{JobPosting, JobPostingSummary};
use crate::domain::site::SiteContent;
use crate::domain::teams::Team;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("content source error: {0}")]
    Source(String),
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl RepoError {
    pub fn from_source(err: impl std::fmt::Display) -> Self {
        Self::Source(err.to_string())
    }
}

/// Read access to published job postings.
#[async_trait]
pub trait JobsRepo: Send + Sync {
    /// Look up one posting by its full slug path.
    async fn find_posting(&self, slug: &str) -> Result<Option<JobPosting>, RepoError>;

    /// Every published posting, in archive order.
    async fn list_postings(&self) -> Result<Vec<JobPostingSummary>, RepoError>;
}

/// Read access to hiring teams.
#[async_trait]
pub trait TeamsRepo: Send + Sync {
    async fn find_team(&self, name: &str) -> Result<Option<Team>, RepoError>;
}

/// Read access to site-wide hiring content.
#[async_trait]
pub trait SiteRepo: Send + Sync {
    async fn load_site(&self) -> Result<SiteContent, RepoError>;
}
