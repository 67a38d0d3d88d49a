use std::sync::Arc;

use crate::application::repos::{JobsRepo, RepoError};
use crate::presentation::views::{CareersIndexContext, RoleCardView};

/// Assembles the careers index: every open role, in archive order.
#[derive(Clone)]
pub struct CareersService {
    jobs: Arc<dyn JobsRepo>,
}

impl CareersService {
    pub fn new(jobs: Arc<dyn JobsRepo>) -> Self {
        Self { jobs }
    }

    pub async fn index_context(&self) -> Result<CareersIndexContext, RepoError> {
        let postings = self.jobs.list_postings().await?;

        let roles: Vec<RoleCardView> = postings
            .into_iter()
            .map(|posting| RoleCardView {
                href: format!("/careers/{}", posting.slug),
                title: posting.title,
                department: posting.department_name,
                location: posting.location_name,
            })
            .collect();

        let role_count = roles.len();
        Ok(CareersIndexContext { roles, role_count })
    }
}
