//! Site-wide hiring content shared by every page.

use crate::domain::compensation::BenchmarkTable;

/// Content that applies to the careers site as a whole, as opposed to a
/// single posting or team.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteContent {
    pub company_name: String,
    /// Absolute origin used for canonical URLs, no trailing slash.
    pub public_base_url: String,
    /// Destination of the "About us" navigation entry.
    pub about_url: String,
    pub footer_copy: String,
    pub benefits: Vec<Benefit>,
    pub interview_stages: Vec<InterviewStage>,
    pub benchmarks: BenchmarkTable,
}

/// One entry of the company-wide benefits catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Benefit {
    pub title: String,
    /// Path of the illustration asset.
    pub image: String,
}

/// One stage of the interview process, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewStage {
    pub title: String,
    pub description: String,
}
