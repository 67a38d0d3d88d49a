//! Archive-backed content store.
//!
//! The upstream hiring pipeline resolves postings, teams, and site content
//! into a single TOML archive. The store parses and validates the archive at
//! startup, sanitizes every HTML body once, and then serves read-only
//! lookups from the in-memory snapshot.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::application::repos::{JobsRepo, RepoError, SiteRepo, TeamsRepo};
use crate::application::richtext::sanitize_document;
use crate::domain::compensation::{BenchmarkEntry, BenchmarkTable};
use crate::domain::jobs::{
    ApplicationForm, CustomField, FormField, FormFieldType, FormSection, JobPosting,
    JobPostingSummary, TocEntry,
};
use crate::domain::site::{Benefit, InterviewStage, SiteContent};
use crate::domain::slug::derive_slug;
use crate::domain::teams::{ContentDocument, IssueLabel, IssueReference, Team, TeamMember};
use crate::infra::error::InfraError;

/// In-memory snapshot of the content archive.
#[derive(Debug)]
pub struct ContentStore {
    site: SiteContent,
    postings: Vec<JobPosting>,
    postings_by_slug: HashMap<String, usize>,
    teams: HashMap<String, Team>,
}

impl ContentStore {
    /// Read and validate the archive at `path`.
    pub async fn load(path: &Path) -> Result<Self, InfraError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::parse(&raw)
    }

    /// Parse and validate archive text.
    pub fn parse(raw: &str) -> Result<Self, InfraError> {
        let archive: ContentArchive = toml::from_str(raw)
            .map_err(|err| InfraError::content(format!("invalid archive: {err}")))?;
        Self::from_archive(archive)
    }

    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    fn from_archive(archive: ContentArchive) -> Result<Self, InfraError> {
        let site = build_site(archive.site)?;

        let mut teams = HashMap::with_capacity(archive.teams.len());
        for raw_team in archive.teams {
            let team = build_team(raw_team)?;
            if teams.contains_key(&team.name) {
                return Err(InfraError::content(format!(
                    "duplicate team `{}`",
                    team.name
                )));
            }
            teams.insert(team.name.clone(), team);
        }

        let mut postings = Vec::with_capacity(archive.postings.len());
        let mut postings_by_slug = HashMap::with_capacity(archive.postings.len());
        for raw_posting in archive.postings {
            let posting = build_posting(raw_posting)?;
            if !teams.contains_key(&posting.team_name) {
                warn!(
                    target = "mestiere::content",
                    posting = %posting.slug,
                    team = %posting.team_name,
                    "posting references a team the archive does not define",
                );
            }
            if postings_by_slug
                .insert(posting.slug.clone(), postings.len())
                .is_some()
            {
                return Err(InfraError::content(format!(
                    "duplicate posting slug `{}`",
                    posting.slug
                )));
            }
            postings.push(posting);
        }

        Ok(Self {
            site,
            postings,
            postings_by_slug,
            teams,
        })
    }
}

#[async_trait]
impl JobsRepo for ContentStore {
    async fn find_posting(&self, slug: &str) -> Result<Option<JobPosting>, RepoError> {
        Ok(self
            .postings_by_slug
            .get(slug)
            .map(|index| self.postings[*index].clone()))
    }

    async fn list_postings(&self) -> Result<Vec<JobPostingSummary>, RepoError> {
        Ok(self
            .postings
            .iter()
            .map(|posting| JobPostingSummary {
                title: posting.title.clone(),
                slug: posting.slug.clone(),
                department_name: posting.department_name.clone(),
                location_name: posting.location_name.clone(),
            })
            .collect())
    }
}

#[async_trait]
impl TeamsRepo for ContentStore {
    async fn find_team(&self, name: &str) -> Result<Option<Team>, RepoError> {
        Ok(self.teams.get(name).cloned())
    }
}

#[async_trait]
impl SiteRepo for ContentStore {
    async fn load_site(&self) -> Result<SiteContent, RepoError> {
        Ok(self.site.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ContentArchive {
    site: RawSite,
    #[serde(default)]
    teams: Vec<RawTeam>,
    #[serde(default)]
    postings: Vec<RawPosting>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    company_name: String,
    public_base_url: String,
    #[serde(default = "default_about_url")]
    about_url: String,
    #[serde(default)]
    footer_copy: Option<String>,
    #[serde(default)]
    benefits: Vec<RawBenefit>,
    #[serde(default)]
    interview_stages: Vec<RawInterviewStage>,
    #[serde(default)]
    benchmarks: HashMap<String, u64>,
}

fn default_about_url() -> String {
    "/about".to_string()
}

#[derive(Debug, Deserialize)]
struct RawBenefit {
    title: String,
    image: String,
}

#[derive(Debug, Deserialize)]
struct RawInterviewStage {
    title: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    mission_html: Option<String>,
    #[serde(default)]
    objectives_html: Option<String>,
    #[serde(default)]
    members: Vec<RawTeamMember>,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
struct RawTeamMember {
    name: String,
    country: String,
    job_title: String,
    headshot: String,
    #[serde(default)]
    team_lead: bool,
    #[serde(default)]
    pineapple_on_pizza: bool,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
    title: String,
    url: String,
    #[serde(default)]
    labels: Vec<RawIssueLabel>,
}

#[derive(Debug, Deserialize)]
struct RawIssueLabel {
    name: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawPosting {
    id: String,
    title: String,
    slug: String,
    department_name: String,
    location_name: String,
    team: String,
    body_html: String,
    #[serde(default)]
    toc: Vec<RawTocEntry>,
    #[serde(default)]
    custom_fields: Vec<RawCustomField>,
    #[serde(default)]
    form: RawApplicationForm,
}

#[derive(Debug, Deserialize)]
struct RawTocEntry {
    label: String,
    anchor: String,
    #[serde(default)]
    depth: u8,
}

#[derive(Debug, Deserialize)]
struct RawCustomField {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize, Default)]
struct RawApplicationForm {
    #[serde(default)]
    sections: Vec<RawFormSection>,
}

#[derive(Debug, Deserialize)]
struct RawFormSection {
    fields: Vec<RawFormField>,
}

#[derive(Debug, Deserialize)]
struct RawFormField {
    #[serde(rename = "type")]
    field_type: FormFieldType,
    title: String,
    #[serde(default)]
    nullable: bool,
    path: String,
}

fn build_site(raw: RawSite) -> Result<SiteContent, InfraError> {
    if raw.company_name.trim().is_empty() {
        return Err(InfraError::content("site.company_name must not be empty"));
    }

    let public_base_url = raw.public_base_url.trim_end_matches('/').to_string();
    Url::parse(&public_base_url).map_err(|err| {
        InfraError::content(format!(
            "site.public_base_url `{public_base_url}` is not a valid URL: {err}"
        ))
    })?;

    let footer_copy = raw
        .footer_copy
        .unwrap_or_else(|| raw.company_name.clone());

    let benchmarks = BenchmarkTable::new(
        raw.benchmarks
            .into_iter()
            .map(|(title, location_base)| (title, BenchmarkEntry { location_base }))
            .collect(),
    );

    Ok(SiteContent {
        company_name: raw.company_name,
        public_base_url,
        about_url: raw.about_url,
        footer_copy,
        benefits: raw
            .benefits
            .into_iter()
            .map(|benefit| Benefit {
                title: benefit.title,
                image: benefit.image,
            })
            .collect(),
        interview_stages: raw
            .interview_stages
            .into_iter()
            .map(|stage| InterviewStage {
                title: stage.title,
                description: stage.description,
            })
            .collect(),
        benchmarks,
    })
}

fn build_team(raw: RawTeam) -> Result<Team, InfraError> {
    if raw.name.trim().is_empty() {
        return Err(InfraError::content("team name must not be empty"));
    }

    let slug = match raw.slug {
        Some(slug) => slug,
        None => derive_slug(&raw.name).map_err(|err| {
            InfraError::content(format!("team `{}` has no usable slug: {err}", raw.name))
        })?,
    };

    let mut members = Vec::with_capacity(raw.members.len());
    let mut lead = None;
    for raw_member in raw.members {
        let member = TeamMember {
            name: raw_member.name,
            country: raw_member.country,
            job_title: raw_member.job_title,
            headshot: raw_member.headshot,
            pineapple_on_pizza: raw_member.pineapple_on_pizza,
        };
        if raw_member.team_lead {
            if lead.is_some() {
                return Err(InfraError::content(format!(
                    "team `{}` declares more than one lead",
                    raw.name
                )));
            }
            lead = Some(member.clone());
        }
        members.push(member);
    }

    let mut issues = Vec::with_capacity(raw.issues.len());
    for raw_issue in raw.issues {
        issues.push(build_issue(&raw.name, raw_issue)?);
    }

    Ok(Team {
        slug,
        members,
        lead,
        mission: raw.mission_html.map(sanitized_document),
        objectives: raw.objectives_html.map(sanitized_document),
        issues,
        name: raw.name,
    })
}

fn build_issue(team: &str, raw: RawIssue) -> Result<IssueReference, InfraError> {
    Url::parse(&raw.url).map_err(|err| {
        InfraError::content(format!(
            "team `{team}` issue #{}: invalid url `{}`: {err}",
            raw.number, raw.url
        ))
    })?;

    let mut labels = Vec::with_capacity(raw.labels.len());
    for label in raw.labels {
        Url::parse(&label.url).map_err(|err| {
            InfraError::content(format!(
                "team `{team}` issue #{} label `{}`: invalid url: {err}",
                raw.number, label.name
            ))
        })?;
        labels.push(IssueLabel {
            name: label.name,
            url: label.url,
        });
    }

    Ok(IssueReference {
        number: raw.number,
        title: raw.title,
        url: raw.url,
        labels,
    })
}

fn build_posting(raw: RawPosting) -> Result<JobPosting, InfraError> {
    if raw.id.trim().is_empty() {
        return Err(InfraError::content(format!(
            "posting `{}` has an empty id",
            raw.slug
        )));
    }
    if raw.title.trim().is_empty() {
        return Err(InfraError::content(format!(
            "posting `{}` has an empty title",
            raw.slug
        )));
    }
    let slug = raw.slug.trim_matches('/').to_string();
    if slug.is_empty() {
        return Err(InfraError::content(format!(
            "posting `{}` has an empty slug",
            raw.title
        )));
    }

    let toc = raw
        .toc
        .into_iter()
        .filter(|entry| {
            let keep = !entry.label.is_empty() && !entry.anchor.is_empty();
            if !keep {
                warn!(
                    target = "mestiere::content",
                    posting = %slug,
                    "dropping table-of-contents entry with an empty label or anchor",
                );
            }
            keep
        })
        .map(|entry| TocEntry {
            label: entry.label,
            anchor: entry.anchor,
            depth: entry.depth,
        })
        .collect();

    Ok(JobPosting {
        id: raw.id,
        title: raw.title,
        slug,
        department_name: raw.department_name,
        location_name: raw.location_name,
        team_name: raw.team,
        body_html: sanitize_document(&raw.body_html),
        toc,
        custom_fields: raw
            .custom_fields
            .into_iter()
            .map(|field| CustomField {
                name: field.name,
                value: field.value,
            })
            .collect(),
        application_form: ApplicationForm {
            sections: raw
                .form
                .sections
                .into_iter()
                .map(|section| FormSection {
                    fields: section
                        .fields
                        .into_iter()
                        .map(|field| FormField {
                            field_type: field.field_type,
                            title: field.title,
                            nullable: field.nullable,
                            path: field.path,
                        })
                        .collect(),
                })
                .collect(),
        },
    })
}

fn sanitized_document(html: String) -> ContentDocument {
    ContentDocument {
        body_html: sanitize_document(&html),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [site]
        company_name = "Acme"
        public_base_url = "https://acme.example/"

        [[teams]]
        name = "Platform"

        [[postings]]
        id = "posting-1"
        title = "Software Engineer"
        slug = "/engineering/software-engineer/"
        department_name = "Engineering"
        location_name = "Remote"
        team = "Platform"
        body_html = "<p>Build things.</p>"
    "#;

    #[test]
    fn parses_a_minimal_archive() {
        let store = ContentStore::parse(MINIMAL).expect("archive parses");
        assert_eq!(store.posting_count(), 1);
        assert_eq!(store.team_count(), 1);

        let posting = &store.postings[0];
        assert_eq!(posting.slug, "engineering/software-engineer");
        assert_eq!(store.site.public_base_url, "https://acme.example");
        assert_eq!(store.site.footer_copy, "Acme");
        assert_eq!(store.teams["Platform"].slug, "platform");
    }

    #[test]
    fn rejects_duplicate_posting_slugs() {
        let raw = format!(
            "{MINIMAL}\n{}",
            r#"
            [[postings]]
            id = "posting-2"
            title = "Software Engineer"
            slug = "engineering/software-engineer"
            department_name = "Engineering"
            location_name = "Remote"
            team = "Platform"
            body_html = ""
            "#
        );
        let err = ContentStore::parse(&raw).expect_err("duplicate slug");
        assert!(err.to_string().contains("duplicate posting slug"));
    }

    #[test]
    fn rejects_postings_without_a_title() {
        let raw = MINIMAL.replace("title = \"Software Engineer\"", "title = \"  \"");
        let err = ContentStore::parse(&raw).expect_err("empty title");
        assert!(err.to_string().contains("empty title"));
    }

    #[test]
    fn rejects_invalid_issue_urls() {
        let raw = format!(
            "{MINIMAL}\n{}",
            r#"
            [[teams]]
            name = "Ingestion"

            [[teams.issues]]
            number = 12
            title = "Fix the thing"
            url = "not a url"
            "#
        );
        let err = ContentStore::parse(&raw).expect_err("bad url");
        assert!(err.to_string().contains("invalid url"));
    }

    #[test]
    fn rejects_a_second_team_lead() {
        let raw = format!(
            "{MINIMAL}\n{}",
            r#"
            [[teams]]
            name = "Ingestion"

            [[teams.members]]
            name = "A"
            country = "US"
            job_title = "Engineer"
            headshot = "/images/a.png"
            team_lead = true

            [[teams.members]]
            name = "B"
            country = "DE"
            job_title = "Engineer"
            headshot = "/images/b.png"
            team_lead = true
            "#
        );
        let err = ContentStore::parse(&raw).expect_err("two leads");
        assert!(err.to_string().contains("more than one lead"));
    }

    #[test]
    fn sanitizes_posting_bodies_on_ingest() {
        let raw = MINIMAL.replace(
            "body_html = \"<p>Build things.</p>\"",
            "body_html = \"<p>Build things.</p><script>alert(1)</script>\"",
        );
        let store = ContentStore::parse(&raw).expect("archive parses");
        assert!(!store.postings[0].body_html.contains("<script"));
    }

    #[test]
    fn benchmarks_round_trip_into_the_table() {
        let raw = format!(
            "{MINIMAL}\n{}",
            r#"
            [site.benchmarks]
            "Software Engineer" = 212000
            "#
        );
        let store = ContentStore::parse(&raw).expect("archive parses");
        assert!(store.site.benchmarks.contains("Software Engineer"));
        assert_eq!(
            store
                .site
                .benchmarks
                .entry("Software Engineer")
                .map(|e| e.location_base),
            Some(212_000)
        );
    }
}
