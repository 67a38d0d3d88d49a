use std::sync::Arc;

use serde_json::json;
use thiserror::Error;

use crate::application::repos::{JobsRepo, RepoError, SiteRepo, TeamsRepo};
use crate::application::richtext::{self, RenderContext, RichTextError};
use crate::domain::jobs::{JobPosting, TIMEZONE_FIELD};
use crate::domain::site::SiteContent;
use crate::domain::teams::{IssueReference, TeamMember};
use crate::presentation::views::{
    ApplyFieldView, ApplyFormSectionView, ApplyFormView, BenefitView, DetailRowView,
    InterviewStageView, IssueLabelView, IssueRowView, JobPageContext, MissionObjectivesView,
    SalaryView, TeamMemberView, TeamSidebarView, TocItemView, TypicalTasksView,
};

pub const SALARY_ANCHOR: &str = "salary";
pub const BENEFITS_ANCHOR: &str = "benefits";
pub const TYPICAL_TASKS_ANCHOR: &str = "typical-tasks";
pub const MISSION_OBJECTIVES_ANCHOR: &str = "mission-objectives";
pub const INTERVIEW_PROCESS_ANCHOR: &str = "interview-process";
pub const APPLY_ANCHOR: &str = "apply";

const MISSION_OBJECTIVES_LABEL: &str = "Your team's mission and objectives";

const STEP_DESCRIPTION: &str = "We hire into the Established step by default and keep \
     incremental steps between levels to allow for more flexibility.";
const LOCATION_DESCRIPTION: &str = "The benchmark for each role is based on the market rate \
     in San Francisco.";
const LEVEL_DESCRIPTION: &str = "More experienced team members are paid a greater amount, \
     since it is reasonable to expect this correlates with an increase in skill.";

/// Everything a handler needs to serve one posting page: the template
/// content plus the per-page document metadata.
pub struct JobPageBundle {
    pub content: JobPageContext,
    pub seo_title: String,
    pub og_image: String,
    /// Site-relative path of the page, for canonical URLs.
    pub path: String,
}

#[derive(Debug, Error)]
pub enum JobPageError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    RichText(#[from] RichTextError),
}

/// Assembles the job-posting page from the resolved content bundle.
///
/// Optional inputs (timezone field, benchmark entry, issue list, team
/// documents) each gate their own section; a missing one suppresses that
/// section and its table-of-contents entry, never anything else.
#[derive(Clone)]
pub struct JobPageService {
    jobs: Arc<dyn JobsRepo>,
    teams: Arc<dyn TeamsRepo>,
    site: Arc<dyn SiteRepo>,
}

impl JobPageService {
    pub fn new(jobs: Arc<dyn JobsRepo>, teams: Arc<dyn TeamsRepo>, site: Arc<dyn SiteRepo>) -> Self {
        Self { jobs, teams, site }
    }

    pub async fn page_bundle(&self, slug: &str) -> Result<Option<JobPageBundle>, JobPageError> {
        let Some(posting) = self.jobs.find_posting(slug).await? else {
            return Ok(None);
        };

        let site = self.site.load_site().await?;
        let team = self.teams.find_team(&posting.team_name).await?;

        let mut details = vec![
            DetailRowView {
                icon: "department".to_string(),
                title: "Department".to_string(),
                value: posting.department_name.clone(),
            },
            DetailRowView {
                icon: "location".to_string(),
                title: "Location".to_string(),
                value: posting.location_name.clone(),
            },
        ];
        if let Some(timezone) = posting.timezone() {
            details.push(DetailRowView {
                icon: "timezone".to_string(),
                title: TIMEZONE_FIELD.to_string(),
                value: timezone.to_string(),
            });
        }

        let salary = site.benchmarks.entry(&posting.title).map(|entry| SalaryView {
            initial_job: posting.title.clone(),
            location_base: entry.location_base,
            step_description: STEP_DESCRIPTION.to_string(),
            location_description: LOCATION_DESCRIPTION.to_string(),
            level_description: LEVEL_DESCRIPTION.to_string(),
        });

        let typical_tasks = team
            .as_ref()
            .filter(|team| !team.issues.is_empty())
            .map(|team| TypicalTasksView {
                issues: team.issues.iter().map(issue_row).collect(),
            });

        let mission_objectives = match team.as_ref().and_then(|t| t.mission_and_objectives()) {
            Some((mission, objectives)) => Some(MissionObjectivesView {
                mission_html: richtext::filter_document(
                    &mission.body_html,
                    RenderContext::JobPosting,
                )?,
                objectives_html: richtext::filter_document(
                    &objectives.body_html,
                    RenderContext::JobPosting,
                )?,
            }),
            None => None,
        };

        let mut toc: Vec<TocItemView> = posting
            .toc
            .iter()
            .filter(|entry| !entry.label.is_empty() && !entry.anchor.is_empty())
            .map(|entry| TocItemView {
                label: entry.label.clone(),
                anchor: entry.anchor.clone(),
                depth: entry.depth,
            })
            .collect();
        if salary.is_some() {
            toc.push(section_toc_entry("Salary", SALARY_ANCHOR));
        }
        toc.push(section_toc_entry("Benefits", BENEFITS_ANCHOR));
        if typical_tasks.is_some() {
            toc.push(section_toc_entry("Typical tasks", TYPICAL_TASKS_ANCHOR));
        }
        if mission_objectives.is_some() {
            toc.push(section_toc_entry(
                MISSION_OBJECTIVES_LABEL,
                MISSION_OBJECTIVES_ANCHOR,
            ));
        }
        toc.push(section_toc_entry(
            "Interview process",
            INTERVIEW_PROCESS_ANCHOR,
        ));
        toc.push(section_toc_entry("Apply", APPLY_ANCHOR));

        let sidebar = match team.as_ref() {
            Some(team) => TeamSidebarView {
                team_name: team.name.clone(),
                team_slug: Some(team.slug.clone()),
                lead: team.lead.as_ref().map(member_view),
                members: team.members.iter().map(member_view).collect(),
            },
            None => TeamSidebarView {
                team_name: posting.team_name.clone(),
                team_slug: None,
                lead: None,
                members: Vec::new(),
            },
        };

        let apply = ApplyFormView {
            posting_id: posting.id.clone(),
            sections: posting
                .application_form
                .sections
                .iter()
                .map(|section| ApplyFormSectionView {
                    fields: section
                        .fields
                        .iter()
                        .map(|field| ApplyFieldView {
                            title: field.title.clone(),
                            path: field.path.clone(),
                            input_type: field.field_type.input_type().to_string(),
                            required: field.required(),
                            long_text: field.field_type.is_long_text(),
                        })
                        .collect(),
                })
                .collect(),
        };

        let benefits = site
            .benefits
            .iter()
            .map(|benefit| BenefitView {
                title: benefit.title.clone(),
                image: benefit.image.clone(),
            })
            .collect();

        let interview_stages = site
            .interview_stages
            .iter()
            .map(|stage| InterviewStageView {
                title: stage.title.clone(),
                description: stage.description.clone(),
            })
            .collect();

        let seo_title = format!("{} - {}", posting.title, site.company_name);
        let og_image = posting.og_image_path();
        let path = format!("/careers/{}", posting.slug);
        let ld_json = build_job_ld_json(&posting, &site);

        let content = JobPageContext {
            title: posting.title,
            details,
            body_html: posting.body_html,
            toc,
            salary,
            benefits,
            typical_tasks,
            mission_objectives,
            interview_stages,
            apply,
            sidebar,
            ld_json,
        };

        Ok(Some(JobPageBundle {
            content,
            seo_title,
            og_image,
            path,
        }))
    }
}

fn section_toc_entry(label: &str, anchor: &str) -> TocItemView {
    TocItemView {
        label: label.to_string(),
        anchor: anchor.to_string(),
        depth: 0,
    }
}

fn issue_row(issue: &IssueReference) -> IssueRowView {
    IssueRowView {
        number: issue.number,
        title: issue.title.clone(),
        url: issue.url.clone(),
        labels: issue
            .labels
            .iter()
            .map(|label| IssueLabelView {
                name: label.name.clone(),
                url: label.url.clone(),
            })
            .collect(),
    }
}

fn member_view(member: &TeamMember) -> TeamMemberView {
    TeamMemberView {
        name: member.name.clone(),
        country: member.country.clone(),
        job_title: member.job_title.clone(),
        headshot: member.headshot.clone(),
        pineapple_on_pizza: member.pineapple_on_pizza,
    }
}

fn build_job_ld_json(posting: &JobPosting, site: &SiteContent) -> Option<String> {
    let value = json!({
        "@context": "https://schema.org",
        "@type": "JobPosting",
        "title": posting.title,
        "hiringOrganization": {
            "@type": "Organization",
            "name": site.company_name,
        },
        "jobLocation": {
            "@type": "Place",
            "address": posting.location_name,
        },
        "url": format!("{}/careers/{}", site.public_base_url, posting.slug),
    });
    serde_json::to_string(&value).ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::compensation::{BenchmarkEntry, BenchmarkTable};
    use crate::domain::jobs::{
        ApplicationForm, CustomField, FormField, FormFieldType, FormSection, JobPostingSummary,
        TocEntry,
    };
    use crate::domain::site::{Benefit, InterviewStage};
    use crate::domain::teams::{ContentDocument, IssueLabel, Team};

    struct Fixture {
        posting: JobPosting,
        team: Option<Team>,
        site: SiteContent,
    }

    #[async_trait]
    impl JobsRepo for Fixture {
        async fn find_posting(&self, slug: &str) -> Result<Option<JobPosting>, RepoError> {
            Ok((self.posting.slug == slug).then(|| self.posting.clone()))
        }

        async fn list_postings(&self) -> Result<Vec<JobPostingSummary>, RepoError> {
            Ok(vec![JobPostingSummary {
                title: self.posting.title.clone(),
                slug: self.posting.slug.clone(),
                department_name: self.posting.department_name.clone(),
                location_name: self.posting.location_name.clone(),
            }])
        }
    }

    #[async_trait]
    impl TeamsRepo for Fixture {
        async fn find_team(&self, name: &str) -> Result<Option<Team>, RepoError> {
            Ok(self
                .team
                .as_ref()
                .filter(|team| team.name == name)
                .cloned())
        }
    }

    #[async_trait]
    impl SiteRepo for Fixture {
        async fn load_site(&self) -> Result<SiteContent, RepoError> {
            Ok(self.site.clone())
        }
    }

    fn site(benchmarks: BenchmarkTable) -> SiteContent {
        SiteContent {
            company_name: "Acme".to_string(),
            public_base_url: "https://acme.example".to_string(),
            about_url: "/about".to_string(),
            footer_copy: "Acme".to_string(),
            benefits: vec![Benefit {
                title: "Unlimited time off".to_string(),
                image: "/images/benefits/time-off.svg".to_string(),
            }],
            interview_stages: vec![InterviewStage {
                title: "Culture interview".to_string(),
                description: "A 30-minute introductory call.".to_string(),
            }],
            benchmarks,
        }
    }

    fn posting() -> JobPosting {
        JobPosting {
            id: "posting-1".to_string(),
            title: "Software Engineer".to_string(),
            slug: "engineering/software-engineer".to_string(),
            department_name: "Engineering".to_string(),
            location_name: "Remote".to_string(),
            team_name: "Platform".to_string(),
            body_html: "<h2 id=\"the-role\">The role</h2><p>Build things.</p>".to_string(),
            toc: vec![TocEntry {
                label: "The role".to_string(),
                anchor: "the-role".to_string(),
                depth: 0,
            }],
            custom_fields: vec![CustomField {
                name: TIMEZONE_FIELD.to_string(),
                value: "GMT -8:00 to GMT +2:00".to_string(),
            }],
            application_form: ApplicationForm {
                sections: vec![FormSection {
                    fields: vec![FormField {
                        field_type: FormFieldType::Email,
                        title: "Email".to_string(),
                        nullable: false,
                        path: "_systemfield_email".to_string(),
                    }],
                }],
            },
        }
    }

    fn team() -> Team {
        Team {
            name: "Platform".to_string(),
            slug: "platform".to_string(),
            members: vec![TeamMember {
                name: "Sam Doe".to_string(),
                country: "DE".to_string(),
                job_title: "Engineer".to_string(),
                headshot: "/images/people/sam.png".to_string(),
                pineapple_on_pizza: true,
            }],
            lead: Some(TeamMember {
                name: "Alex Roe".to_string(),
                country: "US".to_string(),
                job_title: "Engineering Lead".to_string(),
                headshot: "/images/people/alex.png".to_string(),
                pineapple_on_pizza: false,
            }),
            mission: Some(ContentDocument {
                body_html: "<p>Make the platform boring.</p>".to_string(),
            }),
            objectives: Some(ContentDocument {
                body_html: concat!(
                    "<p>Ship the ingestion rewrite.</p>",
                    "<div data-role=\"hide-from-posting\"><p>Budget notes.</p></div>",
                )
                .to_string(),
            }),
            issues: vec![IssueReference {
                number: 4091,
                title: "Harden the retry loop".to_string(),
                url: "https://github.com/acme/platform/issues/4091".to_string(),
                labels: vec![IssueLabel {
                    name: "good first issue".to_string(),
                    url: "https://github.com/acme/platform/labels/good%20first%20issue"
                        .to_string(),
                }],
            }],
        }
    }

    fn benchmarked() -> BenchmarkTable {
        BenchmarkTable::new(HashMap::from([(
            "Software Engineer".to_string(),
            BenchmarkEntry {
                location_base: 212_000,
            },
        )]))
    }

    fn service(fixture: Fixture) -> JobPageService {
        let fixture = Arc::new(fixture);
        JobPageService::new(fixture.clone(), fixture.clone(), fixture)
    }

    fn toc_labels(bundle: &JobPageBundle) -> Vec<&str> {
        bundle
            .content
            .toc
            .iter()
            .map(|entry| entry.label.as_str())
            .collect()
    }

    #[tokio::test]
    async fn full_bundle_orders_the_table_of_contents() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert_eq!(
            toc_labels(&bundle),
            vec![
                "The role",
                "Salary",
                "Benefits",
                "Typical tasks",
                "Your team's mission and objectives",
                "Interview process",
                "Apply",
            ]
        );
        assert!(bundle.content.toc.iter().all(|e| !e.anchor.is_empty()));
    }

    #[tokio::test]
    async fn missing_benchmark_drops_salary_section_and_anchor() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(BenchmarkTable::default()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert!(bundle.content.salary.is_none());
        assert!(!toc_labels(&bundle).contains(&"Salary"));
        // The rest of the conditional sections are unaffected.
        assert!(bundle.content.typical_tasks.is_some());
        assert!(bundle.content.mission_objectives.is_some());
    }

    #[tokio::test]
    async fn empty_issue_list_drops_typical_tasks() {
        let mut team = team();
        team.issues.clear();
        let service = service(Fixture {
            posting: posting(),
            team: Some(team),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert!(bundle.content.typical_tasks.is_none());
        assert!(!toc_labels(&bundle).contains(&"Typical tasks"));
        assert!(bundle.content.salary.is_some());
    }

    #[tokio::test]
    async fn issue_rows_carry_ticket_numbers_and_labels() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        let tasks = bundle.content.typical_tasks.expect("typical tasks");
        assert_eq!(tasks.issues.len(), 1);
        assert_eq!(tasks.issues[0].number, 4091);
        assert_eq!(tasks.issues[0].labels[0].name, "good first issue");
    }

    #[tokio::test]
    async fn missing_timezone_field_drops_the_detail_row() {
        let mut posting = posting();
        posting.custom_fields.clear();
        let service = service(Fixture {
            posting,
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        let titles: Vec<&str> = bundle
            .content
            .details
            .iter()
            .map(|d| d.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Department", "Location"]);
    }

    #[tokio::test]
    async fn single_missing_document_drops_mission_objectives() {
        let mut team = team();
        team.objectives = None;
        let service = service(Fixture {
            posting: posting(),
            team: Some(team),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert!(bundle.content.mission_objectives.is_none());
        assert!(!toc_labels(&bundle).contains(&"Your team's mission and objectives"));
    }

    #[tokio::test]
    async fn mission_objectives_strip_hidden_blocks() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        let section = bundle.content.mission_objectives.expect("section present");
        assert_eq!(section.mission_html, "<p>Make the platform boring.</p>");
        assert_eq!(section.objectives_html, "<p>Ship the ingestion rewrite.</p>");
    }

    #[tokio::test]
    async fn empty_base_toc_entries_are_filtered() {
        let mut posting = posting();
        posting.toc.push(TocEntry {
            label: String::new(),
            anchor: String::new(),
            depth: 0,
        });
        let service = service(Fixture {
            posting,
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert!(bundle.content.toc.iter().all(|e| !e.label.is_empty()));
    }

    #[tokio::test]
    async fn page_metadata_uses_company_and_flattened_slug() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert_eq!(bundle.seo_title, "Software Engineer - Acme");
        assert_eq!(
            bundle.og_image,
            "/og-images/engineeringsoftware-engineer.jpeg"
        );
        assert_eq!(bundle.path, "/careers/engineering/software-engineer");
    }

    #[tokio::test]
    async fn unknown_team_still_renders_with_a_bare_sidebar() {
        let service = service(Fixture {
            posting: posting(),
            team: None,
            site: site(benchmarked()),
        });

        let bundle = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert_eq!(bundle.content.sidebar.team_name, "Platform");
        assert!(bundle.content.sidebar.team_slug.is_none());
        assert!(bundle.content.typical_tasks.is_none());
        assert!(bundle.content.mission_objectives.is_none());
    }

    #[tokio::test]
    async fn unknown_slug_returns_none() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(benchmarked()),
        });

        let bundle = service.page_bundle("design/brand").await.expect("assemble");
        assert!(bundle.is_none());
    }

    #[tokio::test]
    async fn reassembly_is_deterministic() {
        let service = service(Fixture {
            posting: posting(),
            team: Some(team()),
            site: site(benchmarked()),
        });

        let first = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");
        let second = service
            .page_bundle("engineering/software-engineer")
            .await
            .expect("assemble")
            .expect("posting found");

        assert_eq!(first.seo_title, second.seo_title);
        assert_eq!(first.og_image, second.og_image);
        assert_eq!(first.content.body_html, second.content.body_html);
        assert_eq!(first.content.ld_json, second.content.ld_json);
        assert_eq!(
            toc_labels(&first),
            second
                .content
                .toc
                .iter()
                .map(|e| e.label.as_str())
                .collect::<Vec<_>>()
        );
    }
}
