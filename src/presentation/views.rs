use crate::application::error::{ErrorReport, HttpError};
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome, content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

/// One navigation entry. Entries without an `href` render as headings;
/// entries with children render a nested submenu.
#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: Option<String>,
    pub children: Vec<NavigationLinkView>,
}

impl NavigationLinkView {
    pub fn heading(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: None,
            children: Vec::new(),
        }
    }

    pub fn link(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: Some(href.into()),
            children: Vec::new(),
        }
    }

    pub fn submenu(label: impl Into<String>, children: Vec<NavigationLinkView>) -> Self {
        Self {
            label: label.into(),
            href: None,
            children,
        }
    }
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self {
            meta: self.meta.with_canonical(canonical),
            ..self
        }
    }

    /// Rebind the document title and social-preview image for one page.
    pub fn with_page(self, title: String, og_image: Option<String>) -> Self {
        Self {
            meta: self.meta.with_page(title, og_image),
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
    pub og_image: Option<String>,
    pub canonical: String,
}

impl PageMetaView {
    pub fn with_canonical(self, canonical: String) -> Self {
        Self { canonical, ..self }
    }

    pub fn with_page(self, title: String, og_image: Option<String>) -> Self {
        Self {
            title,
            og_image,
            ..self
        }
    }
}

#[derive(Clone)]
pub struct RoleCardView {
    pub title: String,
    pub department: String,
    pub location: String,
    pub href: String,
}

pub struct CareersIndexContext {
    pub roles: Vec<RoleCardView>,
    pub role_count: usize,
}

#[derive(Template)]
#[template(path = "careers.html")]
pub struct CareersTemplate {
    pub view: LayoutContext<CareersIndexContext>,
}

/// Icon + label + value triple in the posting header.
#[derive(Clone)]
pub struct DetailRowView {
    pub icon: String,
    pub title: String,
    pub value: String,
}

/// One in-page navigation entry; `depth` nests entries under their heading.
#[derive(Clone)]
pub struct TocItemView {
    pub label: String,
    pub anchor: String,
    pub depth: u8,
}

#[derive(Clone)]
pub struct SalaryView {
    pub initial_job: String,
    pub location_base: u64,
    pub step_description: String,
    pub location_description: String,
    pub level_description: String,
}

#[derive(Clone)]
pub struct BenefitView {
    pub title: String,
    pub image: String,
}

#[derive(Clone)]
pub struct IssueLabelView {
    pub name: String,
    pub url: String,
}

#[derive(Clone)]
pub struct IssueRowView {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub labels: Vec<IssueLabelView>,
}

#[derive(Clone)]
pub struct TypicalTasksView {
    pub issues: Vec<IssueRowView>,
}

#[derive(Clone)]
pub struct MissionObjectivesView {
    pub mission_html: String,
    pub objectives_html: String,
}

#[derive(Clone)]
pub struct InterviewStageView {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct ApplyFieldView {
    pub title: String,
    pub path: String,
    pub input_type: String,
    pub required: bool,
    pub long_text: bool,
}

#[derive(Clone)]
pub struct ApplyFormSectionView {
    pub fields: Vec<ApplyFieldView>,
}

#[derive(Clone)]
pub struct ApplyFormView {
    pub posting_id: String,
    pub sections: Vec<ApplyFormSectionView>,
}

#[derive(Clone)]
pub struct TeamMemberView {
    pub name: String,
    pub country: String,
    pub job_title: String,
    pub headshot: String,
    pub pineapple_on_pizza: bool,
}

#[derive(Clone)]
pub struct TeamSidebarView {
    pub team_name: String,
    pub team_slug: Option<String>,
    pub lead: Option<TeamMemberView>,
    pub members: Vec<TeamMemberView>,
}

pub struct JobPageContext {
    pub title: String,
    pub details: Vec<DetailRowView>,
    pub body_html: String,
    pub toc: Vec<TocItemView>,
    pub salary: Option<SalaryView>,
    pub benefits: Vec<BenefitView>,
    pub typical_tasks: Option<TypicalTasksView>,
    pub mission_objectives: Option<MissionObjectivesView>,
    pub interview_stages: Vec<InterviewStageView>,
    pub apply: ApplyFormView,
    pub sidebar: TeamSidebarView,
    pub ld_json: Option<String>,
}

#[derive(Template)]
#[template(path = "job.html")]
pub struct JobTemplate {
    pub view: LayoutContext<JobPageContext>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Head back to the careers home to browse every open role.".to_string(),
            primary_action: Some(ErrorAction::careers_home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn careers_home() -> Self {
        Self {
            href: "/careers".to_string(),
            label: "Back to careers home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}
