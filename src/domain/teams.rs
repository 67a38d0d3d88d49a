//! Hiring teams: rosters, leads, published documents, open issues.

/// A hiring team as published to the careers site.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub name: String,
    /// Anchor slug on the broader site (team handbook page).
    pub slug: String,
    pub members: Vec<TeamMember>,
    /// At most one designated lead per team.
    pub lead: Option<TeamMember>,
    pub mission: Option<ContentDocument>,
    pub objectives: Option<ContentDocument>,
    /// Open issues the team surfaces on its postings, in curated order.
    pub issues: Vec<IssueReference>,
}

impl Team {
    /// Both team documents, only when the team has published both.
    pub fn mission_and_objectives(&self) -> Option<(&ContentDocument, &ContentDocument)> {
        match (&self.mission, &self.objectives) {
            (Some(mission), Some(objectives)) => Some((mission, objectives)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMember {
    pub name: String,
    pub country: String,
    pub job_title: String,
    /// Path of the processed headshot asset.
    pub headshot: String,
    /// Opaque pass-through flag consumed by the sidebar renderer.
    pub pineapple_on_pizza: bool,
}

/// A published rich-text document (mission, objectives).
#[derive(Debug, Clone, PartialEq)]
pub struct ContentDocument {
    pub body_html: String,
}

/// A ticket in the team's external issue tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueReference {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub labels: Vec<IssueLabel>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IssueLabel {
    pub name: String,
    pub url: String,
}
