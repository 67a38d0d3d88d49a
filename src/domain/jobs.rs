//! Job postings and their presentation-facing derivations.

use serde::Deserialize;

/// Custom-field key carrying the working-timezone range of a posting.
pub const TIMEZONE_FIELD: &str = "Timezone(s)";

const OG_IMAGE_PREFIX: &str = "/og-images/";
const OG_IMAGE_EXTENSION: &str = ".jpeg";

/// A single published job posting, fully resolved by the upstream ATS.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPosting {
    /// Opaque identifier assigned by the upstream applicant-tracking system.
    pub id: String,
    pub title: String,
    /// Relative path under the careers root; may contain `/` separators.
    pub slug: String,
    pub department_name: String,
    pub location_name: String,
    /// Name of the hiring team; resolves a [`crate::domain::teams::Team`].
    pub team_name: String,
    /// Sanitized posting body.
    pub body_html: String,
    /// Heading entries extracted from the posting body, in document order.
    pub toc: Vec<TocEntry>,
    /// Key/value pairs attached to the posting's parent requisition.
    pub custom_fields: Vec<CustomField>,
    pub application_form: ApplicationForm,
}

impl JobPosting {
    /// Working-timezone range, when the parent requisition carries one.
    pub fn timezone(&self) -> Option<&str> {
        self.custom_fields
            .iter()
            .find(|field| field.name == TIMEZONE_FIELD)
            .map(|field| field.value.as_str())
    }

    /// Social-preview image path: the slug with every `/` removed, under the
    /// og-image root. `engineering/software-engineer` maps to
    /// `/og-images/engineeringsoftware-engineer.jpeg`.
    pub fn og_image_path(&self) -> String {
        let flattened: String = self.slug.chars().filter(|ch| *ch != '/').collect();
        format!("{OG_IMAGE_PREFIX}{flattened}{OG_IMAGE_EXTENSION}")
    }
}

/// Title and location of a posting, for the roles index and navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct JobPostingSummary {
    pub title: String,
    pub slug: String,
    pub department_name: String,
    pub location_name: String,
}

/// One in-page navigation entry: label, anchor id, nesting depth.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    pub label: String,
    pub anchor: String,
    pub depth: u8,
}

/// Arbitrary key/value pair from the posting's parent requisition.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomField {
    pub name: String,
    pub value: String,
}

/// Application-form schema as defined by the upstream ATS.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApplicationForm {
    pub sections: Vec<FormSection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSection {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub field_type: FormFieldType,
    pub title: String,
    /// Whether the upstream schema allows the field to be left empty.
    pub nullable: bool,
    /// Submission path within the upstream application payload.
    pub path: String,
}

impl FormField {
    pub fn required(&self) -> bool {
        !self.nullable
    }
}

/// Field kinds the upstream form builder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormFieldType {
    String,
    LongText,
    Email,
    Phone,
    File,
    Boolean,
    #[serde(other)]
    Unknown,
}

impl FormFieldType {
    /// HTML input type used when the field renders as a single-line input.
    pub fn input_type(&self) -> &'static str {
        match self {
            FormFieldType::Email => "email",
            FormFieldType::Phone => "tel",
            FormFieldType::File => "file",
            FormFieldType::Boolean => "checkbox",
            _ => "text",
        }
    }

    pub fn is_long_text(&self) -> bool {
        matches!(self, FormFieldType::LongText)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(slug: &str, custom_fields: Vec<CustomField>) -> JobPosting {
        JobPosting {
            id: "posting-1".to_string(),
            title: "Software Engineer".to_string(),
            slug: slug.to_string(),
            department_name: "Engineering".to_string(),
            location_name: "Remote".to_string(),
            team_name: "Platform".to_string(),
            body_html: String::new(),
            toc: Vec::new(),
            custom_fields,
            application_form: ApplicationForm::default(),
        }
    }

    #[test]
    fn og_image_path_strips_every_slash() {
        let posting = posting("engineering/software-engineer", Vec::new());
        assert_eq!(
            posting.og_image_path(),
            "/og-images/engineeringsoftware-engineer.jpeg"
        );
    }

    #[test]
    fn og_image_path_passes_flat_slugs_through() {
        let posting = posting("product-engineer", Vec::new());
        assert_eq!(posting.og_image_path(), "/og-images/product-engineer.jpeg");
    }

    #[test]
    fn timezone_reads_the_dedicated_custom_field() {
        let posting = posting(
            "product-engineer",
            vec![
                CustomField {
                    name: "Team size".to_string(),
                    value: "6".to_string(),
                },
                CustomField {
                    name: TIMEZONE_FIELD.to_string(),
                    value: "GMT -8:00 to GMT +2:00".to_string(),
                },
            ],
        );
        assert_eq!(posting.timezone(), Some("GMT -8:00 to GMT +2:00"));
    }

    #[test]
    fn timezone_is_absent_without_the_field() {
        let posting = posting("product-engineer", Vec::new());
        assert_eq!(posting.timezone(), None);
    }
}
