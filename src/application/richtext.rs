//! Rich-text handling for archive-sourced HTML.
//!
//! Archive bodies are sanitized once on ingest. Team documents may carry
//! blocks that are meant for the handbook but not for a job posting; those
//! are marked with `data-role="hide-from-posting"` and stripped when the
//! document renders inside a posting. The render context is explicit so the
//! same document can still render unfiltered elsewhere.

use ammonia::Builder;
use lol_html::{RewriteStrSettings, element, rewrite_str};
use once_cell::sync::Lazy;
use thiserror::Error;

const HIDE_FROM_POSTING_SELECTOR: &str = "[data-role=\"hide-from-posting\"]";

static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    // `id` carries heading anchors the table of contents points at;
    // `data-role` carries the render-context markers.
    builder.add_generic_attributes(["id", "data-role"]);
    builder
});

/// Where a document is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderContext {
    /// The document renders on its own page; nothing is suppressed.
    Standalone,
    /// The document renders inside a job posting; marked blocks are removed.
    JobPosting,
}

#[derive(Debug, Error)]
pub enum RichTextError {
    #[error("html rewrite failed: {0}")]
    Rewrite(String),
}

/// Sanitize untrusted archive HTML, keeping anchor ids and role markers.
pub fn sanitize_document(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}

/// Apply the render-context filter to a sanitized document.
pub fn filter_document(html: &str, context: RenderContext) -> Result<String, RichTextError> {
    match context {
        RenderContext::Standalone => Ok(html.to_string()),
        RenderContext::JobPosting => strip_hidden_blocks(html),
    }
}

fn strip_hidden_blocks(html: &str) -> Result<String, RichTextError> {
    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!(HIDE_FROM_POSTING_SELECTOR, |el| {
                el.remove();
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|err| RichTextError::Rewrite(err.to_string()))
}
