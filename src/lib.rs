//! mestiere is a self-hosted careers site: it serves job-posting pages and a
//! careers index composed from a pre-resolved hiring-content archive.
//!
//! The crate is layered the usual way: `domain` holds the content model and
//! its invariants, `application` assembles view contexts behind repository
//! traits, `infra` provides the archive-backed content store and the HTTP
//! surface, and `presentation` renders askama templates.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
