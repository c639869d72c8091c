//! Branded Propwell AMP weekly brief, laid out and rendered to PDF with `genpdf`.
//!
//! [`report::generate`] is the one-call entry point.  The building blocks (style registry,
//! flowables, striped tables, page decorator) are public so other fixed documents can reuse them.

pub mod brand;
pub mod builder;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod markup;
pub mod report;
pub mod styles;
pub mod tables;
pub mod text;
pub mod tracking;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use builder::{DocumentBuilder, RenderedPdf, Story};
pub use config::BriefConfig;
pub use error::BriefError;
pub use report::{build_weekly_brief, generate};
pub use styles::{Role, StyleRegistry};
