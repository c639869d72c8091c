//! Error type shared by every fallible operation of the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::markup::ParseError;

/// Errors raised while assembling or writing the brief.
#[derive(Debug, Error)]
pub enum BriefError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// The layout engine failed while paginating or serialising the document.
    #[error("failed to render document")]
    Render(#[source] genpdf::error::Error),

    /// Inline markup in a paragraph or cell was malformed.
    #[error("invalid inline markup")]
    Markup(#[from] ParseError),

    /// A table row has a different number of cells than the header.
    #[error("table row {row} has {cells} cells but the header has {headers}")]
    TableShape {
        headers: usize,
        row: usize,
        cells: usize,
    },

    /// The column width list does not match the header.
    #[error("table has {headers} columns but {widths} column widths")]
    ColumnWidths { headers: usize, widths: usize },

    /// Reading or writing a file failed.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Embedding the bookmark outline failed.
    #[cfg(feature = "bookmarks")]
    #[error("failed to add bookmarks")]
    Bookmarks(#[from] crate::bookmarks::BookmarkError),
}

impl BriefError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
