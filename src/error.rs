//! Error types for pagestruct.

use std::io;
use thiserror::Error;

/// Result type alias for pagestruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors that stop processing of the current document.
///
/// Recoverable per-figure and per-table problems are not errors; they are
/// recorded as [`Warning`](crate::model::Warning)s in the run report.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout source could not produce the elements of a page.
    #[error("Layout read error on page {page}: {message}")]
    LayoutRead {
        /// Zero-based page index
        page: u32,
        /// Collaborator message
        message: String,
    },

    /// A line was classified before the document-wide font pass completed.
    #[error("Classification policy used before the document-wide font pass")]
    PolicyNotInitialized,

    /// The table finder or cell extraction failed.
    #[error("Table extraction error: {0}")]
    TableExtract(String),

    /// The rasterizer failed to produce an image for a figure.
    #[error("Rasterization error: {0}")]
    Rasterize(String),

    /// The OCR engine failed to recognize a figure.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// An error raised while sequencing a specific page element.
    #[error("page {page}, element {element}: {source}")]
    Located {
        /// Zero-based page index
        page: u32,
        /// Index of the element in the layout source's original order
        element: usize,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach page/element context to an error.
    pub fn at(self, page: u32, element: usize) -> Self {
        match self {
            located @ Error::Located { .. } => located,
            other => Error::Located {
                page,
                element,
                source: Box::new(other),
            },
        }
    }

    /// The innermost error, looking through [`Error::Located`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Located { source, .. } => source.root(),
            other => other,
        }
    }
}
