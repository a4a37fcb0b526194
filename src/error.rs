//! Error types for the PDF preview toolkit

use thiserror::Error;

/// Result type alias for the PDF preview toolkit
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the PDF preview toolkit
#[derive(Error, Debug)]
pub enum Error {
    /// Bytes could not be opened as a document
    #[error("Failed to open document: {reason}")]
    DocumentOpen { reason: String },

    /// A page failed to rasterize
    #[error("Failed to render page {page}: {reason}")]
    Render { page: u32, reason: String },

    /// PDF is password protected and no password was provided
    #[error("PDF is password protected")]
    PasswordRequired,

    /// Operation needs an open preview session
    #[error("Preview session is closed")]
    SessionClosed,

    /// Operation needs a displayed page
    #[error("No page is currently displayed")]
    NothingDisplayed,

    /// `open` was called without any document
    #[error("No document parts to preview")]
    NoParts,

    /// Invalid page range
    #[error("Invalid page range: {range}")]
    InvalidPageRange { range: String },

    /// Page out of bounds
    #[error("Page {page} out of bounds (total: {total})")]
    PageOutOfBounds { page: u32, total: u32 },

    /// Split point outside `1..total`
    #[error("Invalid split point {page}: expected a page between 1 and {max}")]
    InvalidSplitPoint { page: u32, max: u32 },

    /// Merge was given fewer than two documents
    #[error("Merge needs at least 2 documents, got {count}")]
    NotEnoughInputs { count: usize },

    /// Rotation that is not a multiple of 90 degrees
    #[error("Invalid rotation: {angle} degrees (must be a multiple of 90)")]
    InvalidRotation { angle: i32 },

    /// Image dimension exceeded
    #[error("Image dimension exceeded: {detail}")]
    ImageDimensionExceeded { detail: String },

    /// Image encoding error
    #[error("Image encoding failed: {0}")]
    ImageEncode(#[from] image::ImageError),

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// qpdf error
    #[error("qpdf error: {reason}")]
    QpdfError { reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Return a sanitized error message safe to show to users.
    /// Internal details (paths, library errors) are omitted.
    /// Full details should be logged via tracing before calling this.
    pub fn client_message(&self) -> String {
        match self {
            Error::DocumentOpen { .. } => "Could not open the document".to_string(),
            Error::Render { page, .. } => format!("Could not display page {}", page),
            Error::PasswordRequired => "PDF is password protected".to_string(),
            Error::SessionClosed => "No preview is open".to_string(),
            Error::NothingDisplayed => "No page is displayed".to_string(),
            Error::NoParts => "Nothing to preview".to_string(),
            Error::InvalidPageRange { range } => format!("Invalid page range: {}", range),
            Error::PageOutOfBounds { page, total } => {
                format!("Page {} out of bounds (total: {})", page, total)
            }
            Error::InvalidSplitPoint { max, .. } => {
                format!("Please enter a page number between 1 and {}", max)
            }
            Error::NotEnoughInputs { .. } => "Select at least 2 files to merge".to_string(),
            Error::InvalidRotation { angle } => {
                format!("Rotation must be a multiple of 90 degrees (got {})", angle)
            }
            Error::ImageDimensionExceeded { detail } => {
                format!("Image dimension exceeded: {}", detail)
            }
            Error::ImageEncode(_) => "Image encoding error".to_string(),
            Error::Pdfium { .. } => "PDF processing error".to_string(),
            Error::QpdfError { .. } => "PDF processing error".to_string(),
            Error::Io(_) => "I/O error".to_string(),
        }
    }
}
