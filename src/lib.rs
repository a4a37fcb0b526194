//! PDF Preview Library
//!
//! This crate provides a PDF toolkit built around a multi-part preview:
//! - `preview`: the preview session (navigation across parts and pages,
//!   superseded-render handling, downloads)
//! - `pdf`: PDFium rendering, qpdf producers (merge, split, rotate,
//!   compress, reorder, delete) and page selection parsing

pub mod error;
pub mod pdf;
pub mod preview;

pub use error::{Error, Result};
pub use pdf::{parse_page_order, parse_page_ranges, PdfiumRenderer, QpdfWrapper};
pub use preview::{
    DirectorySaver, DisplayedPage, DocumentHandle, DocumentRenderer, FileSaver, Part,
    PreviewConfig, PreviewSession, RenderOutcome, RenderedPage, SessionStatus,
};
