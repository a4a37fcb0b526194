//! PDF processing layer
//!
//! PDFium renders pages for the preview; qpdf produces the documents that
//! get previewed.

mod pages;
mod pdfium;
mod qpdf;

pub use pages::{parse_page_order, parse_page_ranges};
pub use pdfium::PdfiumRenderer;
pub use qpdf::QpdfWrapper;
