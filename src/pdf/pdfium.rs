//! PDFium-backed document renderer

use crate::error::{Error, Result};
use crate::preview::{DocumentHandle, DocumentRenderer, PreviewConfig, RenderedPage};
use async_trait::async_trait;
use pdfium_render::prelude::*;
use std::sync::Arc;

/// Get PDFium instance (creates new instance each time - PDFium is not thread-safe)
fn create_pdfium() -> Result<Pdfium> {
    // Try to bind to a bundled library first, then the system one
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

fn check_pdf_header(data: &[u8]) -> Result<()> {
    if data.len() < 4 || &data[0..4] != b"%PDF" {
        return Err(Error::DocumentOpen {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}

/// Map PDFium load errors to our error type
fn map_load_error(err: PdfiumError) -> Error {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Error::PasswordRequired
        }
        _ => Error::DocumentOpen {
            reason: format!("{}", err),
        },
    }
}

fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Pdfium {
        reason: format!("Task join error: {}", e),
    }
}

fn count_pages(data: &[u8]) -> Result<u32> {
    let pdfium = create_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(map_load_error)?;
    Ok(document.pages().len() as u32)
}

fn render_blocking(data: &[u8], page_num: u32, scale: f32, max_pixels: u64) -> Result<RenderedPage> {
    let pdfium = create_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(data, None)
        .map_err(map_load_error)?;

    let pages = document.pages();
    let page = pages
        .get((page_num - 1) as u16)
        .map_err(|e| Error::Render {
            page: page_num,
            reason: format!("Failed to get page: {}", e),
        })?;

    let width = (page.width().value * scale).ceil().max(0.0) as u64;
    let height = (page.height().value * scale).ceil().max(0.0) as u64;
    let pixel_area = width * height;
    if pixel_area > max_pixels {
        return Err(Error::ImageDimensionExceeded {
            detail: format!(
                "pixel area {}x{} = {} exceeds maximum {} pixels",
                width, height, pixel_area, max_pixels
            ),
        });
    }

    let config = PdfRenderConfig::new()
        .scale_page_by_factor(scale)
        .render_form_data(true)
        .render_annotations(true);

    let bitmap = page.render_with_config(&config).map_err(|e| Error::Render {
        page: page_num,
        reason: format!("{}", e),
    })?;

    Ok(RenderedPage::new(page_num, bitmap.as_image().to_rgba8()))
}

/// Renderer that opens and rasterizes PDFs with PDFium.
///
/// PDFium work runs on the blocking thread pool; each call binds its own
/// PDFium instance.
#[derive(Debug, Clone)]
pub struct PdfiumRenderer {
    max_render_pixels: u64,
}

impl Default for PdfiumRenderer {
    fn default() -> Self {
        Self::from_config(&PreviewConfig::default())
    }
}

impl PdfiumRenderer {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            max_render_pixels: config.max_render_pixels,
        }
    }

    /// Check that PDFium can be bound on this machine
    pub fn check_available() -> Result<()> {
        create_pdfium().map(|_| ())
    }
}

#[async_trait]
impl DocumentRenderer for PdfiumRenderer {
    async fn open_document(&self, bytes: Arc<[u8]>) -> Result<DocumentHandle> {
        check_pdf_header(&bytes)?;

        let data = Arc::clone(&bytes);
        let page_count = tokio::task::spawn_blocking(move || count_pages(&data))
            .await
            .map_err(join_error)??;

        Ok(DocumentHandle::new(bytes, page_count))
    }

    async fn render_page(
        &self,
        handle: &DocumentHandle,
        page: u32,
        scale: f32,
    ) -> Result<RenderedPage> {
        if page < 1 || page > handle.page_count() {
            return Err(Error::PageOutOfBounds {
                page,
                total: handle.page_count(),
            });
        }

        let data = handle.shared_bytes();
        let max_pixels = self.max_render_pixels;
        tokio::task::spawn_blocking(move || render_blocking(&data, page, scale, max_pixels))
            .await
            .map_err(join_error)?
    }
}
