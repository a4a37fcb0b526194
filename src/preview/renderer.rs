//! Document renderer collaborator

use crate::error::Result;
use async_trait::async_trait;
use image::RgbaImage;
use std::sync::Arc;

/// An opened document: its bytes and the page count the renderer reported
#[derive(Debug, Clone)]
pub struct DocumentHandle {
    bytes: Arc<[u8]>,
    page_count: u32,
}

impl DocumentHandle {
    pub fn new(bytes: Arc<[u8]>, page_count: u32) -> Self {
        Self { bytes, page_count }
    }

    /// Raw document bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared handle to the bytes, for moving into blocking tasks
    pub fn shared_bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    /// Number of pages
    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

/// Rendered page image data
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Page number (1-indexed)
    pub page: u32,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// RGBA pixels
    pub image: RgbaImage,
}

impl RenderedPage {
    pub fn new(page: u32, image: RgbaImage) -> Self {
        Self {
            page,
            width: image.width(),
            height: image.height(),
            image,
        }
    }

    /// Encode the surface as PNG
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut png_bytes = Vec::new();
        self.image.write_to(
            &mut std::io::Cursor::new(&mut png_bytes),
            image::ImageFormat::Png,
        )?;
        Ok(png_bytes)
    }
}

/// Opens documents and rasterizes their pages.
///
/// Implementations hold no per-session state: every call receives the
/// document it works on.
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Open `bytes` as a document and report its page count.
    ///
    /// Fails with [`Error::DocumentOpen`](crate::Error::DocumentOpen) when the
    /// bytes are not a well-formed document.
    async fn open_document(&self, bytes: Arc<[u8]>) -> Result<DocumentHandle>;

    /// Render page `page` (1-indexed) at `scale` times its intrinsic size.
    async fn render_page(
        &self,
        handle: &DocumentHandle,
        page: u32,
        scale: f32,
    ) -> Result<RenderedPage>;
}

#[async_trait]
impl<T: DocumentRenderer + ?Sized> DocumentRenderer for Arc<T> {
    async fn open_document(&self, bytes: Arc<[u8]>) -> Result<DocumentHandle> {
        (**self).open_document(bytes).await
    }

    async fn render_page(
        &self,
        handle: &DocumentHandle,
        page: u32,
        scale: f32,
    ) -> Result<RenderedPage> {
        (**self).render_page(handle, page, scale).await
    }
}
