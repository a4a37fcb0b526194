//! Preview configuration

/// Rendering and naming configuration for a preview session
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Magnification applied to a page's intrinsic size when rendering (default: 1.5)
    pub render_scale: f32,
    /// Largest accepted render scale (default: 10.0)
    pub max_render_scale: f32,
    /// Largest accepted pixel area of a rendered page (default: 100_000_000)
    pub max_render_pixels: u64,
    /// Extension used when naming parts (default: "pdf")
    pub part_extension: String,
    /// MIME type handed to the file saver on download (default: "application/pdf")
    pub mime_type: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            render_scale: 1.5,
            max_render_scale: 10.0,
            max_render_pixels: 100_000_000,
            part_extension: "pdf".to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }
}

impl PreviewConfig {
    /// Use `scale` for rendering if it lies in `(0, max_render_scale]`,
    /// otherwise keep the current scale.
    pub fn with_render_scale(mut self, scale: f32) -> Self {
        if scale > 0.0 && scale <= self.max_render_scale {
            self.render_scale = scale;
        } else {
            tracing::warn!(
                scale,
                max = self.max_render_scale,
                fallback = self.render_scale,
                "render scale out of range, keeping current scale"
            );
        }
        self
    }

    /// Name of the part at `index` (0-based) for a session on `base_name`
    pub fn part_name(&self, base_name: &str, index: usize) -> String {
        format!("{}_part{}.{}", base_name, index + 1, self.part_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = PreviewConfig::default();
        assert_eq!(config.render_scale, 1.5);
        assert_eq!(config.max_render_scale, 10.0);
        assert_eq!(config.max_render_pixels, 100_000_000);
        assert_eq!(config.part_extension, "pdf");
        assert_eq!(config.mime_type, "application/pdf");
    }

    #[test]
    fn test_part_name_is_one_based() {
        let config = PreviewConfig::default();
        assert_eq!(config.part_name("doc", 0), "doc_part1.pdf");
        assert_eq!(config.part_name("doc", 1), "doc_part2.pdf");
    }

    #[test]
    fn test_render_scale_validation() {
        assert_eq!(PreviewConfig::default().with_render_scale(2.0).render_scale, 2.0);
        assert_eq!(PreviewConfig::default().with_render_scale(0.0).render_scale, 1.5);
        assert_eq!(PreviewConfig::default().with_render_scale(-1.0).render_scale, 1.5);
        assert_eq!(PreviewConfig::default().with_render_scale(11.0).render_scale, 1.5);
    }
}
