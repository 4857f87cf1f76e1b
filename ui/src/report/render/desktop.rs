use std::sync::Arc;

use tiny_skia::{Color, Pixmap, Transform};

use super::{Bitmap, RenderError, SceneRenderer};

/// Headless rasterizer backed by resvg.
#[derive(Clone)]
pub struct ResvgRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl ResvgRenderer {
    /// Loads the fonts installed on the machine. Chart text falls back to
    /// whatever sans-serif face is found.
    pub fn with_system_fonts() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "font database ready");
        Self::with_fonts(db)
    }

    pub fn with_fonts(db: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Synchronous core of [`SceneRenderer::render`].
    pub fn rasterize(&self, markup: &str, width: u32, height: u32) -> Result<Bitmap, RenderError> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree =
            usvg::Tree::from_str(markup, &options).map_err(|err| RenderError::Markup(err.to_string()))?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Surface(format!("{width}x{height} is not a valid size")))?;
        pixmap.fill(Color::WHITE);

        let size = tree.size();
        let transform = Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        let png = encode_png(&pixmap)?;
        Ok(Bitmap { width, height, png })
    }
}

#[async_trait::async_trait(?Send)]
impl SceneRenderer for ResvgRenderer {
    async fn render(&self, markup: &str, width: u32, height: u32) -> Result<Bitmap, RenderError> {
        self.rasterize(markup, width, height)
    }
}

fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, RenderError> {
    // The surface starts opaque white, so premultiplied and straight alpha
    // are the same bytes.
    let mut buffer = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buffer, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder
            .write_header()
            .map_err(|err| RenderError::Encode(err.to_string()))?
            .write_image_data(pixmap.data())
            .map_err(|err| RenderError::Encode(err.to_string()))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> ResvgRenderer {
        ResvgRenderer::with_fonts(usvg::fontdb::Database::new())
    }

    #[test]
    fn transparent_markup_lands_on_white() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"></svg>"#;
        let bitmap = renderer().rasterize(markup, 80, 80).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (80, 80));

        let decoded = image::load_from_memory(&bitmap.png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (80, 80));
        assert!(decoded.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn viewbox_is_stretched_to_the_target_size() {
        let markup = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect x="0" y="0" width="5" height="10" fill="#ff0000"/></svg>"##;
        let bitmap = renderer().rasterize(markup, 40, 20).unwrap();
        let decoded = image::load_from_memory(&bitmap.png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(5, 10).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(35, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn malformed_markup_is_reported() {
        let err = renderer().rasterize("<svg", 10, 10).unwrap_err();
        assert!(matches!(err, RenderError::Markup(_)));
    }

    #[test]
    fn zero_sized_surface_is_reported() {
        let markup = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#;
        let err = renderer().rasterize(markup, 0, 10).unwrap_err();
        assert!(matches!(err, RenderError::Surface(_)));
    }
}
