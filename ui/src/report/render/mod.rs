//! Scene renderer capability: SVG markup in, PNG bitmap out.
//!
//! The chart engine and the compositor only see [`SceneRenderer`]; each
//! target provides its own rasterizer.

#[cfg(not(target_arch = "wasm32"))]
mod desktop;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use desktop::ResvgRenderer;
#[cfg(target_arch = "wasm32")]
pub use web::CanvasRenderer;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("malformed chart markup: {0}")]
    Markup(String),
    #[error("unable to allocate drawing surface: {0}")]
    Surface(String),
    #[error("2D drawing context unavailable")]
    NoContext,
    #[error("chart image could not be loaded: {0}")]
    ImageLoad(String),
    #[error("unable to encode chart bitmap: {0}")]
    Encode(String),
}

/// Encoded still image produced by a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Rasterizes one vector document onto an opaque white surface of
/// `width × height` pixels, stretching the document's viewBox to fit.
///
/// Implementations release every temporary resource before returning, on
/// success and on failure.
#[async_trait::async_trait(?Send)]
pub trait SceneRenderer {
    async fn render(&self, markup: &str, width: u32, height: u32) -> Result<Bitmap, RenderError>;
}

/// Renderer for the current build target.
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_renderer() -> ResvgRenderer {
    ResvgRenderer::with_system_fonts()
}

#[cfg(target_arch = "wasm32")]
pub fn platform_renderer() -> CanvasRenderer {
    CanvasRenderer
}

/// Pixel size of a surface `oversample` times larger than a nominal size.
pub fn oversampled(nominal_w: f64, nominal_h: f64, oversample: u32) -> (u32, u32) {
    let factor = oversample.max(1) as f64;
    let px = |v: f64| (v * factor).round().max(1.0) as u32;
    (px(nominal_w), px(nominal_h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversampling_scales_the_nominal_box() {
        assert_eq!(oversampled(190.0, 110.8, 8), (1520, 886));
        assert_eq!(oversampled(0.0, 10.0, 0), (1, 10));
    }
}
