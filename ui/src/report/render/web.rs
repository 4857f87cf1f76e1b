use base64::Engine as _;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement,
    ImageSmoothingQuality, Url,
};

use super::{Bitmap, RenderError, SceneRenderer};

/// Browser rasterizer: the markup is decoded as an image and drawn on an
/// offscreen canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasRenderer;

#[async_trait::async_trait(?Send)]
impl SceneRenderer for CanvasRenderer {
    async fn render(&self, markup: &str, width: u32, height: u32) -> Result<Bitmap, RenderError> {
        let mut opts = BlobPropertyBag::new();
        opts.type_("image/svg+xml;charset=utf-8");
        let parts = js_sys::Array::new();
        parts.push(&JsValue::from_str(markup));
        let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)
            .map_err(|_| RenderError::Markup("unable to build SVG blob".into()))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|_| RenderError::Surface("unable to create SVG URL".into()))?;

        let outcome = draw_to_png(&url, width, height).await;
        Url::revoke_object_url(&url).ok();
        let png = outcome?;

        Ok(Bitmap { width, height, png })
    }
}

async fn draw_to_png(url: &str, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RenderError::Surface("document unavailable".into()))?;

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|_| RenderError::Surface("unable to create canvas".into()))?
        .dyn_into()
        .map_err(|_| RenderError::Surface("canvas cast failed".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|_| RenderError::NoContext)?
        .ok_or(RenderError::NoContext)?
        .dyn_into()
        .map_err(|_| RenderError::NoContext)?;
    context.set_image_smoothing_enabled(true);
    context.set_image_smoothing_quality(ImageSmoothingQuality::High);
    context.set_fill_style(&JsValue::from_str("#ffffff"));
    context.fill_rect(0.0, 0.0, width as f64, height as f64);

    let image = HtmlImageElement::new()
        .map_err(|_| RenderError::ImageLoad("unable to create image".into()))?;
    image.set_src(url);
    JsFuture::from(image.decode())
        .await
        .map_err(|err| RenderError::ImageLoad(format!("{err:?}")))?;

    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(|err| RenderError::ImageLoad(format!("{err:?}")))?;

    let data_url = canvas
        .to_data_url_with_type("image/png")
        .map_err(|_| RenderError::Encode("unable to serialise canvas".into()))?;
    let payload = data_url
        .split(',')
        .nth(1)
        .ok_or_else(|| RenderError::Encode("malformed data URL".into()))?;

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|err| RenderError::Encode(err.to_string()))
}
