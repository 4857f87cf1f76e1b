//! Serializes laid-out pages with printpdf, using the base-14 Helvetica
//! faces so no font file has to be shipped.

use printpdf::image_crate::{self, ImageFormat};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rect,
};
use thiserror::Error;

use super::{text_width, Align, Element, FontStyle, Page, Rgb};

/// Segments used to approximate each rounded corner.
const CORNER_SEGMENTS: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("unable to load font: {0}")]
    Font(String),
    #[error("unable to embed image: {0}")]
    Image(String),
    #[error("unable to serialize document: {0}")]
    Serialize(String),
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn load(doc: &PdfDocumentReference) -> Result<Self, DocumentError> {
        let builtin = |font| {
            doc.add_builtin_font(font)
                .map_err(|err| DocumentError::Font(err.to_string()))
        };
        Ok(Self {
            regular: builtin(BuiltinFont::Helvetica)?,
            bold: builtin(BuiltinFont::HelveticaBold)?,
            italic: builtin(BuiltinFont::HelveticaOblique)?,
        })
    }

    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

/// Writes every page, in order, into one PDF file.
pub fn write_pdf(
    title: &str,
    pages: &[Page],
    width: f64,
    height: f64,
) -> Result<Vec<u8>, DocumentError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(width as f32), Mm(height as f32), "Layer 1");
    let fonts = Fonts::load(&doc)?;

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(width as f32), Mm(height as f32), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };
        let canvas = PageCanvas {
            layer,
            fonts: &fonts,
            height,
        };
        for element in &page.elements {
            canvas.draw(element)?;
        }
    }

    doc.save_to_bytes()
        .map_err(|err| DocumentError::Serialize(err.to_string()))
}

/// Converts top-left millimetre coordinates to PDF user space.
struct PageCanvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    height: f64,
}

impl PageCanvas<'_> {
    fn draw(&self, element: &Element) -> Result<(), DocumentError> {
        match element {
            Element::Fill {
                x,
                y,
                width,
                height,
                radius,
                color,
            } => {
                self.layer.set_fill_color(pdf_color(*color));
                if *radius > 0.0 {
                    self.layer
                        .add_polygon(rounded_polygon(*x, self.flip(y + height), *width, *height, *radius));
                } else {
                    self.layer.add_rect(
                        Rect::new(
                            mm(*x),
                            mm(self.flip(y + height)),
                            mm(x + width),
                            mm(self.flip(*y)),
                        )
                        .with_mode(PaintMode::Fill),
                    );
                }
            }
            Element::Text {
                x,
                y,
                content,
                size,
                style,
                color,
                align,
            } => {
                let left = match align {
                    Align::Left => *x,
                    Align::Center => x - text_width(content, *size) / 2.0,
                    Align::Right => x - text_width(content, *size),
                };
                self.layer.set_fill_color(pdf_color(*color));
                self.layer.use_text(
                    content.as_str(),
                    *size as f32,
                    mm(left),
                    mm(self.flip(*y)),
                    self.fonts.get(*style),
                );
            }
            Element::Image {
                x,
                y,
                width,
                height,
                bitmap,
            } => {
                let decoded = image_crate::load_from_memory_with_format(&bitmap.png, ImageFormat::Png)
                    .map_err(|err| DocumentError::Image(err.to_string()))?;
                // Flattened to RGB: charts are drawn on an opaque background.
                let rgb = image_crate::DynamicImage::ImageRgb8(decoded.to_rgb8());
                let (px_w, px_h) = (rgb.width() as f64, rgb.height() as f64);
                let dpi = px_w * 25.4 / width;
                let natural_height = px_h * 25.4 / dpi;
                Image::from_dynamic_image(&rgb).add_to_layer(
                    self.layer.clone(),
                    ImageTransform {
                        translate_x: Some(mm(*x)),
                        translate_y: Some(mm(self.flip(y + height))),
                        dpi: Some(dpi as f32),
                        scale_y: Some((height / natural_height) as f32),
                        ..Default::default()
                    },
                );
            }
        }
        Ok(())
    }

    fn flip(&self, y: f64) -> f64 {
        self.height - y
    }
}

fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

fn pdf_color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb(printpdf::Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

/// Rounded rectangle whose lower-left corner is at (`x`, `bottom`) in PDF
/// space. Corners are approximated with short straight segments.
fn rounded_polygon(x: f64, bottom: f64, width: f64, height: f64, radius: f64) -> Polygon {
    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    let corners = [
        (x + width - r, bottom + r, 270.0),
        (x + width - r, bottom + height - r, 0.0),
        (x + r, bottom + height - r, 90.0),
        (x + r, bottom + r, 180.0),
    ];

    let mut ring = Vec::with_capacity(4 * (CORNER_SEGMENTS + 1));
    for (cx, cy, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = (start + 90.0 * step as f64 / CORNER_SEGMENTS as f64).to_radians();
            let point = Point::new(mm(cx + r * angle.cos()), mm(cy + r * angle.sin()));
            ring.push((point, false));
        }
    }

    Polygon {
        rings: vec![ring],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::document::{PageBuilder, TextStyle};
    use crate::report::render::Bitmap;

    fn tiny_png() -> Vec<u8> {
        let image = image_crate::RgbaImage::from_pixel(4, 2, image_crate::Rgba([30, 64, 175, 255]));
        let mut bytes = std::io::Cursor::new(Vec::new());
        image_crate::DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn writes_fills_rounded_cards_and_text() {
        let pages = PageBuilder::new(210.0, 297.0)
            .fill(0.0, 0.0, 210.0, 45.0, Rgb(30, 64, 175))
            .rounded(20.0, 55.0, 40.0, 25.0, 3.0, Rgb(5, 150, 105))
            .text(105.0, 22.0, "RAPPORT D'IMPUTATION", TextStyle::bold(22.0).centered())
            .new_page()
            .text(20.0, 30.0, "Catégorie • Heures", TextStyle::regular(10.0))
            .finish();

        let bytes = write_pdf("Rapport", &pages, 210.0, 297.0).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn embeds_chart_bitmaps() {
        let pages = PageBuilder::new(210.0, 297.0)
            .place(Element::Image {
                x: 10.0,
                y: 55.0,
                width: 190.0,
                height: 95.0,
                bitmap: Bitmap {
                    width: 4,
                    height: 2,
                    png: tiny_png(),
                },
            })
            .finish();
        let bytes = write_pdf("Rapport", &pages, 210.0, 297.0).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn corrupt_bitmaps_are_reported() {
        let pages = PageBuilder::new(210.0, 297.0)
            .place(Element::Image {
                x: 10.0,
                y: 55.0,
                width: 190.0,
                height: 95.0,
                bitmap: Bitmap {
                    width: 4,
                    height: 2,
                    png: b"not a png".to_vec(),
                },
            })
            .finish();
        let err = write_pdf("Rapport", &pages, 210.0, 297.0).unwrap_err();
        assert!(matches!(err, DocumentError::Image(_)));
    }

    #[test]
    fn rounded_corners_close_the_ring() {
        let polygon = rounded_polygon(0.0, 0.0, 40.0, 25.0, 3.0);
        assert_eq!(polygon.rings[0].len(), 4 * (CORNER_SEGMENTS + 1));
    }
}
