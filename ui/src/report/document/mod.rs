//! Page model of the PDF report.
//!
//! Layout code never keeps a hidden cursor: every operation consumes a
//! [`PageBuilder`] and hands back the updated one, so the current page and
//! vertical position are plain values that tests can inspect.

pub mod layout;
pub mod pdf;
mod team;

use crate::report::render::Bitmap;

/// Millimetres per typographic point.
pub const MM_PER_PT: f64 = 25.4 / 72.0;

/// Average Helvetica advance, as a fraction of the font size.
const AVERAGE_ADVANCE_EM: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// `#rrggbb` or `rrggbb`; anything else is black.
    pub fn from_hex(hex: &str) -> Self {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Self::BLACK;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        match (channel(0), channel(2), channel(4)) {
            (Some(r), Some(g), Some(b)) => Rgb(r, g, b),
            _ => Self::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Something placed on a page. Coordinates are millimetres from the top-left
/// corner; text `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Fill {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        color: Rgb,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        size: f64,
        style: FontStyle,
        color: Rgb,
        align: Align,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        bitmap: Bitmap,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &Bitmap> {
        self.elements.iter().filter_map(|e| match e {
            Element::Image { bitmap, .. } => Some(bitmap),
            _ => None,
        })
    }
}

/// Pages written so far plus the vertical cursor on the last one.
///
/// Pages are only ever appended; earlier pages are never revisited.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBuilder {
    width: f64,
    height: f64,
    cursor: f64,
    pages: Vec<Page>,
}

impl PageBuilder {
    /// Starts a document with one empty page.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            cursor: 0.0,
            pages: vec![Page::default()],
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current(&self) -> &Page {
        // Never empty: `new` seeds one page and pages are never removed.
        &self.pages[self.pages.len() - 1]
    }

    pub fn finish(self) -> Vec<Page> {
        self.pages
    }

    pub fn new_page(mut self) -> Self {
        self.pages.push(Page::default());
        self.cursor = 0.0;
        self
    }

    pub fn at(mut self, y: f64) -> Self {
        self.cursor = y;
        self
    }

    pub fn advance(mut self, dy: f64) -> Self {
        self.cursor += dy;
        self
    }

    /// Opens a new page at `restart` once the cursor has passed
    /// `height - bottom_margin`.
    pub fn break_if_past(self, bottom_margin: f64, restart: f64) -> Self {
        if self.cursor > self.height - bottom_margin {
            self.new_page().at(restart)
        } else {
            self
        }
    }

    pub fn place(mut self, element: Element) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
        self
    }

    pub fn fill(self, x: f64, y: f64, width: f64, height: f64, color: Rgb) -> Self {
        self.place(Element::Fill {
            x,
            y,
            width,
            height,
            radius: 0.0,
            color,
        })
    }

    pub fn rounded(self, x: f64, y: f64, width: f64, height: f64, radius: f64, color: Rgb) -> Self {
        self.place(Element::Fill {
            x,
            y,
            width,
            height,
            radius,
            color,
        })
    }

    pub fn text(self, x: f64, y: f64, content: impl Into<String>, style: TextStyle) -> Self {
        self.place(Element::Text {
            x,
            y,
            content: content.into(),
            size: style.size,
            style: style.font,
            color: style.color,
            align: style.align,
        })
    }
}

/// Font settings for one text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f64,
    pub font: FontStyle,
    pub color: Rgb,
    pub align: Align,
}

impl TextStyle {
    pub fn regular(size: f64) -> Self {
        Self {
            size,
            font: FontStyle::Regular,
            color: Rgb::BLACK,
            align: Align::Left,
        }
    }

    pub fn bold(size: f64) -> Self {
        Self {
            font: FontStyle::Bold,
            ..Self::regular(size)
        }
    }

    pub fn italic(size: f64) -> Self {
        Self {
            font: FontStyle::Italic,
            ..Self::regular(size)
        }
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }
}

/// Estimated width of `text` in millimetres at `size` points.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVERAGE_ADVANCE_EM * MM_PER_PT
}

/// Greedy whitespace wrapping against the estimated width. A single word
/// wider than the line is kept whole on its own line.
pub fn wrap_text(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if text_width(&candidate, size) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(Rgb::from_hex("#1e40af"), Rgb(30, 64, 175));
        assert_eq!(Rgb::from_hex("d97706"), Rgb(217, 119, 6));
        assert_eq!(Rgb::from_hex("#fff"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#zzzzzz"), Rgb::BLACK);
    }

    #[test]
    fn builder_is_threaded_by_value() {
        let builder = PageBuilder::new(210.0, 297.0).at(20.0).advance(15.0);
        assert_eq!(builder.cursor(), 35.0);
        assert_eq!(builder.page_count(), 1);

        let builder = builder.new_page();
        assert_eq!(builder.page_count(), 2);
        assert_eq!(builder.cursor(), 0.0);
    }

    #[test]
    fn page_breaks_only_past_the_bottom_margin() {
        let builder = PageBuilder::new(210.0, 297.0).at(267.0).break_if_past(30.0, 30.0);
        assert_eq!(builder.page_count(), 1);

        let builder = builder.advance(0.5).break_if_past(30.0, 30.0);
        assert_eq!(builder.page_count(), 2);
        assert_eq!(builder.cursor(), 30.0);
    }

    #[test]
    fn elements_land_on_the_last_page() {
        let builder = PageBuilder::new(210.0, 297.0)
            .text(20.0, 10.0, "premier", TextStyle::regular(10.0))
            .new_page()
            .text(20.0, 10.0, "second", TextStyle::bold(10.0));
        let pages = builder.finish();
        assert_eq!(pages[0].texts().collect::<Vec<_>>(), ["premier"]);
        assert_eq!(pages[1].texts().collect::<Vec<_>>(), ["second"]);
    }

    #[test]
    fn wrapping_breaks_at_whitespace() {
        // 10pt: one character is about 1.76 mm, so 20 mm holds 11 characters.
        let lines = wrap_text("Dev: 4.0h (50.0%) • Meeting: 4.0h", 20.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.join(" "), "Dev: 4.0h (50.0%) • Meeting: 4.0h");
        assert!(wrap_text("   ", 20.0, 10.0).is_empty());
    }
}
