//! SVG markup writer for scene descriptions.
//!
//! The markup is the hand-off format to the renderers: resvg parses it on
//! desktop, the browser decodes it on the web.


use super::scene::{Anchor, Primitive, Scene, Sector, Stroke, TextRun, Weight};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Spans at or above this are drawn as a closed circle.
const FULL_TURN_EPSILON: f64 = 1e-9;

pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::with_capacity(256 + scene.primitives.len() * 160);
    let w = num(scene.width);
    let h = num(scene.height);
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    ));

    for primitive in &scene.primitives {
        out.push('\n');
        match primitive {
            Primitive::Rect(rect) => {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    num(rect.x),
                    num(rect.y),
                    num(rect.width.max(0.0)),
                    num(rect.height.max(0.0))
                ));
                if rect.radius > 0.0 {
                    let r = num(rect.radius);
                    out.push_str(&format!(" rx=\"{r}\" ry=\"{r}\""));
                }
                write_paint(&mut out, Some(&rect.fill), rect.stroke.as_ref());
                out.push_str("/>");
            }
            Primitive::Sector(sector) => {
                out.push_str(&format!("<path d=\"{}\"", sector_path(sector)));
                write_paint(&mut out, Some(&sector.fill), sector.stroke.as_ref());
                out.push_str("/>");
            }
            Primitive::Circle(circle) => {
                out.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    num(circle.cx),
                    num(circle.cy),
                    num(circle.radius)
                ));
                write_paint(
                    &mut out,
                    Some(circle.fill.as_deref().unwrap_or("none")),
                    circle.stroke.as_ref(),
                );
                out.push_str("/>");
            }
            Primitive::Line(line) => {
                out.push_str(&format!(
                    "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                    num(line.x1),
                    num(line.y1),
                    num(line.x2),
                    num(line.y2)
                ));
                write_paint(&mut out, None, Some(&line.stroke));
                if let Some((dash, gap)) = line.dash {
                    out.push_str(&format!(" stroke-dasharray=\"{} {}\"", num(dash), num(gap)));
                }
                out.push_str("/>");
            }
            Primitive::Text(text) => write_text(&mut out, text),
        }
    }

    out.push_str("\n</svg>");
    out
}

fn write_text(out: &mut String, text: &TextRun) {
    let anchor = match text.anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
        Anchor::End => "end",
    };
    let weight = match text.weight {
        Weight::Normal => "normal",
        Weight::Bold => "bold",
    };
    out.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-family=\"{FONT_FAMILY}\" font-size=\"{}\" font-weight=\"{weight}\" text-anchor=\"{anchor}\" fill=\"{}\"",
        num(text.x),
        num(text.y),
        num(text.size),
        escape(&text.color)
    ));
    if let Some(degrees) = text.rotate {
        out.push_str(&format!(
            " transform=\"rotate({}, {}, {})\"",
            num(degrees),
            num(text.x),
            num(text.y)
        ));
    }
    out.push_str(&format!(">{}</text>", escape(&text.content)));
}

fn write_paint(out: &mut String, fill: Option<&str>, stroke: Option<&Stroke>) {
    if let Some(fill) = fill {
        out.push_str(&format!(" fill=\"{}\"", escape(fill)));
    }
    if let Some(stroke) = stroke {
        out.push_str(&format!(
            " stroke=\"{}\" stroke-width=\"{}\"",
            escape(&stroke.color),
            num(stroke.width)
        ));
    }
}

/// Wedge path from the center. A full turn has identical start and end
/// points, which an SVG arc cannot express, so it is split in two halves.
pub fn sector_path(sector: &Sector) -> String {
    let r = num(sector.radius);
    let (cx, cy) = (num(sector.cx), num(sector.cy));

    if sector.span_deg() >= 360.0 - FULL_TURN_EPSILON {
        let (x1, y1) = sector.point_at(sector.start_deg);
        let (x2, y2) = sector.point_at(sector.start_deg + 180.0);
        return format!(
            "M {} {} A {r} {r} 0 1 1 {} {} A {r} {r} 0 1 1 {} {} Z",
            num(x1),
            num(y1),
            num(x2),
            num(y2),
            num(x1),
            num(y1),
        );
    }

    let (x1, y1) = sector.point_at(sector.start_deg);
    let (x2, y2) = sector.point_at(sector.end_deg);
    let large_arc = u8::from(sector.large_arc());
    format!(
        "M {cx} {cy} L {} {} A {r} {r} 0 {large_arc} 1 {} {} Z",
        num(x1),
        num(y1),
        num(x2),
        num(y2),
    )
}

/// Up to three decimals, trailing zeros trimmed, never `-0`.
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".into();
    }
    let mut text = format!("{value:.3}");
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".into();
    }
    text
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
