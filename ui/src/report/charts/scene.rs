//! Scene description: absolute-coordinate drawing primitives on a fixed
//! logical canvas. Pure data, consumed by the markup writer.

use crate::core::records::HourMap;
use crate::report::config::CHART_COLORS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub fill: String,
    pub stroke: Option<Stroke>,
}

/// Circular sector swept clockwise from `start_deg` to `end_deg`.
///
/// Angles follow the screen convention: 0° points right and positive angles
/// turn clockwise, so -90° is 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    pub fill: String,
    pub stroke: Option<Stroke>,
}

impl Sector {
    pub fn span_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    pub fn large_arc(&self) -> bool {
        self.span_deg() > 180.0
    }

    /// Point on the outer arc at `angle_deg`.
    pub fn point_at(&self, angle_deg: f64) -> (f64, f64) {
        polar(self.cx, self.cy, self.radius, angle_deg)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Option<String>,
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Stroke,
    /// Dash and gap lengths; `None` draws a solid line.
    pub dash: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub size: f64,
    pub color: String,
    pub anchor: Anchor,
    pub weight: Weight,
    /// Rotation in degrees around the anchor point.
    pub rotate: Option<f64>,
}

impl TextRun {
    pub fn new(x: f64, y: f64, content: impl Into<String>, size: f64) -> Self {
        Self {
            x,
            y,
            content: content.into(),
            size,
            color: "#374151".into(),
            anchor: Anchor::Start,
            weight: Weight::Normal,
            rotate: None,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.weight = Weight::Bold;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn rotated(mut self, degrees: f64) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(RectShape),
    Sector(Sector),
    Circle(CircleShape),
    Line(LineShape),
    Text(TextRun),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn sectors(&self) -> impl Iterator<Item = &Sector> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Sector(sector) => Some(sector),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = &RectShape> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Rect(rect) => Some(rect),
            _ => None,
        })
    }
}

/// Ordered `(label, value)` pairs feeding one chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<(String, f64)>,
}

impl Series {
    pub fn new<L: Into<String>>(points: impl IntoIterator<Item = (L, f64)>) -> Self {
        Self {
            points: points.into_iter().map(|(l, v)| (l.into(), v)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(label, _)| label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, value)| *value)
    }
}

impl From<&HourMap> for Series {
    fn from(map: &HourMap) -> Self {
        Series::new(map.iter())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// An empty list falls back to the default chart colors.
    pub fn new<C: Into<String>>(colors: impl IntoIterator<Item = C>) -> Self {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            Self::default()
        } else {
            Self { colors }
        }
    }

    /// Entry `index` of a series always takes `colors[index % len]`.
    pub fn color(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: CHART_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Titles drawn around a chart. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartOptions {
    pub title: Option<String>,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
}

impl ChartOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

pub(crate) fn polar(cx: f64, cy: f64, radius: f64, angle_deg: f64) -> (f64, f64) {
    let rad = angle_deg.to_radians();
    (cx + radius * rad.cos(), cy + radius * rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        let palette = Palette::new(["#111", "#222"]);
        assert_eq!(palette.color(0), "#111");
        assert_eq!(palette.color(1), "#222");
        assert_eq!(palette.color(2), palette.color(0));
        assert_eq!(palette.color(5), "#222");
    }

    #[test]
    fn empty_palette_uses_default_colors() {
        let palette = Palette::new(Vec::<String>::new());
        assert_eq!(palette.len(), CHART_COLORS.len());
        assert_eq!(palette.color(0), CHART_COLORS[0]);
    }

    #[test]
    fn minus_ninety_degrees_points_up() {
        let (x, y) = polar(100.0, 100.0, 10.0, -90.0);
        assert!((x - 100.0).abs() < 1e-9);
        assert!((y - 90.0).abs() < 1e-9);
    }
}
