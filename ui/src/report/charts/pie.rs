//! Pie chart: proportional sectors, in-slice percentages and a side legend.

use super::scene::{
    polar, Anchor, ChartOptions, CircleShape, Palette, Primitive, RectShape, Scene, Sector,
    Series, Stroke, TextRun,
};
use crate::core::format::{format_hours, format_percent};
use crate::report::config::PieChartConfig;

const SHADOW: &str = "rgba(0,0,0,0.1)";
const INK: &str = "#1f2937";
const LABEL: &str = "#374151";
const MUTED: &str = "#6b7280";
const GUIDE: &str = "#e5e7eb";

const SHADOW_OFFSET: f64 = 5.0;
const START_DEG: f64 = -90.0;
const SWATCH: f64 = 20.0;

/// One proportional sector before it is turned into primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Share of the total, in percent.
    pub share: f64,
    pub start_deg: f64,
    pub end_deg: f64,
    pub color: String,
}

impl Slice {
    pub fn span_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.span_deg() / 2.0
    }
}

/// Keeps strictly positive finite values, in input order.
pub fn positive_points(series: &Series) -> Vec<(&str, f64)> {
    series
        .points
        .iter()
        .filter(|(_, value)| value.is_finite() && *value > 0.0)
        .map(|(label, value)| (label.as_str(), *value))
        .collect()
}

/// Cumulative angles, starting at 12 o'clock and running clockwise.
///
/// Colors are assigned by position among the kept values, so a filtered
/// entry does not consume a palette slot.
pub fn slices(series: &Series, palette: &Palette) -> Vec<Slice> {
    let points = positive_points(series);
    let total: f64 = points.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut cursor = 0.0;
    points
        .into_iter()
        .enumerate()
        .map(|(index, (label, value))| {
            let span = value / total * 360.0;
            let start = cursor;
            cursor += span;
            Slice {
                label: label.to_string(),
                value,
                share: value / total * 100.0,
                start_deg: START_DEG + start,
                end_deg: START_DEG + start + span,
                color: palette.color(index).to_string(),
            }
        })
        .collect()
}

pub fn pie_chart(
    series: &Series,
    palette: &Palette,
    options: &ChartOptions,
    config: &PieChartConfig,
) -> Scene {
    let slices = slices(series, palette);
    if slices.is_empty() {
        return placeholder(config);
    }

    let mut scene = Scene::new(config.width, config.height);
    scene.push(background(config));

    if let Some(title) = &options.title {
        scene.push(Primitive::Text(
            TextRun::new(config.width / 2.0, 40.0, title, config.title_size)
                .anchor(Anchor::Middle)
                .bold()
                .color(INK),
        ));
    }

    let radius = (config.width.min(config.height) / 2.0 - config.radius_inset).max(1.0);
    let (cx, cy) = (config.width / 2.0, config.height / 2.0);

    for slice in &slices {
        scene.push(Primitive::Sector(Sector {
            cx: cx + SHADOW_OFFSET,
            cy: cy + SHADOW_OFFSET,
            radius,
            start_deg: slice.start_deg,
            end_deg: slice.end_deg,
            fill: SHADOW.into(),
            stroke: None,
        }));
        scene.push(Primitive::Sector(Sector {
            cx,
            cy,
            radius,
            start_deg: slice.start_deg,
            end_deg: slice.end_deg,
            fill: slice.color.clone(),
            stroke: Some(Stroke {
                color: "#ffffff".into(),
                width: 4.0,
            }),
        }));

        if slice.span_deg() > config.label_min_degrees {
            let (lx, ly) = polar(cx, cy, radius * config.label_radius_ratio, slice.mid_deg());
            scene.push(Primitive::Text(
                TextRun::new(lx, ly, format_percent(slice.share, 0), config.slice_label_size)
                    .anchor(Anchor::Middle)
                    .bold()
                    .color("#ffffff"),
            ));
        }
    }

    let legend_x = cx + radius + 40.0;
    let legend_y = cy - slices.len() as f64 * config.legend_row_height / 2.0;
    for (index, slice) in slices.iter().enumerate() {
        let y = legend_y + index as f64 * config.legend_row_height;
        scene.push(Primitive::Rect(RectShape {
            x: legend_x,
            y: y - 10.0,
            width: SWATCH,
            height: SWATCH,
            radius: 3.0,
            fill: slice.color.clone(),
            stroke: Some(Stroke {
                color: "#ffffff".into(),
                width: 2.0,
            }),
        }));
        scene.push(Primitive::Text(
            TextRun::new(legend_x + 30.0, y + 5.0, &slice.label, config.legend_title_size)
                .bold()
                .color(LABEL),
        ));
        scene.push(Primitive::Text(
            TextRun::new(
                legend_x + 30.0,
                y + 20.0,
                format!(
                    "{} ({})",
                    format_hours(slice.value),
                    format_percent(slice.share, 1)
                ),
                config.legend_value_size,
            )
            .color(MUTED),
        ));
    }

    scene.push(Primitive::Circle(CircleShape {
        cx,
        cy,
        radius: radius + 5.0,
        fill: None,
        stroke: Some(Stroke {
            color: GUIDE.into(),
            width: 1.0,
        }),
    }));

    scene
}

fn placeholder(config: &PieChartConfig) -> Scene {
    let mut scene = Scene::new(config.width, config.height);
    scene.push(background(config));
    scene.push(Primitive::Text(
        TextRun::new(
            config.width / 2.0,
            config.height / 2.0,
            crate::t!("chart-no-data"),
            20.0,
        )
        .anchor(Anchor::Middle)
        .bold()
        .color(MUTED),
    ));
    scene
}

fn background(config: &PieChartConfig) -> Primitive {
    Primitive::Rect(RectShape {
        x: 0.0,
        y: 0.0,
        width: config.width,
        height: config.height,
        radius: 8.0,
        fill: "#ffffff".into(),
        stroke: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_sectors(scene: &Scene) -> Vec<&Sector> {
        scene.sectors().filter(|s| s.fill != SHADOW).collect()
    }

    #[test]
    fn non_positive_values_yield_the_placeholder() {
        let series = Series::new([("a", 0.0), ("b", -2.0), ("c", f64::NAN)]);
        let scene = pie_chart(
            &series,
            &Palette::default(),
            &ChartOptions::default(),
            &PieChartConfig::default(),
        );
        assert_eq!(scene.sectors().count(), 0);
        let texts: Vec<&str> = scene.texts().map(|t| t.content.as_str()).collect();
        assert_eq!(texts, ["Aucune donnée disponible"]);
    }

    #[test]
    fn spans_add_up_to_a_full_turn() {
        let series = Series::new([("a", 3.3), ("b", 1.7), ("c", 0.25), ("d", 11.0), ("e", 0.0)]);
        let parts = slices(&series, &Palette::default());
        assert_eq!(parts.len(), 4);
        let sum: f64 = parts.iter().map(Slice::span_deg).sum();
        assert!((sum - 360.0).abs() < 1e-6);
        assert_eq!(parts[0].start_deg, -90.0);
        assert!((parts[3].end_deg - 270.0).abs() < 1e-6);
    }

    #[test]
    fn colors_wrap_with_a_short_palette() {
        let series = Series::new([("a", 10.0), ("b", 10.0), ("c", 10.0)]);
        let palette = Palette::new(["#111", "#222"]);
        let scene = pie_chart(
            &series,
            &palette,
            &ChartOptions::default(),
            &PieChartConfig::default(),
        );
        let fills: Vec<&str> = main_sectors(&scene).iter().map(|s| s.fill.as_str()).collect();
        assert_eq!(fills, ["#111", "#222", "#111"]);
    }

    #[test]
    fn thin_slices_get_no_percentage_label() {
        // 2/100 of a turn is 7.2°, below the 15° threshold.
        let series = Series::new([("big", 98.0), ("thin", 2.0)]);
        let scene = pie_chart(
            &series,
            &Palette::default(),
            &ChartOptions::default(),
            &PieChartConfig::default(),
        );
        let in_slice: Vec<&str> = scene
            .texts()
            .filter(|t| t.color == "#ffffff")
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(in_slice, ["98%"]);
    }

    #[test]
    fn legend_lists_every_slice_in_input_order() {
        let series = Series::new([("Dev", 4.0), ("Meeting", 4.0)]);
        let scene = pie_chart(
            &series,
            &Palette::default(),
            &ChartOptions::titled("Catégories"),
            &PieChartConfig::default(),
        );
        let legend: Vec<&str> = scene
            .texts()
            .filter(|t| t.color == MUTED)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(legend, ["4.0h (50.0%)", "4.0h (50.0%)"]);

        let swatches = scene.rects().filter(|r| r.width == SWATCH).count();
        assert_eq!(swatches, 2);
    }

    #[test]
    fn a_single_value_fills_the_whole_pie() {
        let series = Series::new([("only", 5.0)]);
        let parts = slices(&series, &Palette::default());
        assert_eq!(parts.len(), 1);
        assert!((parts[0].span_deg() - 360.0).abs() < 1e-9);
    }
}
