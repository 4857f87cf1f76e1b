//! Vertical bar chart with a shared linear scale, gridlines and value labels.

use super::scene::{
    Anchor, ChartOptions, LineShape, Palette, Primitive, RectShape, Scene, Series, Stroke, TextRun,
};
use crate::core::format::{format_hours, format_number};
use crate::report::config::BarChartConfig;

const SHADOW: &str = "rgba(0,0,0,0.2)";
const AXIS: &str = "#6b7280";
const GRID: &str = "#e5e7eb";
const BORDER: &str = "#d1d5db";
const INK: &str = "#1f2937";
const LABEL: &str = "#374151";

const BAR_RADIUS: f64 = 4.0;
const BAR_INSET: f64 = 5.0;
const SHADOW_DX: f64 = 8.0;
const SHADOW_DY: f64 = 5.0;
const TICK_LENGTH: f64 = 10.0;

/// Geometry shared by every bar of one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarScale {
    pub max_value: f64,
    /// Pixels per unit. Exactly 1 when the series has no positive value.
    pub factor: f64,
    pub slot_width: f64,
    pub bar_width: f64,
}

impl BarScale {
    pub fn compute(series: &Series, config: &BarChartConfig) -> Self {
        let max_value = series.values().filter(|v| v.is_finite()).fold(0.0, f64::max);
        let factor = if max_value > 0.0 {
            config.inner_height() / max_value
        } else {
            1.0
        };
        let count = series.len().max(1) as f64;
        let slot_width = config.inner_width() / count;
        Self {
            max_value,
            factor,
            slot_width,
            bar_width: (slot_width - config.gutter).max(0.0),
        }
    }

    pub fn bar_height(&self, value: f64) -> f64 {
        if value.is_finite() && value > 0.0 {
            value * self.factor
        } else {
            0.0
        }
    }
}

pub fn bar_chart(
    series: &Series,
    palette: &Palette,
    options: &ChartOptions,
    config: &BarChartConfig,
) -> Scene {
    let scale = BarScale::compute(series, config);
    let margin = config.margin;
    let inner_w = config.inner_width();
    let inner_h = config.inner_height();
    let baseline = margin.top + inner_h;

    let mut scene = Scene::new(config.width, config.height);
    scene.push(Primitive::Rect(RectShape {
        x: 0.0,
        y: 0.0,
        width: config.width,
        height: config.height,
        radius: 8.0,
        fill: "#ffffff".into(),
        stroke: None,
    }));

    if let Some(title) = &options.title {
        scene.push(Primitive::Text(
            TextRun::new(config.width / 2.0, margin.top / 2.0, title, config.title_size)
                .anchor(Anchor::Middle)
                .bold()
                .color(INK),
        ));
    }

    scene.push(axis_line(margin.left, margin.top, margin.left, baseline));

    let ticks = config.tick_count.max(1);
    for step in 0..=ticks {
        let value = scale.max_value * step as f64 / ticks as f64;
        let y = baseline - value * scale.factor;
        scene.push(Primitive::Line(LineShape {
            x1: margin.left,
            y1: y,
            x2: margin.left + inner_w,
            y2: y,
            stroke: Stroke {
                color: GRID.into(),
                width: 1.0,
            },
            dash: None,
        }));
        scene.push(axis_line(margin.left - TICK_LENGTH, y, margin.left, y));
        scene.push(Primitive::Text(
            TextRun::new(
                margin.left - 20.0,
                y + 6.0,
                format_number(value, 1),
                config.axis_label_size,
            )
            .anchor(Anchor::End)
            .color(AXIS),
        ));
    }

    if let Some(title) = &options.y_axis_title {
        let x = margin.left - 60.0;
        let y = margin.top + inner_h / 2.0;
        scene.push(Primitive::Text(
            TextRun::new(x, y, title, config.axis_title_size)
                .anchor(Anchor::Middle)
                .bold()
                .color(LABEL)
                .rotated(-90.0),
        ));
    }

    scene.push(axis_line(margin.left, baseline, margin.left + inner_w, baseline));

    for (index, label) in series.labels().enumerate() {
        let x = margin.left + index as f64 * scale.slot_width + scale.slot_width / 2.0;
        scene.push(Primitive::Text(
            TextRun::new(x, baseline + 30.0, label, config.axis_label_size)
                .anchor(Anchor::Middle)
                .bold()
                .color(LABEL),
        ));
    }

    if let Some(title) = &options.x_axis_title {
        scene.push(Primitive::Text(
            TextRun::new(
                margin.left + inner_w / 2.0,
                config.height - 25.0,
                title,
                config.axis_title_size,
            )
            .anchor(Anchor::Middle)
            .bold()
            .color(LABEL),
        ));
    }

    for (index, value) in series.values().enumerate() {
        let height = scale.bar_height(value);
        let x = margin.left + index as f64 * scale.slot_width;
        let y = baseline - height;

        scene.push(Primitive::Rect(RectShape {
            x: x + SHADOW_DX,
            y: y + SHADOW_DY,
            width: scale.bar_width,
            height,
            radius: BAR_RADIUS,
            fill: SHADOW.into(),
            stroke: None,
        }));
        scene.push(Primitive::Rect(RectShape {
            x: x + BAR_INSET,
            y,
            width: scale.bar_width,
            height,
            radius: BAR_RADIUS,
            fill: palette.color(index).to_string(),
            stroke: Some(Stroke {
                color: "#ffffff".into(),
                width: 3.0,
            }),
        }));
        scene.push(Primitive::Text(
            TextRun::new(
                x + scale.bar_width / 2.0 + BAR_INSET,
                y - 12.0,
                format_hours(if value.is_finite() { value } else { 0.0 }),
                config.value_size,
            )
            .anchor(Anchor::Middle)
            .bold()
            .color(INK),
        ));
    }

    scene.push(Primitive::Rect(RectShape {
        x: margin.left,
        y: margin.top,
        width: inner_w,
        height: inner_h,
        radius: BAR_RADIUS,
        fill: "none".into(),
        stroke: Some(Stroke {
            color: BORDER.into(),
            width: 1.0,
        }),
    }));

    scene
}

fn axis_line(x1: f64, y1: f64, x2: f64, y2: f64) -> Primitive {
    Primitive::Line(LineShape {
        x1,
        y1,
        x2,
        y2,
        stroke: Stroke {
            color: AXIS.into(),
            width: 2.0,
        },
        dash: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars(scene: &Scene) -> Vec<&RectShape> {
        // Main bars are the only rects carrying a white stroke.
        scene
            .rects()
            .filter(|r| r.stroke.as_ref().is_some_and(|s| s.color == "#ffffff"))
            .collect()
    }

    #[test]
    fn scale_uses_the_largest_value() {
        let config = BarChartConfig::default();
        let series = Series::new([("lun", 4.0), ("mar", 8.0)]);
        let scale = BarScale::compute(&series, &config);
        assert_eq!(scale.max_value, 8.0);
        assert!((scale.factor - 520.0 / 8.0).abs() < 1e-9);
        assert!((scale.bar_width - (525.0 - 15.0)).abs() < 1e-9);
    }

    #[test]
    fn all_zero_series_falls_back_to_unit_scale() {
        let config = BarChartConfig::default();
        let series = Series::new([("lun", 0.0), ("mar", 0.0), ("mer", 0.0)]);
        let scale = BarScale::compute(&series, &config);
        assert_eq!(scale.factor, 1.0);

        let scene = bar_chart(&series, &Palette::default(), &ChartOptions::default(), &config);
        let heights: Vec<f64> = bars(&scene).iter().map(|r| r.height).collect();
        assert_eq!(heights, [0.0, 0.0, 0.0]);
        assert!(scene
            .primitives
            .iter()
            .all(|p| !matches!(p, Primitive::Rect(r) if r.y.is_nan() || r.height.is_nan())));
    }

    #[test]
    fn each_bar_has_a_shadow_and_a_value_label() {
        let config = BarChartConfig::default();
        let series = Series::new([("08/01", 7.5), ("09/01", 6.0)]);
        let scene = bar_chart(&series, &Palette::default(), &ChartOptions::default(), &config);

        let shadows = scene.rects().filter(|r| r.fill == SHADOW).count();
        assert_eq!(shadows, 2);
        assert_eq!(bars(&scene).len(), 2);

        let values: Vec<&str> = scene
            .texts()
            .map(|t| t.content.as_str())
            .filter(|c| c.ends_with('h'))
            .collect();
        assert_eq!(values, ["7.5h", "6.0h"]);
    }

    #[test]
    fn gridlines_cover_zero_to_max() {
        let config = BarChartConfig::default();
        let series = Series::new([("a", 6.0)]);
        let scene = bar_chart(&series, &Palette::default(), &ChartOptions::default(), &config);
        let ticks: Vec<&str> = scene
            .texts()
            .filter(|t| t.anchor == Anchor::End)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(ticks, ["0.0", "1.0", "2.0", "3.0", "4.0", "5.0", "6.0"]);
    }

    #[test]
    fn colors_wrap_around_the_palette() {
        let config = BarChartConfig::default();
        let series = Series::new([("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let palette = Palette::new(["#111", "#222"]);
        let scene = bar_chart(&series, &palette, &ChartOptions::default(), &config);
        let fills: Vec<&str> = bars(&scene).iter().map(|r| r.fill.as_str()).collect();
        assert_eq!(fills, ["#111", "#222", "#111"]);
    }

    #[test]
    fn empty_series_draws_axes_only() {
        let config = BarChartConfig::default();
        let scene = bar_chart(
            &Series::default(),
            &Palette::default(),
            &ChartOptions::titled("Heures par jour"),
            &config,
        );
        assert!(bars(&scene).is_empty());
        assert!(scene.texts().any(|t| t.content == "Heures par jour"));
    }
}
