//! Layout constants of the weekly report, grouped so they can be overridden
//! from JSON without touching the pipeline.

use serde::{Deserialize, Serialize};

/// Chart colors, in assignment order. Entry `i` of a series takes
/// `CHART_COLORS[i % len]`.
pub const CHART_COLORS: [&str; 15] = [
    "#1e40af", "#059669", "#dc2626", "#d97706", "#0891b2", "#16a34a", "#7c3aed", "#e11d48",
    "#0d9488", "#4f46e5", "#9333ea", "#db2777", "#65a30d", "#ca8a04", "#0284c7",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub bar: BarChartConfig,
    pub pie: PieChartConfig,
    pub page: PageConfig,
    /// Rasterization factor applied to the nominal embed size.
    pub oversample: u32,
    pub palette: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bar: BarChartConfig::default(),
            pie: PieChartConfig::default(),
            page: PageConfig::default(),
            oversample: 8,
            palette: CHART_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ReportConfig {
    /// Partial documents are accepted; missing keys keep their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 90.0,
            right: 60.0,
            bottom: 90.0,
            left: 90.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarChartConfig {
    pub width: f64,
    pub height: f64,
    pub margin: Margins,
    /// Horizontal space left between two bars.
    pub gutter: f64,
    pub tick_count: usize,
    pub title_size: f64,
    pub axis_title_size: f64,
    pub axis_label_size: f64,
    pub value_size: f64,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 700.0,
            margin: Margins::default(),
            gutter: 15.0,
            tick_count: 6,
            title_size: 24.0,
            axis_title_size: 18.0,
            axis_label_size: 16.0,
            value_size: 18.0,
        }
    }
}

impl BarChartConfig {
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PieChartConfig {
    pub width: f64,
    pub height: f64,
    /// Distance kept between the pie and the canvas edge.
    pub radius_inset: f64,
    /// Slices narrower than this (degrees) get no percentage label.
    pub label_min_degrees: f64,
    pub label_radius_ratio: f64,
    pub legend_row_height: f64,
    pub title_size: f64,
    pub legend_title_size: f64,
    pub legend_value_size: f64,
    pub slice_label_size: f64,
}

impl Default for PieChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            radius_inset: 80.0,
            label_min_degrees: 15.0,
            label_radius_ratio: 0.6,
            legend_row_height: 35.0,
            title_size: 24.0,
            legend_title_size: 16.0,
            legend_value_size: 14.0,
            slice_label_size: 16.0,
        }
    }
}

/// Page geometry in millimetres (A4 portrait by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub width: f64,
    pub height: f64,
    /// Table rows never start below `height - bottom_margin`.
    pub bottom_margin: f64,
    /// Cursor position of a continuation page.
    pub continuation_top: f64,
    pub label_max_chars: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            bottom_margin: 30.0,
            continuation_top: 30.0,
            label_max_chars: 35,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let config = ReportConfig::from_json_str(r#"{"oversample": 4, "bar": {"gutter": 10}}"#)
            .unwrap();
        assert_eq!(config.oversample, 4);
        assert_eq!(config.bar.gutter, 10.0);
        assert_eq!(config.bar.width, 1200.0);
        assert_eq!(config.page.bottom_margin, 30.0);
        assert_eq!(config.palette.len(), CHART_COLORS.len());
    }

    #[test]
    fn default_plot_area() {
        let bar = BarChartConfig::default();
        assert_eq!(bar.inner_width(), 1050.0);
        assert_eq!(bar.inner_height(), 520.0);
    }
}
