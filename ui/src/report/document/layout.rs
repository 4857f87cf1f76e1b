//! Section-by-section layout of the weekly activity report.
//!
//! Every section starts on its own page. Charts are rasterized one at a time
//! in document order; the first failure aborts the whole layout.

use thiserror::Error;
use time::OffsetDateTime;

use super::{wrap_text, Element, Page, PageBuilder, Rgb, TextStyle};
use crate::core::format::{
    format_day_month, format_generated_at, format_hours, format_number, format_percent,
    truncate_label,
};
use crate::core::records::{HourMap, ReportInput};
use crate::report::charts::{bar_chart, pie_chart, to_svg, ChartOptions, Palette, Scene, Series};
use crate::report::config::ReportConfig;
use crate::report::metrics::ReportMetrics;
use crate::report::render::{oversampled, RenderError, SceneRenderer};

pub(super) const PRIMARY: Rgb = Rgb(30, 64, 175);
pub(super) const SECONDARY: Rgb = Rgb(5, 150, 105);
pub(super) const WARNING: Rgb = Rgb(217, 119, 6);
pub(super) const INFO: Rgb = Rgb(8, 145, 178);
pub(super) const PURPLE: Rgb = Rgb(124, 58, 237);
pub(super) const INDIGO: Rgb = Rgb(79, 70, 229);
pub(super) const GRAY_50: Rgb = Rgb(249, 250, 251);
pub(super) const GRAY_100: Rgb = Rgb(243, 244, 246);
pub(super) const GRAY_600: Rgb = Rgb(75, 85, 99);
const SHADOW: Rgb = Rgb(209, 213, 219);
const WATERMARK: Rgb = Rgb(200, 200, 200);

const BAND_HEIGHT: f64 = 45.0;
const ACCENT_HEIGHT: f64 = 5.0;
pub(super) const SECTION_TOP: f64 = 55.0;
const SHADOW_OFFSET: f64 = 2.0;

const TABLE_LEFT: f64 = 15.0;
const TABLE_COLUMNS: [f64; 4] = [20.0, 45.0, 90.0, 175.0];
const ROW_HEIGHT: f64 = 10.0;

/// A chart could not be turned into an embeddable bitmap.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unable to embed chart `{chart}`: {source}")]
pub struct ChartEmbedError {
    pub chart: String,
    #[source]
    pub source: RenderError,
}

/// Headings of a distribution page (categories or projects).
struct Distribution {
    band: Rgb,
    title: String,
    subtitle: String,
    chart_title: String,
    detail_heading: String,
    chart_name: &'static str,
}

/// One colored card: large value, caption, optional second caption.
pub(super) struct Card {
    value: String,
    label: String,
    sublabel: Option<String>,
    color: Rgb,
}

impl Card {
    pub(super) fn new(value: String, label: String, color: Rgb) -> Self {
        Self {
            value,
            label,
            sublabel: None,
            color,
        }
    }

    pub(super) fn sublabel(mut self, sublabel: String) -> Self {
        self.sublabel = Some(sublabel);
        self
    }
}

/// Lays out report pages; see [`Compositor::compose`] for the weekly report
/// and the `team` module for the manager documents.
pub struct Compositor<'a, R> {
    renderer: &'a R,
    pub(super) config: &'a ReportConfig,
    pub(super) palette: Palette,
}

impl<'a, R: SceneRenderer> Compositor<'a, R> {
    pub fn new(renderer: &'a R, config: &'a ReportConfig) -> Self {
        Self {
            renderer,
            config,
            palette: Palette::new(config.palette.iter().cloned()),
        }
    }

    /// Lays out every section and returns the finished pages.
    pub async fn compose(
        &self,
        input: &ReportInput,
        metrics: &ReportMetrics,
        generated_at: OffsetDateTime,
    ) -> Result<Vec<Page>, ChartEmbedError> {
        let page = PageBuilder::new(self.config.page.width, self.config.page.height);

        let page = self.metrics_page(page, input, metrics).await?;
        let categories = Distribution {
            band: SECONDARY,
            title: crate::t!("report-category-title"),
            subtitle: crate::t!("report-category-subtitle"),
            chart_title: crate::t!("chart-category-title"),
            detail_heading: crate::t!("report-category-detail"),
            chart_name: "categories",
        };
        let page = self
            .distribution_page(page.new_page(), categories, &metrics.breakdown.by_category, metrics)
            .await?;
        let projects = Distribution {
            band: PURPLE,
            title: crate::t!("report-project-title"),
            subtitle: crate::t!("report-project-subtitle"),
            chart_title: crate::t!("chart-project-title"),
            detail_heading: crate::t!("report-project-detail"),
            chart_name: "projects",
        };
        let page = self
            .distribution_page(page.new_page(), projects, &metrics.breakdown.by_project, metrics)
            .await?;
        let page = performance_page(page.new_page(), metrics);
        let page = activity_table(page.new_page(), input, self.config);
        let page = footer(page, generated_at);

        Ok(page.finish())
    }

    async fn metrics_page(
        &self,
        page: PageBuilder,
        input: &ReportInput,
        metrics: &ReportMetrics,
    ) -> Result<PageBuilder, ChartEmbedError> {
        let page = title_band(
            page,
            PRIMARY,
            crate::t!("report-title"),
            crate::t!("report-period", period = input.period.clone()),
        )
        .at(SECTION_TOP);

        let average = metrics
            .average_per_day
            .map(format_hours)
            .unwrap_or_else(|| "—".to_string());
        let cards = [
            Card::new(format_hours(metrics.total_hours), crate::t!("metric-total-hours"), PRIMARY),
            Card::new(metrics.working_days.to_string(), crate::t!("metric-working-days"), SECONDARY),
            Card::new(
                metrics.total_activities.to_string(),
                crate::t!("metric-activity-count"),
                WARNING,
            ),
            Card::new(average, crate::t!("metric-average-per-day"), INFO),
        ];
        let left = (page.width() - (4.0 * 40.0 + 3.0 * 5.0)) / 2.0;
        let page = card_row(page, &cards, left, 40.0, 25.0, 5.0, 16.0).advance(40.0);

        if input.daily_hours.is_empty() {
            return Ok(page);
        }

        let series = Series::new(
            input
                .daily_hours
                .iter()
                .map(|(date, hours)| (format_day_month(date), hours)),
        );
        let options = ChartOptions {
            title: Some(crate::t!("chart-daily-title")),
            x_axis_title: Some(crate::t!("chart-daily-x-axis")),
            y_axis_title: Some(crate::t!("chart-daily-y-axis")),
        };
        let scene = bar_chart(&series, &self.palette, &options, &self.config.bar);
        let top = page.cursor();
        let page = self.embed_chart(page, "daily-hours", &scene, 10.0, top, 190.0, 130.0).await?;
        Ok(page.advance(140.0))
    }

    async fn distribution_page(
        &self,
        page: PageBuilder,
        section: Distribution,
        hours: &HourMap,
        metrics: &ReportMetrics,
    ) -> Result<PageBuilder, ChartEmbedError> {
        let mut page =
            title_band(page, section.band, section.title, section.subtitle).at(SECTION_TOP);

        if !hours.is_empty() {
            let scene = pie_chart(
                &Series::from(hours),
                &self.palette,
                &ChartOptions::titled(section.chart_title),
                &self.config.pie,
            );
            let top = page.cursor();
            page = self
                .embed_chart(page, section.chart_name, &scene, 10.0, top, 190.0, 120.0)
                .await?
                .advance(130.0);
        }

        let summary = hours
            .iter()
            .map(|(label, h)| {
                format!(
                    "{label}: {} ({})",
                    format_hours(h),
                    format_percent(metrics.share_pct(h), 1)
                )
            })
            .collect::<Vec<_>>()
            .join(" • ");
        Ok(breakdown_box(page, section.detail_heading, &summary))
    }

    /// Rasterizes `scene` and places it inside the box, keeping its aspect
    /// ratio and centering it horizontally.
    #[allow(clippy::too_many_arguments)]
    pub(super) async fn embed_chart(
        &self,
        page: PageBuilder,
        name: &str,
        scene: &Scene,
        x: f64,
        y: f64,
        box_width: f64,
        box_height: f64,
    ) -> Result<PageBuilder, ChartEmbedError> {
        let (width, height) = fit_within(scene.width, scene.height, box_width, box_height);
        let (px_w, px_h) = oversampled(width, height, self.config.oversample);
        let markup = to_svg(scene);

        let bitmap = self
            .renderer
            .render(&markup, px_w, px_h)
            .await
            .map_err(|source| ChartEmbedError {
                chart: name.to_string(),
                source,
            })?;
        tracing::debug!(chart = name, px_w, px_h, bytes = bitmap.png.len(), "chart rasterized");

        Ok(page.place(Element::Image {
            x: x + (box_width - width) / 2.0,
            y,
            width,
            height,
            bitmap,
        }))
    }
}

/// Largest `width × height` box with the scene's aspect ratio that fits.
pub fn fit_within(scene_w: f64, scene_h: f64, box_w: f64, box_h: f64) -> (f64, f64) {
    if scene_w <= 0.0 || scene_h <= 0.0 {
        return (box_w, box_h);
    }
    let scale = (box_w / scene_w).min(box_h / scene_h);
    (scene_w * scale, scene_h * scale)
}

pub(super) fn title_band(page: PageBuilder, color: Rgb, title: String, subtitle: String) -> PageBuilder {
    let width = page.width();
    page.fill(0.0, 0.0, width, BAND_HEIGHT, color)
        .fill(0.0, BAND_HEIGHT - ACCENT_HEIGHT, width, ACCENT_HEIGHT, WARNING)
        .text(
            width / 2.0,
            22.0,
            title,
            TextStyle::bold(22.0).color(Rgb::WHITE).centered(),
        )
        .text(
            width / 2.0,
            33.0,
            subtitle,
            TextStyle::regular(13.0).color(Rgb::WHITE).centered(),
        )
}

pub(super) fn card_row(
    page: PageBuilder,
    cards: &[Card],
    left: f64,
    width: f64,
    height: f64,
    spacing: f64,
    value_size: f64,
) -> PageBuilder {
    let top = page.cursor();
    cards.iter().enumerate().fold(page, |page, (index, card)| {
        let x = left + index as f64 * (width + spacing);
        let center = x + width / 2.0;
        let white = |style: TextStyle| style.color(Rgb::WHITE).centered();
        let page = page
            .rounded(x + SHADOW_OFFSET, top + SHADOW_OFFSET, width, height, 3.0, SHADOW)
            .rounded(x, top, width, height, 3.0, card.color)
            .text(center, top + 11.0, &card.value, white(TextStyle::bold(value_size)))
            .text(center, top + 18.0, &card.label, white(TextStyle::regular(8.0)));
        match &card.sublabel {
            Some(sublabel) => page.text(center, top + 25.0, sublabel, white(TextStyle::regular(8.0))),
            None => page,
        }
    })
}

fn breakdown_box(page: PageBuilder, heading: String, summary: &str) -> PageBuilder {
    let width = page.width();
    let lines = wrap_text(summary, width - 40.0, 10.0);
    let top = page.cursor();
    let height = 25.0f64.max(22.0 + lines.len() as f64 * 5.0);

    let page = page.rounded(10.0, top, width - 20.0, height, 3.0, GRAY_50).text(
        20.0,
        top + 10.0,
        heading,
        TextStyle::bold(12.0),
    );
    lines
        .into_iter()
        .enumerate()
        .fold(page, |page, (index, line)| {
            page.text(20.0, top + 18.0 + index as f64 * 5.0, line, TextStyle::regular(10.0))
        })
        .advance(height + 10.0)
}

fn performance_page(page: PageBuilder, metrics: &ReportMetrics) -> PageBuilder {
    let page = title_band(
        page,
        INDIGO,
        crate::t!("report-performance-title"),
        crate::t!("report-performance-subtitle"),
    )
    .at(SECTION_TOP);

    let per_day = metrics
        .average_per_day
        .map(|avg| crate::t!("indicator-hours-per-day", hours = format_number(avg, 1)))
        .unwrap_or_else(|| "—".to_string());
    let cards = [
        Card::new(
            metrics.tier.label(),
            crate::t!("indicator-productivity"),
            Rgb::from_hex(metrics.tier.color()),
        )
        .sublabel(per_day),
        Card::new(
            format_percent(metrics.regularity_pct, 0),
            crate::t!("indicator-regularity"),
            INFO,
        )
        .sublabel(crate::t!("indicator-days-of-week", days = metrics.working_days.to_string())),
        Card::new(
            metrics.distinct_projects.to_string(),
            crate::t!("indicator-diversity"),
            PURPLE,
        )
        .sublabel(crate::t!("indicator-active-projects")),
    ];
    card_row(page, &cards, 20.0, 55.0, 30.0, 10.0, 14.0).advance(45.0)
}

fn activity_table(page: PageBuilder, input: &ReportInput, config: &ReportConfig) -> PageBuilder {
    let width = page.width();
    let inner = width - 2.0 * TABLE_LEFT;
    let page = page.at(20.0);
    let top = page.cursor();

    let page = page
        .fill(TABLE_LEFT, top - 5.0, inner, 15.0, PRIMARY)
        .text(
            20.0,
            top + 5.0,
            crate::t!("table-title"),
            TextStyle::bold(14.0).color(Rgb::WHITE),
        )
        .advance(20.0);

    let top = page.cursor();
    let headers = [
        crate::t!("table-date"),
        crate::t!("table-category"),
        crate::t!("table-project"),
        crate::t!("table-hours"),
    ];
    let page = headers
        .into_iter()
        .zip(TABLE_COLUMNS)
        .fold(
            page.fill(TABLE_LEFT, top - 3.0, inner, 12.0, GRAY_100),
            |page, (header, x)| page.text(x, top + 5.0, header, TextStyle::bold(10.0)),
        )
        .advance(15.0);

    let page_config = &config.page;
    input
        .activities
        .iter()
        .enumerate()
        .fold(page, |page, (index, activity)| {
            let page = page.break_if_past(page_config.bottom_margin, page_config.continuation_top);
            let y = page.cursor();
            let page = if index % 2 == 0 {
                page.fill(TABLE_LEFT, y - 2.0, inner, ROW_HEIGHT, GRAY_50)
            } else {
                page
            };
            let cells = [
                format_day_month(&activity.date),
                activity.category.clone(),
                truncate_label(&activity.project_or_formation, page_config.label_max_chars),
                format_hours(activity.hours),
            ];
            cells
                .into_iter()
                .zip(TABLE_COLUMNS)
                .fold(page, |page, (cell, x)| {
                    page.text(x, y + 5.0, cell, TextStyle::regular(9.0))
                })
                .advance(ROW_HEIGHT)
        })
}

fn footer(page: PageBuilder, generated_at: OffsetDateTime) -> PageBuilder {
    let (width, height) = (page.width(), page.height());
    let (date, clock) = format_generated_at(generated_at);
    page.fill(0.0, height - 20.0, width, 20.0, GRAY_100)
        .text(
            width / 2.0,
            height - 10.0,
            crate::t!("footer-generated", date = date, time = clock),
            TextStyle::italic(8.0).color(GRAY_600).centered(),
        )
        .text(
            width - 15.0,
            height - 5.0,
            crate::t!("footer-copyright"),
            TextStyle::regular(6.0).color(WATERMARK).right(),
        )
}
