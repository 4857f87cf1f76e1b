//! Layout of the two manager documents: the per-employee report and the
//! global summary. Both reuse the weekly report's bands, cards and chart
//! embedding, and close with a footer stamped on the last page.

use time::OffsetDateTime;

use super::layout::{
    card_row, title_band, Card, ChartEmbedError, Compositor, GRAY_100, GRAY_50, GRAY_600, INDIGO,
    INFO, PRIMARY, PURPLE, SECONDARY, SECTION_TOP, WARNING,
};
use super::{wrap_text, Page, PageBuilder, Rgb, TextStyle};
use crate::core::format::{
    format_date, format_generated_at, format_hours, format_number, format_percent,
    format_signed_hours,
};
use crate::core::team::{week_bounds, TeamReportInput};
use crate::report::charts::{bar_chart, pie_chart, ChartOptions, Series};
use crate::report::config::PageConfig;
use crate::report::render::SceneRenderer;
use crate::report::team_metrics::TeamMetrics;

const PINK: Rgb = Rgb(220, 38, 127);
const GREEN: Rgb = Rgb(22, 163, 74);
const AMBER: Rgb = Rgb(234, 179, 8);
const SLATE: Rgb = Rgb(107, 114, 128);
const INK: Rgb = Rgb(31, 41, 55);
const GREEN_TINT: Rgb = Rgb(220, 252, 231);
const AMBER_TINT: Rgb = Rgb(254, 249, 195);

const FOOTER_HEIGHT: f64 = 25.0;
const TABLE_COLUMNS: [f64; 4] = [15.0, 80.0, 130.0, 170.0];
const ROW_HEIGHT: f64 = 14.0;
/// Length of the performance bar of the busiest employee.
const BAR_FULL_WIDTH: f64 = 60.0;
const BULLET_LINE: f64 = 5.0;

impl<'a, R: SceneRenderer> Compositor<'a, R> {
    /// Workload per employee, category analysis and the ranking table.
    pub async fn compose_employee_report(
        &self,
        input: &TeamReportInput,
        metrics: &TeamMetrics,
        generated_at: OffsetDateTime,
    ) -> Result<Vec<Page>, ChartEmbedError> {
        let page = PageBuilder::new(self.config.page.width, self.config.page.height);
        let page = title_band(
            page,
            PRIMARY,
            crate::t!("team-detailed-title"),
            week_subtitle(input, generated_at),
        )
        .at(SECTION_TOP);

        let cards = [
            Card::new(metrics.employee_count.to_string(), crate::t!("team-employees-total"), PRIMARY),
            Card::new(format_hours(metrics.total_hours), crate::t!("team-hours-total"), SECONDARY),
            Card::new(
                format_hours(metrics.average_per_employee),
                crate::t!("team-average-per-employee"),
                WARNING,
            ),
            Card::new(format_percent(metrics.productivity_pct, 1), crate::t!("team-productivity"), INFO),
        ];
        let page = centered_cards(page, &cards, 47.0, 32.0, 6.0, 18.0).advance(45.0);

        let page = if input.employee_hours.is_empty() {
            page
        } else {
            let page = section_heading(page, crate::t!("team-employee-heading"), PRIMARY);
            let options = ChartOptions {
                title: Some(crate::t!("chart-employee-title")),
                x_axis_title: Some(crate::t!("chart-employee-x-axis")),
                y_axis_title: Some(crate::t!("chart-employee-y-axis")),
            };
            let scene = bar_chart(
                &Series::from(&input.employee_hours),
                &self.palette,
                &options,
                &self.config.bar,
            );
            let top = page.cursor();
            self.embed_chart(page, "employees", &scene, 10.0, top, 190.0, 130.0)
                .await?
                .advance(140.0)
        };

        let page = self.category_analysis(page.new_page(), input, metrics).await?;
        let page = employee_table(page.new_page(), metrics, &self.config.page);
        Ok(team_footer(page, generated_at).finish())
    }

    /// Team-wide cards, project distribution, indicators, trends and
    /// recommendations.
    pub async fn compose_summary_report(
        &self,
        input: &TeamReportInput,
        metrics: &TeamMetrics,
        generated_at: OffsetDateTime,
    ) -> Result<Vec<Page>, ChartEmbedError> {
        let page = PageBuilder::new(self.config.page.width, self.config.page.height);
        let page = title_band(
            page,
            PINK,
            crate::t!("team-summary-title"),
            week_subtitle(input, generated_at),
        )
        .at(SECTION_TOP);

        let cards = [
            Card::new(format_hours(metrics.total_hours), crate::t!("team-hours-total"), PRIMARY),
            Card::new(metrics.project_count.to_string(), crate::t!("team-active-projects"), SECONDARY),
            Card::new(metrics.employee_count.to_string(), crate::t!("team-employees"), WARNING),
            Card::new(format_percent(metrics.productivity_pct, 1), crate::t!("team-productivity"), INFO),
            Card::new(format_hours(metrics.productive_hours), crate::t!("team-productive-hours"), GREEN),
        ];
        let page = centered_cards(page, &cards, 37.0, 32.0, 6.0, 16.0).advance(45.0);

        let page = if input.project_hours.is_empty() {
            page
        } else {
            let page = section_heading(page, crate::t!("team-project-heading"), PINK);
            let scene = pie_chart(
                &Series::from(&input.project_hours),
                &self.palette,
                &ChartOptions::titled(crate::t!("chart-team-project-title")),
                &self.config.pie,
            );
            let top = page.cursor();
            self.embed_chart(page, "team-projects", &scene, 10.0, top, 190.0, 120.0)
                .await?
                .advance(130.0)
        };

        let page = indicators(page.new_page(), metrics);
        let page = trends(page, metrics);
        let page = recommendations(page, metrics);
        Ok(team_footer(page, generated_at).finish())
    }

    async fn category_analysis(
        &self,
        page: PageBuilder,
        input: &TeamReportInput,
        metrics: &TeamMetrics,
    ) -> Result<PageBuilder, ChartEmbedError> {
        let page = title_band(
            page,
            SECONDARY,
            crate::t!("team-category-title"),
            crate::t!("report-category-subtitle"),
        )
        .at(SECTION_TOP);

        if input.category_hours.is_empty() {
            return Ok(page);
        }

        let scene = pie_chart(
            &Series::from(&input.category_hours),
            &self.palette,
            &ChartOptions::titled(crate::t!("chart-team-category-title")),
            &self.config.pie,
        );
        let top = page.cursor();
        let page = self
            .embed_chart(page, "team-categories", &scene, 10.0, top, 190.0, 120.0)
            .await?
            .advance(130.0);

        let width = page.width();
        let top = page.cursor();
        let page = page
            .rounded(10.0, top, width - 20.0, 50.0, 5.0, GRAY_50)
            .rounded(15.0, top + 5.0, width - 30.0, 15.0, 3.0, SECONDARY)
            .text(
                20.0,
                top + 15.0,
                crate::t!("team-category-analysis"),
                TextStyle::bold(14.0).color(Rgb::WHITE),
            );
        let findings = [
            crate::t!(
                "team-analysis-productivity",
                rate = format_number(metrics.productivity_pct, 1)
            ),
            crate::t!("team-analysis-categories", count = metrics.category_count),
            crate::t!(
                "team-analysis-idle",
                idle = format_number(metrics.idle_hours(), 1),
                total = format_number(metrics.total_hours, 1)
            ),
        ];
        let page = findings
            .into_iter()
            .enumerate()
            .fold(page, |page, (index, finding)| {
                page.text(
                    20.0,
                    top + 30.0 + index as f64 * 8.0,
                    format!("• {finding}"),
                    TextStyle::regular(11.0),
                )
            });
        Ok(page.advance(60.0))
    }
}

/// `Semaine du … au … | Projet: …` for the week containing `generated_at`.
fn week_subtitle(input: &TeamReportInput, generated_at: OffsetDateTime) -> String {
    let (monday, sunday) = week_bounds(generated_at.date());
    let project = input
        .project
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| crate::t!("team-all-projects"));
    crate::t!(
        "team-week",
        start = format_date(monday),
        end = format_date(sunday),
        project = project
    )
}

fn centered_cards(
    page: PageBuilder,
    cards: &[Card],
    width: f64,
    height: f64,
    spacing: f64,
    value_size: f64,
) -> PageBuilder {
    let count = cards.len() as f64;
    let total = count * width + (count - 1.0).max(0.0) * spacing;
    let left = (page.width() - total) / 2.0;
    card_row(page, cards, left, width, height, spacing, value_size)
}

/// Light strip with a colored heading, placed just above a chart.
fn section_heading(page: PageBuilder, heading: String, color: Rgb) -> PageBuilder {
    let width = page.width();
    let top = page.cursor();
    page.rounded(10.0, top - 5.0, width - 20.0, 20.0, 3.0, GRAY_100)
        .text(15.0, top + 8.0, heading, TextStyle::bold(16.0).color(color))
        .advance(25.0)
}

/// Page title on a rounded band; the cursor lands below it.
fn page_heading(page: PageBuilder, heading: String, band: Rgb) -> PageBuilder {
    let width = page.width();
    page.rounded(10.0, 15.0, width - 20.0, 25.0, 5.0, band)
        .text(15.0, 32.0, heading, TextStyle::bold(18.0).color(Rgb::WHITE))
        .at(SECTION_TOP)
}

fn employee_table(
    page: PageBuilder,
    metrics: &TeamMetrics,
    page_config: &PageConfig,
) -> PageBuilder {
    let width = page.width();
    let page = page_heading(page, crate::t!("team-employee-detail-title"), PRIMARY);

    let top = page.cursor();
    let stats = crate::t!(
        "team-employee-stats",
        average = format_hours(metrics.average_per_employee),
        max = format_hours(metrics.max_hours),
        min = format_hours(metrics.min_hours)
    );
    let page = page
        .rounded(10.0, top, width - 20.0, 25.0, 3.0, GRAY_50)
        .text(15.0, top + 8.0, stats, TextStyle::regular(10.0).color(SLATE))
        .advance(30.0);

    let top = page.cursor();
    let headers = [
        crate::t!("team-table-employee"),
        crate::t!("table-hours"),
        crate::t!("team-table-performance"),
        crate::t!("team-table-gap"),
    ];
    let page = headers
        .into_iter()
        .zip(TABLE_COLUMNS)
        .fold(
            page.rounded(10.0, top - 3.0, width - 20.0, 18.0, 3.0, GRAY_100),
            |page, (header, x)| page.text(x, top + 10.0, header, TextStyle::bold(12.0)),
        )
        .advance(18.0);

    metrics
        .standings
        .iter()
        .enumerate()
        .fold(page, |page, (index, standing)| {
            let page = page.break_if_past(page_config.bottom_margin, page_config.continuation_top);
            let y = page.cursor();
            let page = if index % 2 == 0 {
                page.rounded(10.0, y - 2.0, width - 20.0, ROW_HEIGHT, 2.0, GRAY_50)
            } else {
                page
            };
            let (verdict, color, tint) = if standing.above_average {
                (crate::t!("team-above-average"), GREEN, GREEN_TINT)
            } else {
                (crate::t!("team-below-average"), AMBER, AMBER_TINT)
            };
            let cell = TextStyle::regular(10.0);
            page.rounded(75.0, y + 2.0, standing.share_of_max * BAR_FULL_WIDTH, 6.0, 1.0, tint)
                .text(TABLE_COLUMNS[0], y + 8.0, &standing.name, cell)
                .text(TABLE_COLUMNS[1], y + 8.0, format_hours(standing.hours), cell)
                .text(TABLE_COLUMNS[2], y + 8.0, verdict, cell.color(color))
                .text(
                    TABLE_COLUMNS[3],
                    y + 8.0,
                    format_signed_hours(standing.gap),
                    cell.color(color),
                )
                .advance(ROW_HEIGHT)
        })
}

fn indicators(page: PageBuilder, metrics: &TeamMetrics) -> PageBuilder {
    let width = page.width();
    let page = page
        .rounded(10.0, 15.0, width - 20.0, 25.0, 5.0, GRAY_100)
        .rounded(15.0, 20.0, width - 30.0, 15.0, 3.0, PINK)
        .text(
            20.0,
            30.0,
            crate::t!("team-indicators-title"),
            TextStyle::bold(16.0).color(Rgb::WHITE),
        )
        .at(SECTION_TOP);

    let cards = [
        Card::new(metrics.tier.label(), crate::t!("team-performance"), Rgb::from_hex(metrics.tier.color()))
            .sublabel(crate::t!(
                "team-hours-per-employee",
                hours = format_number(metrics.average_per_employee, 1)
            )),
        Card::new(format_number(metrics.weeks_per_employee, 1), crate::t!("team-efficiency"), INFO)
            .sublabel(crate::t!("team-weeks-per-employee")),
        Card::new(metrics.project_count.to_string(), crate::t!("team-diversification"), PURPLE)
            .sublabel(crate::t!("team-concurrent-projects")),
        Card::new(format_hours(metrics.daily_load), crate::t!("team-daily-load"), INDIGO)
            .sublabel(crate::t!("team-per-working-day")),
    ];
    centered_cards(page, &cards, 47.0, 38.0, 8.0, 16.0).advance(55.0)
}

fn trends(page: PageBuilder, metrics: &TeamMetrics) -> PageBuilder {
    let width = page.width();
    let top = page.cursor();
    let page = page
        .rounded(10.0, top, width - 20.0, 70.0, 5.0, GRAY_50)
        .rounded(15.0, top + 5.0, width - 30.0, 18.0, 3.0, SECONDARY)
        .text(
            20.0,
            top + 16.0,
            crate::t!("team-trends-title"),
            TextStyle::bold(14.0).color(Rgb::WHITE),
        );
    let items = [
        crate::t!(
            "team-trend-productivity",
            rate = format_number(metrics.productivity_pct, 1),
            productive = format_number(metrics.productive_hours, 1),
            total = format_number(metrics.total_hours, 1)
        ),
        crate::t!(
            "team-trend-workload",
            average = format_number(metrics.average_per_employee, 1)
        ),
        crate::t!(
            "team-trend-distribution",
            projects = metrics.project_count,
            employees = metrics.employee_count
        ),
        crate::t!("team-trend-pending", weeks = metrics.pending_weeks),
    ];
    bullets(page.at(top + 35.0), &items, 11.0, 10.0).at(top + 80.0)
}

fn recommendations(page: PageBuilder, metrics: &TeamMetrics) -> PageBuilder {
    let width = page.width();
    let top = page.cursor();
    let page = page
        .rounded(15.0, top, width - 30.0, 18.0, 3.0, GREEN)
        .text(
            20.0,
            top + 12.0,
            crate::t!("team-recommendations-title"),
            TextStyle::bold(12.0).color(Rgb::WHITE),
        )
        .advance(25.0);
    let items: Vec<String> = metrics
        .recommendations()
        .into_iter()
        .map(|recommendation| recommendation.message())
        .collect();
    bullets(page, &items, 10.0, 10.0)
}

/// Bulleted, wrapped items starting at the cursor. Each item takes at least
/// `spacing` millimetres.
fn bullets(page: PageBuilder, items: &[String], size: f64, spacing: f64) -> PageBuilder {
    let max_width = page.width() - 40.0;
    items.iter().fold(page, |page, item| {
        let top = page.cursor();
        let lines = wrap_text(&format!("• {item}"), max_width, size);
        let used = lines.len() as f64 * BULLET_LINE;
        lines
            .into_iter()
            .enumerate()
            .fold(page, |page, (index, line)| {
                page.text(
                    20.0,
                    top + index as f64 * BULLET_LINE,
                    line,
                    TextStyle::regular(size).color(INK),
                )
            })
            .advance(used.max(spacing))
    })
}

fn team_footer(page: PageBuilder, generated_at: OffsetDateTime) -> PageBuilder {
    let (width, height) = (page.width(), page.height());
    let (date, clock) = format_generated_at(generated_at);
    page.fill(0.0, height - FOOTER_HEIGHT, width, FOOTER_HEIGHT, GRAY_100)
        .text(
            width / 2.0,
            height - 15.0,
            crate::t!("team-footer", date = date, time = clock),
            TextStyle::italic(10.0).color(GRAY_600).centered(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::config::ReportConfig;
    use crate::report::render::{Bitmap, RenderError};
    use std::cell::RefCell;
    use time::macros::datetime;

    #[derive(Default)]
    struct Recorder {
        charts: RefCell<usize>,
    }

    #[async_trait::async_trait(?Send)]
    impl SceneRenderer for Recorder {
        async fn render(&self, _markup: &str, width: u32, height: u32) -> Result<Bitmap, RenderError> {
            *self.charts.borrow_mut() += 1;
            Ok(Bitmap {
                width,
                height,
                png: Vec::new(),
            })
        }
    }

    fn team(employees: usize) -> TeamReportInput {
        TeamReportInput {
            employee_hours: (0..employees)
                .map(|i| (format!("Employé {i}"), 30.0 + i as f64))
                .collect(),
            category_hours: [("Projets", 20.0), ("Formation", 5.0)].into_iter().collect(),
            project_hours: [("Atlas", 15.0), ("Nova", 10.0)].into_iter().collect(),
            pending_weeks: 2,
            project: None,
        }
    }

    /// Thursday 8 February 2024; the week runs from the 5th to the 11th.
    const GENERATED_AT: OffsetDateTime = datetime!(2024-02-08 09:15 UTC);

    fn employee_report(input: &TeamReportInput) -> (Vec<Page>, usize) {
        let renderer = Recorder::default();
        let config = ReportConfig::default();
        let metrics = TeamMetrics::derive(input);
        let pages = futures::executor::block_on(
            Compositor::new(&renderer, &config).compose_employee_report(input, &metrics, GENERATED_AT),
        )
        .unwrap();
        (pages, renderer.charts.into_inner())
    }

    fn summary_report(input: &TeamReportInput) -> (Vec<Page>, usize) {
        let renderer = Recorder::default();
        let config = ReportConfig::default();
        let metrics = TeamMetrics::derive(input);
        let pages = futures::executor::block_on(
            Compositor::new(&renderer, &config).compose_summary_report(input, &metrics, GENERATED_AT),
        )
        .unwrap();
        (pages, renderer.charts.into_inner())
    }

    fn texts(page: &Page) -> Vec<&str> {
        page.texts().collect()
    }

    #[test]
    fn employee_report_has_three_sections() {
        let (pages, charts) = employee_report(&team(3));
        assert_eq!(pages.len(), 3);
        assert_eq!(charts, 2);
        assert_eq!(pages[0].images().count(), 1);
        assert_eq!(pages[1].images().count(), 1);
        assert!(texts(&pages[0])
            .contains(&"Semaine du 05/02/2024 au 11/02/2024 | Projet: Tous les projets"));
    }

    #[test]
    fn ranking_shows_signed_gaps() {
        // 30h, 31h, 32h: average 31h.
        let (pages, _) = employee_report(&team(3));
        let table = texts(&pages[2]);
        assert!(table.contains(&"Statistiques: Moyenne 31.0h | Maximum 32.0h | Minimum 30.0h"));
        assert!(table.contains(&"-1.0h"));
        assert!(table.contains(&"0.0h"));
        assert!(table.contains(&"+1.0h"));
        assert_eq!(table.iter().filter(|t| **t == "Au-dessus").count(), 2);
        assert_eq!(table.iter().filter(|t| **t == "En-dessous").count(), 1);
    }

    #[test]
    fn long_rankings_continue_on_new_pages() {
        // Rows start at 103 and advance 14 mm; the 13th row would start at 271 > 267.
        let (pages, _) = employee_report(&team(20));
        assert_eq!(pages.len(), 4);
        assert!(texts(&pages[3]).contains(&"Employé 19"));
        let stamp = "Rapport généré le 08/02/2024 à 09:15 | Données de la semaine courante";
        assert!(texts(&pages[3]).contains(&stamp));
        assert!(!texts(&pages[2]).contains(&stamp));
    }

    #[test]
    fn employee_report_without_data_draws_no_chart() {
        let (pages, charts) = employee_report(&TeamReportInput::default());
        assert_eq!(pages.len(), 3);
        assert_eq!(charts, 0);
    }

    #[test]
    fn summary_fits_on_two_pages() {
        let mut input = team(2);
        input.project = Some("Atlas".into());
        let (pages, charts) = summary_report(&input);
        assert_eq!(pages.len(), 2);
        assert_eq!(charts, 1);
        assert!(texts(&pages[0]).contains(&"Semaine du 05/02/2024 au 11/02/2024 | Projet: Atlas"));

        let indicators = texts(&pages[1]);
        // 30h and 31h: 30.5h per employee.
        assert!(indicators.contains(&"Bonne"));
        assert!(indicators.contains(&"30.5h/employé"));
        assert!(indicators.contains(&"• Répartition: 2 projets actifs pour 2 employés"));
        assert!(indicators.contains(&"• Validation en attente: 2 semaines à traiter"));
    }

    #[test]
    fn satisfied_team_gets_a_single_recommendation() {
        let input = TeamReportInput {
            employee_hours: [("Zoé", 38.0)].into_iter().collect(),
            category_hours: [("Projets", 38.0)].into_iter().collect(),
            project_hours: [("Atlas", 38.0)].into_iter().collect(),
            pending_weeks: 1,
            project: None,
        };
        let (pages, _) = summary_report(&input);
        let advice: Vec<&str> = texts(&pages[1])
            .into_iter()
            .filter(|t| t.starts_with("• ") && !t.contains(':'))
            .collect();
        assert_eq!(
            advice,
            ["• Performance globale satisfaisante, maintenir le niveau actuel"]
        );
        assert!(texts(&pages[1]).contains(&"• Répartition: 1 projet actif pour 1 employé"));
    }
}
