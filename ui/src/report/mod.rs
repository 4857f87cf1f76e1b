//! Activity reports: metrics, charts, rasterization, page layout and PDF
//! output for the weekly report and the two manager documents, plus the
//! export panels that drive them.

pub mod charts;
pub mod config;
pub mod document;
pub mod export;
pub mod generate;
pub mod metrics;
pub mod render;
pub mod team_metrics;

pub use config::ReportConfig;
pub use export::{ReportExportPanel, TeamReportExportPanel};
pub use generate::{
    generate_report, generate_team_report, GenerationContext, ReportArtifact, ReportError,
};
pub use metrics::{ProductivityTier, ReportMetrics};
pub use render::{platform_renderer, Bitmap, RenderError, SceneRenderer};
pub use team_metrics::{Recommendation, TeamMetrics};
