//! Report generation entry point: input bundle in, PDF artifact out.

use thiserror::Error;
use time::OffsetDateTime;

use crate::core::records::ReportInput;
use crate::core::team::{week_bounds, TeamReportInput, TeamReportKind};
use crate::report::config::ReportConfig;
use crate::report::document::layout::{ChartEmbedError, Compositor};
use crate::report::document::pdf::{write_pdf, DocumentError};
use crate::report::document::Page;
use crate::report::metrics::ReportMetrics;
use crate::report::render::SceneRenderer;
use crate::report::team_metrics::TeamMetrics;

/// The stage that stopped generation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error(transparent)]
    Chart(#[from] ChartEmbedError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Single user-facing failure of [`generate_report`] and
/// [`generate_team_report`]; the cause is kept as the error source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("unable to generate report")]
    Generation {
        #[source]
        source: StageError,
    },
}

impl ReportError {
    /// Localized message shown to the user.
    pub fn user_message(&self) -> String {
        crate::t!("report-generation-failed")
    }

    pub fn cause(&self) -> &StageError {
        match self {
            ReportError::Generation { source } => source,
        }
    }
}

impl From<ChartEmbedError> for ReportError {
    fn from(err: ChartEmbedError) -> Self {
        ReportError::Generation { source: err.into() }
    }
}

impl From<DocumentError> for ReportError {
    fn from(err: DocumentError) -> Self {
        ReportError::Generation { source: err.into() }
    }
}

/// Everything generation needs besides the data itself.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub generated_at: OffsetDateTime,
    pub config: ReportConfig,
}

impl GenerationContext {
    pub fn new(generated_at: OffsetDateTime) -> Self {
        Self {
            generated_at,
            config: ReportConfig::default(),
        }
    }

    /// Context stamped with the local time, or UTC when the offset is unknown.
    pub fn now() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::new(now)
    }

    pub fn with_config(mut self, config: ReportConfig) -> Self {
        self.config = config;
        self
    }
}

/// A finished document, not yet delivered anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Derives the metrics, lays out every page (rasterizing charts one after
/// the other) and serializes the PDF. Nothing is produced on failure.
pub async fn generate_report<R: SceneRenderer>(
    input: &ReportInput,
    ctx: &GenerationContext,
    renderer: &R,
) -> Result<ReportArtifact, ReportError> {
    logged(build(input, ctx, renderer).await)
}

/// Same pipeline for the manager documents. The artifact is named after the
/// Monday of the week containing `ctx.generated_at`.
pub async fn generate_team_report<R: SceneRenderer>(
    kind: TeamReportKind,
    input: &TeamReportInput,
    ctx: &GenerationContext,
    renderer: &R,
) -> Result<ReportArtifact, ReportError> {
    logged(build_team(kind, input, ctx, renderer).await)
}

fn logged(outcome: Result<ReportArtifact, ReportError>) -> Result<ReportArtifact, ReportError> {
    if let Err(err) = &outcome {
        tracing::error!(cause = %err.cause(), "report generation failed");
    }
    outcome
}

async fn build<R: SceneRenderer>(
    input: &ReportInput,
    ctx: &GenerationContext,
    renderer: &R,
) -> Result<ReportArtifact, ReportError> {
    let metrics = ReportMetrics::derive(input);
    let pages = Compositor::new(renderer, &ctx.config)
        .compose(input, &metrics, ctx.generated_at)
        .await?;
    serialize(input.artifact_filename(), &pages, ctx)
}

async fn build_team<R: SceneRenderer>(
    kind: TeamReportKind,
    input: &TeamReportInput,
    ctx: &GenerationContext,
    renderer: &R,
) -> Result<ReportArtifact, ReportError> {
    let metrics = TeamMetrics::derive(input);
    let compositor = Compositor::new(renderer, &ctx.config);
    let pages = match kind {
        TeamReportKind::EmployeeDetail => {
            compositor
                .compose_employee_report(input, &metrics, ctx.generated_at)
                .await?
        }
        TeamReportKind::GlobalSummary => {
            compositor
                .compose_summary_report(input, &metrics, ctx.generated_at)
                .await?
        }
    };
    let (monday, _) = week_bounds(ctx.generated_at.date());
    serialize(kind.filename(monday), &pages, ctx)
}

fn serialize(
    filename: String,
    pages: &[Page],
    ctx: &GenerationContext,
) -> Result<ReportArtifact, ReportError> {
    let page = &ctx.config.page;
    let bytes = write_pdf(&filename, pages, page.width, page.height)?;
    tracing::info!(
        filename = %filename,
        pages = pages.len(),
        bytes = bytes.len(),
        "report generated"
    );
    Ok(ReportArtifact { filename, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::render::RenderError;

    #[test]
    fn display_is_the_fixed_message_and_source_is_kept() {
        let err = ReportError::from(ChartEmbedError {
            chart: "daily".into(),
            source: RenderError::NoContext,
        });
        assert_eq!(err.to_string(), "unable to generate report");
        assert!(matches!(err.cause(), StageError::Chart(_)));
        assert_eq!(
            err.cause().to_string(),
            "unable to embed chart `daily`: 2D drawing context unavailable"
        );
    }

    #[test]
    fn user_message_is_localized() {
        let err = ReportError::from(DocumentError::Serialize("disk".into()));
        assert_eq!(err.user_message(), "Impossible de générer le rapport PDF");
    }
}
