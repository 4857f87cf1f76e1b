use dioxus::prelude::*;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use crate::core::platform;
use crate::core::format::format_hours;
use crate::core::records::ReportInput;
use crate::core::team::{TeamReportInput, TeamReportKind};
use crate::report::config::ReportConfig;
use crate::report::generate::{
    generate_report, generate_team_report, GenerationContext, ReportArtifact, ReportError,
};
use crate::report::render::platform_renderer;
use crate::t;

pub const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("browser download failed: {0}")]
    Browser(String),
    #[error("unable to determine the reports directory")]
    NoDataDir,
    #[error("unable to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

impl ExportStatus {
    /// CSS class and text of the feedback line, if any.
    fn feedback(&self) -> Option<(String, String)> {
        match self {
            ExportStatus::Idle => None,
            ExportStatus::Working => Some((
                "report-card__meta".to_string(),
                format!("{}…", t!("export-working")),
            )),
            ExportStatus::Done(message) => Some((
                "report-card__meta report-card__meta--success".to_string(),
                format!("✅ {message}"),
            )),
            ExportStatus::Error(err) => Some((
                "report-card__meta report-card__meta--error".to_string(),
                format!("⚠️ {err}"),
            )),
        }
    }
}

/// One document to produce.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportJob {
    Weekly(ReportInput),
    Team(TeamReportKind, TeamReportInput),
}

impl ExportJob {
    async fn generate(&self, ctx: &GenerationContext) -> Result<ReportArtifact, ReportError> {
        let renderer = platform_renderer();
        match self {
            ExportJob::Weekly(input) => generate_report(input, ctx, &renderer).await,
            ExportJob::Team(kind, input) => {
                generate_team_report(*kind, input, ctx, &renderer).await
            }
        }
    }
}

/// Runs `job` unless an export is already in flight, reporting progress
/// through `status`.
fn start_export(
    job: ExportJob,
    config: ReportConfig,
    mut status: Signal<ExportStatus>,
    mut busy: Signal<bool>,
) {
    if busy() {
        return;
    }
    busy.set(true);
    status.set(ExportStatus::Working);

    #[cfg(target_arch = "wasm32")]
    {
        platform::spawn_future(async move {
            match perform_export(job, config).await {
                Ok(message) => status.set(ExportStatus::Done(message)),
                Err(err) => status.set(ExportStatus::Error(err)),
            }
            busy.set(false);
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        match futures::executor::block_on(perform_export(job, config)) {
            Ok(message) => status.set(ExportStatus::Done(message)),
            Err(err) => status.set(ExportStatus::Error(err)),
        }
        busy.set(false);
    }
}

#[component]
pub fn ReportExportPanel(input: ReportInput, config: ReportConfig) -> Element {
    let activity_count = input.activities.len();
    let total = format_hours(input.total_hours);
    let period = input.period.clone();

    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);
    let feedback = status().feedback();

    let pdf_handler = move |_| start_export(ExportJob::Weekly(input.clone()), config.clone(), status, busy);

    rsx! {
        section { class: "report-card report-export",
            div { class: "report-card__header",
                h2 { {t!("export-title")} }
            }

            if activity_count == 0 {
                p { class: "report-card__placeholder", {t!("export-empty")} }
            } else {
                p { {t!("export-description")} }

                ul { class: "report-export__summary",
                    li { strong { "{period}" } }
                    li { strong { "{activity_count}" } " " {t!("export-activities")} }
                    li { strong { "{total}" } " " {t!("export-logged")} }
                }

                div { class: "report-export__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: pdf_handler,
                        {t!("export-button")}
                    }
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}

/// Both manager documents from one team bundle.
#[component]
pub fn TeamReportExportPanel(input: TeamReportInput, config: ReportConfig) -> Element {
    let employee_count = input.employee_hours.len();
    let total = format_hours(input.employee_hours.total());
    let empty = input.is_empty();

    let status = use_signal(|| ExportStatus::Idle);
    let busy = use_signal(|| false);
    let feedback = status().feedback();

    let export = move |kind: TeamReportKind| {
        start_export(
            ExportJob::Team(kind, input.clone()),
            config.clone(),
            status,
            busy,
        )
    };
    let detailed = export.clone();
    let summary = export;

    rsx! {
        section { class: "report-card report-export",
            div { class: "report-card__header",
                h2 { {t!("team-export-title")} }
            }

            if empty {
                p { class: "report-card__placeholder", {t!("team-export-empty")} }
            } else {
                ul { class: "report-export__summary",
                    li { strong { "{employee_count}" } " " {t!("team-export-employees")} }
                    li { strong { "{total}" } " " {t!("export-logged")} }
                }

                div { class: "report-export__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: busy(),
                        onclick: move |_| detailed(TeamReportKind::EmployeeDetail),
                        {t!("team-export-detailed")}
                    }
                    button {
                        r#type: "button",
                        class: "button",
                        disabled: busy(),
                        onclick: move |_| summary(TeamReportKind::GlobalSummary),
                        {t!("team-export-summary")}
                    }
                }

                if let Some((class_name, message)) = feedback {
                    p { class: "{class_name}", "{message}" }
                }
            }
        }
    }
}

async fn perform_export(job: ExportJob, config: ReportConfig) -> Result<String, String> {
    let ctx = GenerationContext::now().with_config(config);
    let artifact = job.generate(&ctx).await.map_err(|err| err.user_message())?;
    let delivery = deliver(&artifact).await.map_err(|err| {
        tracing::warn!(error = %err, filename = %artifact.filename, "report delivery failed");
        err.to_string()
    })?;
    Ok(match delivery {
        Some(path) => t!("export-saved", path = path),
        None => t!("export-download-started"),
    })
}

/// Hands the artifact to the user: a browser download on the web, a file in
/// the application data directory on desktop (its path is returned).
pub async fn deliver(artifact: &ReportArtifact) -> Result<Option<String>, DeliveryError> {
    #[cfg(target_arch = "wasm32")]
    {
        download_in_browser(&artifact.filename, PDF_MIME, &artifact.bytes)?;
        Ok(None)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let dir = desktop_report_dir()?;
        let path = save_to_dir(artifact, &dir)?;
        Ok(Some(path.to_string_lossy().to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn download_in_browser(filename: &str, mime: &str, bytes: &[u8]) -> Result<(), DeliveryError> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let browser = |msg: &str| DeliveryError::Browser(msg.to_string());

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let mut opts = BlobPropertyBag::new();
    opts.type_(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|_| browser("unable to create blob"))?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| browser("unable to create download URL"))?;

    let clicked = (|| -> Result<(), DeliveryError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| browser("document unavailable"))?;
        let anchor: HtmlAnchorElement = document
            .create_element("a")
            .map_err(|_| browser("unable to create anchor"))?
            .dyn_into()
            .map_err(|_| browser("anchor cast failed"))?;
        anchor.set_href(&url);
        anchor.set_download(filename);
        anchor.style().set_property("display", "none").ok();

        document
            .body()
            .ok_or_else(|| browser("missing body"))?
            .append_child(&anchor)
            .ok();
        anchor.click();
        anchor.remove();
        Ok(())
    })();
    Url::revoke_object_url(&url).ok();
    clicked
}

#[cfg(not(target_arch = "wasm32"))]
fn desktop_report_dir() -> Result<std::path::PathBuf, DeliveryError> {
    let dirs = directories::ProjectDirs::from("fr", "Imputation", "Imputation")
        .ok_or(DeliveryError::NoDataDir)?;
    Ok(dirs.data_dir().join("reports"))
}

/// Writes the artifact under `dir`, creating it if needed.
#[cfg(not(target_arch = "wasm32"))]
pub fn save_to_dir(
    artifact: &ReportArtifact,
    dir: &std::path::Path,
) -> Result<std::path::PathBuf, DeliveryError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.filename);
    std::fs::write(&path, &artifact.bytes)?;
    tracing::info!(path = %path.display(), "report saved");
    Ok(path)
}
