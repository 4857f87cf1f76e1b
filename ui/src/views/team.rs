use dioxus::prelude::*;

use super::report::LayoutOptions;
use crate::core::team::TeamReportInput;
use crate::report::{ReportConfig, TeamReportExportPanel};
use crate::t;

/// Loads the manager dashboard bundle and offers both team documents.
#[component]
pub fn TeamReport() -> Element {
    let mut raw = use_signal(String::new);
    let mut input = use_signal(|| None::<TeamReportInput>);
    let mut error = use_signal(|| None::<String>);
    let config = use_signal(ReportConfig::default);

    let load = move |_| match TeamReportInput::from_json_str(&raw()) {
        Ok(parsed) => {
            tracing::debug!(
                employees = parsed.employee_hours.len(),
                projects = parsed.project_hours.len(),
                pending_weeks = parsed.pending_weeks,
                "team data loaded"
            );
            error.set(None);
            input.set(Some(parsed));
        }
        Err(err) => {
            input.set(None);
            error.set(Some(t!("report-view-invalid", error = err.to_string())));
        }
    };

    rsx! {
        section { class: "page page-report",
            h1 { {t!("team-view-title")} }
            p { {t!("team-view-intro")} }

            textarea {
                class: "page-report__input",
                rows: "10",
                value: "{raw}",
                oninput: move |evt| raw.set(evt.value()),
            }
            div { class: "report-export__actions",
                button {
                    r#type: "button",
                    class: "button",
                    onclick: load,
                    {t!("report-view-load")}
                }
            }
            if let Some(message) = error() {
                p { class: "report-card__meta report-card__meta--error", "⚠️ {message}" }
            }
            LayoutOptions { config }
            if let Some(input) = input() {
                TeamReportExportPanel { input, config: config() }
            }
        }
    }
}
