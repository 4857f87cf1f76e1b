use dioxus::prelude::*;

use crate::core::records::ReportInput;
use crate::report::{ReportConfig, ReportExportPanel};
use crate::t;

/// Loads a timesheet JSON bundle and hands it to the export panel.
#[component]
pub fn Report() -> Element {
    let mut raw = use_signal(String::new);
    let mut input = use_signal(|| None::<ReportInput>);
    let mut error = use_signal(|| None::<String>);
    let config = use_signal(ReportConfig::default);

    let load = move |_| match ReportInput::from_json_str(&raw()) {
        Ok(parsed) => {
            tracing::debug!(
                period = %parsed.period,
                activities = parsed.activities.len(),
                "report data loaded"
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
            h1 { {t!("report-view-title")} }
            p { {t!("report-view-intro")} }

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
                ReportExportPanel { input, config: config() }
            }
        }
    }
}

/// Parses layout overrides; blank input restores the defaults.
pub fn parse_layout(raw: &str) -> Result<ReportConfig, String> {
    if raw.trim().is_empty() {
        return Ok(ReportConfig::default());
    }
    ReportConfig::from_json_str(raw)
        .map_err(|err| t!("report-view-config-invalid", error = err.to_string()))
}

/// Collapsible editor for JSON overrides of the page and chart layout
/// (e.g. `{"oversample": 4}`).
#[component]
pub fn LayoutOptions(config: Signal<ReportConfig>) -> Element {
    let mut config = config;
    let mut raw = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);

    let apply = move |_| match parse_layout(&raw()) {
        Ok(parsed) => {
            tracing::debug!(oversample = parsed.oversample, "layout options applied");
            error.set(None);
            config.set(parsed);
        }
        Err(message) => error.set(Some(message)),
    };

    rsx! {
        details { class: "page-report__options",
            summary { {t!("report-view-config")} }
            textarea {
                class: "page-report__input",
                rows: "4",
                placeholder: "{{\"oversample\": 4}}",
                value: "{raw}",
                oninput: move |evt| raw.set(evt.value()),
            }
            div { class: "report-export__actions",
                button {
                    r#type: "button",
                    class: "button",
                    onclick: apply,
                    {t!("report-view-config-apply")}
                }
            }
            if let Some(message) = error() {
                p { class: "report-card__meta report-card__meta--error", "⚠️ {message}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_layout_keeps_the_defaults() {
        assert_eq!(parse_layout("  \n"), Ok(ReportConfig::default()));
    }

    #[test]
    fn layout_overrides_are_applied() {
        let config = parse_layout(r#"{"oversample": 4}"#).unwrap();
        assert_eq!(config.oversample, 4);
        assert_eq!(config.page, ReportConfig::default().page);
    }

    #[test]
    fn broken_layout_is_reported() {
        let message = parse_layout("{oversample").unwrap_err();
        assert!(message.starts_with("Options de mise en page invalides : "));
    }
}
