#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::prelude::*;

use api::{Credentials, DEFAULT_BASE_URL};
use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Dashboard, Report, TeamReport};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(DesktopNavbar)]
    #[route("/")]
    Dashboard {},
    #[route("/rapport")]
    Report {},
    #[route("/equipe")]
    TeamReport {},
}

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Shared theme from ui/assets/theme/main.css, embedded.

#[cfg(feature = "desktop")]
fn main() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new().with_window(
                WindowBuilder::new()
                    .with_title(format!("Imputation – v{}", env!("CARGO_PKG_VERSION")))
                    .with_maximized(true),
            ),
        )
        .launch(App);
}

#[cfg(not(feature = "desktop"))]
fn main() {
    eprintln!("imputation-desktop was built without the `desktop` feature");
}

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" })
}
fn nav_report(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::Report {}, "{label}" })
}
fn nav_team(label: &str) -> Element {
    rsx!(Link { class: "navbar__link", to: Route::TeamReport {}, "{label}" })
}

/// Backend location and token, read once from the environment.
fn env_credentials() -> Credentials {
    let base_url =
        std::env::var("IMPUTATION_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let token = std::env::var("IMPUTATION_TOKEN").unwrap_or_default();
    if token.is_empty() {
        tracing::warn!("IMPUTATION_TOKEN is not set; the leave dashboard stays signed out");
    }
    Credentials::new(base_url, token)
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        report: nav_report,
        team: nav_team,
    });
    use_context_provider(env_credentials);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }
        Router::<Route> { }
    }
}

/// Desktop router layout around the shared navbar.
#[component]
fn DesktopNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
