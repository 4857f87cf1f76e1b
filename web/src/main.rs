use dioxus::prelude::*;

use api::{Credentials, DEFAULT_BASE_URL};
use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Dashboard, Report, TeamReport};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
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
));

/// Local storage key written by the sign-in page.
const TOKEN_KEY: &str = "accessToken";

fn nav_dashboard(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Dashboard {},
        "{label}"
    })
}
fn nav_report(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Report {},
        "{label}"
    })
}
fn nav_team(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::TeamReport {},
        "{label}"
    })
}

/// Reads the session token once, at the application boundary.
fn stored_credentials() -> Credentials {
    let token = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
        .unwrap_or_default();
    Credentials::new(DEFAULT_BASE_URL, token)
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();
    register_nav(NavBuilder {
        dashboard: nav_dashboard,
        report: nav_report,
        team: nav_team,
    });
    use_context_provider(stored_credentials);

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }
        Router::<Route> {}
    }
}

/// Web router layout around the shared navbar.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
