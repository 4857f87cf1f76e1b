use crate::t;
use dioxus::prelude::*;
use once_cell::sync::OnceCell;

/// Platform-supplied navigation links.
///
/// `ui` does not know each launcher's `Route` enum, so launchers register
/// one function per destination that wraps the localized label in a `Link`:
///
/// ```ignore
/// register_nav(NavBuilder {
///     dashboard: |label| rsx!( Link { class: "navbar__link", to: Route::Dashboard {}, "{label}" } ),
///     report: |label| rsx!( Link { class: "navbar__link", to: Route::Report {}, "{label}" } ),
///     team: |label| rsx!( Link { class: "navbar__link", to: Route::TeamReport {}, "{label}" } ),
/// });
/// ```
pub struct NavBuilder {
    pub dashboard: fn(label: &str) -> Element,
    pub report: fn(label: &str) -> Element,
    pub team: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// First registration wins.
pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar(children: Element) -> Element {
    let internal_nav: Option<Element> = NAV_BUILDER.get().map(|b| {
        let dashboard = (b.dashboard)(&t!("nav-dashboard"));
        let report = (b.report)(&t!("nav-report"));
        let team = (b.team)(&t!("nav-team"));
        rsx! {
            nav { class: "navbar__links",
                {dashboard}
                {report}
                {team}
            }
        }
    });

    let tagline = t!("footer-tagline");

    rsx! {
        header {
            id: "navbar",
            class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", {t!("app-title")} }
                    }
                    span { class: "navbar__brand-subtitle", "{tagline}" }
                }

                if let Some(nav) = internal_nav {
                    {nav}
                } else {
                    nav { class: "navbar__links", {children} }
                }
            }
        }
    }
}
