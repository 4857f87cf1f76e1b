#![cfg(test)]
/*!
Theme selector lint for the desktop build.

Every class the shared views put on their markup must exist in the unified
theme (`ui/assets/theme/main.css`). When a view changes a class name, update
the list below together with the stylesheet.
*/

const THEME_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

const REQUIRED_SELECTORS: &[&str] = &[
    // Global / layout
    ":root",
    "body {",
    ".page {",
    // Navbar
    ".navbar {",
    ".navbar__links",
    ".navbar__link",
    ".navbar__brand-mark",
    // Buttons
    ".button {",
    ".button--primary",
    ".button--ghost",
    // Cards and export panel
    ".report-card {",
    ".report-card__meta",
    ".report-card__meta--success",
    ".report-card__meta--error",
    ".report-card__placeholder",
    ".report-export__summary",
    ".report-export__actions",
    // Report view
    ".page-report__input",
    ".page-report__options",
    // Leave dashboard
    ".page-dashboard__balance",
    ".leave-list__item",
    ".leave-form__errors",
    ".leave-form__actions",
    // Media query token (sanity check responsive block exists)
    "@media (max-width: 720px)",
];

#[test]
fn unified_theme_contains_required_selectors() {
    let mut missing = Vec::new();
    for sel in REQUIRED_SELECTORS {
        if !THEME_CSS.contains(sel) {
            missing.push(*sel);
        }
    }

    if !missing.is_empty() {
        panic!(
            "Missing {} required CSS selectors/tokens in unified theme:\n{}",
            missing.len(),
            missing.join("\n")
        );
    }
}

#[test]
fn unified_theme_not_trivially_empty() {
    let non_ws_len = THEME_CSS.chars().filter(|c| !c.is_whitespace()).count();
    assert!(
        non_ws_len > 2_000,
        "Embedded theme appears unexpectedly small ({non_ws_len} non-whitespace chars) – \
         did the file get truncated or path change?"
    );
}

#[test]
fn leave_status_badges_come_in_a_full_set() {
    for status in ["pending", "approved", "rejected"] {
        let selector = format!(".leave-status--{status}");
        assert!(
            THEME_CSS.contains(&selector),
            "Status badge selector `{selector}` missing"
        );
    }
}
