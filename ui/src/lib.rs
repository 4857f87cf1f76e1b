//! Shared UI crate for Imputation: the weekly report pipeline and the views
//! used by the web and desktop launchers.

pub mod core;
pub mod i18n;
pub mod report;
pub mod views;

pub mod components {
    pub mod app_navbar;
    pub use app_navbar::register_nav;
    pub use app_navbar::AppNavbar;
    pub use app_navbar::NavBuilder;
}
