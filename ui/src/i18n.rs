//! Localization for `imputation-ui`.
//!
//! The application ships a single locale, `fr-FR`. Messages live in
//! `i18n/fr-FR/imputation-ui.ftl`, are embedded with `rust-embed` and looked
//! up through the [`t!`](crate::t) macro, which expands to a compile-time
//! checked `fl!` call against the shared [`LOADER`].
//!
//! ```ignore
//! use crate::t;
//! let title = t!("report-title");
//! let period = t!("report-period", period = "05 - 09 Fevrier");
//! ```
//!
//! The loader is filled on first use, so lookups work without any explicit
//! initialization (unit tests rely on that). Unicode bidi isolation marks are
//! turned off: the PDF base fonts have no glyph for them.
use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use unic_langid::LanguageIdentifier;

pub use i18n_embed_fl::fl;

/// Ergonomic translation macro.
///     t!("nav-dashboard")
///     t!("report-period", period = label)
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent domain, also the FTL file name.
const DOMAIN: &str = "imputation-ui";

/// The only locale served.
pub const LOCALE: &str = "fr-FR";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

/// Global language loader used with the `fl!` macro.
pub static LOADER: Lazy<FluentLanguageLoader> = Lazy::new(|| {
    let locale: LanguageIdentifier = LOCALE.parse().expect("valid locale identifier");
    let loader = FluentLanguageLoader::new(DOMAIN, locale.clone());
    if let Err(err) = i18n_embed::select(&loader, &Localizations, &[locale]) {
        tracing::warn!(error = %err, "unable to load embedded translations; message ids will be shown");
    }
    loader.set_use_isolating(false);
    loader
});

/// Forces the loader early so a broken bundle is reported at start-up
/// rather than at the first lookup. Idempotent.
pub fn init() {
    Lazy::force(&LOADER);
}

/// Embedded locale folders.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::fl;

    #[test]
    fn only_the_fixed_locale_is_embedded() {
        assert_eq!(available_languages(), [LOCALE]);
    }

    #[test]
    fn lookups_work_without_init() {
        let s = fl!(&*LOADER, "nav-dashboard");
        assert_eq!(s, "Tableau de bord");
    }

    #[test]
    fn arguments_are_not_wrapped_in_isolation_marks() {
        init();
        let s = fl!(&*LOADER, "report-period", period = "05 - 09 Fevrier");
        assert_eq!(s, "Période : 05 - 09 Fevrier");
    }
}
