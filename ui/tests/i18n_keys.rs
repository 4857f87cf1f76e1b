use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the canonical FTL file per locale.
const FTL_FILENAME: &str = "imputation-ui.ftl";

/// The only shipped locale.
const LOCALE: &str = "fr-FR";

/// Message IDs defined in a Fluent file, in file order.
///
/// Any line of the form `<identifier> =` counts as a definition. Comments,
/// terms, attributes and continuation lines are skipped.
fn parse_ftl_keys(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| line.split_once('='))
        .map(|(id, _)| id.trim())
        .filter(|id| !id.is_empty() && id.chars().all(valid_key_char))
        .map(str::to_string)
        .collect()
}

fn valid_key_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

/// Every literal first argument of `t!("...")` under `src_root`, including
/// calls whose arguments start on the next line.
fn referenced_keys(src_root: &Path) -> HashSet<String> {
    let mut found = HashSet::new();
    let mut stack = vec![src_root.to_path_buf()];

    while let Some(path) = stack.pop() {
        if path.is_dir() {
            if let Ok(read_dir) = fs::read_dir(&path) {
                stack.extend(read_dir.flatten().map(|entry| entry.path()));
            }
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };

        let mut rest = content.as_str();
        while let Some(pos) = rest.find("t!(") {
            rest = rest[pos + 3..].trim_start();
            let Some(literal) = rest.strip_prefix('"') else {
                continue;
            };
            rest = literal;
            if let Some(end) = rest.find('"') {
                let key = &rest[..end];
                if key.chars().all(valid_key_char) {
                    found.insert(key.to_string());
                }
                rest = &rest[end..];
            }
        }
    }

    found
}

fn locale_keys() -> Vec<String> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("i18n")
        .join(LOCALE)
        .join(FTL_FILENAME);
    let content = fs::read_to_string(&path).expect("locale file is readable");
    parse_ftl_keys(&content)
}

#[test]
fn every_referenced_key_is_translated() {
    let defined: HashSet<String> = locale_keys().into_iter().collect();
    assert!(!defined.is_empty(), "no message keys parsed for {LOCALE}");

    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let missing: BTreeSet<_> = referenced_keys(&src_root)
        .into_iter()
        .filter(|key| !defined.contains(key))
        .collect();

    assert!(
        missing.is_empty(),
        "keys used in src/ but missing from {LOCALE}/{FTL_FILENAME}:\n  {}",
        missing.into_iter().collect::<Vec<_>>().join("\n  ")
    );
}

#[test]
fn no_key_is_defined_twice() {
    let mut seen = HashSet::new();
    let duplicates: BTreeSet<_> = locale_keys()
        .into_iter()
        .filter(|key| !seen.insert(key.clone()))
        .collect();
    assert!(duplicates.is_empty(), "duplicate keys: {duplicates:?}");
}

#[test]
fn no_translation_is_orphaned() {
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    let used = referenced_keys(&src_root);
    let orphaned: BTreeSet<_> = locale_keys()
        .into_iter()
        .filter(|key| !used.contains(key))
        .collect();
    assert!(orphaned.is_empty(), "keys no longer referenced: {orphaned:?}");
}
