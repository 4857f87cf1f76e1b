//! Team workload bundle behind the manager reports.
//!
//! The bundle mirrors the manager dashboard payload: hours per employee,
//! per activity category and per project, plus the weeks still waiting for
//! validation.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use time::{Date, Duration};

use super::format::format_iso_date;
use super::records::{count_from_value, hours_from_value, HourMap};

/// The two team documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamReportKind {
    /// Per-employee workload, category analysis and ranking table.
    EmployeeDetail,
    /// Team-wide indicators, trends and recommendations.
    GlobalSummary,
}

impl TeamReportKind {
    /// Artifact name keyed on the Monday of the reported week.
    pub fn filename(self, week_start: Date) -> String {
        let stem = match self {
            Self::EmployeeDetail => "Rapport_Detaille_Employes_Semaine",
            Self::GlobalSummary => "Rapport_Synthese_Global_Semaine",
        };
        format!("{stem}_{}.pdf", format_iso_date(week_start))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TeamReportInput {
    #[serde(default, rename = "charge_par_employe", deserialize_with = "load_map")]
    pub employee_hours: HourMap,
    /// Keyed by display label; the `Projets` entry counts as productive time.
    #[serde(default, rename = "charge_par_categorie", deserialize_with = "load_map")]
    pub category_hours: HourMap,
    #[serde(default, rename = "charge_par_projet", deserialize_with = "load_map")]
    pub project_hours: HourMap,
    /// Weeks submitted but not yet validated.
    #[serde(default, rename = "semaines_a_valider", deserialize_with = "pending_weeks")]
    pub pending_weeks: usize,
    /// Project the dashboard was filtered on; `None` means every project.
    #[serde(default, alias = "projet")]
    pub project: Option<String>,
}

impl TeamReportInput {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.employee_hours.is_empty()
            && self.category_hours.is_empty()
            && self.project_hours.is_empty()
    }
}

/// Monday and Sunday of the week containing `day`.
pub fn week_bounds(day: Date) -> (Date, Date) {
    let monday = day - Duration::days(i64::from(day.weekday().number_days_from_monday()));
    (monday, monday + Duration::days(6))
}

/// One dashboard entry: either plain hours or an object carrying `heures`
/// and, for categories, a display `label` that replaces the key.
fn load_entry(key: String, raw: &Value) -> (String, f64) {
    match raw {
        Value::Object(fields) => {
            let label = fields
                .get("label")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string)
                .unwrap_or(key);
            let hours = fields.get("heures").map(hours_from_value).unwrap_or(0.0);
            (label, hours)
        }
        other => (key, hours_from_value(other)),
    }
}

fn load_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HourMap, D::Error> {
    struct LoadVisitor;

    impl<'de> Visitor<'de> for LoadVisitor {
        type Value = HourMap;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping names to hours")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<HourMap, A::Error> {
            let mut map = HourMap::new();
            while let Some((key, raw)) = access.next_entry::<String, Value>()? {
                let (label, hours) = load_entry(key, &raw);
                map.accumulate(&label, hours);
            }
            Ok(map)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<HourMap, E> {
            Ok(HourMap::new())
        }
    }

    deserializer.deserialize_any(LoadVisitor)
}

/// The dashboard sends the pending weeks themselves; a bare count is accepted too.
fn pending_weeks<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let count = match Value::deserialize(deserializer)? {
        Value::Array(weeks) => weeks.len() as u64,
        other => count_from_value(&other),
    };
    Ok(usize::try_from(count).unwrap_or(usize::MAX))
}
