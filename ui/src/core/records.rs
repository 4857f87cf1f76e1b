//! Activity records and the weekly report bundle handed to the report pipeline.
//!
//! Everything here is plain data. The bundle is built by the caller (usually
//! from a timesheet JSON payload) and never mutated by the pipeline.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One logged unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(default)]
    pub date: String,
    /// Weekday label as displayed in the timesheet (e.g. `"Lundi"`).
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "project")]
    pub project_or_formation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub hours: f64,
}

impl ActivityRecord {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        project: impl Into<String>,
        hours: f64,
    ) -> Self {
        Self {
            date: date.into(),
            day: String::new(),
            category: category.into(),
            project_or_formation: project.into(),
            description: String::new(),
            hours: coerce_hours(hours),
        }
    }
}

/// The complete input of one weekly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    /// Human period label, e.g. `"05 - 09 Fevrier"`.
    #[serde(rename = "weekDates")]
    pub period: String,
    #[serde(default, deserialize_with = "lenient_hours")]
    pub total_hours: f64,
    #[serde(default, deserialize_with = "lenient_days")]
    pub working_days: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_activities: usize,
    /// Hours per date, in chronological (document) order.
    #[serde(default)]
    pub daily_hours: HourMap,
    #[serde(default, rename = "projectDistribution")]
    pub project_hours: HourMap,
    #[serde(default, rename = "categoryDistribution")]
    pub category_hours: HourMap,
    #[serde(default)]
    pub activities: Vec<ActivityRecord>,
}

impl ReportInput {
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Deterministic artifact name: every whitespace character of the period
    /// label becomes an underscore.
    pub fn artifact_filename(&self) -> String {
        let slug: String = self
            .period
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        format!("Rapport_Imputation_{slug}.pdf")
    }
}

/// Label → hours mapping that keeps insertion order.
///
/// JSON objects are read entry by entry so the order of the source document is
/// preserved whatever map implementation `serde_json` is compiled with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourMap {
    entries: Vec<(String, f64)>,
}

impl HourMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `hours` to `label`, creating the entry at the end when it is new.
    pub fn accumulate(&mut self, label: &str, hours: f64) {
        match self.entries.iter_mut().find(|(key, _)| key == label) {
            Some((_, total)) => *total += hours,
            None => self.entries.push((label.to_string(), hours)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, hours)| *hours)
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, hours)| (key.as_str(), *hours))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, hours)| hours).sum()
    }

    /// True when the mapping sums to `expected` within `tolerance` hours.
    pub fn reconciles_with(&self, expected: f64, tolerance: f64) -> bool {
        (self.total() - expected).abs() <= tolerance
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for HourMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut map = HourMap::new();
        for (label, hours) in iter {
            map.accumulate(&label.into(), hours);
        }
        map
    }
}

impl Serialize for HourMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, hours) in &self.entries {
            map.serialize_entry(label, hours)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for HourMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HourMapVisitor;

        impl<'de> Visitor<'de> for HourMapVisitor {
            type Value = HourMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping labels to hours")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<HourMap, A::Error> {
                let mut map = HourMap::new();
                while let Some((label, raw)) = access.next_entry::<String, Value>()? {
                    map.accumulate(&label, hours_from_value(&raw));
                }
                Ok(map)
            }

            fn visit_unit<E: de::Error>(self) -> Result<HourMap, E> {
                Ok(HourMap::new())
            }
        }

        deserializer.deserialize_any(HourMapVisitor)
    }
}

/// Hours are coerced, never rejected: numbers pass through, numeric strings are
/// parsed, anything else (missing, null, garbage, NaN, negative) becomes 0.
pub fn hours_from_value(value: &Value) -> f64 {
    let raw = match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => text.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    coerce_hours(raw)
}

fn coerce_hours(raw: f64) -> f64 {
    if raw.is_finite() && raw > 0.0 {
        raw
    } else {
        0.0
    }
}

fn lenient_hours<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(hours_from_value(&value))
}

/// Counts follow the same rules as hours and are then rounded to the nearest
/// whole number (`4.5` and `"4.5"` both give 5).
pub fn count_from_value(value: &Value) -> u64 {
    // Saturating float-to-int cast: huge values clamp instead of wrapping.
    hours_from_value(value).round() as u64
}

fn lenient_days<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(u32::try_from(count_from_value(&value)).unwrap_or(u32::MAX))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(usize::try_from(count_from_value(&value)).unwrap_or(usize::MAX))
}
