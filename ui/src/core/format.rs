//! Formatting helpers for presenting hours, shares and dates.

use time::{macros::format_description, Date, OffsetDateTime};

pub fn format_hours(value: f64) -> String {
    format!("{value:.1}h")
}

pub fn format_number(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}%")
}

/// `2024-01-08` → `08/01`. Anything that is not an ISO date is returned as is.
pub fn format_day_month(iso: &str) -> String {
    Date::parse(iso.trim(), format_description!("[year]-[month]-[day]"))
        .ok()
        .and_then(|date| date.format(format_description!("[day]/[month]")).ok())
        .unwrap_or_else(|| iso.to_string())
}

/// `dd/MM/yyyy`.
pub fn format_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| "—".to_string())
}

/// `yyyy-MM-dd`, as used in artifact names.
pub fn format_iso_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Signed hours with one decimal: `+2.5h`, `-1.0h`, `0.0h`.
pub fn format_signed_hours(value: f64) -> String {
    if value > 0.0 {
        format!("+{value:.1}h")
    } else {
        format_hours(value)
    }
}

/// `(dd/MM/yyyy, HH:mm)` for the report footer.
pub fn format_generated_at(at: OffsetDateTime) -> (String, String) {
    let date = format_date(at.date());
    let clock = at
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_else(|_| "—".to_string());
    (date, clock)
}

/// Keeps the first `max_chars` characters and appends `...` when the label is longer.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn truncation_boundary() {
        let exact = "a".repeat(35);
        assert_eq!(truncate_label(&exact, 35), exact);

        let long = "b".repeat(40);
        let cut = truncate_label(&long, 35);
        assert_eq!(cut, format!("{}...", "b".repeat(35)));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let accented = "é".repeat(36);
        assert_eq!(truncate_label(&accented, 35), format!("{}...", "é".repeat(35)));
    }

    #[test]
    fn day_month_falls_back_to_raw_input() {
        assert_eq!(format_day_month("2024-01-08"), "08/01");
        assert_eq!(format_day_month("lundi"), "lundi");
    }

    #[test]
    fn footer_stamp() {
        let (date, clock) = format_generated_at(datetime!(2024-02-09 17:05 UTC));
        assert_eq!(date, "09/02/2024");
        assert_eq!(clock, "17:05");
    }

    #[test]
    fn hours_use_one_decimal() {
        assert_eq!(format_hours(7.26), "7.3h");
        assert_eq!(format_hours(8.0), "8.0h");
    }

    #[test]
    fn gaps_carry_their_sign() {
        assert_eq!(format_signed_hours(2.54), "+2.5h");
        assert_eq!(format_signed_hours(-1.0), "-1.0h");
        assert_eq!(format_signed_hours(0.0), "0.0h");
    }

    #[test]
    fn calendar_dates() {
        let date = time::macros::date!(2024 - 02 - 05);
        assert_eq!(format_date(date), "05/02/2024");
        assert_eq!(format_iso_date(date), "2024-02-05");
    }
}
