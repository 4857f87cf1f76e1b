//! Summary statistics derived from a weekly report bundle.

use serde::{Deserialize, Serialize};

use crate::core::records::{ActivityRecord, HourMap, ReportInput};

/// Days of a full working week; regularity is expressed against it.
pub const FULL_WEEK_DAYS: f64 = 5.0;

const EXCELLENT_HOURS_PER_DAY: f64 = 7.0;
const GOOD_HOURS_PER_DAY: f64 = 6.0;
const EXCELLENT_HOURS_PER_WEEK: f64 = 35.0;
const GOOD_HOURS_PER_WEEK: f64 = 28.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductivityTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ProductivityTier {
    pub fn from_average(hours_per_day: f64) -> Self {
        if hours_per_day >= EXCELLENT_HOURS_PER_DAY {
            Self::Excellent
        } else if hours_per_day >= GOOD_HOURS_PER_DAY {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    /// Team rating from the average weekly hours per employee.
    pub fn from_weekly_average(hours_per_employee: f64) -> Self {
        if hours_per_employee >= EXCELLENT_HOURS_PER_WEEK {
            Self::Excellent
        } else if hours_per_employee >= GOOD_HOURS_PER_WEEK {
            Self::Good
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn label(self) -> String {
        match self {
            Self::Excellent => crate::t!("tier-excellent"),
            Self::Good => crate::t!("tier-good"),
            Self::NeedsImprovement => crate::t!("tier-needs-improvement"),
        }
    }

    /// Card color used on the performance page.
    pub fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#16a34a",
            Self::Good => "#d97706",
            Self::NeedsImprovement => "#dc2626",
        }
    }
}

/// Hours grouped by category and, independently, by project or training label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityBreakdown {
    pub by_category: HourMap,
    pub by_project: HourMap,
}

impl ActivityBreakdown {
    pub fn from_records(records: &[ActivityRecord]) -> Self {
        let mut breakdown = Self::default();
        for record in records {
            breakdown.by_category.accumulate(&record.category, record.hours);
            breakdown
                .by_project
                .accumulate(&record.project_or_formation, record.hours);
        }
        breakdown
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportMetrics {
    pub total_hours: f64,
    pub working_days: u32,
    pub total_activities: usize,
    /// `None` when the caller passed zero working days.
    pub average_per_day: Option<f64>,
    pub tier: ProductivityTier,
    /// `working_days / 5 * 100`, not capped.
    pub regularity_pct: f64,
    pub distinct_projects: usize,
    pub breakdown: ActivityBreakdown,
}

impl ReportMetrics {
    pub fn derive(input: &ReportInput) -> Self {
        let breakdown = if input.activities.is_empty() {
            // Without records the caller's mappings are the only source.
            ActivityBreakdown {
                by_category: input.category_hours.clone(),
                by_project: input.project_hours.clone(),
            }
        } else {
            ActivityBreakdown::from_records(&input.activities)
        };

        let average_per_day = average_per_day(input.total_hours, input.working_days);
        let tier = average_per_day
            .map(ProductivityTier::from_average)
            .unwrap_or(ProductivityTier::NeedsImprovement);

        Self {
            total_hours: input.total_hours,
            working_days: input.working_days,
            total_activities: input.total_activities,
            average_per_day,
            tier,
            regularity_pct: input.working_days as f64 / FULL_WEEK_DAYS * 100.0,
            distinct_projects: breakdown.by_project.len(),
            breakdown,
        }
    }

    /// Share of `hours` in the reported total, in percent.
    pub fn share_pct(&self, hours: f64) -> f64 {
        if self.total_hours > 0.0 {
            hours / self.total_hours * 100.0
        } else {
            0.0
        }
    }
}

fn average_per_day(total_hours: f64, working_days: u32) -> Option<f64> {
    if working_days == 0 {
        None
    } else {
        Some(total_hours / working_days as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(activities: Vec<ActivityRecord>, total_hours: f64, working_days: u32) -> ReportInput {
        ReportInput {
            period: "01 - 05 Janvier".into(),
            total_hours,
            working_days,
            total_activities: activities.len(),
            daily_hours: HourMap::new(),
            project_hours: HourMap::new(),
            category_hours: HourMap::new(),
            activities,
        }
    }

    #[test]
    fn two_activities_single_day() {
        let metrics = ReportMetrics::derive(&input(
            vec![
                ActivityRecord::new("2024-01-01", "Dev", "Alpha", 4.0),
                ActivityRecord::new("2024-01-01", "Meeting", "Alpha", 4.0),
            ],
            8.0,
            1,
        ));

        let categories: Vec<(&str, f64)> = metrics.breakdown.by_category.iter().collect();
        assert_eq!(categories, [("Dev", 4.0), ("Meeting", 4.0)]);
        assert_eq!(metrics.average_per_day, Some(8.0));
        assert_eq!(metrics.tier, ProductivityTier::Excellent);
        assert_eq!(metrics.distinct_projects, 1);
        assert_eq!(metrics.regularity_pct, 20.0);
    }

    #[test]
    fn tier_thresholds_are_inclusive() {
        assert_eq!(ProductivityTier::from_average(7.0), ProductivityTier::Excellent);
        assert_eq!(ProductivityTier::from_average(6.99), ProductivityTier::Good);
        assert_eq!(ProductivityTier::from_average(6.0), ProductivityTier::Good);
        assert_eq!(
            ProductivityTier::from_average(5.9),
            ProductivityTier::NeedsImprovement
        );
    }

    #[test]
    fn weekly_thresholds_are_inclusive() {
        assert_eq!(ProductivityTier::from_weekly_average(35.0), ProductivityTier::Excellent);
        assert_eq!(ProductivityTier::from_weekly_average(34.9), ProductivityTier::Good);
        assert_eq!(ProductivityTier::from_weekly_average(28.0), ProductivityTier::Good);
        assert_eq!(
            ProductivityTier::from_weekly_average(27.9),
            ProductivityTier::NeedsImprovement
        );
    }

    #[test]
    fn zero_working_days_leaves_average_undefined() {
        let metrics = ReportMetrics::derive(&input(Vec::new(), 0.0, 0));
        assert_eq!(metrics.average_per_day, None);
        assert_eq!(metrics.tier, ProductivityTier::NeedsImprovement);
        assert_eq!(metrics.regularity_pct, 0.0);
    }

    #[test]
    fn recomputed_mappings_partition_the_total() {
        let records = vec![
            ActivityRecord::new("2024-01-01", "Dev", "Alpha", 3.5),
            ActivityRecord::new("2024-01-01", "Formation", "Rust", 4.0),
            ActivityRecord::new("2024-01-02", "Dev", "Beta", 7.25),
            ActivityRecord::new("2024-01-03", "Réunion", "Alpha", 0.75),
        ];
        let metrics = ReportMetrics::derive(&input(records, 15.5, 3));
        assert!(metrics.breakdown.by_category.reconciles_with(15.5, 0.05));
        assert!(metrics.breakdown.by_project.reconciles_with(15.5, 0.05));
        assert_eq!(metrics.distinct_projects, 3);
    }

    #[test]
    fn regularity_is_not_capped() {
        let metrics = ReportMetrics::derive(&input(Vec::new(), 42.0, 6));
        assert!((metrics.regularity_pct - 120.0).abs() < 1e-9);
    }
}
