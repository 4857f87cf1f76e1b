//! Team indicators behind the manager reports.

use crate::core::team::TeamReportInput;
use crate::report::metrics::{ProductivityTier, FULL_WEEK_DAYS};

/// Category label whose hours count as productive time.
pub const PRODUCTIVE_CATEGORY: &str = "Projets";

const LOW_PRODUCTIVITY_PCT: f64 = 70.0;
const LOW_WORKLOAD_HOURS: f64 = 30.0;
const VALIDATION_BACKLOG_WEEKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    ReduceNonProductiveWork,
    RebalanceWorkload,
    SpeedUpValidation,
    AssignMoreProjects,
    KeepCourse,
}

impl Recommendation {
    pub fn message(self) -> String {
        match self {
            Self::ReduceNonProductiveWork => crate::t!("team-advice-productivity"),
            Self::RebalanceWorkload => crate::t!("team-advice-workload"),
            Self::SpeedUpValidation => crate::t!("team-advice-validation"),
            Self::AssignMoreProjects => crate::t!("team-advice-projects"),
            Self::KeepCourse => crate::t!("team-advice-none"),
        }
    }
}

/// One employee compared with the team average.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeStanding {
    pub name: String,
    pub hours: f64,
    /// At or above the average.
    pub above_average: bool,
    /// `hours - average`.
    pub gap: f64,
    /// `hours / max`, 0 when nobody logged anything.
    pub share_of_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamMetrics {
    /// Sum of the per-employee hours.
    pub total_hours: f64,
    pub employee_count: usize,
    pub average_per_employee: f64,
    pub productive_hours: f64,
    pub productivity_pct: f64,
    /// 0 when there are no employees.
    pub max_hours: f64,
    pub min_hours: f64,
    pub category_count: usize,
    pub project_count: usize,
    pub pending_weeks: usize,
    pub weeks_per_employee: f64,
    /// Total spread over a five-day week.
    pub daily_load: f64,
    pub tier: ProductivityTier,
    pub standings: Vec<EmployeeStanding>,
}

impl TeamMetrics {
    pub fn derive(input: &TeamReportInput) -> Self {
        let total_hours = input.employee_hours.total();
        let employee_count = input.employee_hours.len();
        let per_employee = |value: f64| {
            if employee_count > 0 {
                value / employee_count as f64
            } else {
                0.0
            }
        };
        let average_per_employee = per_employee(total_hours);
        let productive_hours = input
            .category_hours
            .get(PRODUCTIVE_CATEGORY)
            .unwrap_or(0.0);
        let productivity_pct = if total_hours > 0.0 {
            productive_hours / total_hours * 100.0
        } else {
            0.0
        };

        let hours = || input.employee_hours.iter().map(|(_, hours)| hours);
        let max_hours = hours().reduce(f64::max).unwrap_or(0.0);
        let min_hours = hours().reduce(f64::min).unwrap_or(0.0);

        let standings = input
            .employee_hours
            .iter()
            .map(|(name, hours)| EmployeeStanding {
                name: name.to_string(),
                hours,
                above_average: hours >= average_per_employee,
                gap: hours - average_per_employee,
                share_of_max: if max_hours > 0.0 { hours / max_hours } else { 0.0 },
            })
            .collect();

        Self {
            total_hours,
            employee_count,
            average_per_employee,
            productive_hours,
            productivity_pct,
            max_hours,
            min_hours,
            category_count: input.category_hours.len(),
            project_count: input.project_hours.len(),
            pending_weeks: input.pending_weeks,
            weeks_per_employee: per_employee(input.pending_weeks as f64),
            daily_load: total_hours / FULL_WEEK_DAYS,
            tier: ProductivityTier::from_weekly_average(average_per_employee),
            standings,
        }
    }

    pub fn idle_hours(&self) -> f64 {
        self.total_hours - self.productive_hours
    }

    /// Every rule that fires, in a fixed order; `KeepCourse` alone when none does.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let rules = [
            (
                self.productivity_pct < LOW_PRODUCTIVITY_PCT,
                Recommendation::ReduceNonProductiveWork,
            ),
            (
                self.average_per_employee < LOW_WORKLOAD_HOURS,
                Recommendation::RebalanceWorkload,
            ),
            (
                self.pending_weeks > VALIDATION_BACKLOG_WEEKS,
                Recommendation::SpeedUpValidation,
            ),
            (
                self.project_count < self.employee_count,
                Recommendation::AssignMoreProjects,
            ),
        ];
        let fired: Vec<Recommendation> = rules
            .into_iter()
            .filter(|(fires, _)| *fires)
            .map(|(_, recommendation)| recommendation)
            .collect();
        if fired.is_empty() {
            vec![Recommendation::KeepCourse]
        } else {
            fired
        }
    }
}
