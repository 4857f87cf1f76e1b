mod dashboard;
pub use dashboard::Dashboard;

mod report;
pub use report::{LayoutOptions, Report};

mod team;
pub use team::TeamReport;
