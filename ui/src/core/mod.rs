//! Plain data and helpers shared by the report pipeline and the views.

pub mod format;
pub mod platform;
pub mod records;
pub mod team;
