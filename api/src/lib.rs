//! Typed client for the leave-request backend.
//!
//! Credentials are injected explicitly through [`Credentials`]; error bodies
//! are resolved once into [`ErrorBody`].

pub mod client;
pub mod error;
pub mod leave;

pub use client::{Credentials, LeaveClient, DEFAULT_BASE_URL};
pub use error::{ApiError, ErrorBody};
pub use leave::{Dashboard, LeaveDraft, LeaveRequest, LeaveStatus};
