// Tamu domain types
//
// This crate defines the guestbook's domain model and the validation rules
// applied to inbound submissions.
//
// Key design decisions:
// - Entities use i64 identifiers (BIGSERIAL in storage); the public contract
//   promises positive integer ids
// - Validation lives on the request types themselves so the HTTP layer and
//   the CLI enforce identical rules
// - Duplicate detection for attendance normalizes names (trim + casefold)
//   before comparison

pub mod attendance;
pub mod common;
pub mod error;
pub mod event;
pub mod institution;
pub mod operator;

pub use attendance::{
    AttendanceNotice, AttendanceRecord, AttendanceSubmission, GuestCategory,
};
pub use common::{ListResponse, Pagination};
pub use error::ValidationError;
pub use event::{
    CategoryRollup, CreateEventRequest, Event, EventStats, InstitutionRollup, UpdateEventRequest,
};
pub use institution::{Institution, InstitutionKind, SaveInstitutionRequest};
pub use operator::{LoginRequest, Operator, OperatorRole, RegisterRequest};

pub(crate) fn is_valid_email(s: &str) -> bool {
    use std::sync::LazyLock;
    static EMAIL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex")
    });
    EMAIL_RE.is_match(s.trim())
}
