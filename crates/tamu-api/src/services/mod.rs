// Business logic services

pub mod attendance;
pub mod event;
pub mod institution;

pub use attendance::AttendanceService;
pub use event::EventService;
pub use institution::InstitutionService;
