// Database models (internal, may differ from public DTOs)
//
// Rows convert into the tamu-core entities via From, so services don't
// repeat field-by-field mapping.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use tamu_core::{
    AttendanceRecord, Event, GuestCategory, Institution, InstitutionKind, Operator, OperatorRole,
};

// ============================================
// Event models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            date: row.date,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct EventStatsRow {
    pub total_attendees: i64,
    pub total_institutions: i64,
    pub total_represented: i64,
    pub first_arrival: Option<DateTime<Utc>>,
    pub last_arrival: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InstitutionRollupRow {
    pub institution: String,
    pub attendee_count: i64,
    pub total_represented: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct CategoryRollupRow {
    pub category: String,
    pub attendee_count: i64,
    pub total_represented: i64,
}

// ============================================
// Attendance models
// ============================================

/// Attendance joined with its owning event (name/slug are denormalized into
/// every read so display surfaces never need a second fetch).
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRow {
    pub id: i64,
    pub event_id: i64,
    pub guest_name: String,
    pub institution: String,
    pub institution_id: Option<i64>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub representative_count: i32,
    pub category: String,
    pub arrival_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub event_slug: String,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        AttendanceRecord {
            id: row.id,
            event_id: row.event_id,
            guest_name: row.guest_name,
            institution: row.institution,
            institution_id: row.institution_id,
            position: row.position,
            phone: row.phone,
            email: row.email,
            representative_count: row.representative_count,
            category: GuestCategory::from(row.category.as_str()),
            arrival_time: row.arrival_time,
            created_at: row.created_at,
            event_name: row.event_name,
            event_slug: row.event_slug,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateAttendance {
    pub event_id: i64,
    pub guest_name: String,
    pub institution: String,
    pub institution_id: Option<i64>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub representative_count: i32,
    pub category: String,
}

/// Filters shared by the paginated listing and the CSV export.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub institution: Option<String>,
    pub search: Option<String>,
}

/// Flattened row for CSV export, joined with event metadata.
#[derive(Debug, Clone, FromRow)]
pub struct ExportRow {
    pub guest_name: String,
    pub institution: String,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub representative_count: i32,
    pub category: String,
    pub arrival_time: DateTime<Utc>,
    pub event_name: String,
    pub event_date: DateTime<Utc>,
    pub event_location: Option<String>,
}

// ============================================
// Institution models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct InstitutionRow {
    pub id: i64,
    pub name: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

impl From<InstitutionRow> for Institution {
    fn from(row: InstitutionRow) -> Self {
        Institution {
            id: row.id,
            name: row.name,
            kind: InstitutionKind::from(row.kind.as_str()),
            created_at: row.created_at,
        }
    }
}

// ============================================
// Operator models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct OperatorRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OperatorRow> for Operator {
    fn from(row: OperatorRow) -> Self {
        Operator {
            id: row.id,
            name: row.name,
            email: row.email,
            role: OperatorRole::from(row.role.as_str()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOperator {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}
