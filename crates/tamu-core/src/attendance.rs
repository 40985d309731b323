// Attendance domain types
//
// A check-in is immutable once written: guests register once, operators can
// delete a record but never edit it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::is_valid_email;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Guest category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum GuestCategory {
    Guest,
    OfficialInvitation,
    Sponsor,
    Speaker,
    Media,
    Other,
}

impl Default for GuestCategory {
    fn default() -> Self {
        GuestCategory::Guest
    }
}

impl std::fmt::Display for GuestCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GuestCategory::Guest => "guest",
            GuestCategory::OfficialInvitation => "official_invitation",
            GuestCategory::Sponsor => "sponsor",
            GuestCategory::Speaker => "speaker",
            GuestCategory::Media => "media",
            GuestCategory::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl From<&str> for GuestCategory {
    fn from(s: &str) -> Self {
        match s {
            "official_invitation" => GuestCategory::OfficialInvitation,
            "sponsor" => GuestCategory::Sponsor,
            "speaker" => GuestCategory::Speaker,
            "media" => GuestCategory::Media,
            "other" => GuestCategory::Other,
            _ => GuestCategory::Guest,
        }
    }
}

/// One persisted check-in, with the owning event denormalized for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AttendanceRecord {
    pub id: i64,
    pub event_id: i64,
    pub guest_name: String,
    pub institution: String,
    /// Captured reference to a managed institution, when the submitted name
    /// matched one at check-in time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub representative_count: i32,
    pub category: GuestCategory,
    pub arrival_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub event_name: String,
    pub event_slug: String,
}

/// A guest's check-in submission, addressed to an event by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AttendanceSubmission {
    pub event_slug: String,
    pub guest_name: String,
    pub institution: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub representative_count: Option<i32>,
    #[serde(default)]
    pub category: Option<GuestCategory>,
}

impl AttendanceSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name_len = self.guest_name.trim().len();
        if !(2..=255).contains(&name_len) {
            return Err(ValidationError::new(
                "guest_name",
                "must be between 2 and 255 characters",
            ));
        }
        let inst_len = self.institution.trim().len();
        if !(2..=255).contains(&inst_len) {
            return Err(ValidationError::new(
                "institution",
                "must be between 2 and 255 characters",
            ));
        }
        if let Some(position) = &self.position {
            if position.len() > 255 {
                return Err(ValidationError::new(
                    "position",
                    "must be at most 255 characters",
                ));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.trim().len() > 20 {
                return Err(ValidationError::new(
                    "phone",
                    "must be at most 20 characters",
                ));
            }
        }
        if let Some(email) = &self.email {
            if email.len() > 255 || !is_valid_email(email) {
                return Err(ValidationError::new("email", "must be a valid address"));
            }
        }
        if let Some(count) = self.representative_count {
            if !(1..=100).contains(&count) {
                return Err(ValidationError::new(
                    "representative_count",
                    "must be between 1 and 100",
                ));
            }
        }
        Ok(())
    }

    /// Trim free-text fields, dropping optional ones that trim to empty.
    pub fn trimmed(mut self) -> Self {
        fn clean(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        self.event_slug = self.event_slug.trim().to_string();
        self.guest_name = self.guest_name.trim().to_string();
        self.institution = self.institution.trim().to_string();
        self.position = clean(self.position);
        self.phone = clean(self.phone);
        self.email = clean(self.email);
        self
    }
}

/// The payload fanned out to live displays when a check-in lands.
///
/// A subset of the stored record plus the event name/slug, so displays can
/// render without a follow-up fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AttendanceNotice {
    pub id: i64,
    pub guest_name: String,
    pub institution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub category: GuestCategory,
    pub arrival_time: DateTime<Utc>,
    pub event_name: String,
    pub event_slug: String,
}

impl From<&AttendanceRecord> for AttendanceNotice {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: record.id,
            guest_name: record.guest_name.clone(),
            institution: record.institution.clone(),
            position: record.position.clone(),
            category: record.category,
            arrival_time: record.arrival_time,
            event_name: record.event_name.clone(),
            event_slug: record.event_slug.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> AttendanceSubmission {
        AttendanceSubmission {
            event_slug: "open-campus-day-2024".into(),
            guest_name: "Ana Putri".into(),
            institution: "Universitas Dumai".into(),
            position: None,
            phone: None,
            email: None,
            representative_count: None,
            category: None,
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(submission().validate().is_ok());
    }

    #[test]
    fn representative_count_bounds() {
        let mut sub = submission();
        sub.representative_count = Some(0);
        assert_eq!(sub.validate().unwrap_err().field, "representative_count");
        sub.representative_count = Some(101);
        assert_eq!(sub.validate().unwrap_err().field, "representative_count");
        sub.representative_count = Some(100);
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn email_must_be_well_formed() {
        let mut sub = submission();
        sub.email = Some("not-an-email".into());
        assert_eq!(sub.validate().unwrap_err().field, "email");
        sub.email = Some("ana@example.ac.id".into());
        assert!(sub.validate().is_ok());
    }

    #[test]
    fn trimmed_drops_empty_optionals() {
        let mut sub = submission();
        sub.guest_name = "  Ana Putri ".into();
        sub.position = Some("   ".into());
        let sub = sub.trimmed();
        assert_eq!(sub.guest_name, "Ana Putri");
        assert_eq!(sub.position, None);
    }

    #[test]
    fn category_round_trips_through_strings() {
        for cat in [
            GuestCategory::Guest,
            GuestCategory::OfficialInvitation,
            GuestCategory::Sponsor,
            GuestCategory::Speaker,
            GuestCategory::Media,
            GuestCategory::Other,
        ] {
            assert_eq!(GuestCategory::from(cat.to_string().as_str()), cat);
        }
        // Unknown strings fall back to the default bucket
        assert_eq!(GuestCategory::from("vip"), GuestCategory::Guest);
    }
}
