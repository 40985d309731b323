// Event domain types
//
// An event is the unit everything else hangs off: guests check in against an
// event, and live displays subscribe to one event's room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A campus event guests can check in to.
///
/// The slug is the public handle: the attendance form and the live display
/// both address an event by slug, so it is unique and URL-safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEventRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Request to update an event. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Attendance rollup for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventStats {
    pub total_attendees: i64,
    pub total_institutions: i64,
    /// Sum of representative counts (head-count including delegations).
    pub total_represented: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_arrival: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_arrival: Option<DateTime<Utc>>,
}

/// Per-institution attendance rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InstitutionRollup {
    pub institution: String,
    pub attendee_count: i64,
    pub total_represented: i64,
}

/// Per-category attendance rollup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CategoryRollup {
    pub category: crate::attendance::GuestCategory,
    pub attendee_count: i64,
    pub total_represented: i64,
}

/// Slug rule: lowercase ASCII letters, digits, and dashes.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let trimmed = slug.trim();
    if trimmed.len() < 3 || trimmed.len() > 255 {
        return Err(ValidationError::new(
            "slug",
            "must be between 3 and 255 characters",
        ));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ValidationError::new(
            "slug",
            "may only contain lowercase letters, digits, and dashes",
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().len();
    if !(3..=255).contains(&len) {
        return Err(ValidationError::new(
            "name",
            "must be between 3 and 255 characters",
        ));
    }
    Ok(())
}

fn validate_description(description: &Option<String>) -> Result<(), ValidationError> {
    if let Some(d) = description {
        if d.len() > 1000 {
            return Err(ValidationError::new(
                "description",
                "must be at most 1000 characters",
            ));
        }
    }
    Ok(())
}

fn validate_location(location: &Option<String>) -> Result<(), ValidationError> {
    if let Some(l) = location {
        if l.len() > 255 {
            return Err(ValidationError::new(
                "location",
                "must be at most 255 characters",
            ));
        }
    }
    Ok(())
}

impl CreateEventRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_slug(&self.slug)?;
        validate_description(&self.description)?;
        validate_location(&self.location)?;
        Ok(())
    }
}

impl UpdateEventRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(slug) = &self.slug {
            validate_slug(slug)?;
        }
        validate_description(&self.description)?;
        validate_location(&self.location)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_accepts_lowercase_dashes() {
        assert!(validate_slug("open-campus-day-2024").is_ok());
    }

    #[test]
    fn slug_rejects_uppercase_and_spaces() {
        assert!(validate_slug("Open Campus").is_err());
        assert!(validate_slug("open_campus").is_err());
        assert!(validate_slug("ab").is_err());
    }

    #[test]
    fn create_request_validates_bounds() {
        let req = CreateEventRequest {
            name: "Open Campus Day".into(),
            slug: "open-campus-day-2024".into(),
            description: None,
            date: Utc::now(),
            location: Some("Auditorium".into()),
        };
        assert!(req.validate().is_ok());

        let bad = CreateEventRequest {
            name: "ab".into(),
            ..req
        };
        assert_eq!(bad.validate().unwrap_err().field, "name");
    }
}
