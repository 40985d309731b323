// Institution domain types
//
// Institutions are a managed pick-list for the attendance form; guests may
// still type a free-text institution that matches nothing here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Institution kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum InstitutionKind {
    University,
    School,
    Government,
    Company,
    Other,
}

impl std::fmt::Display for InstitutionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InstitutionKind::University => "university",
            InstitutionKind::School => "school",
            InstitutionKind::Government => "government",
            InstitutionKind::Company => "company",
            InstitutionKind::Other => "other",
        };
        write!(f, "{s}")
    }
}

impl From<&str> for InstitutionKind {
    fn from(s: &str) -> Self {
        match s {
            "university" => InstitutionKind::University,
            "school" => InstitutionKind::School,
            "government" => InstitutionKind::Government,
            "company" => InstitutionKind::Company,
            _ => InstitutionKind::Other,
        }
    }
}

/// A managed institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Institution {
    pub id: i64,
    pub name: String,
    pub kind: InstitutionKind,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or replacing an institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SaveInstitutionRequest {
    pub name: String,
    pub kind: InstitutionKind,
}

impl SaveInstitutionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let len = self.name.trim().len();
        if !(2..=255).contains(&len) {
            return Err(ValidationError::new(
                "name",
                "must be between 2 and 255 characters",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in [
            InstitutionKind::University,
            InstitutionKind::School,
            InstitutionKind::Government,
            InstitutionKind::Company,
            InstitutionKind::Other,
        ] {
            assert_eq!(InstitutionKind::from(kind.to_string().as_str()), kind);
        }
    }

    #[test]
    fn name_length_enforced() {
        let req = SaveInstitutionRequest {
            name: "U".into(),
            kind: InstitutionKind::University,
        };
        assert!(req.validate().is_err());
    }
}
