// Institution service for business logic
//
// Delete protection is referential: an institution with attendance snapshot
// references cannot be removed, regardless of later renames.

use std::sync::Arc;

use tamu_core::{Institution, SaveInstitutionRequest};
use tamu_storage::Database;

use crate::error::{ApiError, ApiResult};

pub struct InstitutionService {
    db: Arc<Database>,
}

impl InstitutionService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<Institution>> {
        let rows = self.db.list_institutions().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn get(&self, id: i64) -> ApiResult<Institution> {
        let row = self
            .db
            .get_institution(id)
            .await?
            .ok_or(ApiError::NotFound("institution"))?;
        Ok(row.into())
    }

    pub async fn create(&self, req: SaveInstitutionRequest) -> ApiResult<Institution> {
        req.validate()?;
        let name = req.name.trim().to_string();
        if self.db.find_institution_by_name(&name).await?.is_some() {
            return Err(ApiError::Conflict(format!(
                "an institution named '{name}' already exists"
            )));
        }
        let row = self
            .db
            .create_institution(&name, &req.kind.to_string())
            .await?;
        Ok(row.into())
    }

    pub async fn update(&self, id: i64, req: SaveInstitutionRequest) -> ApiResult<Institution> {
        req.validate()?;
        let name = req.name.trim().to_string();
        if let Some(existing) = self.db.find_institution_by_name(&name).await? {
            if existing.id != id {
                return Err(ApiError::Conflict(format!(
                    "an institution named '{name}' already exists"
                )));
            }
        }
        let row = self
            .db
            .update_institution(id, &name, &req.kind.to_string())
            .await?
            .ok_or(ApiError::NotFound("institution"))?;
        Ok(row.into())
    }

    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        // NotFound before the in-use check, so callers can tell them apart
        self.get(id).await?;
        if self.db.institution_in_use(id).await? {
            return Err(ApiError::Conflict(
                "cannot delete an institution referenced by attendance records".to_string(),
            ));
        }
        if !self.db.delete_institution(id).await? {
            return Err(ApiError::NotFound("institution"));
        }
        Ok(())
    }
}
