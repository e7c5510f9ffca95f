//! Clinic information service
//!
//! The clinic record is a singleton: the accessor creates it with the
//! configured default name the first time anything reads it.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{ClinicInfo, UpdateClinicInfoInput};
use shared::validation;

/// Clinic service
#[derive(Clone)]
pub struct ClinicService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct ClinicRow {
    id: Uuid,
    name: String,
    address: Option<String>,
    phone: Option<String>,
    fax: Option<String>,
    email: Option<String>,
    website: Option<String>,
    director: Option<String>,
}

impl From<ClinicRow> for ClinicInfo {
    fn from(row: ClinicRow) -> Self {
        ClinicInfo {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            fax: row.fax,
            email: row.email,
            website: row.website,
            director: row.director,
        }
    }
}

impl ClinicService {
    /// Create a new ClinicService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get the clinic record, creating it with the default name when no
    /// record exists yet
    pub async fn get_or_init(&self, default_name: &str) -> AppResult<ClinicInfo> {
        let existing = sqlx::query_as::<_, ClinicRow>(
            r#"
            SELECT id, name, address, phone, fax, email, website, director
            FROM clinic_info
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await?;

        if let Some(row) = existing {
            return Ok(row.into());
        }

        let row = sqlx::query_as::<_, ClinicRow>(
            r#"
            INSERT INTO clinic_info (name)
            VALUES ($1)
            RETURNING id, name, address, phone, fax, email, website, director
            "#,
        )
        .bind(default_name)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update the clinic record (initializing it first if needed)
    pub async fn update(
        &self,
        default_name: &str,
        input: UpdateClinicInfoInput,
    ) -> AppResult<ClinicInfo> {
        if validation::validate_name(&input.name).is_err() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Clinic name must not be blank".to_string(),
                message_ja: "クリニック名を入力してください".to_string(),
            });
        }
        if let Some(fax) = input.fax.as_deref() {
            if !fax.is_empty() && validation::validate_japanese_fax(fax).is_err() {
                return Err(AppError::Validation {
                    field: "fax".to_string(),
                    message: "Invalid fax number format".to_string(),
                    message_ja: "FAX番号の形式が正しくありません".to_string(),
                });
            }
        }

        let current = self.get_or_init(default_name).await?;

        let row = sqlx::query_as::<_, ClinicRow>(
            r#"
            UPDATE clinic_info
            SET name = $1, address = $2, phone = $3, fax = $4,
                email = $5, website = $6, director = $7
            WHERE id = $8
            RETURNING id, name, address, phone, fax, email, website, director
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.address)
        .bind(&input.phone)
        .bind(&input.fax)
        .bind(&input.email)
        .bind(&input.website)
        .bind(&input.director)
        .bind(current.id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }
}
