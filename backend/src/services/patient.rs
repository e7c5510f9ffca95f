//! Patient service: master data for home-visit patients

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreatePatientInput, Patient, UpdatePatientInput};
use shared::validation;

/// Patient service
#[derive(Clone)]
pub struct PatientService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct PatientRow {
    id: Uuid,
    name: String,
    patient_code: Option<String>,
    address: Option<String>,
    phone: Option<String>,
}

impl From<PatientRow> for Patient {
    fn from(row: PatientRow) -> Self {
        Patient {
            id: row.id,
            name: row.name,
            patient_code: row.patient_code,
            address: row.address,
            phone: row.phone,
        }
    }
}

impl PatientService {
    /// Create a new PatientService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all patients, alphabetically
    pub async fn list_patients(&self) -> AppResult<Vec<Patient>> {
        let rows = sqlx::query_as::<_, PatientRow>(
            "SELECT id, name, patient_code, address, phone FROM patients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Patient::from).collect())
    }

    /// Get a single patient
    pub async fn get_patient(&self, patient_id: Uuid) -> AppResult<Patient> {
        let row = sqlx::query_as::<_, PatientRow>(
            "SELECT id, name, patient_code, address, phone FROM patients WHERE id = $1",
        )
        .bind(patient_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Patient".to_string()))?;

        Ok(row.into())
    }

    /// Create a patient
    pub async fn create_patient(&self, input: CreatePatientInput) -> AppResult<Patient> {
        Self::validate_patient_fields(&input.name, input.patient_code.as_deref())?;

        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            INSERT INTO patients (name, patient_code, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, patient_code, address, phone
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.patient_code)
        .bind(&input.address)
        .bind(&input.phone)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a patient; absent fields keep their current values
    pub async fn update_patient(
        &self,
        patient_id: Uuid,
        input: UpdatePatientInput,
    ) -> AppResult<Patient> {
        let existing = self.get_patient(patient_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let patient_code = input.patient_code.or(existing.patient_code);
        let address = input.address.or(existing.address);
        let phone = input.phone.or(existing.phone);

        Self::validate_patient_fields(&name, patient_code.as_deref())?;

        let row = sqlx::query_as::<_, PatientRow>(
            r#"
            UPDATE patients
            SET name = $1, patient_code = $2, address = $3, phone = $4
            WHERE id = $5
            RETURNING id, name, patient_code, address, phone
            "#,
        )
        .bind(name.trim())
        .bind(&patient_code)
        .bind(&address)
        .bind(&phone)
        .bind(patient_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a patient. Patients referenced by kits or usage records
    /// cannot be removed.
    pub async fn delete_patient(&self, patient_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(patient_id)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(AppError::NotFound("Patient".to_string()))
            }
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => {
                Err(AppError::Conflict {
                    resource: "patient".to_string(),
                    message: "Patient is referenced by kits or usage records".to_string(),
                    message_ja: "この患者はセットまたは使用記録で使用されているため削除できません"
                        .to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn validate_patient_fields(name: &str, patient_code: Option<&str>) -> AppResult<()> {
        if validation::validate_name(name).is_err() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Patient name must not be blank".to_string(),
                message_ja: "患者名を入力してください".to_string(),
            });
        }
        if let Some(code) = patient_code {
            if !code.is_empty() {
                if let Err(msg) = validation::validate_patient_code(code) {
                    return Err(AppError::Validation {
                        field: "patient_code".to_string(),
                        message: msg.to_string(),
                        message_ja: "患者コードの形式が正しくありません".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
