//! Supplier service: master data for the parties orders are faxed to

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateSupplierInput, Supplier, UpdateSupplierInput};
use shared::validation;

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    fax_number: String,
    address: Option<String>,
    email: Option<String>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            id: row.id,
            name: row.name,
            fax_number: row.fax_number,
            address: row.address,
            email: row.email,
        }
    }
}

impl SupplierService {
    /// Create a new SupplierService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all suppliers, alphabetically
    pub async fn list_suppliers(&self) -> AppResult<Vec<Supplier>> {
        let rows = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, fax_number, address, email FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Get a single supplier
    pub async fn get_supplier(&self, supplier_id: Uuid) -> AppResult<Supplier> {
        let row = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, fax_number, address, email FROM suppliers WHERE id = $1",
        )
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        Ok(row.into())
    }

    /// Create a supplier
    pub async fn create_supplier(&self, input: CreateSupplierInput) -> AppResult<Supplier> {
        Self::validate_supplier_fields(&input.name, &input.fax_number, input.email.as_deref())?;

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            INSERT INTO suppliers (name, fax_number, address, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, fax_number, address, email
            "#,
        )
        .bind(input.name.trim())
        .bind(input.fax_number.trim())
        .bind(&input.address)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update a supplier; absent fields keep their current values
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        input: UpdateSupplierInput,
    ) -> AppResult<Supplier> {
        let existing = self.get_supplier(supplier_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let fax_number = input.fax_number.unwrap_or(existing.fax_number);
        let address = input.address.or(existing.address);
        let email = input.email.or(existing.email);

        Self::validate_supplier_fields(&name, &fax_number, email.as_deref())?;

        let row = sqlx::query_as::<_, SupplierRow>(
            r#"
            UPDATE suppliers
            SET name = $1, fax_number = $2, address = $3, email = $4
            WHERE id = $5
            RETURNING id, name, fax_number, address, email
            "#,
        )
        .bind(name.trim())
        .bind(fax_number.trim())
        .bind(&address)
        .bind(&email)
        .bind(supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Delete a supplier. Suppliers referenced by items or orders cannot be
    /// removed.
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(supplier_id)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                Err(AppError::NotFound("Supplier".to_string()))
            }
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => {
                Err(AppError::Conflict {
                    resource: "supplier".to_string(),
                    message: "Supplier is referenced by items or orders".to_string(),
                    message_ja: "この発注先は備品または発注で使用されているため削除できません"
                        .to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn validate_supplier_fields(
        name: &str,
        fax_number: &str,
        email: Option<&str>,
    ) -> AppResult<()> {
        if validation::validate_name(name).is_err() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Supplier name must not be blank".to_string(),
                message_ja: "発注先名を入力してください".to_string(),
            });
        }
        if let Err(msg) = validation::validate_japanese_fax(fax_number) {
            return Err(AppError::Validation {
                field: "fax_number".to_string(),
                message: msg.to_string(),
                message_ja: "FAX番号の形式が正しくありません".to_string(),
            });
        }
        if let Some(email) = email {
            if !email.is_empty() && validation::validate_email(email).is_err() {
                return Err(AppError::Validation {
                    field: "email".to_string(),
                    message: "Invalid email format".to_string(),
                    message_ja: "メールアドレスの形式が正しくありません".to_string(),
                });
            }
        }
        Ok(())
    }
}
