//! Kit service: reusable bundles of supply items
//!
//! Generic kits can be used for any patient; patient kits belong to one
//! patient. Editing a kit replaces its whole line set.

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    CreateItemKitInput, CreatePatientKitInput, ItemKit, KitLineInput, PatientKit,
    ReplaceKitLinesInput,
};
use serde::Serialize;
use shared::validation;

/// Kit service
#[derive(Clone)]
pub struct KitService {
    db: PgPool,
}

/// A kit line joined with its item for display
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct KitLineDetail {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
}

/// A generic kit with its lines
#[derive(Debug, Clone, Serialize)]
pub struct ItemKitDetail {
    #[serde(flatten)]
    pub kit: ItemKit,
    pub lines: Vec<KitLineDetail>,
}

/// A patient kit with its lines
#[derive(Debug, Clone, Serialize)]
pub struct PatientKitDetail {
    #[serde(flatten)]
    pub kit: PatientKit,
    pub lines: Vec<KitLineDetail>,
}

#[derive(Debug, FromRow)]
struct ItemKitRow {
    id: Uuid,
    name: String,
    description: Option<String>,
}

#[derive(Debug, FromRow)]
struct PatientKitRow {
    id: Uuid,
    name: String,
    patient_id: Uuid,
}

impl From<ItemKitRow> for ItemKit {
    fn from(row: ItemKitRow) -> Self {
        ItemKit {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

impl From<PatientKitRow> for PatientKit {
    fn from(row: PatientKitRow) -> Self {
        PatientKit {
            id: row.id,
            name: row.name,
            patient_id: row.patient_id,
        }
    }
}

impl KitService {
    /// Create a new KitService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Generic kits
    // ========================================================================

    /// List all generic kits
    pub async fn list_item_kits(&self) -> AppResult<Vec<ItemKit>> {
        let rows = sqlx::query_as::<_, ItemKitRow>(
            "SELECT id, name, description FROM item_kits ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ItemKit::from).collect())
    }

    /// Get a generic kit with its lines
    pub async fn get_item_kit(&self, kit_id: Uuid) -> AppResult<ItemKitDetail> {
        let kit = sqlx::query_as::<_, ItemKitRow>(
            "SELECT id, name, description FROM item_kits WHERE id = $1",
        )
        .bind(kit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Kit".to_string()))?;

        let lines = sqlx::query_as::<_, KitLineDetail>(
            r#"
            SELECT ki.id, ki.item_id, i.name AS item_name, ki.quantity
            FROM kit_items ki
            JOIN items i ON i.id = ki.item_id
            WHERE ki.item_kit_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(kit_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ItemKitDetail {
            kit: kit.into(),
            lines,
        })
    }

    /// Create a generic kit with its lines
    pub async fn create_item_kit(&self, input: CreateItemKitInput) -> AppResult<ItemKitDetail> {
        Self::validate_kit_name(&input.name)?;
        let lines = self.usable_lines(&input.lines).await?;

        let mut tx = self.db.begin().await?;

        let kit_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO item_kits (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query("INSERT INTO kit_items (item_kit_id, item_id, quantity) VALUES ($1, $2, $3)")
                .bind(kit_id)
                .bind(line.item_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_item_kit(kit_id).await
    }

    /// Replace a generic kit's line set
    pub async fn replace_item_kit_lines(
        &self,
        kit_id: Uuid,
        input: ReplaceKitLinesInput,
    ) -> AppResult<ItemKitDetail> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM item_kits WHERE id = $1)",
        )
        .bind(kit_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Kit".to_string()));
        }

        let lines = self.usable_lines(&input.lines).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM kit_items WHERE item_kit_id = $1")
            .bind(kit_id)
            .execute(&mut *tx)
            .await?;

        for line in &lines {
            sqlx::query("INSERT INTO kit_items (item_kit_id, item_id, quantity) VALUES ($1, $2, $3)")
                .bind(kit_id)
                .bind(line.item_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        self.get_item_kit(kit_id).await
    }

    /// Delete a generic kit and its lines
    pub async fn delete_item_kit(&self, kit_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM item_kits WHERE id = $1")
            .bind(kit_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Kit".to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Patient kits
    // ========================================================================

    /// List all patient kits
    pub async fn list_patient_kits(&self) -> AppResult<Vec<PatientKit>> {
        let rows = sqlx::query_as::<_, PatientKitRow>(
            "SELECT id, name, patient_id FROM patient_kits ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(PatientKit::from).collect())
    }

    /// List the kits bound to one patient
    pub async fn list_patient_kits_for_patient(
        &self,
        patient_id: Uuid,
    ) -> AppResult<Vec<PatientKit>> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM patients WHERE id = $1)")
                .bind(patient_id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Patient".to_string()));
        }

        let rows = sqlx::query_as::<_, PatientKitRow>(
            "SELECT id, name, patient_id FROM patient_kits WHERE patient_id = $1 ORDER BY name",
        )
        .bind(patient_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(PatientKit::from).collect())
    }

    /// Get a patient kit with its lines
    pub async fn get_patient_kit(&self, kit_id: Uuid) -> AppResult<PatientKitDetail> {
        let kit = sqlx::query_as::<_, PatientKitRow>(
            "SELECT id, name, patient_id FROM patient_kits WHERE id = $1",
        )
        .bind(kit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Kit".to_string()))?;

        let lines = sqlx::query_as::<_, KitLineDetail>(
            r#"
            SELECT ki.id, ki.item_id, i.name AS item_name, ki.quantity
            FROM kit_items ki
            JOIN items i ON i.id = ki.item_id
            WHERE ki.patient_kit_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(kit_id)
        .fetch_all(&self.db)
        .await?;

        Ok(PatientKitDetail {
            kit: kit.into(),
            lines,
        })
    }

    /// Create a patient kit with its lines
    pub async fn create_patient_kit(
        &self,
        input: CreatePatientKitInput,
    ) -> AppResult<PatientKitDetail> {
        Self::validate_kit_name(&input.name)?;

        let patient_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM patients WHERE id = $1)")
                .bind(input.patient_id)
                .fetch_one(&self.db)
                .await?;
        if !patient_exists {
            return Err(AppError::NotFound("Patient".to_string()));
        }

        let lines = self.usable_lines(&input.lines).await?;

        let mut tx = self.db.begin().await?;

        let kit_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO patient_kits (name, patient_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(input.name.trim())
        .bind(input.patient_id)
        .fetch_one(&mut *tx)
        .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO kit_items (patient_kit_id, item_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(kit_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_patient_kit(kit_id).await
    }

    /// Replace a patient kit's line set
    pub async fn replace_patient_kit_lines(
        &self,
        kit_id: Uuid,
        input: ReplaceKitLinesInput,
    ) -> AppResult<PatientKitDetail> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM patient_kits WHERE id = $1)",
        )
        .bind(kit_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Kit".to_string()));
        }

        let lines = self.usable_lines(&input.lines).await?;

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM kit_items WHERE patient_kit_id = $1")
            .bind(kit_id)
            .execute(&mut *tx)
            .await?;

        for line in &lines {
            sqlx::query(
                "INSERT INTO kit_items (patient_kit_id, item_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(kit_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_patient_kit(kit_id).await
    }

    /// Delete a patient kit and its lines
    pub async fn delete_patient_kit(&self, kit_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM patient_kits WHERE id = $1")
            .bind(kit_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Kit".to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Filter submitted lines down to the usable ones. Non-positive
    /// quantities are dropped silently, matching the authoring forms;
    /// an unknown item is a hard error.
    async fn usable_lines(&self, lines: &[KitLineInput]) -> AppResult<Vec<KitLineInput>> {
        let mut usable = Vec::new();
        for line in lines {
            if validation::validate_quantity(line.quantity).is_err() {
                continue;
            }
            let exists =
                sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
                    .bind(line.item_id)
                    .fetch_one(&self.db)
                    .await?;
            if !exists {
                return Err(AppError::NotFound("Item".to_string()));
            }
            usable.push(line.clone());
        }
        Ok(usable)
    }

    fn validate_kit_name(name: &str) -> AppResult<()> {
        if validation::validate_name(name).is_err() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Kit name must not be blank".to_string(),
                message_ja: "セット名を入力してください".to_string(),
            });
        }
        Ok(())
    }
}
