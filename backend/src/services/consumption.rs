//! Consumption service: records stock usage and drives reorder generation
//!
//! Every entry point processes its lines as one batch inside one
//! transaction: usage rows, stock decrements, and any generated purchase
//! orders commit or roll back together.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{Item, RecordUsageInput, UnitType};
use crate::services::reorder::ReorderBatch;
use shared::reorder::{consume_stock, ReorderPolicy};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Consumption service
#[derive(Clone)]
pub struct ConsumptionService {
    db: PgPool,
}

/// Result of one consumption batch, returned to the caller so it can
/// redirect to the first generated order
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    /// Usage rows written
    pub recorded: u32,
    /// Lines dropped for a missing item reference or non-positive quantity
    pub skipped: u32,
    /// Orders touched, in first-touch order
    pub order_ids: Vec<Uuid>,
    /// Where the caller should navigate: the first order touched
    pub redirect_order_id: Option<Uuid>,
    pub reorder_generated: bool,
}

/// A usage record joined with item and patient names for display
#[derive(Debug, Serialize, FromRow)]
pub struct UsageDetail {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub used_at: DateTime<Utc>,
    pub patient_id: Option<Uuid>,
    pub patient_name: Option<String>,
}

/// Filter for usage listings
#[derive(Debug, Default, Deserialize)]
pub struct UsageFilter {
    pub item_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
}

/// Input for using a generic kit: the patient is optional
#[derive(Debug, Default, Deserialize)]
pub struct UseItemKitInput {
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    unit_type: String,
    items_per_box: Option<i32>,
    minimum_stock: i32,
    current_stock: i32,
    supplier_id: Option<Uuid>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            name: row.name,
            unit_type: UnitType::parse_or_default(&row.unit_type),
            items_per_box: row.items_per_box,
            minimum_stock: row.minimum_stock,
            current_stock: row.current_stock,
            supplier_id: row.supplier_id,
        }
    }
}

#[derive(Debug, FromRow)]
struct KitLineRow {
    item_id: Uuid,
    quantity: i32,
}

impl ConsumptionService {
    /// Create a new ConsumptionService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an ad-hoc consumption batch.
    ///
    /// Lines without an item reference or with a non-positive quantity are
    /// skipped and counted. A line whose item id does not resolve aborts
    /// the whole batch. Reorders replenish the consumed quantity.
    pub async fn record_usage(&self, input: RecordUsageInput) -> AppResult<BatchOutcome> {
        if input.lines.is_empty() {
            return Err(AppError::Validation {
                field: "lines".to_string(),
                message: "Select items and quantities".to_string(),
                message_ja: "備品と数量を正しく選択してください".to_string(),
            });
        }

        if let Some(patient_id) = input.patient_id {
            self.ensure_patient_exists(patient_id).await?;
        }

        let mut tx = self.db.begin().await?;
        let mut batch = ReorderBatch::new();
        let mut recorded = 0u32;
        let mut skipped = 0u32;

        for line in &input.lines {
            let Some(item_id) = line.item_id else {
                skipped += 1;
                continue;
            };
            if line.quantity <= 0 {
                skipped += 1;
                continue;
            }

            // Missing item is a hard stop: the batch rolls back
            let item = Self::fetch_item(&mut tx, item_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

            Self::consume_one(
                &mut tx,
                &mut batch,
                item,
                line.quantity,
                input.patient_id,
                ReorderPolicy::ReplenishConsumed,
            )
            .await?;
            recorded += 1;
        }

        tx.commit().await?;

        Ok(Self::outcome(recorded, skipped, batch))
    }

    /// Consume a patient kit: one line per kit item, attributed to the
    /// kit's patient. Reorders replenish the consumed quantity.
    pub async fn use_patient_kit(&self, kit_id: Uuid) -> AppResult<BatchOutcome> {
        let patient_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT patient_id FROM patient_kits WHERE id = $1",
        )
        .bind(kit_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Kit".to_string()))?;

        let lines = sqlx::query_as::<_, KitLineRow>(
            "SELECT item_id, quantity FROM kit_items WHERE patient_kit_id = $1",
        )
        .bind(kit_id)
        .fetch_all(&self.db)
        .await?;

        self.consume_kit_lines(lines, Some(patient_id), ReorderPolicy::ReplenishConsumed)
            .await
    }

    /// Consume a generic kit, optionally attributed to a patient.
    /// Reorders restock toward twice the minimum threshold.
    pub async fn use_item_kit(
        &self,
        kit_id: Uuid,
        input: UseItemKitInput,
    ) -> AppResult<BatchOutcome> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM item_kits WHERE id = $1)")
                .bind(kit_id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Kit".to_string()));
        }

        if let Some(patient_id) = input.patient_id {
            self.ensure_patient_exists(patient_id).await?;
        }

        let lines = sqlx::query_as::<_, KitLineRow>(
            "SELECT item_id, quantity FROM kit_items WHERE item_kit_id = $1",
        )
        .bind(kit_id)
        .fetch_all(&self.db)
        .await?;

        self.consume_kit_lines(lines, input.patient_id, ReorderPolicy::RestockToTarget)
            .await
    }

    /// List usage records, newest first
    pub async fn list_usages(
        &self,
        filter: UsageFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<UsageDetail>> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM usages u
            WHERE ($1::uuid IS NULL OR u.item_id = $1)
              AND ($2::uuid IS NULL OR u.patient_id = $2)
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.patient_id)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, UsageDetail>(
            r#"
            SELECT u.id, u.item_id, i.name AS item_name, u.quantity, u.used_at,
                   u.patient_id, p.name AS patient_name
            FROM usages u
            JOIN items i ON i.id = u.item_id
            LEFT JOIN patients p ON p.id = u.patient_id
            WHERE ($1::uuid IS NULL OR u.item_id = $1)
              AND ($2::uuid IS NULL OR u.patient_id = $2)
            ORDER BY u.used_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(filter.item_id)
        .bind(filter.patient_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows,
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }

    // ========================================================================
    // Batch internals
    // ========================================================================

    /// Run one kit expansion as a consumption batch. Kit lines were
    /// validated positive at authoring time; a line whose item row no
    /// longer exists is skipped.
    async fn consume_kit_lines(
        &self,
        lines: Vec<KitLineRow>,
        patient_id: Option<Uuid>,
        policy: ReorderPolicy,
    ) -> AppResult<BatchOutcome> {
        if lines.is_empty() {
            return Err(AppError::Validation {
                field: "lines".to_string(),
                message: "This kit has no items".to_string(),
                message_ja: "このセットには備品が登録されていません".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;
        let mut batch = ReorderBatch::new();
        let mut recorded = 0u32;
        let mut skipped = 0u32;

        for line in &lines {
            let Some(item) = Self::fetch_item(&mut tx, line.item_id).await? else {
                skipped += 1;
                continue;
            };

            Self::consume_one(&mut tx, &mut batch, item, line.quantity, patient_id, policy)
                .await?;
            recorded += 1;
        }

        tx.commit().await?;

        Ok(Self::outcome(recorded, skipped, batch))
    }

    /// Record one consumed line: usage row, stock decrement floored at
    /// zero, then the reorder check against the decremented level.
    async fn consume_one(
        tx: &mut Transaction<'_, Postgres>,
        batch: &mut ReorderBatch,
        mut item: Item,
        quantity: i32,
        patient_id: Option<Uuid>,
        policy: ReorderPolicy,
    ) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO usages (item_id, quantity, patient_id, used_at) VALUES ($1, $2, $3, now())",
        )
        .bind(item.id)
        .bind(quantity)
        .bind(patient_id)
        .execute(&mut **tx)
        .await?;

        item.current_stock = consume_stock(item.current_stock, quantity);

        sqlx::query("UPDATE items SET current_stock = $1 WHERE id = $2")
            .bind(item.current_stock)
            .bind(item.id)
            .execute(&mut **tx)
            .await?;

        batch.process(tx, &item, quantity, policy).await?;

        Ok(())
    }

    async fn fetch_item(
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
    ) -> AppResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(Item::from))
    }

    async fn ensure_patient_exists(&self, patient_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM patients WHERE id = $1)")
                .bind(patient_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Patient".to_string()));
        }
        Ok(())
    }

    fn outcome(recorded: u32, skipped: u32, batch: ReorderBatch) -> BatchOutcome {
        let order_ids = batch.order_ids().to_vec();
        BatchOutcome {
            recorded,
            skipped,
            redirect_order_id: batch.first_order_id(),
            reorder_generated: !batch.is_empty(),
            order_ids,
        }
    }
}
