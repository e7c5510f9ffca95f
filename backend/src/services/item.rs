//! Supply item service: catalog CRUD and the inline stock-level edit

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{CreateItemInput, Item, SetStockInput, UnitType, UpdateItemInput};
use shared::validation;

/// Item service for catalog management
#[derive(Clone)]
pub struct ItemService {
    db: PgPool,
}

/// Row for item queries
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

impl ItemService {
    /// Create a new ItemService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all items, alphabetically
    pub async fn list_items(&self) -> AppResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            FROM items
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Get a single item
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<Item> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(row.into())
    }

    /// Create an item
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<Item> {
        Self::validate_item_fields(
            &input.name,
            input.unit_type,
            input.items_per_box,
            input.minimum_stock,
            input.current_stock,
        )?;

        if let Some(supplier_id) = input.supplier_id {
            self.ensure_supplier_exists(supplier_id).await?;
        }

        // Per-box count only carries meaning for box items
        let items_per_box = match input.unit_type {
            UnitType::Box => Some(input.items_per_box.unwrap_or(1)),
            UnitType::Individual => None,
        };

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            "#,
        )
        .bind(input.name.trim())
        .bind(input.unit_type.as_str())
        .bind(items_per_box)
        .bind(input.minimum_stock)
        .bind(input.current_stock)
        .bind(input.supplier_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Update an item; absent fields keep their current values
    pub async fn update_item(&self, item_id: Uuid, input: UpdateItemInput) -> AppResult<Item> {
        let existing = self.get_item(item_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let unit_type = input.unit_type.unwrap_or(existing.unit_type);
        let minimum_stock = input.minimum_stock.unwrap_or(existing.minimum_stock);
        let current_stock = input.current_stock.unwrap_or(existing.current_stock);
        let supplier_id = input.supplier_id.unwrap_or(existing.supplier_id);
        let items_per_box = match unit_type {
            UnitType::Box => input.items_per_box.or(existing.items_per_box).or(Some(1)),
            UnitType::Individual => None,
        };

        Self::validate_item_fields(&name, unit_type, items_per_box, minimum_stock, current_stock)?;

        if let Some(supplier_id) = supplier_id {
            self.ensure_supplier_exists(supplier_id).await?;
        }

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET name = $1, unit_type = $2, items_per_box = $3,
                minimum_stock = $4, current_stock = $5, supplier_id = $6
            WHERE id = $7
            RETURNING id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            "#,
        )
        .bind(name.trim())
        .bind(unit_type.as_str())
        .bind(items_per_box)
        .bind(minimum_stock)
        .bind(current_stock)
        .bind(supplier_id)
        .bind(item_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    /// Inline stock-level edit
    pub async fn set_stock(&self, item_id: Uuid, input: SetStockInput) -> AppResult<Item> {
        if validation::validate_stock_level(input.current_stock).is_err() {
            return Err(AppError::Validation {
                field: "current_stock".to_string(),
                message: "Stock level cannot be negative".to_string(),
                message_ja: "在庫数は0以上で入力してください".to_string(),
            });
        }

        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET current_stock = $1
            WHERE id = $2
            RETURNING id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            "#,
        )
        .bind(input.current_stock)
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(row.into())
    }

    /// Delete an item. Items referenced by kits, usage records, or orders
    /// cannot be removed.
    pub async fn delete_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(AppError::NotFound("Item".to_string())),
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.code().as_deref() == Some("23503") => {
                Err(AppError::Conflict {
                    resource: "item".to_string(),
                    message: "Item is referenced by kits, usage records, or orders".to_string(),
                    message_ja: "この備品はセット・使用記録・発注で使用されているため削除できません"
                        .to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_supplier_exists(&self, supplier_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM suppliers WHERE id = $1)")
                .bind(supplier_id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Supplier".to_string()));
        }
        Ok(())
    }

    fn validate_item_fields(
        name: &str,
        unit_type: UnitType,
        items_per_box: Option<i32>,
        minimum_stock: i32,
        current_stock: i32,
    ) -> AppResult<()> {
        if validation::validate_name(name).is_err() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Item name must not be blank".to_string(),
                message_ja: "備品名を入力してください".to_string(),
            });
        }
        if validation::validate_stock_level(minimum_stock).is_err() {
            return Err(AppError::Validation {
                field: "minimum_stock".to_string(),
                message: "Minimum stock cannot be negative".to_string(),
                message_ja: "最低在庫数は0以上で入力してください".to_string(),
            });
        }
        if validation::validate_stock_level(current_stock).is_err() {
            return Err(AppError::Validation {
                field: "current_stock".to_string(),
                message: "Current stock cannot be negative".to_string(),
                message_ja: "在庫数は0以上で入力してください".to_string(),
            });
        }
        if unit_type == UnitType::Box {
            if let Some(per_box) = items_per_box {
                if validation::validate_items_per_box(per_box).is_err() {
                    return Err(AppError::Validation {
                        field: "items_per_box".to_string(),
                        message: "Items per box must be positive".to_string(),
                        message_ja: "箱あたりの個数は1以上で入力してください".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
