//! Reorder aggregation: routes triggered reorders into pending orders
//!
//! One `ReorderBatch` lives for exactly one consumption batch and runs
//! inside that batch's transaction. It remembers which order each supplier
//! resolved to so a batch never opens two orders for the same supplier,
//! and merges repeated triggers for the same item into one order line.

use sqlx::{Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::Item;
use shared::reorder::ReorderPolicy;

/// Batch-local aggregation state. Construct one per consumption batch and
/// drop it at commit; it must never outlive the batch.
#[derive(Debug, Default)]
pub struct ReorderBatch {
    /// Supplier -> resolved order, for this batch only
    by_supplier: HashMap<Uuid, Uuid>,
    /// Orders in first-touch order; the first one is the redirect target
    sequence: Vec<Uuid>,
}

impl ReorderBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the reorder check for one item after its stock was decremented.
    ///
    /// `item` carries the already-decremented stock level; `consumed` is the
    /// quantity this trigger consumed. Returns the order the reorder was
    /// routed into, or `None` when no reorder is due.
    pub async fn process(
        &mut self,
        tx: &mut Transaction<'_, Postgres>,
        item: &Item,
        consumed: i32,
        policy: ReorderPolicy,
    ) -> AppResult<Option<Uuid>> {
        if !item.reorder_due() {
            return Ok(None);
        }
        let Some(supplier_id) = item.supplier_id else {
            return Ok(None);
        };

        let order_id = self.resolve_order(tx, supplier_id).await?;
        let quantity = policy.order_quantity(consumed, item.minimum_stock, item.current_stock);
        self.merge_line(tx, order_id, item.id, quantity).await?;

        Ok(Some(order_id))
    }

    /// Find the order this supplier's reorders accumulate into:
    /// the batch-local cache first, then the newest pending order in the
    /// database, then a freshly inserted one.
    async fn resolve_order(
        &mut self,
        tx: &mut Transaction<'_, Postgres>,
        supplier_id: Uuid,
    ) -> AppResult<Uuid> {
        if let Some(order_id) = self.by_supplier.get(&supplier_id) {
            return Ok(*order_id);
        }

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM orders
            WHERE supplier_id = $1 AND status = 'pending'
            ORDER BY order_date DESC
            LIMIT 1
            "#,
        )
        .bind(supplier_id)
        .fetch_optional(&mut **tx)
        .await?;

        let order_id = match existing {
            Some(id) => id,
            None => {
                // Inserted immediately so the id is usable for line merging
                sqlx::query_scalar::<_, Uuid>(
                    r#"
                    INSERT INTO orders (supplier_id, status, order_date)
                    VALUES ($1, 'pending', now())
                    RETURNING id
                    "#,
                )
                .bind(supplier_id)
                .fetch_one(&mut **tx)
                .await?
            }
        };

        self.by_supplier.insert(supplier_id, order_id);
        self.sequence.push(order_id);
        Ok(order_id)
    }

    /// Add quantity to the order's line for this item, creating the line if
    /// it does not exist. At most one line per (order, item).
    async fn merge_line(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<()> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM order_items WHERE order_id = $1 AND item_id = $2",
        )
        .bind(order_id)
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?;

        match existing {
            Some(line_id) => {
                sqlx::query("UPDATE order_items SET quantity = quantity + $1 WHERE id = $2")
                    .bind(quantity)
                    .bind(line_id)
                    .execute(&mut **tx)
                    .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO order_items (order_id, item_id, quantity) VALUES ($1, $2, $3)",
                )
                .bind(order_id)
                .bind(item_id)
                .bind(quantity)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }

    /// Orders touched during this batch, in first-touch order
    pub fn order_ids(&self) -> &[Uuid] {
        &self.sequence
    }

    /// The redirect target: the first order touched during the batch
    pub fn first_order_id(&self) -> Option<Uuid> {
        self.sequence.first().copied()
    }

    /// Whether any reorder was generated during the batch
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}
