//! Purchase order service: listing, detail, status transitions, and the
//! order document

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{OrderStatus, SetOrderStatusInput, Supplier, UnitType};
use crate::services::clinic::ClinicService;
use crate::services::document;

/// Order service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Order summary for listings
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub status: OrderStatus,
    pub line_count: i64,
}

/// One order line with its item for display
#[derive(Debug, Serialize)]
pub struct OrderLineDetail {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub quantity: i32,
    pub unit_label: String,
}

/// A full order with supplier and lines
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    pub id: Uuid,
    pub order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub supplier: Supplier,
    pub lines: Vec<OrderLineDetail>,
}

#[derive(Debug, FromRow)]
struct OrderSummaryRow {
    id: Uuid,
    order_date: DateTime<Utc>,
    supplier_id: Uuid,
    supplier_name: String,
    status: String,
    line_count: i64,
}

#[derive(Debug, FromRow)]
struct OrderHeadRow {
    id: Uuid,
    order_date: DateTime<Utc>,
    status: String,
    supplier_id: Uuid,
    supplier_name: String,
    fax_number: String,
    address: Option<String>,
    email: Option<String>,
}

#[derive(Debug, FromRow)]
struct OrderLineRow {
    id: Uuid,
    item_id: Uuid,
    item_name: String,
    quantity: i32,
    unit_type: String,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all orders, newest first
    pub async fn list_orders(&self) -> AppResult<Vec<OrderSummary>> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            r#"
            SELECT o.id, o.order_date, o.supplier_id, s.name AS supplier_name, o.status,
                   COUNT(oi.id) AS line_count
            FROM orders o
            JOIN suppliers s ON s.id = o.supplier_id
            LEFT JOIN order_items oi ON oi.order_id = o.id
            GROUP BY o.id, o.order_date, o.supplier_id, s.name, o.status
            ORDER BY o.order_date DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(OrderSummary {
                    id: row.id,
                    order_date: row.order_date,
                    supplier_id: row.supplier_id,
                    supplier_name: row.supplier_name,
                    status: Self::parse_status(&row.status)?,
                    line_count: row.line_count,
                })
            })
            .collect()
    }

    /// Get an order with its supplier and lines
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderDetail> {
        let head = sqlx::query_as::<_, OrderHeadRow>(
            r#"
            SELECT o.id, o.order_date, o.status, o.supplier_id,
                   s.name AS supplier_name, s.fax_number, s.address, s.email
            FROM orders o
            JOIN suppliers s ON s.id = o.supplier_id
            WHERE o.id = $1
            "#,
        )
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let lines = sqlx::query_as::<_, OrderLineRow>(
            r#"
            SELECT oi.id, oi.item_id, i.name AS item_name, oi.quantity, i.unit_type
            FROM order_items oi
            JOIN items i ON i.id = oi.item_id
            WHERE oi.order_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderDetail {
            id: head.id,
            order_date: head.order_date,
            status: Self::parse_status(&head.status)?,
            supplier: Supplier {
                id: head.supplier_id,
                name: head.supplier_name,
                fax_number: head.fax_number,
                address: head.address,
                email: head.email,
            },
            lines: lines
                .into_iter()
                .map(|row| OrderLineDetail {
                    id: row.id,
                    item_id: row.item_id,
                    item_name: row.item_name,
                    quantity: row.quantity,
                    unit_label: UnitType::parse_or_default(&row.unit_type)
                        .document_label()
                        .to_string(),
                })
                .collect(),
        })
    }

    /// Manually transition an order's status. Only the forward transitions
    /// pending -> sent and sent -> received exist.
    pub async fn set_status(
        &self,
        order_id: Uuid,
        input: SetOrderStatusInput,
    ) -> AppResult<OrderDetail> {
        let current = sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;
        let current = Self::parse_status(&current)?;

        if !current.can_transition(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot change order status from {} to {}",
                current.as_str(),
                input.status.as_str()
            )));
        }

        sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(input.status.as_str())
            .bind(order_id)
            .execute(&self.db)
            .await?;

        self.get_order(order_id).await
    }

    /// Render the purchase-order document and advance a pending order to
    /// sent. Regeneration on a sent or received order re-renders without
    /// touching the status; the transition is one-way.
    pub async fn generate_document(
        &self,
        order_id: Uuid,
        default_clinic_name: &str,
    ) -> AppResult<Vec<u8>> {
        let order = self.get_order(order_id).await?;

        let clinic = ClinicService::new(self.db.clone())
            .get_or_init(default_clinic_name)
            .await?;

        let bytes = document::render_purchase_order(&order, &clinic)?;

        if order.status == OrderStatus::Pending {
            sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
                .bind(OrderStatus::Sent.as_str())
                .bind(order_id)
                .execute(&self.db)
                .await?;
        }

        Ok(bytes)
    }

    fn parse_status(value: &str) -> AppResult<OrderStatus> {
        OrderStatus::parse(value)
            .ok_or_else(|| AppError::Internal(format!("unknown order status: {}", value)))
    }
}
