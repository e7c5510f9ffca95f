//! JSON backup, restore, and bulk clear
//!
//! The backup document captures every record type in one versioned JSON
//! envelope. Restore replaces the whole database atomically, preserving
//! the original ids so cross-references survive the round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    ClinicInfo, Item, ItemKit, KitItem, Order, OrderItem, OrderStatus, Patient, PatientKit,
    Supplier, UnitType, Usage,
};

/// Current backup format version
const BACKUP_VERSION: u32 = 1;

/// Backup service
#[derive(Clone)]
pub struct BackupService {
    db: PgPool,
}

/// Full-database backup envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub suppliers: Vec<Supplier>,
    pub items: Vec<Item>,
    pub patients: Vec<Patient>,
    pub item_kits: Vec<ItemKit>,
    pub patient_kits: Vec<PatientKit>,
    pub kit_items: Vec<KitItem>,
    pub usages: Vec<Usage>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
    pub clinic: Option<ClinicInfo>,
}

/// Input for the bulk clear: suppliers survive unless explicitly included
#[derive(Debug, Default, Deserialize)]
pub struct ClearDataInput {
    #[serde(default)]
    pub clear_suppliers: bool,
}

/// Result of a restore run
#[derive(Debug, Serialize)]
pub struct RestoreSummary {
    pub suppliers: usize,
    pub items: usize,
    pub patients: usize,
    pub kits: usize,
    pub usages: usize,
    pub orders: usize,
}

#[derive(Debug, FromRow)]
struct SupplierRow {
    id: Uuid,
    name: String,
    fax_number: String,
    address: Option<String>,
    email: Option<String>,
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

#[derive(Debug, FromRow)]
struct PatientRow {
    id: Uuid,
    name: String,
    patient_code: Option<String>,
    address: Option<String>,
    phone: Option<String>,
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

#[derive(Debug, FromRow)]
struct KitItemRow {
    id: Uuid,
    patient_kit_id: Option<Uuid>,
    item_kit_id: Option<Uuid>,
    item_id: Uuid,
    quantity: i32,
}

#[derive(Debug, FromRow)]
struct UsageRow {
    id: Uuid,
    item_id: Uuid,
    quantity: i32,
    used_at: DateTime<Utc>,
    patient_id: Option<Uuid>,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    order_date: DateTime<Utc>,
    supplier_id: Uuid,
    status: String,
}

#[derive(Debug, FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    item_id: Uuid,
    quantity: i32,
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

impl BackupService {
    /// Create a new BackupService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Export the whole database as one JSON document
    pub async fn export(&self) -> AppResult<BackupDocument> {
        let suppliers = sqlx::query_as::<_, SupplierRow>(
            "SELECT id, name, fax_number, address, email FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| Supplier {
            id: row.id,
            name: row.name,
            fax_number: row.fax_number,
            address: row.address,
            email: row.email,
        })
        .collect();

        let items = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id
            FROM items
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| Item {
            id: row.id,
            name: row.name,
            unit_type: UnitType::parse_or_default(&row.unit_type),
            items_per_box: row.items_per_box,
            minimum_stock: row.minimum_stock,
            current_stock: row.current_stock,
            supplier_id: row.supplier_id,
        })
        .collect();

        let patients = sqlx::query_as::<_, PatientRow>(
            "SELECT id, name, patient_code, address, phone FROM patients ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| Patient {
            id: row.id,
            name: row.name,
            patient_code: row.patient_code,
            address: row.address,
            phone: row.phone,
        })
        .collect();

        let item_kits = sqlx::query_as::<_, ItemKitRow>(
            "SELECT id, name, description FROM item_kits ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| ItemKit {
            id: row.id,
            name: row.name,
            description: row.description,
        })
        .collect();

        let patient_kits = sqlx::query_as::<_, PatientKitRow>(
            "SELECT id, name, patient_id FROM patient_kits ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| PatientKit {
            id: row.id,
            name: row.name,
            patient_id: row.patient_id,
        })
        .collect();

        let kit_items = sqlx::query_as::<_, KitItemRow>(
            "SELECT id, patient_kit_id, item_kit_id, item_id, quantity FROM kit_items",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| KitItem {
            id: row.id,
            patient_kit_id: row.patient_kit_id,
            item_kit_id: row.item_kit_id,
            item_id: row.item_id,
            quantity: row.quantity,
        })
        .collect();

        let usages = sqlx::query_as::<_, UsageRow>(
            "SELECT id, item_id, quantity, used_at, patient_id FROM usages ORDER BY used_at",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| Usage {
            id: row.id,
            item_id: row.item_id,
            quantity: row.quantity,
            used_at: row.used_at,
            patient_id: row.patient_id,
        })
        .collect();

        let orders = sqlx::query_as::<_, OrderRow>(
            "SELECT id, order_date, supplier_id, status FROM orders ORDER BY order_date",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| {
            Ok(Order {
                id: row.id,
                order_date: row.order_date,
                supplier_id: row.supplier_id,
                status: OrderStatus::parse(&row.status).ok_or_else(|| {
                    AppError::Internal(format!("unknown order status: {}", row.status))
                })?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

        let order_items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, item_id, quantity FROM order_items",
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(|row| OrderItem {
            id: row.id,
            order_id: row.order_id,
            item_id: row.item_id,
            quantity: row.quantity,
        })
        .collect();

        let clinic = sqlx::query_as::<_, ClinicRow>(
            r#"
            SELECT id, name, address, phone, fax, email, website, director
            FROM clinic_info
            ORDER BY id
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.db)
        .await?
        .map(|row| ClinicInfo {
            id: row.id,
            name: row.name,
            address: row.address,
            phone: row.phone,
            fax: row.fax,
            email: row.email,
            website: row.website,
            director: row.director,
        });

        Ok(BackupDocument {
            version: BACKUP_VERSION,
            exported_at: Utc::now(),
            suppliers,
            items,
            patients,
            item_kits,
            patient_kits,
            kit_items,
            usages,
            orders,
            order_items,
            clinic,
        })
    }

    /// Replace the whole database with a backup document's contents
    pub async fn restore(&self, document: BackupDocument) -> AppResult<RestoreSummary> {
        if document.version != BACKUP_VERSION {
            return Err(AppError::ValidationError(format!(
                "unsupported backup version {}",
                document.version
            )));
        }

        let mut tx = self.db.begin().await?;

        Self::wipe(&mut tx, true).await?;

        for supplier in &document.suppliers {
            sqlx::query(
                "INSERT INTO suppliers (id, name, fax_number, address, email) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(supplier.id)
            .bind(&supplier.name)
            .bind(&supplier.fax_number)
            .bind(&supplier.address)
            .bind(&supplier.email)
            .execute(&mut *tx)
            .await?;
        }

        for item in &document.items {
            sqlx::query(
                r#"
                INSERT INTO items (id, name, unit_type, items_per_box, minimum_stock, current_stock, supplier_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(item.id)
            .bind(&item.name)
            .bind(item.unit_type.as_str())
            .bind(item.items_per_box)
            .bind(item.minimum_stock)
            .bind(item.current_stock)
            .bind(item.supplier_id)
            .execute(&mut *tx)
            .await?;
        }

        for patient in &document.patients {
            sqlx::query(
                "INSERT INTO patients (id, name, patient_code, address, phone) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(patient.id)
            .bind(&patient.name)
            .bind(&patient.patient_code)
            .bind(&patient.address)
            .bind(&patient.phone)
            .execute(&mut *tx)
            .await?;
        }

        for kit in &document.item_kits {
            sqlx::query("INSERT INTO item_kits (id, name, description) VALUES ($1, $2, $3)")
                .bind(kit.id)
                .bind(&kit.name)
                .bind(&kit.description)
                .execute(&mut *tx)
                .await?;
        }

        for kit in &document.patient_kits {
            sqlx::query("INSERT INTO patient_kits (id, name, patient_id) VALUES ($1, $2, $3)")
                .bind(kit.id)
                .bind(&kit.name)
                .bind(kit.patient_id)
                .execute(&mut *tx)
                .await?;
        }

        for line in &document.kit_items {
            sqlx::query(
                r#"
                INSERT INTO kit_items (id, patient_kit_id, item_kit_id, item_id, quantity)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(line.id)
            .bind(line.patient_kit_id)
            .bind(line.item_kit_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        for usage in &document.usages {
            sqlx::query(
                "INSERT INTO usages (id, item_id, quantity, used_at, patient_id) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(usage.id)
            .bind(usage.item_id)
            .bind(usage.quantity)
            .bind(usage.used_at)
            .bind(usage.patient_id)
            .execute(&mut *tx)
            .await?;
        }

        for order in &document.orders {
            sqlx::query(
                "INSERT INTO orders (id, order_date, supplier_id, status) VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(order.order_date)
            .bind(order.supplier_id)
            .bind(order.status.as_str())
            .execute(&mut *tx)
            .await?;
        }

        for line in &document.order_items {
            sqlx::query(
                "INSERT INTO order_items (id, order_id, item_id, quantity) VALUES ($1, $2, $3, $4)",
            )
            .bind(line.id)
            .bind(line.order_id)
            .bind(line.item_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(clinic) = &document.clinic {
            sqlx::query(
                r#"
                INSERT INTO clinic_info (id, name, address, phone, fax, email, website, director)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(clinic.id)
            .bind(&clinic.name)
            .bind(&clinic.address)
            .bind(&clinic.phone)
            .bind(&clinic.fax)
            .bind(&clinic.email)
            .bind(&clinic.website)
            .bind(&clinic.director)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(RestoreSummary {
            suppliers: document.suppliers.len(),
            items: document.items.len(),
            patients: document.patients.len(),
            kits: document.item_kits.len() + document.patient_kits.len(),
            usages: document.usages.len(),
            orders: document.orders.len(),
        })
    }

    /// Delete all data. Suppliers are kept unless explicitly included.
    pub async fn clear_all(&self, input: ClearDataInput) -> AppResult<()> {
        let mut tx = self.db.begin().await?;
        Self::wipe(&mut tx, input.clear_suppliers).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete rows in an order that respects the foreign keys
    async fn wipe(tx: &mut Transaction<'_, Postgres>, clear_suppliers: bool) -> AppResult<()> {
        for table in [
            "usages",
            "order_items",
            "kit_items",
            "orders",
            "items",
            "patient_kits",
            "item_kits",
            "patients",
            "clinic_info",
        ] {
            sqlx::query(&format!("DELETE FROM {}", table))
                .execute(&mut **tx)
                .await?;
        }

        if clear_suppliers {
            sqlx::query("DELETE FROM suppliers")
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}
