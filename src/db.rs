use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    audit::AuditEntry,
    models::{Category, Customer, Order, Product, Supplier},
    services::auth_service::hash_password,
};

pub type Db = Arc<RwLock<Tables>>;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Orders are stored by reference; `Tables::join_order` embeds customer and product.
#[derive(Debug, Clone)]
pub struct OrderRow {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Sequences {
    product: i64,
    category: i64,
    supplier: i64,
    customer: i64,
    order: i64,
    user: i64,
}

#[derive(Debug, Default)]
pub struct Tables {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
    pub orders: Vec<OrderRow>,
    pub users: Vec<UserRecord>,
    pub audit_log: Vec<AuditEntry>,
    seq: Sequences,
}

impl Tables {
    pub fn next_product_id(&mut self) -> i64 {
        self.seq.product += 1;
        self.seq.product
    }

    pub fn next_category_id(&mut self) -> i64 {
        self.seq.category += 1;
        self.seq.category
    }

    pub fn next_supplier_id(&mut self) -> i64 {
        self.seq.supplier += 1;
        self.seq.supplier
    }

    pub fn next_customer_id(&mut self) -> i64 {
        self.seq.customer += 1;
        self.seq.customer
    }

    pub fn next_order_id(&mut self) -> i64 {
        self.seq.order += 1;
        self.seq.order
    }

    pub fn next_user_id(&mut self) -> i64 {
        self.seq.user += 1;
        self.seq.user
    }

    pub fn category_name(&self, id: i64) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }

    pub fn join_order(&self, row: &OrderRow) -> Option<Order> {
        let customer = self.customers.iter().find(|c| c.id == row.customer_id)?;
        let product = self.products.iter().find(|p| p.id == row.product_id)?;
        Some(Order {
            id: row.id,
            customer_id: row.customer_id,
            product_id: row.product_id,
            quantity: row.quantity,
            status: row.status.clone(),
            notes: row.notes.clone(),
            created_at: row.created_at,
            customer: customer.clone(),
            product: product.clone(),
        })
    }
}

pub fn create_db() -> Db {
    Arc::new(RwLock::new(Tables::default()))
}

/// Seeds the admin account and a small starter catalog.
pub async fn seed_data(db: &Db, admin_password: &str) -> Result<()> {
    seed_admin(db, admin_password).await?;
    seed_catalog(db).await;
    Ok(())
}

pub async fn seed_admin(db: &Db, admin_password: &str) -> Result<()> {
    let password_hash = hash_password(admin_password)?;
    let mut tables = db.write().await;

    if !tables.users.iter().any(|u| u.username == "admin") {
        let id = tables.next_user_id();
        tables.users.push(UserRecord {
            id,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash,
            created_at: Utc::now(),
        });
    }
    Ok(())
}

pub async fn seed_catalog(db: &Db) {
    let mut tables = db.write().await;

    if tables.categories.is_empty() {
        for name in ["Dairy", "Cold cuts"] {
            let id = tables.next_category_id();
            tables.categories.push(Category {
                id,
                name: name.to_string(),
            });
        }
    }

    if tables.suppliers.is_empty() {
        for (name, phone, email) in [
            ("Supplier A", "12345", "suppliera@example.com"),
            ("Supplier B", "67890", "supplierb@example.com"),
        ] {
            let id = tables.next_supplier_id();
            tables.suppliers.push(Supplier {
                id,
                name: name.to_string(),
                phone: Some(phone.to_string()),
                email: Some(email.to_string()),
            });
        }
    }

    if tables.products.is_empty() {
        for (name, price, category_id, supplier_id) in [
            ("Farm cheese", 8500.0, 1, 1),
            ("Smoked ham", 12000.0, 2, 2),
            ("Butter", 6200.0, 1, 1),
        ] {
            let id = tables.next_product_id();
            tables.products.push(Product {
                id,
                name: name.to_string(),
                price,
                category_id,
                supplier_id,
            });
        }
    }

    tracing::info!(
        products = tables.products.len(),
        categories = tables.categories.len(),
        suppliers = tables.suppliers.len(),
        "seed data loaded"
    );
}
