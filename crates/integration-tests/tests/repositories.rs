//! Integration tests for the `PostgreSQL` repositories.
//!
//! These tests require:
//! - A scratch `PostgreSQL` database (tables come from `fixtures/schema.sql`)
//! - `NORTHWIND_TEST_DATABASE_URL` pointing at it
//!
//! Run with: cargo test -p northwind-integration-tests -- --ignored

use rust_decimal_macros::dec;

use northwind_admin::db::{
    CategoryRepository, CustomerRepository, OrderDetailRepository, OrderRepository,
    ProductRepository, RepositoryError,
};
use northwind_core::models::{
    NewCategory, NewCustomer, NewOrder, NewOrderDetail, NewProduct, ShipTo,
};
use northwind_admin::seed::{SeedError, SeedFile, seed};
use northwind_core::{OrderInput, OrderRef};
use northwind_integration_tests::test_pool;

// =============================================================================
// Repository Tests
// =============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_order_totals_follow_snapshotted_prices() {
    let pool = test_pool().await;

    let category = CategoryRepository::new(&pool)
        .create(&NewCategory {
            name: "Test Dairy".to_string(),
            ..NewCategory::default()
        })
        .await
        .expect("create category");

    let products = ProductRepository::new(&pool);
    let cheese = products
        .create(&NewProduct {
            name: "Test Cabrales".to_string(),
            category_id: category.id,
            quantity_per_unit: None,
            unit_price: Some(dec!(14.00)),
            in_stock: Some(10),
            on_order: None,
            reorder_level: None,
            discontinued: false,
        })
        .await
        .expect("create product");

    let customer = CustomerRepository::new(&pool)
        .create(&NewCustomer {
            name: "Test Chevalier".to_string(),
            ..NewCustomer::default()
        })
        .await
        .expect("create customer");

    let orders = OrderRepository::new(&pool);
    let order = orders
        .create(&NewOrder {
            customer_id: customer.id,
            order_date: chrono::NaiveDate::from_ymd_opt(1996, 7, 4).expect("date"),
            required_date: chrono::NaiveDate::from_ymd_opt(1996, 8, 1).expect("date"),
            shipped_date: None,
            shipper_id: None,
            freight: Some(dec!(32.38)),
            ship_to: ShipTo::default(),
        })
        .await
        .expect("create order");

    let detail = OrderDetailRepository::new(&pool)
        .create(&NewOrderDetail {
            order_id: order.id,
            product_id: cheese.id,
            quantity: 12,
            discount: dec!(0),
        })
        .await
        .expect("create detail");
    assert_eq!(detail.unit_price, Some(dec!(14.00)));

    // A later price change does not touch the snapshot
    let repriced = NewProduct {
        name: cheese.name.clone(),
        category_id: category.id,
        quantity_per_unit: None,
        unit_price: Some(dec!(99.00)),
        in_stock: Some(10),
        on_order: None,
        reorder_level: None,
        discontinued: false,
    };
    products.update(cheese.id, &repriced).await.expect("reprice");

    let stored = orders
        .get_with_totals(order.id)
        .await
        .expect("query")
        .expect("order exists");
    assert_eq!(stored.totals.subtotal.to_string(), "168.00");
    assert_eq!(stored.totals.total.to_string(), "200.38");

    let nested = orders
        .totals(&OrderInput::from(OrderRef::ByNestedOrder(order.id)))
        .await
        .expect("nested totals");
    assert_eq!(nested.total.to_string(), "168.00");

    // Referenced rows cannot be deleted out from under the order
    let blocked = products.delete(cheese.id).await;
    assert!(matches!(blocked, Err(RepositoryError::Conflict(_))));

    OrderDetailRepository::new(&pool)
        .delete(detail.id)
        .await
        .expect("delete detail");
    orders.delete(order.id).await.expect("delete order");
    products.delete(cheese.id).await.expect("delete product");
    CustomerRepository::new(&pool)
        .delete(customer.id)
        .await
        .expect("delete customer");
    CategoryRepository::new(&pool)
        .delete(category.id)
        .await
        .expect("delete category");
}

// =============================================================================
// Seed Tests
// =============================================================================

/// Passes every validator, but the price overflows `numeric(11, 2)`, so the
/// product insert fails after the district and category are written.
const OVERFLOWING_SEED: &str = r#"
districts:
  - name: Rollback West
categories:
  - name: Rollback Cat
products:
  - name: Rollback Gold
    category: Rollback Cat
    unit_price: "1000000000000.00"
"#;

async fn count_named(pool: &sqlx::PgPool, table: &str, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT count(*) FROM {table} WHERE name = $1"))
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("count rows")
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL database"]
async fn test_failed_seed_writes_nothing() {
    let pool = test_pool().await;
    let file = SeedFile::from_yaml(OVERFLOWING_SEED).expect("parse seed");
    file.preview().expect("file passes validation");

    let districts_before = count_named(&pool, "district", "Rollback West").await;
    let categories_before = count_named(&pool, "category", "Rollback Cat").await;

    let err = seed(&pool, &file).await.expect_err("product insert overflows");
    assert!(matches!(err, SeedError::Repository(_)));

    assert_eq!(
        count_named(&pool, "district", "Rollback West").await,
        districts_before
    );
    assert_eq!(
        count_named(&pool, "category", "Rollback Cat").await,
        categories_before
    );
    assert_eq!(count_named(&pool, "product", "Rollback Gold").await, 0);
}
