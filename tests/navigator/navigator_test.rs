// tests/navigator/navigator_test.rs
//
// End-to-end coverage of the exposed interface: registered providers,
// cached snapshots, invalidation, and SQL rendering.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use trellis::metadata::{
    ForeignKeyInfo, MemorySchemaProvider, MetadataResult, SchemaProvider, SqliteSchemaProvider,
};
use trellis::navigator::{Navigator, NavigatorError};
use trellis::render::render_join_plan;
use trellis::ResolveError;

fn fk(name: Option<&str>, columns: &[&str], to: &str, to_columns: &[&str]) -> ForeignKeyInfo {
    ForeignKeyInfo {
        name: name.map(str::to_string),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        referenced_table: to.to_string(),
        referenced_columns: to_columns.iter().map(|c| c.to_string()).collect(),
    }
}

/// The shop fixture: orders → customers, order_items → orders/products.
fn shop_provider() -> MemorySchemaProvider {
    let mut provider = MemorySchemaProvider::new();
    provider.add_table("orders");
    provider.add_table("customers");
    provider.add_table("products");
    provider.add_table("order_items");
    provider.add_foreign_key(
        "orders",
        fk(Some("fk_orders_customer"), &["customer_id"], "customers", &["id"]),
    );
    provider.add_foreign_key(
        "order_items",
        fk(Some("fk_items_order"), &["order_id"], "orders", &["id"]),
    );
    provider.add_foreign_key(
        "order_items",
        fk(Some("fk_items_product"), &["product_id"], "products", &["id"]),
    );
    provider
}

/// Provider whose metadata can be swapped underneath the navigator, the way
/// a live database changes underneath an introspection cache.
struct SwappableProvider {
    inner: Mutex<MemorySchemaProvider>,
}

impl SwappableProvider {
    fn new(initial: MemorySchemaProvider) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    fn swap(&self, replacement: MemorySchemaProvider) {
        *self.inner.lock().unwrap() = replacement;
    }

    fn current(&self) -> MemorySchemaProvider {
        self.inner.lock().unwrap().clone()
    }
}

#[async_trait]
impl SchemaProvider for SwappableProvider {
    async fn list_tables(&self) -> MetadataResult<Vec<String>> {
        self.current().list_tables().await
    }

    async fn foreign_keys(&self, table: &str) -> MetadataResult<Vec<ForeignKeyInfo>> {
        self.current().foreign_keys(table).await
    }
}

#[tokio::test]
async fn shortest_join_path_end_to_end() {
    let navigator = Navigator::new();
    navigator.register("shop", Arc::new(shop_provider()));

    let steps = navigator
        .shortest_join_path("shop", "orders", "products")
        .await
        .unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].constraint_name.as_deref(), Some("fk_items_order"));
    assert_eq!(steps[1].constraint_name.as_deref(), Some("fk_items_product"));

    let sql = render_join_plan(&steps).unwrap();
    assert_eq!(
        sql,
        "FROM \"orders\"\n\
         JOIN \"order_items\" ON \"orders\".\"id\" = \"order_items\".\"order_id\"\n\
         JOIN \"products\" ON \"order_items\".\"product_id\" = \"products\".\"id\""
    );
}

#[tokio::test]
async fn connect_tables_end_to_end() {
    let navigator = Navigator::new();
    navigator.register("shop", Arc::new(shop_provider()));

    let steps = navigator
        .connect_tables("shop", &["customers", "products"])
        .await
        .unwrap();
    assert_eq!(steps.len(), 3);

    // Rendering starts from the first requested terminal.
    let sql = render_join_plan(&steps).unwrap();
    assert!(sql.starts_with("FROM \"customers\""));
}

#[tokio::test]
async fn tables_lists_snapshot_order() {
    let navigator = Navigator::new();
    navigator.register("shop", Arc::new(shop_provider()));

    let tables = navigator.tables("shop").await.unwrap();
    assert_eq!(tables, vec!["orders", "customers", "products", "order_items"]);
}

#[tokio::test]
async fn unregistered_schema_is_an_error() {
    let navigator = Navigator::new();

    let err = navigator
        .shortest_join_path("nope", "a", "b")
        .await
        .unwrap_err();
    assert!(matches!(err, NavigatorError::UnknownSchema(_)));
    assert!(err.to_string().contains("nope"));
}

#[tokio::test]
async fn unknown_table_propagates_with_names() {
    let navigator = Navigator::new();
    navigator.register("shop", Arc::new(shop_provider()));

    let err = navigator
        .shortest_join_path("shop", "orders", "invoices")
        .await
        .unwrap_err();
    match err {
        NavigatorError::Resolve(ResolveError::UnknownTable { unknown, available }) => {
            assert_eq!(unknown, vec!["invoices".to_string()]);
            assert_eq!(available.len(), 4);
        }
        other => panic!("expected UnknownTable, got {other:?}"),
    }
}

#[tokio::test]
async fn invalidate_picks_up_schema_changes() {
    let provider = Arc::new(SwappableProvider::new(shop_provider()));
    let navigator = Navigator::new();
    navigator.register("shop", Arc::clone(&provider) as Arc<dyn SchemaProvider>);

    assert_eq!(navigator.tables("shop").await.unwrap().len(), 4);

    // The schema grows a warehouses table linked from products.
    let mut refreshed = shop_provider();
    refreshed.add_table("warehouses");
    refreshed.add_foreign_key(
        "products",
        fk(None, &["warehouse_id"], "warehouses", &["id"]),
    );
    provider.swap(refreshed);

    // Cached snapshot still answers until invalidated.
    assert_eq!(navigator.tables("shop").await.unwrap().len(), 4);

    assert!(navigator.invalidate("shop"));
    let tables = navigator.tables("shop").await.unwrap();
    assert_eq!(tables.len(), 5);
    assert!(tables.contains(&"warehouses".to_string()));

    let steps = navigator
        .shortest_join_path("shop", "orders", "warehouses")
        .await
        .unwrap();
    assert_eq!(steps.len(), 3);
}

#[tokio::test]
async fn invalidating_unknown_schema_is_a_noop() {
    let navigator = Navigator::new();
    assert!(!navigator.invalidate("shop"));
}

#[tokio::test]
async fn sqlite_schema_end_to_end() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "
        CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT);
        CREATE TABLE products (id INTEGER PRIMARY KEY, title TEXT);
        CREATE TABLE orders (
            id INTEGER PRIMARY KEY,
            customer_id INTEGER REFERENCES customers(id)
        );
        CREATE TABLE order_items (
            order_id INTEGER REFERENCES orders(id),
            product_id INTEGER REFERENCES products(id),
            PRIMARY KEY (order_id, product_id)
        );
        ",
    )
    .unwrap();

    let navigator = Navigator::new();
    navigator.register(
        "main",
        Arc::new(SqliteSchemaProvider::from_connection(conn)),
    );

    let steps = navigator
        .shortest_join_path("main", "customers", "products")
        .await
        .unwrap();
    assert_eq!(steps.len(), 3);

    let sql = render_join_plan(&steps).unwrap();
    assert_eq!(
        sql,
        "FROM \"customers\"\n\
         JOIN \"orders\" ON \"customers\".\"id\" = \"orders\".\"customer_id\"\n\
         JOIN \"order_items\" ON \"orders\".\"id\" = \"order_items\".\"order_id\"\n\
         JOIN \"products\" ON \"order_items\".\"product_id\" = \"products\".\"id\""
    );
}
