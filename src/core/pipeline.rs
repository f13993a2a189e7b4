use std::collections::HashMap;
use std::sync::Arc;

use crate::core::packer::split_order;
use crate::core::pricing::{build_records, total_cost};
use crate::domain::model::{
    CatalogFile, Item, Order, OrderLine, OrdersFile, Parcel, ShipmentPlan, MAX_PARCEL_PER_PALETTE,
};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TrackingProvider};
use crate::utils::error::{Result, ShippingError};
use crate::utils::validation::{parse_order_date, parse_quantity, parse_weight};

/// Palette for the order at `position` (zero-based) in the feed. Orders fill
/// palettes in feed order, `MAX_PARCEL_PER_PALETTE` orders per palette, and
/// every parcel of an order rides on that order's palette.
fn palette_for_position(position: usize) -> u32 {
    (position / MAX_PARCEL_PER_PALETTE) as u32 + 1
}

pub struct ShippingPipeline<S: Storage, C: ConfigProvider, T: TrackingProvider> {
    storage: S,
    config: C,
    tracking: T,
}

impl<S: Storage, C: ConfigProvider, T: TrackingProvider> ShippingPipeline<S, C, T> {
    pub fn new(storage: S, config: C, tracking: T) -> Self {
        Self {
            storage,
            config,
            tracking,
        }
    }

    async fn load_catalog(&self) -> Result<HashMap<String, Arc<Item>>> {
        let bytes = self.storage.read_file(self.config.catalog_path()).await?;
        let file: CatalogFile = serde_json::from_slice(&bytes)?;

        let mut catalog = HashMap::with_capacity(file.items.len());
        for raw in file.items {
            let weight = parse_weight(&raw.id, &raw.weight)?;
            catalog.insert(
                raw.id.clone(),
                Arc::new(Item {
                    id: raw.id,
                    name: raw.name,
                    weight,
                }),
            );
        }
        Ok(catalog)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, T: TrackingProvider> Pipeline for ShippingPipeline<S, C, T> {
    /// Read both feeds and resolve every order line against the catalog.
    /// Any unknown item, unparsable number or bad date aborts the run.
    async fn extract(&self) -> Result<Vec<Order>> {
        tracing::info!("📦 Loading catalog from {}", self.config.catalog_path());
        let catalog = self.load_catalog().await?;
        tracing::info!("📇 Catalog ready: {} items", catalog.len());

        tracing::info!("📥 Loading orders from {}", self.config.orders_path());
        let bytes = self.storage.read_file(self.config.orders_path()).await?;
        let file: OrdersFile = serde_json::from_slice(&bytes)?;

        let mut orders = Vec::with_capacity(file.orders.len());
        for raw in file.orders {
            let date = parse_order_date(&raw.id, &raw.date)?;

            let mut lines = Vec::with_capacity(raw.items.len());
            for line in raw.items {
                let item = catalog
                    .get(&line.item_id)
                    .cloned()
                    .ok_or_else(|| ShippingError::ItemNotFound {
                        id: line.item_id.clone(),
                    })?;
                let quantity = parse_quantity(&raw.id, &line.quantity)?;
                lines.push(OrderLine { item, quantity });
            }

            orders.push(Order {
                id: raw.id,
                date,
                lines,
            });
        }

        tracing::info!("📊 Extracted {} orders", orders.len());
        Ok(orders)
    }

    /// Split every order into parcels, assign palettes, mint one tracking
    /// code per parcel and price the whole batch.
    async fn transform(&self, orders: Vec<Order>) -> Result<ShipmentPlan> {
        let order_count = orders.len();
        tracing::info!("🔧 Packing {} orders into parcels", order_count);

        let mut parcels = Vec::new();
        for (position, order) in orders.iter().enumerate() {
            tracing::debug!("Packing order {} ({}/{})", order.id, position + 1, order_count);
            if order.lines.is_empty() {
                tracing::warn!(
                    "Order {} has no items; it still ships one empty parcel",
                    order.id
                );
            }

            let palette_id = palette_for_position(position);
            for group in split_order(order) {
                // One code per parcel, strictly one request at a time: the
                // provider is rate limited and rejects parallel calls.
                let tracking_id = self.tracking.fetch_code().await?;
                parcels.push(Parcel::new(order, palette_id, tracking_id, group));
            }
        }

        let total = total_cost(&parcels)?;
        tracing::info!("✅ Packed {} parcels, total cost {}€", parcels.len(), total);

        Ok(ShipmentPlan {
            parcels,
            total_cost: total,
        })
    }

    /// Serialize the priced parcels as pretty JSON and hand the bytes to
    /// storage. Returns the path the result was written under.
    async fn load(&self, plan: ShipmentPlan) -> Result<String> {
        let records = build_records(&plan.parcels)?;
        let json = serde_json::to_vec_pretty(&records)?;

        tracing::debug!(
            "Writing {} parcel records ({} bytes) to storage",
            records.len(),
            json.len()
        );
        self.storage
            .write_file(self.config.output_path(), &json)
            .await?;

        tracing::info!("💾 Result saved: {}", self.config.output_path());
        Ok(self.config.output_path().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                ShippingError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        catalog_path: String,
        orders_path: String,
        output_path: String,
        tracking_endpoint: String,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                catalog_path: "data/items.json".to_string(),
                orders_path: "data/orders.json".to_string(),
                output_path: "out/parcels.json".to_string(),
                tracking_endpoint: "http://tracking.test/codes".to_string(),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn catalog_path(&self) -> &str {
            &self.catalog_path
        }

        fn orders_path(&self) -> &str {
            &self.orders_path
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn tracking_endpoint(&self) -> &str {
            &self.tracking_endpoint
        }
    }

    /// Hands out TRK-0001, TRK-0002, ... and counts the calls.
    struct SeqTracking {
        counter: AtomicU32,
    }

    impl SeqTracking {
        fn new() -> Self {
            Self {
                counter: AtomicU32::new(0),
            }
        }

        fn issued(&self) -> u32 {
            self.counter.load(Ordering::SeqCst)
        }
    }

    impl TrackingProvider for SeqTracking {
        async fn fetch_code(&self) -> Result<String> {
            let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("TRK-{:04}", n))
        }
    }

    const CATALOG_JSON: &str = r#"{
        "items": [
            {"id": "a", "name": "Cable reel", "weight": "2"},
            {"id": "b", "name": "Compressor", "weight": "29"}
        ]
    }"#;

    fn pipeline_over(
        storage: MockStorage,
    ) -> ShippingPipeline<MockStorage, MockConfig, SeqTracking> {
        ShippingPipeline::new(storage, MockConfig::new(), SeqTracking::new())
    }

    async fn seed(storage: &MockStorage, catalog: &str, orders: &str) {
        storage
            .write_file("data/items.json", catalog.as_bytes())
            .await
            .unwrap();
        storage
            .write_file("data/orders.json", orders.as_bytes())
            .await
            .unwrap();
    }

    fn item(id: &str, weight: f64) -> Arc<Item> {
        Arc::new(Item {
            id: id.to_string(),
            name: format!("Item {}", id),
            weight,
        })
    }

    fn order(id: &str, lines: Vec<(Arc<Item>, u32)>) -> Order {
        Order {
            id: id.to_string(),
            date: Utc::now(),
            lines: lines
                .into_iter()
                .map(|(item, quantity)| OrderLine { item, quantity })
                .collect(),
        }
    }

    #[test]
    fn test_palette_advances_every_fifteen_orders() {
        assert_eq!(palette_for_position(0), 1);
        assert_eq!(palette_for_position(14), 1);
        assert_eq!(palette_for_position(15), 2);
        assert_eq!(palette_for_position(29), 2);
        assert_eq!(palette_for_position(30), 3);
    }

    #[tokio::test]
    async fn test_extract_resolves_lines_against_the_catalog() {
        let storage = MockStorage::new();
        let orders_json = r#"{
            "orders": [
                {"id": "o-1", "date": "2024-03-01", "items": [
                    {"item_id": "b", "quantity": "1"},
                    {"item_id": "a", "quantity": "3"}
                ]}
            ]
        }"#;
        seed(&storage, CATALOG_JSON, orders_json).await;

        let orders = pipeline_over(storage).extract().await.unwrap();

        assert_eq!(orders.len(), 1);
        let order = &orders[0];
        assert_eq!(order.id, "o-1");
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].item.id, "b");
        assert_eq!(order.lines[0].item.weight, 29.0);
        assert_eq!(order.lines[0].quantity, 1);
        assert_eq!(order.lines[1].item.name, "Cable reel");
        assert_eq!(order.lines[1].quantity, 3);
    }

    #[tokio::test]
    async fn test_extract_fails_on_an_unknown_item() {
        let storage = MockStorage::new();
        let orders_json = r#"{
            "orders": [
                {"id": "o-1", "date": "2024-03-01", "items": [
                    {"item_id": "ghost", "quantity": "1"}
                ]}
            ]
        }"#;
        seed(&storage, CATALOG_JSON, orders_json).await;

        let err = pipeline_over(storage).extract().await.unwrap_err();
        match err {
            ShippingError::ItemNotFound { id } => assert_eq!(id, "ghost"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_extract_fails_on_a_malformed_weight() {
        let storage = MockStorage::new();
        let catalog_json = r#"{
            "items": [{"id": "a", "name": "Cable reel", "weight": "heavy"}]
        }"#;
        let orders_json = r#"{"orders": []}"#;
        seed(&storage, catalog_json, orders_json).await;

        let err = pipeline_over(storage).extract().await.unwrap_err();
        assert!(matches!(err, ShippingError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_extract_fails_on_a_malformed_quantity() {
        let storage = MockStorage::new();
        let orders_json = r#"{
            "orders": [
                {"id": "o-1", "date": "2024-03-01", "items": [
                    {"item_id": "a", "quantity": "0"}
                ]}
            ]
        }"#;
        seed(&storage, CATALOG_JSON, orders_json).await;

        let err = pipeline_over(storage).extract().await.unwrap_err();
        assert!(matches!(err, ShippingError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_transform_prices_a_two_parcel_order() {
        // One order with a 29kg and a 2kg item: the heavy one fills the first
        // parcel (10€), the light one ships alone (2€).
        let storage = MockStorage::new();
        let orders = vec![order("o-1", vec![(item("b", 29.0), 1), (item("a", 2.0), 1)])];

        let plan = pipeline_over(storage).transform(orders).await.unwrap();

        assert_eq!(plan.parcels.len(), 2);
        assert_eq!(plan.parcels[0].weight(), 29.0);
        assert_eq!(plan.parcels[1].weight(), 2.0);
        assert_eq!(plan.total_cost, 12);
    }

    #[tokio::test]
    async fn test_transform_assigns_codes_in_parcel_order() {
        let storage = MockStorage::new();
        let orders = vec![
            order("o-1", vec![(item("b", 29.0), 1), (item("a", 2.0), 1)]),
            order("o-2", vec![(item("a", 2.0), 1)]),
        ];

        let tracking = SeqTracking::new();
        let pipeline = ShippingPipeline::new(storage, MockConfig::new(), tracking);
        let plan = pipeline.transform(orders).await.unwrap();

        assert_eq!(plan.parcels.len(), 3);
        assert_eq!(plan.parcels[0].tracking_id, "TRK-0001");
        assert_eq!(plan.parcels[1].tracking_id, "TRK-0002");
        assert_eq!(plan.parcels[2].tracking_id, "TRK-0003");
        assert_eq!(pipeline.tracking.issued(), 3);
    }

    #[tokio::test]
    async fn test_transform_shares_the_palette_across_an_orders_parcels() {
        let storage = MockStorage::new();
        let orders = vec![order(
            "o-1",
            vec![(item("b", 29.0), 1), (item("c", 28.0), 1), (item("a", 2.0), 1)],
        )];

        let plan = pipeline_over(storage).transform(orders).await.unwrap();

        assert!(plan.parcels.len() >= 2);
        for parcel in &plan.parcels {
            assert_eq!(parcel.order_id, "o-1");
            assert_eq!(parcel.palette_id, 1);
        }
    }

    #[tokio::test]
    async fn test_transform_moves_to_the_next_palette_after_fifteen_orders() {
        let storage = MockStorage::new();
        let orders: Vec<Order> = (0..16)
            .map(|i| order(&format!("o-{}", i + 1), vec![(item("a", 2.0), 1)]))
            .collect();

        let plan = pipeline_over(storage).transform(orders).await.unwrap();

        assert_eq!(plan.parcels.len(), 16);
        assert!(plan.parcels[..15].iter().all(|p| p.palette_id == 1));
        assert_eq!(plan.parcels[15].palette_id, 2);
        assert_eq!(plan.parcels[15].order_id, "o-16");
    }

    #[tokio::test]
    async fn test_transform_ships_an_empty_parcel_for_an_itemless_order() {
        let storage = MockStorage::new();
        let orders = vec![order("o-1", vec![])];

        let plan = pipeline_over(storage).transform(orders).await.unwrap();

        assert_eq!(plan.parcels.len(), 1);
        assert!(plan.parcels[0].items.is_empty());
        assert_eq!(plan.total_cost, 1);
    }

    #[tokio::test]
    async fn test_transform_aborts_when_an_item_cannot_ship() {
        // A 45kg item never fits a parcel; it ends up alone behind the empty
        // first parcel, so the failure names the second tracking code.
        let storage = MockStorage::new();
        let orders = vec![order("o-1", vec![(item("anvil", 45.0), 1)])];

        let err = pipeline_over(storage).transform(orders).await.unwrap_err();
        match err {
            ShippingError::OverWeightedParcel {
                tracking_id,
                weight,
                ..
            } => {
                assert_eq!(tracking_id, "TRK-0002");
                assert_eq!(weight, 45.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_writes_pretty_json_records() {
        let storage = MockStorage::new();
        let mut o = order("o-1", vec![]);
        o.date = "2024-03-01T00:00:00Z".parse().unwrap();
        let parcels = vec![
            Parcel::new(&o, 1, "TRK-0001".to_string(), vec![item("b", 29.0)]),
            Parcel::new(&o, 1, "TRK-0002".to_string(), vec![item("a", 2.0)]),
        ];
        let plan = ShipmentPlan {
            parcels,
            total_cost: 12,
        };

        let pipeline = pipeline_over(storage.clone());
        let path = pipeline.load(plan).await.unwrap();
        assert_eq!(path, "out/parcels.json");

        let bytes = storage.get_file("out/parcels.json").await.unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n"));

        let records: serde_json::Value = serde_json::from_str(&text).unwrap();
        let rows = records.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["order_date"], "2024-03-01T00:00:00Z");
        assert_eq!(rows[0]["tracking_id"], "TRK-0001");
        assert_eq!(rows[0]["weight"], 29.0);
        assert_eq!(rows[0]["cost"], 10);
        assert_eq!(rows[1]["cost"], 2);
        assert_eq!(rows[1]["items"][0]["id"], "a");
    }
}
