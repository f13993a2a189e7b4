use crate::domain::model::{Order, ShipmentPlan};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Byte-level access to the catalog, orders and result files.
pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn catalog_path(&self) -> &str;
    fn orders_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn tracking_endpoint(&self) -> &str;
}

/// Mints one opaque tracking token per call. The production provider is
/// rate-limited, so callers must await each call before issuing the next.
pub trait TrackingProvider: Send + Sync {
    fn fetch_code(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Order>>;
    async fn transform(&self, orders: Vec<Order>) -> Result<ShipmentPlan>;
    async fn load(&self, plan: ShipmentPlan) -> Result<String>;
}
