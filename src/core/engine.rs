use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

/// What a completed run reports back for the closing summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub orders: usize,
    pub parcels: usize,
    pub total_cost: u32,
    pub output_path: String,
}

pub struct ShippingEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> ShippingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitoring: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(monitoring),
        }
    }

    /// Drive extract, transform and load in order. The first error stops the
    /// run, so a batch that cannot be fully priced writes nothing.
    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("🚀 Starting shipping run");
        self.monitor.observe("start");

        tracing::info!("Extracting orders...");
        let orders = self.pipeline.extract().await?;
        let order_count = orders.len();
        self.monitor.observe("extract");

        tracing::info!("Transforming {} orders...", order_count);
        let plan = self.pipeline.transform(orders).await?;
        let parcel_count = plan.parcels.len();
        let total_cost = plan.total_cost;
        self.monitor.observe("transform");

        tracing::info!("Loading {} parcels...", parcel_count);
        let output_path = self.pipeline.load(plan).await?;
        self.monitor.observe("load");
        self.monitor.finish();

        tracing::info!("🏁 Run complete: {}", output_path);
        Ok(RunReport {
            orders: order_count,
            parcels: parcel_count,
            total_cost,
            output_path,
        })
    }
}
