use clap::Parser;
use parcel_mill::utils::{logger, validation::Validate};
use parcel_mill::{
    CliConfig, HttpTrackingProvider, LocalStorage, ShippingEngine, ShippingPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init(config.verbose);

    tracing::info!("Starting parcel-mill");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.data_root.clone());
    let tracking = HttpTrackingProvider::new(config.tracking_endpoint.clone());
    let pipeline = ShippingPipeline::new(storage, config, tracking);

    let engine = ShippingEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Shipping run completed successfully!");
            println!("✅ Shipping run completed successfully!");
            println!("  Orders: {}", report.orders);
            println!("  Parcels: {}", report.parcels);
            println!("  Total cost: {}€", report.total_cost);
            println!("📁 Result saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!("❌ Shipping run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
