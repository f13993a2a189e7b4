pub mod cli;

#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, validate_url, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

/// Command line front door. File paths are relative and resolved by the
/// storage layer against `--data-root`.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "parcel-mill")]
#[command(about = "Packs customer orders into priced, tracked parcels")]
pub struct CliConfig {
    #[arg(long, default_value = ".", help = "Directory the data paths are resolved against")]
    pub data_root: String,

    #[arg(long, default_value = "data/items.json")]
    pub catalog_path: String,

    #[arg(long, default_value = "data/orders.json")]
    pub orders_path: String,

    #[arg(long, default_value = "data/parcels.json")]
    pub output_path: String,

    #[arg(long, default_value = "https://helloacm.com/api/random/?n=15")]
    pub tracking_endpoint: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory usage per stage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
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

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_root", &self.data_root)?;
        validate_path("catalog_path", &self.catalog_path)?;
        validate_path("orders_path", &self.orders_path)?;
        validate_path("output_path", &self.output_path)?;
        validate_url("tracking_endpoint", &self.tracking_endpoint)?;
        Ok(())
    }
}
