pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::cli::LocalStorage;
pub use crate::core::engine::{RunReport, ShippingEngine};
pub use crate::core::pipeline::ShippingPipeline;
pub use crate::core::tracking::HttpTrackingProvider;
pub use crate::domain::model::{Item, Order, OrderLine, Parcel, ParcelRecord, ShipmentPlan};
pub use crate::utils::error::{Result, ShippingError};
