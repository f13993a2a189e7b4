pub mod engine;
pub mod packer;
pub mod pipeline;
pub mod pricing;
pub mod tracking;

pub use crate::domain::model::{Item, Order, OrderLine, Parcel, ParcelRecord, ShipmentPlan};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage, TrackingProvider};
pub use crate::utils::error::Result;
