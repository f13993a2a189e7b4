use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::error::{Result, ShippingError};

/// A parcel may never weigh more than this (kg).
pub const PARCEL_MAX_WEIGHT: f64 = 30.0;

/// Orders are batched onto palettes in groups of this size.
pub const MAX_PARCEL_PER_PALETTE: usize = 15;

// Raw feed shapes. Numeric fields arrive as text in the JSON files and are
// parsed by the loader.

#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub name: String,
    pub weight: String,
}

#[derive(Debug, Deserialize)]
pub struct OrdersFile {
    pub orders: Vec<RawOrder>,
}

#[derive(Debug, Deserialize)]
pub struct RawOrder {
    pub id: String,
    pub date: String,
    pub items: Vec<RawOrderLine>,
}

#[derive(Debug, Deserialize)]
pub struct RawOrderLine {
    pub item_id: String,
    pub quantity: String,
}

/// A catalog item. Owned by the catalog; orders and parcels hold `Arc`
/// clones and never mutate it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct OrderLine {
    pub item: Arc<Item>,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub date: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

/// Sum of the weights of a group of items.
pub fn group_weight(items: &[Arc<Item>]) -> f64 {
    items.iter().map(|item| item.weight).sum()
}

/// Step-function price for a parcel weight, inclusive upper bounds.
/// `None` above the authorized maximum; the caller decides how to surface it.
pub fn tiered_cost(weight: f64) -> Option<u32> {
    if weight <= 1.0 {
        Some(1)
    } else if weight <= 5.0 {
        Some(2)
    } else if weight <= 10.0 {
        Some(3)
    } else if weight <= 20.0 {
        Some(5)
    } else if weight <= PARCEL_MAX_WEIGHT {
        Some(10)
    } else {
        None
    }
}

/// A packed, tracked group of items headed for one palette. Immutable once
/// constructed; weight and cost are derived on demand, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Parcel {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub palette_id: u32,
    pub tracking_id: String,
    pub items: Vec<Arc<Item>>,
}

impl Parcel {
    pub fn new(order: &Order, palette_id: u32, tracking_id: String, items: Vec<Arc<Item>>) -> Self {
        Self {
            order_id: order.id.clone(),
            order_date: order.date,
            palette_id,
            tracking_id,
            items,
        }
    }

    pub fn weight(&self) -> f64 {
        group_weight(&self.items)
    }

    /// The packer never produces an over-limit parcel on its own; this fires
    /// for a single item heavier than the limit, or for a packer regression.
    pub fn is_over_weighted(&self) -> bool {
        self.weight() > PARCEL_MAX_WEIGHT
    }

    pub fn cost(&self) -> Result<u32> {
        let weight = self.weight();
        tiered_cost(weight).ok_or_else(|| ShippingError::OverWeightedParcel {
            tracking_id: self.tracking_id.clone(),
            weight,
            limit: PARCEL_MAX_WEIGHT,
        })
    }
}

/// What `transform` hands to `load`.
#[derive(Debug, Clone)]
pub struct ShipmentPlan {
    pub parcels: Vec<Parcel>,
    pub total_cost: u32,
}

/// One row of the serialized result file. Weight and cost are materialized
/// for the consumer, so building a record prices the parcel once more.
#[derive(Debug, Clone, Serialize)]
pub struct ParcelRecord {
    pub order_id: String,
    pub order_date: DateTime<Utc>,
    pub palette_id: u32,
    pub tracking_id: String,
    pub items: Vec<Arc<Item>>,
    pub weight: f64,
    pub cost: u32,
}

impl ParcelRecord {
    pub fn from_parcel(parcel: &Parcel) -> Result<Self> {
        Ok(Self {
            order_id: parcel.order_id.clone(),
            order_date: parcel.order_date,
            palette_id: parcel.palette_id,
            tracking_id: parcel.tracking_id.clone(),
            items: parcel.items.clone(),
            weight: parcel.weight(),
            cost: parcel.cost()?,
        })
    }
}
