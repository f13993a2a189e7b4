use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShippingError {
    #[error("no item found with the id: {id}")]
    ItemNotFound { id: String },

    #[error("parcel {tracking_id} exceeds the maximum authorized weight ({weight}kg > {limit}kg)")]
    OverWeightedParcel {
        tracking_id: String,
        weight: f64,
        limit: f64,
    },

    #[error("tracking code request failed: {0}")]
    TrackingApi(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl ShippingError {
    /// Process exit code for the binary. Data and configuration problems map
    /// to 2, an over-weight parcel to 3, everything else to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShippingError::ItemNotFound { .. }
            | ShippingError::InvalidRecord { .. }
            | ShippingError::InvalidConfigValue { .. } => 2,
            ShippingError::OverWeightedParcel { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShippingError>;
