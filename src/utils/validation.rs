use crate::utils::error::{Result, ShippingError};
use chrono::{DateTime, NaiveDate, Utc};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ShippingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ShippingError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ShippingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(ShippingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ShippingError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// Item weights arrive as text. They must parse to a finite number >= 0.
pub fn parse_weight(item_id: &str, raw: &str) -> Result<f64> {
    let weight: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ShippingError::InvalidRecord {
            message: format!("item {}: weight '{}' is not a number", item_id, raw),
        })?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(ShippingError::InvalidRecord {
            message: format!("item {}: weight {} must be finite and >= 0", item_id, weight),
        });
    }
    Ok(weight)
}

/// Order line quantities arrive as text. They must parse to an integer >= 1.
pub fn parse_quantity(order_id: &str, raw: &str) -> Result<u32> {
    let quantity: u32 = raw
        .trim()
        .parse()
        .map_err(|_| ShippingError::InvalidRecord {
            message: format!("order {}: quantity '{}' is not an integer", order_id, raw),
        })?;
    if quantity < 1 {
        return Err(ShippingError::InvalidRecord {
            message: format!("order {}: quantity must be >= 1", order_id),
        });
    }
    Ok(quantity)
}

/// Order dates arrive as text, either RFC 3339 or a bare `YYYY-MM-DD`.
pub fn parse_order_date(order_id: &str, raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(ShippingError::InvalidRecord {
        message: format!("order {}: date '{}' is not a recognized date", order_id, raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("tracking_endpoint", "https://example.com").is_ok());
        assert!(validate_url("tracking_endpoint", "http://example.com").is_ok());
        assert!(validate_url("tracking_endpoint", "").is_err());
        assert!(validate_url("tracking_endpoint", "invalid-url").is_err());
        assert!(validate_url("tracking_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("catalog_path", "data/items.json").is_ok());
        assert!(validate_path("catalog_path", "").is_err());
        assert!(validate_path("catalog_path", "   ").is_err());
        assert!(validate_path("catalog_path", "bad\0path").is_err());
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("it-1", "2.5").unwrap(), 2.5);
        assert_eq!(parse_weight("it-1", " 0 ").unwrap(), 0.0);
        assert!(parse_weight("it-1", "heavy").is_err());
        assert!(parse_weight("it-1", "-1").is_err());
        assert!(parse_weight("it-1", "NaN").is_err());
        assert!(parse_weight("it-1", "inf").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("o-1", "3").unwrap(), 3);
        assert!(parse_quantity("o-1", "0").is_err());
        assert!(parse_quantity("o-1", "-2").is_err());
        assert!(parse_quantity("o-1", "2.5").is_err());
        assert!(parse_quantity("o-1", "many").is_err());
    }

    #[test]
    fn test_parse_order_date() {
        assert!(parse_order_date("o-1", "2023-11-07T14:22:00+01:00").is_ok());
        assert!(parse_order_date("o-1", "2023-11-07").is_ok());
        assert!(parse_order_date("o-1", "last tuesday").is_err());
    }
}
