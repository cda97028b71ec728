use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ProductId;
use crate::error::{SalesError, SalesResult};

pub const MAX_PRODUCT_NAME_LEN: usize = 100;

/// An item that can be allocated to sales slots.
///
/// `price` is in minor currency units. Orders copy it at order time, so later
/// changes never alter an existing order's total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: u64) -> SalesResult<Self> {
        let name = name.into();
        validate_name(&name)?;
        validate_price(price)?;
        let now = Utc::now();
        Ok(Self {
            id,
            name,
            price,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn validate_name(name: &str) -> SalesResult<()> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err(SalesError::Validation("Product name is required".to_string()));
    }
    if len > MAX_PRODUCT_NAME_LEN {
        return Err(SalesError::Validation(format!(
            "Product name must be at most {MAX_PRODUCT_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_price(price: u64) -> SalesResult<()> {
    if price == 0 {
        return Err(SalesError::Validation("Product price must be positive".to_string()));
    }
    Ok(())
}
