//! Products

use serde::{Deserialize, Serialize};

use crate::{ids::RecordId, money::decimal_str, pricing::SaleType};

/// Product id
pub type ProductId = RecordId<ProductSnapshot>;

/// Catalog product as last fetched from the backend.
///
/// The stock count is whatever the backend reported at lookup time; it is
/// never refreshed live, so it is only a soft ceiling for cart quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product barcode, if it has one
    #[serde(default)]
    pub barcode: Option<String>,

    /// Retail unit price, in minor units
    #[serde(with = "decimal_str")]
    pub retail_price: i64,

    /// Wholesale unit price, in minor units
    #[serde(with = "decimal_str::option", default)]
    pub wholesale_price: Option<i64>,

    /// Units in stock when the product was fetched
    #[serde(default)]
    pub current_stock: i64,

    /// Whether the product can be sold
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

impl ProductSnapshot {
    /// Unit price charged under the given sale type.
    ///
    /// Wholesale falls back to the retail price for products without a
    /// wholesale price.
    pub fn unit_price(&self, sale_type: SaleType) -> i64 {
        match (sale_type, self.wholesale_price) {
            (SaleType::Wholesale, Some(wholesale)) => wholesale,
            _ => self.retail_price,
        }
    }

    /// Whether the product carries exactly this barcode.
    pub fn has_barcode(&self, code: &str) -> bool {
        self.barcode.as_deref() == Some(code)
    }
}

fn active_by_default() -> bool {
    true
}
