//! Cart Line

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

use crate::{
    money::{decimal_str, decimal_to_minor},
    pricing::{PricingError, SaleType},
    products::ProductSnapshot,
};

/// One product in the cart, with its quantity and manual discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    product: ProductSnapshot,

    #[serde(deserialize_with = "positive_quantity")]
    quantity: u32,

    #[serde(serialize_with = "decimal_str::serialize")]
    #[serde(deserialize_with = "non_negative_discount", default)]
    discount: i64,
}

impl CartLine {
    /// Create a line holding one unit of `product` and no discount.
    pub fn new(product: ProductSnapshot) -> Self {
        Self {
            product,
            quantity: 1,
            discount: 0,
        }
    }

    /// Product snapshot taken when the line was last touched.
    pub fn product(&self) -> &ProductSnapshot {
        &self.product
    }

    /// Units of the product in the cart (always at least one).
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Manual discount for the whole line, in minor units.
    pub fn discount(&self) -> i64 {
        self.discount
    }

    /// Unit price under the given sale type, in minor units.
    pub fn unit_price(&self, sale_type: SaleType) -> i64 {
        self.product.unit_price(sale_type)
    }

    /// Unit price times quantity, in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the product does not fit `i64`.
    pub fn subtotal(&self, sale_type: SaleType) -> Result<i64, PricingError> {
        self.unit_price(sale_type)
            .checked_mul(i64::from(self.quantity))
            .ok_or(PricingError::Overflow)
    }

    /// Discount actually applied: the manual discount capped at the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal overflows.
    pub fn applied_discount(&self, sale_type: SaleType) -> Result<i64, PricingError> {
        Ok(self.discount.min(self.subtotal(sale_type)?).max(0))
    }

    /// Line subtotal minus applied discount.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal overflows.
    pub fn total(&self, sale_type: SaleType) -> Result<i64, PricingError> {
        Ok(self.subtotal(sale_type)? - self.applied_discount(sale_type)?)
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        self.quantity = quantity;
    }

    pub(crate) fn set_discount(&mut self, discount: i64) {
        self.discount = discount;
    }

    pub(crate) fn refresh_product(&mut self, product: ProductSnapshot) {
        self.product = product;
    }
}

fn positive_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let quantity = u32::deserialize(deserializer)?;

    if quantity == 0 {
        return Err(D::Error::custom("cart line quantity must be at least 1"));
    }

    Ok(quantity)
}

fn non_negative_discount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let discount = <rust_decimal::Decimal as Deserialize>::deserialize(deserializer)?;
    let discount = decimal_to_minor(discount).map_err(D::Error::custom)?;

    if discount < 0 {
        return Err(D::Error::custom("cart line discount cannot be negative"));
    }

    Ok(discount)
}
