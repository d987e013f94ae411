//! Cart
//!
//! The cart aggregate: ordered lines (unique by product), an optional
//! customer, the pricing tier and free-text notes. Every mutation either
//! applies completely or returns an error and leaves the cart as it was.

mod errors;
mod line;

pub use errors::CartError;
pub use line::CartLine;

use serde::{Deserialize, Serialize};

use crate::{
    customers::Customer,
    pricing::{PricingError, SaleType, Totals, compute_totals},
    products::ProductSnapshot,
};

/// Outcome of a quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now holds this many units.
    Updated(u32),

    /// The quantity dropped to zero and the line was removed.
    Removed,
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(default, alias = "cart")]
    lines: Vec<CartLine>,

    #[serde(default)]
    customer: Option<Customer>,

    #[serde(default)]
    sale_type: SaleType,

    #[serde(default)]
    notes: String,
}

impl Cart {
    /// Create an empty walk-in retail cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Line at `index`, if any.
    pub fn line(&self, index: usize) -> Option<&CartLine> {
        self.lines.get(index)
    }

    /// Associated customer; `None` means walk-in.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// Pricing tier for every line.
    pub fn sale_type(&self) -> SaleType {
        self.sale_type
    }

    /// Cashier notes.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one unit of `product`, returning the line's new quantity.
    ///
    /// A product already in the cart has its quantity incremented and its
    /// snapshot replaced by the one given; the increment is checked against
    /// the stock in that newer snapshot.
    ///
    /// # Errors
    ///
    /// - [`CartError::StockInsufficient`]: one more unit exceeds known stock.
    /// - [`CartError::OutOfStock`]: a new product has no stock.
    pub fn add_product(&mut self, product: ProductSnapshot) -> Result<u32, CartError> {
        let existing = self
            .lines
            .iter_mut()
            .find(|line| line.product().id == product.id);

        if let Some(line) = existing {
            let quantity = line
                .quantity()
                .checked_add(1)
                .ok_or(PricingError::Overflow)?;

            if i64::from(quantity) > product.current_stock {
                return Err(CartError::StockInsufficient {
                    available: product.current_stock,
                });
            }

            line.refresh_product(product);
            line.set_quantity(quantity);

            return Ok(quantity);
        }

        if product.current_stock <= 0 {
            return Err(CartError::OutOfStock { name: product.name });
        }

        self.lines.push(CartLine::new(product));

        Ok(1)
    }

    /// Adjust the quantity of the line at `index` by `delta`.
    ///
    /// Dropping to zero or below removes the line; that is not an error.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no line at `index`.
    /// - [`CartError::StockInsufficient`]: the new quantity exceeds known stock.
    pub fn update_quantity(&mut self, index: usize, delta: i64) -> Result<QuantityChange, CartError> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;

        let quantity = i64::from(line.quantity())
            .checked_add(delta)
            .ok_or(PricingError::Overflow)?;

        if quantity <= 0 {
            self.lines.remove(index);

            return Ok(QuantityChange::Removed);
        }

        let available = line.product().current_stock;

        if quantity > available {
            return Err(CartError::StockInsufficient { available });
        }

        let quantity = u32::try_from(quantity).map_err(|_overflow| PricingError::Overflow)?;
        line.set_quantity(quantity);

        Ok(QuantityChange::Updated(quantity))
    }

    /// Remove the line at `index`, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if there is no line at `index`.
    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, CartError> {
        if index >= self.lines.len() {
            return Err(CartError::LineNotFound(index));
        }

        Ok(self.lines.remove(index))
    }

    /// Set the flat discount of the line at `index`, in minor units.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`]: no line at `index`.
    /// - [`CartError::NegativeDiscount`]: `discount` is below zero.
    /// - [`CartError::DiscountExceedsLine`]: `discount` is above the line
    ///   subtotal at the current sale type.
    pub fn set_discount(&mut self, index: usize, discount: i64) -> Result<(), CartError> {
        let sale_type = self.sale_type;
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CartError::LineNotFound(index))?;

        if discount < 0 {
            return Err(CartError::NegativeDiscount);
        }

        let line_subtotal = line.subtotal(sale_type)?;

        if discount > line_subtotal {
            return Err(CartError::DiscountExceedsLine {
                index,
                line_subtotal,
            });
        }

        line.set_discount(discount);

        Ok(())
    }

    /// Switch the pricing tier. Lines are left untouched.
    pub fn set_sale_type(&mut self, sale_type: SaleType) {
        self.sale_type = sale_type;
    }

    /// Associate a customer, or `None` for walk-in.
    pub fn set_customer(&mut self, customer: Option<Customer>) {
        self.customer = customer;
    }

    /// Replace the cashier notes.
    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Drop every line, the customer and the notes.
    ///
    /// The sale type is a register setting and survives clearing.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer = None;
        self.notes.clear();
    }

    /// Calculate the totals under the current sale type.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if an amount leaves the `i64` range.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        compute_totals(&self.lines, self.sale_type)
    }
}
