//! Test fixtures

use crate::products::{ProductId, ProductSnapshot};

/// Build an active product snapshot.
pub(crate) fn product(
    id: u64,
    retail_price: i64,
    wholesale_price: Option<i64>,
    current_stock: i64,
) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        name: format!("Producto {id}"),
        barcode: Some(format!("750{id:010}")),
        retail_price,
        wholesale_price,
        current_stock,
        is_active: true,
    }
}
