//! Terminal rendering of the cart and search results.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;
use till::{
    cart::Cart,
    checkout::Payment,
    customers::Customer,
    money::format_minor,
    pricing::{PricingError, SaleType},
    products::ProductSnapshot,
};

/// Errors that can occur when rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Amount arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Writing to the terminal failed.
    #[error("no se pudo escribir en la terminal")]
    Io(#[from] io::Error),
}

/// Print the cart as a table followed by its totals and payment details.
///
/// # Errors
///
/// Returns an error if an amount overflows or the output cannot be written.
pub fn write_cart(out: &mut impl io::Write, cart: &Cart, payment: Payment) -> Result<(), RenderError> {
    let sale_type = cart.sale_type();

    let customer = cart
        .customer()
        .map_or_else(|| "Público general".to_string(), Customer::display_name);

    writeln!(out, "\nCliente: {customer} | {}", sale_type_label(sale_type))?;

    if cart.is_empty() {
        writeln!(out, "El carrito está vacío")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Producto", "Cant.", "Precio", "Desc.", "Importe"]);

    for (index, line) in cart.lines().iter().enumerate() {
        let discount = line.applied_discount(sale_type)?;

        builder.push_record([
            (index + 1).to_string(),
            line.product().name.clone(),
            line.quantity().to_string(),
            format_minor(line.unit_price(sale_type)),
            if discount == 0 {
                String::new()
            } else {
                format!("-{}", format_minor(discount))
            },
            format_minor(line.total(sale_type)?),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..6), Alignment::right());

    writeln!(out, "{table}")?;

    let totals = cart.totals()?;

    writeln!(out, "  Subtotal:  {}", totals.subtotal())?;

    if totals.discount_minor() > 0 {
        writeln!(out, "  Descuento: -{}", totals.discount())?;
    }

    writeln!(out, "  Total:     {}", totals.total())?;

    let tendered = payment
        .tendered
        .map_or_else(|| "exacto".to_string(), format_minor);

    writeln!(out, "  Pago:      {} ({tendered})", payment.method)?;

    if !cart.notes().is_empty() {
        writeln!(out, "  Notas:     {}", cart.notes())?;
    }

    Ok(())
}

/// Print numbered product search results.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_products(
    out: &mut impl io::Write,
    products: &[ProductSnapshot],
    sale_type: SaleType,
) -> Result<(), RenderError> {
    if products.is_empty() {
        writeln!(out, "Sin resultados")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Producto", "Código", "Precio", "Existencia"]);

    for (index, product) in products.iter().enumerate() {
        builder.push_record([
            (index + 1).to_string(),
            product.name.clone(),
            product.barcode.clone().unwrap_or_default(),
            format_minor(product.unit_price(sale_type)),
            product.current_stock.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Print numbered customer search results.
///
/// # Errors
///
/// Returns an error if the output cannot be written.
pub fn write_customers(out: &mut impl io::Write, customers: &[Customer]) -> Result<(), RenderError> {
    if customers.is_empty() {
        writeln!(out, "Sin resultados")?;

        return Ok(());
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "Cliente", "Correo", "Teléfono"]);

    for (index, customer) in customers.iter().enumerate() {
        builder.push_record([
            (index + 1).to_string(),
            customer.display_name(),
            customer.email.clone().unwrap_or_default(),
            customer.phone.clone().unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;

    Ok(())
}

fn sale_type_label(sale_type: SaleType) -> &'static str {
    match sale_type {
        SaleType::Retail => "Menudeo",
        SaleType::Wholesale => "Mayoreo",
    }
}
