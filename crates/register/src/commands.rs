//! Register commands typed at the prompt.

use std::str::FromStr;

use thiserror::Error;
use till::{
    checkout::{PaymentMethod, UnknownPaymentMethod},
    money::{AmountError, parse_amount},
    pricing::SaleType,
};

/// Errors raised while reading a command line.
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    /// The word is not a command.
    #[error("comando desconocido: {0} (escribe \"ayuda\")")]
    Unknown(String),

    /// A required argument is missing.
    #[error("falta {argument} para \"{command}\"")]
    MissingArgument {
        /// Command as typed
        command: &'static str,

        /// What was expected
        argument: &'static str,
    },

    /// Line and result numbers start at 1.
    #[error("número inválido: {0}")]
    InvalidNumber(String),

    /// Quantity deltas are signed whole numbers.
    #[error("cantidad inválida: {0}")]
    InvalidDelta(String),

    /// Money argument could not be read.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Payment method argument could not be read.
    #[error(transparent)]
    PaymentMethod(#[from] UnknownPaymentMethod),

    /// Sale type argument could not be read.
    #[error("tipo de venta desconocido: {0} (menudeo o mayoreo)")]
    SaleType(String),
}

/// One instruction from the cashier.
///
/// Line and result positions are stored zero-based; the prompt shows them
/// one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start the barcode scanner.
    Scan,

    /// Add the product with this barcode.
    Code(String),

    /// Search the catalog.
    Search(String),

    /// Add a product from the last search results.
    Add(usize),

    /// Change a line's quantity by a signed amount.
    Quantity {
        /// Cart line
        line: usize,

        /// Units to add (or remove, if negative)
        delta: i64,
    },

    /// Remove a line.
    Remove(usize),

    /// Set a line's flat discount.
    Discount {
        /// Cart line
        line: usize,

        /// Discount in minor units
        amount: i64,
    },

    /// Search customers.
    Customer(String),

    /// Pick a customer from the last customer results.
    Pick(usize),

    /// Sell to the general public.
    WalkIn,

    /// Switch the pricing tier.
    SaleType(SaleType),

    /// Replace the sale notes.
    Notes(String),

    /// Choose the payment method.
    Method(PaymentMethod),

    /// Set the tendered amount; `None` means exact payment.
    Paid(Option<i64>),

    /// Complete the sale.
    Pay,

    /// Empty the cart.
    Clear,

    /// Reload the stored cart, picking up changes made by another register
    /// sharing the same storage.
    Reload,

    /// Print the cart.
    Show,

    /// Print the command list.
    Help,

    /// Leave the register.
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match word.to_lowercase().as_str() {
            "" | "ver" | "show" => Self::Show,
            "escanear" | "scan" => Self::Scan,
            "codigo" | "código" | "code" => Self::Code(required(rest, "codigo", "el código")?),
            "buscar" | "search" => Self::Search(required(rest, "buscar", "el texto")?),
            "agregar" | "add" => Self::Add(position(rest, "agregar")?),
            "cant" | "qty" => {
                let (line, delta) = two(rest, "cant", "la línea y la cantidad")?;

                Self::Quantity {
                    line: position(line, "cant")?,
                    delta: delta
                        .parse()
                        .map_err(|_err| CommandError::InvalidDelta(delta.to_string()))?,
                }
            }
            "quitar" | "rm" => Self::Remove(position(rest, "quitar")?),
            "desc" | "discount" => {
                let (line, amount) = two(rest, "desc", "la línea y el monto")?;

                Self::Discount {
                    line: position(line, "desc")?,
                    amount: parse_amount(amount)?,
                }
            }
            "cliente" | "customer" => Self::Customer(rest.to_string()),
            "elegir" | "pick" => Self::Pick(position(rest, "elegir")?),
            "publico" | "público" | "walkin" => Self::WalkIn,
            "tipo" | "type" => Self::SaleType(sale_type(&required(rest, "tipo", "el tipo")?)?),
            "notas" | "notes" => Self::Notes(rest.to_string()),
            "metodo" | "método" | "method" => {
                Self::Method(PaymentMethod::from_str(&required(rest, "metodo", "el método")?)?)
            }
            "pago" | "paid" => match required(rest, "pago", "el monto")?.as_str() {
                "exacto" | "none" => Self::Paid(None),
                amount => Self::Paid(Some(parse_amount(amount)?)),
            },
            "cobrar" | "pay" => Self::Pay,
            "limpiar" | "clear" => Self::Clear,
            "recargar" | "reload" => Self::Reload,
            "ayuda" | "help" | "?" => Self::Help,
            "salir" | "quit" | "exit" => Self::Quit,
            _ => return Err(CommandError::Unknown(word.to_string())),
        };

        Ok(command)
    }
}

/// Command reference printed by `ayuda`.
pub const HELP: &str = "\
Comandos:
  escanear                 leer códigos con el escáner (línea vacía para terminar)
  codigo <código>          agregar producto por código de barras
  buscar <texto>           buscar productos
  agregar <n>              agregar el resultado n de la última búsqueda
  cant <línea> <+/-n>      cambiar la cantidad de una línea
  quitar <línea>           quitar una línea
  desc <línea> <monto>     descuento fijo para una línea
  cliente [texto]          buscar clientes
  elegir <n>               asignar el cliente n de la última búsqueda
  publico                  venta a público general
  tipo menudeo|mayoreo     tipo de venta
  notas [texto]            notas de la venta
  metodo <método>          efectivo, tarjeta, transferencia o credito
  pago <monto>|exacto      monto recibido
  cobrar                   completar la venta
  limpiar                  vaciar el carrito
  recargar                 volver a leer el carrito guardado
  ver                      mostrar el carrito
  salir                    terminar";

fn required(rest: &str, command: &'static str, argument: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }

    Ok(rest.to_string())
}

fn two<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<(&'a str, &'a str), CommandError> {
    rest.split_once(char::is_whitespace)
        .map(|(first, second)| (first, second.trim()))
        .filter(|(_, second)| !second.is_empty())
        .ok_or(CommandError::MissingArgument { command, argument })
}

/// One-based position typed by the cashier, as a zero-based index.
fn position(text: &str, command: &'static str) -> Result<usize, CommandError> {
    if text.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "el número",
        });
    }

    text.parse::<usize>()
        .ok()
        .and_then(|number| number.checked_sub(1))
        .ok_or_else(|| CommandError::InvalidNumber(text.to_string()))
}

fn sale_type(text: &str) -> Result<SaleType, CommandError> {
    match text.to_lowercase().as_str() {
        "menudeo" | "retail" => Ok(SaleType::Retail),
        "mayoreo" | "wholesale" => Ok(SaleType::Wholesale),
        _ => Err(CommandError::SaleType(text.to_string())),
    }
}
