//! Interactive register loop.

use std::io;

use thiserror::Error;
use till::{customers::Customer, money::format_minor, products::ProductSnapshot};
use till_app::{
    checkout::{CheckoutController, MIN_SEARCH_LEN, PosError},
    scanner::CameraFacing,
};
use tokio::{
    io::{AsyncBufRead, Lines},
    sync::mpsc,
};
use tracing::{debug, warn};

use crate::{
    commands::{Command, HELP},
    render::{RenderError, write_cart, write_customers, write_products},
};

/// Errors that end the register loop.
#[derive(Debug, Error)]
pub(crate) enum RegisterError {
    /// Reading input or writing output failed.
    #[error("error de terminal: {0}")]
    Io(#[from] io::Error),

    /// The screen could not be drawn.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Reads commands line by line and drives the checkout controller.
///
/// While the scanner is active every non-empty line is treated as a decoded
/// barcode, which is how keyboard-wedge scanners deliver codes.
pub(crate) struct Register<R, W> {
    controller: CheckoutController,
    input: Lines<R>,
    out: W,
    scanner_input: mpsc::Sender<String>,
    products: Vec<ProductSnapshot>,
    customers: Vec<Customer>,
}

impl<R, W> Register<R, W>
where
    R: AsyncBufRead + Unpin,
    W: io::Write,
{
    pub(crate) fn new(
        controller: CheckoutController,
        input: Lines<R>,
        out: W,
        scanner_input: mpsc::Sender<String>,
    ) -> Self {
        Self {
            controller,
            input,
            out,
            scanner_input,
            products: Vec::new(),
            customers: Vec::new(),
        }
    }

    /// Run until `salir` or end of input.
    pub(crate) async fn run(&mut self) -> Result<(), RegisterError> {
        writeln!(self.out, "Escribe \"ayuda\" para ver los comandos.")?;
        self.show()?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let Some(line) = self.input.next_line().await? else {
                break;
            };

            let command = match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => command,
                Err(error) => {
                    writeln!(self.out, "! {error}")?;

                    continue;
                }
            };

            self.execute(command).await?;
        }

        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<(), RegisterError> {
        match command {
            Command::Scan => return self.scan().await,
            Command::Code(code) => {
                let result = self.controller.scan_and_add(&code).await;

                self.refresh(result)?;
            }
            Command::Search(query) => self.search_products(&query).await?,
            Command::Add(index) => match self.products.get(index).cloned() {
                Some(product) => {
                    let result = self.controller.add_product(product);

                    self.refresh(result)?;
                }
                None => writeln!(self.out, "! no hay producto {} en los resultados", index + 1)?,
            },
            Command::Quantity { line, delta } => {
                let result = self.controller.update_quantity(line, delta);

                self.refresh(result)?;
            }
            Command::Remove(line) => {
                let result = self.controller.remove_line(line);

                self.refresh(result)?;
            }
            Command::Discount { line, amount } => {
                let result = self.controller.set_discount(line, amount);

                self.refresh(result)?;
            }
            Command::Customer(query) => self.search_customers(&query).await?,
            Command::Pick(index) => match self.customers.get(index).cloned() {
                Some(customer) => {
                    let result = self.controller.set_customer(Some(customer));

                    self.refresh(result)?;
                }
                None => writeln!(self.out, "! no hay cliente {} en los resultados", index + 1)?,
            },
            Command::WalkIn => {
                let result = self.controller.set_customer(None);

                self.refresh(result)?;
            }
            Command::SaleType(sale_type) => {
                let result = self.controller.set_sale_type(sale_type);

                self.refresh(result)?;
            }
            Command::Notes(notes) => {
                let result = self.controller.set_notes(notes);

                self.refresh(result)?;
            }
            Command::Method(method) => {
                self.controller.set_payment_method(method);

                writeln!(self.out, "Método de pago: {method}")?;
            }
            Command::Paid(tendered) => {
                self.controller.set_tendered(tendered);

                match tendered {
                    Some(amount) => writeln!(self.out, "Pago recibido: {}", format_minor(amount))?,
                    None => writeln!(self.out, "Pago exacto")?,
                }
            }
            Command::Pay => self.pay().await?,
            Command::Clear => {
                let result = self.controller.clear_cart();

                self.refresh(result)?;
            }
            Command::Reload => {
                self.controller.rehydrate();

                self.show()?;
            }
            Command::Show => self.show()?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {}
        }

        Ok(())
    }

    async fn scan(&mut self) -> Result<(), RegisterError> {
        let Ok(mut session) = self.controller.open_scanner(CameraFacing::default()).await else {
            return Ok(());
        };

        writeln!(
            self.out,
            "Escáner activo. Línea vacía para terminar; usa \"cant\" para repetir un producto."
        )?;

        loop {
            tokio::select! {
                biased;

                Some(event) = session.next_scan() => {
                    debug!(code = %event.code, at = %event.scanned_at, "scan accepted");

                    if let Err(error) = self.controller.scan_and_add(&event.code).await {
                        debug!(%error, "scan rejected");
                    }

                    session.complete();
                }
                line = self.input.next_line() => match line? {
                    Some(line) if !line.trim().is_empty() => {
                        if let Err(error) = self.scanner_input.try_send(line) {
                            warn!(%error, "scanner input dropped");
                        }
                    }
                    _ => break,
                },
            }
        }

        session.close();

        self.show()
    }

    async fn search_products(&mut self, query: &str) -> Result<(), RegisterError> {
        if query.trim().chars().count() < MIN_SEARCH_LEN {
            writeln!(self.out, "! escribe al menos {MIN_SEARCH_LEN} caracteres")?;

            return Ok(());
        }

        if let Ok(products) = self.controller.search_products(query).await {
            write_products(&mut self.out, &products, self.controller.cart().sale_type())?;

            self.products = products;
        }

        Ok(())
    }

    async fn search_customers(&mut self, query: &str) -> Result<(), RegisterError> {
        if let Ok(customers) = self.controller.search_customers(query).await {
            write_customers(&mut self.out, &customers)?;

            self.customers = customers;
        }

        Ok(())
    }

    async fn pay(&mut self) -> Result<(), RegisterError> {
        let Ok(sale) = self.controller.checkout().await else {
            return Ok(());
        };

        writeln!(self.out, "  Total:   {}", format_minor(sale.total))?;
        writeln!(self.out, "  Pagado:  {}", format_minor(sale.paid))?;
        writeln!(self.out, "  Cambio:  {}", format_minor(sale.change))?;

        self.show()
    }

    /// Redraw the cart after a successful change. Rejections were already
    /// shown by the notifier.
    fn refresh<T>(&mut self, result: Result<T, PosError>) -> Result<(), RegisterError> {
        match result {
            Ok(_) => self.show(),
            Err(error) => {
                debug!(%error, "command rejected");

                Ok(())
            }
        }
    }

    fn show(&mut self) -> Result<(), RegisterError> {
        write_cart(&mut self.out, self.controller.cart(), self.controller.payment())?;

        Ok(())
    }
}
