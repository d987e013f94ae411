//! Controller.

use std::sync::Arc;

use till::{
    cart::{Cart, CartLine, QuantityChange},
    checkout::{Payment, PaymentMethod, prepare_checkout},
    customers::Customer,
    money::format_minor,
    pricing::{SaleType, Totals},
    products::ProductSnapshot,
};
use tracing::{debug, info, warn};

use crate::{
    checkout::PosError,
    context::PosContext,
    customers::CustomersService,
    notifications::{Notification, Notifier},
    products::ProductsService,
    sales::SalesService,
    scanner::{BarcodeDecoder, CameraFacing, ScanConfig, ScannerSession},
    storage::{CartStore, StoredCart},
};

/// Shortest product query sent to the backend.
pub const MIN_SEARCH_LEN: usize = 2;

/// Results requested per product or customer search.
pub const SEARCH_LIMIT: u32 = 20;

/// A sale the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSale {
    /// Sale number shown to the cashier
    pub sale: String,

    /// Amount due, in minor units
    pub total: i64,

    /// Amount tendered, in minor units
    pub paid: i64,

    /// Change owed, in minor units
    pub change: i64,
}

/// Owns the sale in progress and mediates every change to it.
///
/// Cart mutations run on a copy that is persisted before it replaces the
/// live cart, so a failed write leaves both the cart and the stored record
/// as they were. Every operation reports its rejection, and most report
/// their success, to the [`Notifier`].
pub struct CheckoutController {
    cart: Cart,
    payment: Payment,
    revision: u64,
    products: Arc<dyn ProductsService>,
    customers: Arc<dyn CustomersService>,
    sales: Arc<dyn SalesService>,
    store: Arc<dyn CartStore>,
    notifier: Arc<dyn Notifier>,
    decoder: Arc<dyn BarcodeDecoder>,
}

impl CheckoutController {
    /// Create a controller and restore the stored sale, if any.
    pub fn start(context: &PosContext) -> Self {
        let mut controller = Self {
            cart: Cart::new(),
            payment: Payment::default(),
            revision: 0,
            products: Arc::clone(&context.products),
            customers: Arc::clone(&context.customers),
            sales: Arc::clone(&context.sales),
            store: Arc::clone(&context.store),
            notifier: Arc::clone(&context.notifier),
            decoder: Arc::clone(&context.decoder),
        };

        controller.rehydrate();

        controller
    }

    /// Replace the live cart with the stored one.
    ///
    /// A missing record gives an empty cart. So does an unreadable one: it
    /// is logged and otherwise ignored.
    pub fn rehydrate(&mut self) {
        let StoredCart { revision, cart } = match self.store.load() {
            Ok(Some(stored)) => {
                info!(
                    lines = stored.cart.len(),
                    revision = stored.revision,
                    "restored sale in progress"
                );

                stored
            }
            Ok(None) => StoredCart::default(),
            Err(error) => {
                warn!(%error, "discarding unreadable cart record");

                StoredCart::default()
            }
        };

        self.cart = cart;
        self.revision = revision;
    }

    /// The sale in progress.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Payment method and tendered amount for the next checkout.
    pub fn payment(&self) -> Payment {
        self.payment
    }

    /// Revision of the last record written or restored.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Totals under the current sale type.
    ///
    /// # Errors
    ///
    /// Returns [`PosError::Pricing`] if an amount overflows.
    pub fn totals(&self) -> Result<Totals, PosError> {
        Ok(self.cart.totals()?)
    }

    /// Add one unit of `product`.
    ///
    /// # Errors
    ///
    /// Stock rejections from the cart, or a storage failure.
    #[tracing::instrument(name = "pos.add_product", skip(self, product), fields(product = %product.id))]
    pub fn add_product(&mut self, product: ProductSnapshot) -> Result<u32, PosError> {
        let name = product.name.clone();
        let result = self.apply(|cart| cart.add_product(product));

        self.report(result, |_| {
            Notification::success(format!("\"{name}\" agregado al carrito"))
        })
    }

    /// Change the quantity of line `index` by `delta`. Reaching zero removes
    /// the line.
    ///
    /// # Errors
    ///
    /// Unknown line, stock ceiling, or a storage failure.
    pub fn update_quantity(&mut self, index: usize, delta: i64) -> Result<QuantityChange, PosError> {
        let result = self.apply(|cart| cart.update_quantity(index, delta));

        self.report(result, |change| match change {
            QuantityChange::Updated(quantity) => {
                Notification::info(format!("Cantidad actualizada: {quantity}"))
            }
            QuantityChange::Removed => Notification::info("Producto eliminado del carrito"),
        })
    }

    /// Remove line `index`.
    ///
    /// # Errors
    ///
    /// Unknown line or a storage failure.
    pub fn remove_line(&mut self, index: usize) -> Result<CartLine, PosError> {
        let result = self.apply(|cart| cart.remove_line(index));

        self.report(result, |_| Notification::info("Producto eliminado del carrito"))
    }

    /// Set the flat discount of line `index`, in minor units.
    ///
    /// # Errors
    ///
    /// Unknown line, negative or oversized discount, or a storage failure.
    pub fn set_discount(&mut self, index: usize, discount: i64) -> Result<(), PosError> {
        let result = self.apply(|cart| cart.set_discount(index, discount));

        self.report(result, |()| {
            Notification::info(format!("Descuento aplicado: {}", format_minor(discount)))
        })
    }

    /// Switch between retail and wholesale pricing.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn set_sale_type(&mut self, sale_type: SaleType) -> Result<(), PosError> {
        let result = self.apply(|cart| {
            cart.set_sale_type(sale_type);

            Ok(())
        });

        self.report(result, |()| {
            Notification::info(match sale_type {
                SaleType::Retail => "Precio de menudeo",
                SaleType::Wholesale => "Precio de mayoreo",
            })
        })
    }

    /// Associate a customer, or `None` for a walk-in sale.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn set_customer(&mut self, customer: Option<Customer>) -> Result<(), PosError> {
        let message = customer.as_ref().map_or_else(
            || "Venta a público general".to_string(),
            |customer| format!("Cliente: {}", customer.display_name()),
        );

        let result = self.apply(|cart| {
            cart.set_customer(customer);

            Ok(())
        });

        self.report(result, |()| Notification::info(message))
    }

    /// Replace the sale notes.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be saved.
    pub fn set_notes(&mut self, notes: impl Into<String>) -> Result<(), PosError> {
        let notes = notes.into();
        let result = self.apply(|cart| {
            cart.set_notes(notes);

            Ok(())
        });

        self.report(result, |()| Notification::info("Notas actualizadas"))
    }

    /// Payment method for the next checkout. Not persisted.
    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment.method = method;
    }

    /// Amount tendered for the next checkout, in minor units; `None` means
    /// exact payment. Not persisted.
    pub fn set_tendered(&mut self, tendered: Option<i64>) {
        self.payment.tendered = tendered;
    }

    /// Empty the cart, forget the tendered amount and delete the stored
    /// record. The sale type and payment method stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored record cannot be removed; the cart is
    /// then left as it was.
    pub fn clear_cart(&mut self) -> Result<(), PosError> {
        let result = self.reset_sale();

        self.report(result, |()| Notification::info("Carrito limpiado"))
    }

    /// Search the catalog. Queries shorter than two characters return
    /// nothing without asking the backend.
    ///
    /// # Errors
    ///
    /// [`PosError::ProductLookup`] when the backend call fails.
    pub async fn search_products(&self, query: &str) -> Result<Vec<ProductSnapshot>, PosError> {
        let query = query.trim();

        if query.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }

        let result = self
            .products
            .search(query, SEARCH_LIMIT)
            .await
            .map_err(PosError::ProductLookup);

        self.report_failure(result)
    }

    /// Search customers.
    ///
    /// # Errors
    ///
    /// [`PosError::CustomerLookup`] when the backend call fails.
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, PosError> {
        let result = self
            .customers
            .search(query.trim(), SEARCH_LIMIT)
            .await
            .map_err(PosError::CustomerLookup);

        self.report_failure(result)
    }

    /// Look up the product with barcode `code` and add one unit of it.
    ///
    /// # Errors
    ///
    /// - [`PosError::ProductNotFound`]: no product has exactly this barcode.
    /// - [`PosError::ProductInactive`]: the product is retired.
    /// - [`PosError::ProductLookup`]: the backend call failed.
    /// - Anything [`CheckoutController::add_product`] returns.
    #[tracing::instrument(name = "pos.scan", skip(self))]
    pub async fn scan_and_add(&mut self, code: &str) -> Result<u32, PosError> {
        match self.lookup_barcode(code).await {
            Ok(product) => self.add_product(product),
            Err(error) => self.report_failure(Err(error)),
        }
    }

    /// Start the camera.
    ///
    /// # Errors
    ///
    /// [`PosError::Camera`] with the classified reason.
    pub async fn open_scanner(&self, facing: CameraFacing) -> Result<ScannerSession, PosError> {
        let result = ScannerSession::open(self.decoder.as_ref(), facing, ScanConfig::default())
            .await
            .map_err(PosError::from);

        self.report_failure(result)
    }

    /// Wait for the next distinct scan in `session` and add its product.
    ///
    /// Returns `None` once the session ends. Decodes that arrive while the
    /// scan is handled are suppressed by the session.
    pub async fn scan_next(
        &mut self,
        session: &mut ScannerSession,
    ) -> Option<Result<u32, PosError>> {
        let event = session.next_scan().await?;

        debug!(code = %event.code, at = %event.scanned_at, "scan accepted");

        let outcome = self.scan_and_add(&event.code).await;

        session.complete();

        Some(outcome)
    }

    /// Send the sale to the backend.
    ///
    /// On success the cart is cleared. On failure nothing changes and
    /// nothing is retried.
    ///
    /// # Errors
    ///
    /// - [`PosError::Checkout`]: empty cart or insufficient payment; no
    ///   request is sent.
    /// - [`PosError::CheckoutFailed`]: the backend refused the sale.
    #[tracing::instrument(name = "pos.checkout", skip(self), fields(lines = self.cart.len()))]
    pub async fn checkout(&mut self) -> Result<CompletedSale, PosError> {
        let result = self.commit().await;

        self.report(result, |sale| {
            Notification::success(format!(
                "Venta {} completada. Cambio: {}",
                sale.sale,
                format_minor(sale.change)
            ))
        })
    }

    async fn commit(&mut self) -> Result<CompletedSale, PosError> {
        let prepared = prepare_checkout(&self.cart, self.payment)?;

        let receipt = self
            .sales
            .create(&prepared.request)
            .await
            .map_err(PosError::CheckoutFailed)?;

        let sale = CompletedSale {
            sale: receipt.identifier(),
            total: prepared.total,
            paid: prepared.paid,
            change: prepared.change,
        };

        info!(sale = %sale.sale, total = sale.total, change = sale.change, "sale completed");

        if let Err(error) = self.reset_sale() {
            warn!(%error, "could not remove the stored cart after checkout");

            // An empty record still keeps the sold cart from coming back.
            let mut cleared = self.cart.clone();
            cleared.clear();

            if let Err(error) = self.persist(cleared) {
                warn!(%error, "sold cart is still stored");
            }

            self.cart.clear();
            self.payment.tendered = None;
        }

        Ok(sale)
    }

    async fn lookup_barcode(&self, code: &str) -> Result<ProductSnapshot, PosError> {
        let product = self
            .products
            .find_by_barcode(code)
            .await
            .map_err(PosError::ProductLookup)?
            .ok_or_else(|| PosError::ProductNotFound(code.to_string()))?;

        if !product.is_active {
            return Err(PosError::ProductInactive(product.name));
        }

        Ok(product)
    }

    fn apply<T>(
        &mut self,
        mutate: impl FnOnce(&mut Cart) -> Result<T, till::cart::CartError>,
    ) -> Result<T, PosError> {
        let mut next = self.cart.clone();
        let value = mutate(&mut next)?;

        self.persist(next)?;

        Ok(value)
    }

    fn persist(&mut self, cart: Cart) -> Result<(), PosError> {
        let record = StoredCart::new(self.revision + 1, cart);

        self.store.save(&record)?;

        let StoredCart { revision, cart } = record;

        self.cart = cart;
        self.revision = revision;

        Ok(())
    }

    fn reset_sale(&mut self) -> Result<(), PosError> {
        self.store.clear()?;

        self.cart.clear();
        self.payment.tendered = None;

        Ok(())
    }

    fn report<T>(
        &self,
        result: Result<T, PosError>,
        success: impl FnOnce(&T) -> Notification,
    ) -> Result<T, PosError> {
        let result = self.report_failure(result);

        if let Ok(value) = &result {
            self.notifier.notify(success(value));
        }

        result
    }

    fn report_failure<T>(&self, result: Result<T, PosError>) -> Result<T, PosError> {
        if let Err(error) = &result {
            debug!(%error, level = %error.level(), "operation rejected");

            self.notifier
                .notify(Notification::new(error.level(), error.to_string()));
        }

        result
    }
}

impl std::fmt::Debug for CheckoutController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutController")
            .field("cart", &self.cart)
            .field("payment", &self.payment)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Arc};

    use testresult::TestResult;
    use till::{cart::CartError, checkout::CheckoutError};

    use super::*;
    use crate::{
        api::ApiError,
        notifications::NotificationLevel,
        sales::{SaleId, SaleReceipt},
        scanner::ChannelDecoder,
        storage::{MemoryCartStore, MockCartStore, StorageError},
        test::{TestContext, barcode, product},
    };

    fn receipt(number: &str) -> SaleReceipt {
        SaleReceipt {
            id: SaleId::new(1001),
            sale_number: Some(number.to_string()),
        }
    }

    #[test]
    fn retail_then_wholesale_totals() -> TestResult {
        let (context, notifier) = TestContext::new().build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 10_00, Some(8_00), 5))?;

        assert_eq!(pos.cart().len(), 1);
        assert_eq!(pos.totals()?.subtotal_minor(), 10_00);
        assert_eq!(pos.totals()?.total_minor(), 10_00);
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Success));

        pos.set_sale_type(SaleType::Wholesale)?;

        assert_eq!(pos.totals()?.subtotal_minor(), 8_00);
        assert_eq!(pos.totals()?.total_minor(), 8_00);
        assert_eq!(pos.cart().line(0).map(CartLine::quantity), Some(1));

        Ok(())
    }

    #[test]
    fn sixth_add_is_refused_at_stock_five() -> TestResult {
        let (context, notifier) = TestContext::new().build();
        let mut pos = CheckoutController::start(&context);
        let p1 = product(1, 10_00, Some(8_00), 5);

        for expected in 1..=5 {
            assert_eq!(pos.add_product(p1.clone())?, expected);
        }

        let sixth = pos.add_product(p1);

        assert!(matches!(
            sixth,
            Err(PosError::Cart(CartError::StockInsufficient { available: 5 }))
        ));
        assert_eq!(pos.cart().line(0).map(CartLine::quantity), Some(5));
        assert_eq!(
            notifier.last(),
            Some(Notification::warning("Stock insuficiente. Disponible: 5"))
        );

        Ok(())
    }

    #[test]
    fn out_of_stock_product_is_not_added() {
        let (context, notifier) = TestContext::new().build();
        let mut pos = CheckoutController::start(&context);

        let result = pos.add_product(product(2, 99_00, None, 0));

        assert!(matches!(result, Err(PosError::Cart(CartError::OutOfStock { .. }))));
        assert!(pos.cart().is_empty());
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn short_payment_sends_nothing() -> TestResult {
        let mut test = TestContext::new();
        test.sales.expect_create().never();

        let (context, notifier) = test.build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 25_00, None, 3))?;
        pos.set_tendered(Some(20_00));

        let result = pos.checkout().await;

        assert!(matches!(
            result,
            Err(PosError::Checkout(CheckoutError::InsufficientPayment {
                total: 25_00,
                paid: 20_00
            }))
        ));
        assert_eq!(pos.cart().len(), 1);
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Error));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_checked_out() {
        let mut test = TestContext::new();
        test.sales.expect_create().never();

        let (context, notifier) = test.build();
        let mut pos = CheckoutController::start(&context);

        let result = pos.checkout().await;

        assert!(matches!(result, Err(PosError::Checkout(CheckoutError::EmptyCart))));
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Warning));
    }

    #[tokio::test]
    async fn successful_checkout_reports_change_and_clears() -> TestResult {
        let mut test = TestContext::new();
        test.sales
            .expect_create()
            .withf(|request| request.paid_amount == 30_00 && request.items.len() == 1)
            .times(1)
            .returning(|_| Ok(receipt("S-1001")));

        let store = Arc::new(MemoryCartStore::new());
        let (context, notifier) = test.with_store(store.clone()).build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 25_00, None, 3))?;
        pos.set_tendered(Some(30_00));

        let sale = pos.checkout().await?;

        assert_eq!(sale.sale, "S-1001");
        assert_eq!(sale.change, 5_00);
        assert!(pos.cart().is_empty());
        assert_eq!(pos.payment().tendered, None);
        assert_eq!(store.load()?, None);

        let message = notifier.last().map(|n| n.message).unwrap_or_default();

        assert!(message.starts_with("Venta S-1001 completada. Cambio: "), "{message}");
        assert!(message.contains("5.00"), "{message}");

        Ok(())
    }

    /// Saves and loads normally but can never remove its record.
    struct UnclearableStore(MemoryCartStore);

    impl CartStore for UnclearableStore {
        fn load(&self) -> Result<Option<StoredCart>, StorageError> {
            self.0.load()
        }

        fn save(&self, record: &StoredCart) -> Result<(), StorageError> {
            self.0.save(record)
        }

        fn clear(&self) -> Result<(), StorageError> {
            Err(StorageError::Io(io::Error::other("permiso denegado")))
        }
    }

    #[tokio::test]
    async fn sold_cart_stays_gone_when_clear_fails() -> TestResult {
        let mut test = TestContext::new();
        test.sales
            .expect_create()
            .times(1)
            .returning(|_| Ok(receipt("S-1002")));

        let store: Arc<dyn CartStore> = Arc::new(UnclearableStore(MemoryCartStore::new()));
        let (context, _) = test.with_store(store.clone()).build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 25_00, None, 3))?;
        pos.set_tendered(Some(30_00));

        let sale = pos.checkout().await?;
        let sold_at = pos.revision();

        assert_eq!(sale.sale, "S-1002");
        assert!(pos.cart().is_empty());
        assert_eq!(pos.payment().tendered, None);
        assert_eq!(sold_at, 2, "empty record written over the sold cart");

        let (context, _) = TestContext::new().with_store(store).build();
        let restarted = CheckoutController::start(&context);

        assert!(restarted.cart().is_empty(), "sold cart must not come back");
        assert_eq!(restarted.revision(), sold_at);

        Ok(())
    }

    #[tokio::test]
    async fn failed_checkout_keeps_cart_and_server_message() -> TestResult {
        let mut test = TestContext::new();
        test.sales.expect_create().times(1).returning(|_| {
            Err(ApiError::Status {
                status: 400,
                message: "Stock insuficiente para Producto 1".to_string(),
            })
        });

        let (context, notifier) = test.build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 25_00, None, 3))?;

        let result = pos.checkout().await;

        assert!(matches!(result, Err(PosError::CheckoutFailed(_))));
        assert_eq!(pos.cart().len(), 1);
        assert_eq!(
            notifier.last(),
            Some(Notification::error("Stock insuficiente para Producto 1"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_decodes_add_one_line() -> TestResult {
        let mut test = TestContext::new();
        test.products
            .expect_find_by_barcode()
            .times(1)
            .returning(|code| Ok(Some(product(1, 10_00, None, 5)).filter(|p| p.has_barcode(code))));

        let (context, _notifier) = test.build();
        let mut pos = CheckoutController::start(&context);

        let (decoder, sender) = ChannelDecoder::new(8);
        sender.send(barcode(1)).await?;
        sender.send(barcode(1)).await?;
        drop(sender);

        let mut session =
            ScannerSession::open(&decoder, CameraFacing::Environment, ScanConfig::default())
                .await?;

        let first = pos.scan_next(&mut session).await.transpose()?;
        let second = pos.scan_next(&mut session).await.transpose()?;

        assert_eq!(first, Some(1));
        assert_eq!(second, None);
        assert_eq!(pos.cart().len(), 1);
        assert_eq!(pos.cart().line(0).map(CartLine::quantity), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn decode_during_lookup_is_dropped() -> TestResult {
        let (decoder, sender) = ChannelDecoder::new(8);
        let camera = sender.clone();

        let mut test = TestContext::new();
        test.products
            .expect_find_by_barcode()
            .withf(|code| *code == barcode(1))
            .times(1)
            .returning(move |_| {
                // The camera keeps reading while the lookup is in flight.
                _ = camera.try_send(barcode(2));

                Ok(Some(product(1, 10_00, None, 5)))
            });
        test.products
            .expect_find_by_barcode()
            .withf(|code| *code == barcode(3))
            .times(1)
            .returning(|_| Ok(Some(product(3, 30_00, None, 5))));

        let (context, _notifier) = test.build();
        let mut pos = CheckoutController::start(&context);

        let mut session =
            ScannerSession::open(&decoder, CameraFacing::Environment, ScanConfig::default())
                .await?;

        sender.send(barcode(1)).await?;
        let first = pos.scan_next(&mut session).await.transpose()?;

        sender.send(barcode(3)).await?;
        let second = pos.scan_next(&mut session).await.transpose()?;

        let ids: Vec<u64> = pos
            .cart()
            .lines()
            .iter()
            .map(|line| line.product().id.get())
            .collect();

        assert_eq!(first, Some(1));
        assert_eq!(second, Some(1));
        assert_eq!(ids, vec![1, 3]);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_and_inactive_barcodes_do_not_touch_cart() {
        let mut test = TestContext::new();
        test.products
            .expect_find_by_barcode()
            .returning(|code| match code {
                "7500000000009" => {
                    let mut retired = product(9, 50_00, None, 4);
                    retired.is_active = false;

                    Ok(Some(retired))
                }
                _ => Ok(None),
            });

        let (context, notifier) = test.build();
        let mut pos = CheckoutController::start(&context);

        let missing = pos.scan_and_add("123").await;

        assert!(matches!(missing, Err(PosError::ProductNotFound(code)) if code == "123"));
        assert_eq!(
            notifier.last(),
            Some(Notification::warning("Producto con código 123 no encontrado"))
        );

        let inactive = pos.scan_and_add("7500000000009").await;

        assert!(matches!(inactive, Err(PosError::ProductInactive(_))));
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Error));
        assert!(pos.cart().is_empty());
    }

    #[test]
    fn rehydrate_restores_previous_session() -> TestResult {
        let store: Arc<dyn CartStore> = Arc::new(MemoryCartStore::new());

        let (context, _) = TestContext::new().with_store(Arc::clone(&store)).build();
        let mut first = CheckoutController::start(&context);

        first.add_product(product(1, 10_00, Some(8_00), 5))?;
        first.add_product(product(2, 30_00, None, 2))?;
        first.update_quantity(0, 2)?;
        first.set_sale_type(SaleType::Wholesale)?;
        first.set_notes("cliente frecuente")?;

        let (context, _) = TestContext::new().with_store(store).build();
        let second = CheckoutController::start(&context);

        assert_eq!(second.cart(), first.cart());
        assert_eq!(second.revision(), first.revision());

        Ok(())
    }

    #[test]
    fn clear_then_rehydrate_is_empty_and_keeps_sale_type() -> TestResult {
        let (context, _) = TestContext::new().build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 10_00, None, 5))?;
        pos.set_sale_type(SaleType::Wholesale)?;
        pos.set_tendered(Some(100_00));

        pos.clear_cart()?;
        pos.clear_cart()?;

        assert!(pos.cart().is_empty());
        assert_eq!(pos.cart().sale_type(), SaleType::Wholesale);
        assert_eq!(pos.payment().tendered, None);

        pos.rehydrate();

        assert_eq!(pos.cart(), &Cart::new());

        Ok(())
    }

    #[test]
    fn corrupt_record_starts_empty() -> TestResult {
        let store: Arc<dyn CartStore> = Arc::new(MemoryCartStore::with_raw("{\"cart\": [oops"));
        let (context, _) = TestContext::new().with_store(store).build();

        let mut pos = CheckoutController::start(&context);

        assert!(pos.cart().is_empty());

        pos.add_product(product(1, 10_00, None, 5))?;

        assert_eq!(pos.cart().len(), 1);

        Ok(())
    }

    #[test]
    fn stale_write_rolls_back() -> TestResult {
        let store: Arc<dyn CartStore> = Arc::new(MemoryCartStore::new());

        let (context, _) = TestContext::new().with_store(Arc::clone(&store)).build();
        let mut tab_a = CheckoutController::start(&context);

        let (context, notifier_b) = TestContext::new().with_store(store).build();
        let mut tab_b = CheckoutController::start(&context);

        tab_a.add_product(product(1, 10_00, None, 5))?;

        let result = tab_b.add_product(product(2, 20_00, None, 5));

        assert!(matches!(
            result,
            Err(PosError::Storage(StorageError::StaleWrite {
                stored: 1,
                attempted: 1
            }))
        ));
        assert!(tab_b.cart().is_empty());
        assert_eq!(notifier_b.last_level(), Some(NotificationLevel::Warning));

        tab_b.rehydrate();
        tab_b.add_product(product(2, 20_00, None, 5))?;

        assert_eq!(tab_b.cart().len(), 2);

        Ok(())
    }

    #[test]
    fn failed_save_leaves_cart_untouched() {
        let mut store = MockCartStore::new();
        store.expect_load().returning(|| Ok(None));
        store
            .expect_save()
            .returning(|_| Err(StorageError::Io(io::Error::other("disco lleno"))));

        let (context, notifier) = TestContext::new().with_store(Arc::new(store)).build();
        let mut pos = CheckoutController::start(&context);

        let result = pos.add_product(product(1, 10_00, None, 5));

        assert!(matches!(result, Err(PosError::Storage(StorageError::Io(_)))));
        assert!(pos.cart().is_empty());
        assert_eq!(pos.revision(), 0);
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Error));
    }

    #[tokio::test]
    async fn short_product_queries_skip_the_backend() -> TestResult {
        let mut test = TestContext::new();
        test.products.expect_search().never();

        let (context, _) = test.build();
        let pos = CheckoutController::start(&context);

        assert!(pos.search_products(" a ").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn product_search_failure_is_reported() {
        let mut test = TestContext::new();
        test.products
            .expect_search()
            .withf(|query, limit| query.to_string() == "ron" && *limit == SEARCH_LIMIT)
            .returning(|_, _| Err(ApiError::Unauthorized));

        let (context, notifier) = test.build();
        let pos = CheckoutController::start(&context);

        let result = pos.search_products("ron").await;

        assert!(matches!(result, Err(PosError::ProductLookup(_))));
        assert_eq!(notifier.last_level(), Some(NotificationLevel::Error));
    }

    #[test]
    fn oversized_discount_is_refused() -> TestResult {
        let (context, _) = TestContext::new().build();
        let mut pos = CheckoutController::start(&context);

        pos.add_product(product(1, 10_00, None, 5))?;

        assert!(matches!(
            pos.set_discount(0, 10_01),
            Err(PosError::Cart(CartError::DiscountExceedsLine { .. }))
        ));

        pos.set_discount(0, 2_50)?;

        assert_eq!(pos.totals()?.total_minor(), 7_50);

        Ok(())
    }
}
