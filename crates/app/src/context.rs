//! POS Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiConfig, ApiError},
    auth::{AuthService, HttpAuthService},
    customers::{CustomersService, HttpCustomersService},
    notifications::Notifier,
    products::{HttpProductsService, ProductsService},
    sales::{HttpSalesService, SalesService},
    scanner::BarcodeDecoder,
    storage::CartStore,
};

/// Errors raised while wiring the context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The HTTP client could not be built.
    #[error("failed to build API client")]
    Api(#[source] ApiError),
}

/// Everything the register talks to.
#[derive(Clone)]
pub struct PosContext {
    /// Login and logout
    pub auth: Arc<dyn AuthService>,

    /// Product lookup
    pub products: Arc<dyn ProductsService>,

    /// Customer lookup
    pub customers: Arc<dyn CustomersService>,

    /// Sale commit
    pub sales: Arc<dyn SalesService>,

    /// Durable copy of the sale in progress
    pub store: Arc<dyn CartStore>,

    /// Where operation outcomes are shown
    pub notifier: Arc<dyn Notifier>,

    /// Barcode source
    pub decoder: Arc<dyn BarcodeDecoder>,
}

impl PosContext {
    /// Build the context for a live backend.
    ///
    /// Returns the shared [`ApiClient`] alongside, so the caller can install
    /// stored credentials before the first request.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn connect(
        config: ApiConfig,
        store: Arc<dyn CartStore>,
        notifier: Arc<dyn Notifier>,
        decoder: Arc<dyn BarcodeDecoder>,
    ) -> Result<(Self, ApiClient), AppInitError> {
        let api = ApiClient::new(config).map_err(AppInitError::Api)?;

        let context = Self {
            auth: Arc::new(HttpAuthService::new(api.clone())),
            products: Arc::new(HttpProductsService::new(api.clone())),
            customers: Arc::new(HttpCustomersService::new(api.clone())),
            sales: Arc::new(HttpSalesService::new(api.clone())),
            store,
            notifier,
            decoder,
        };

        Ok((context, api))
    }
}

impl std::fmt::Debug for PosContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PosContext").finish_non_exhaustive()
    }
}
