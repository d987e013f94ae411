//! Sales service.

use async_trait::async_trait;
use mockall::automock;
use till::checkout::CheckoutRequest;
use tracing::info;

use crate::{
    api::{ApiClient, ApiError},
    sales::{SaleEnvelope, SaleReceipt},
};

/// Sale commit backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpSalesService {
    api: ApiClient,
}

impl HttpSalesService {
    /// Submit sales through `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SalesService for HttpSalesService {
    #[tracing::instrument(
        name = "sales.create",
        skip(self, request),
        fields(items = request.items.len(), sale_type = ?request.sale_type),
        err
    )]
    async fn create(&self, request: &CheckoutRequest) -> Result<SaleReceipt, ApiError> {
        let envelope: SaleEnvelope = self.api.post_json("/sales", request).await?;

        info!(sale = %envelope.sale.identifier(), "sale committed");

        Ok(envelope.sale)
    }
}

/// Sale submission.
#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Commit a sale. Sent once; never retried here.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] carries the server's rejection message verbatim,
    /// for example insufficient stock. Transport failures are returned as
    /// they are.
    async fn create(&self, request: &CheckoutRequest) -> Result<SaleReceipt, ApiError>;
}
