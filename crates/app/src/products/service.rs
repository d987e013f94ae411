//! Products service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use till::products::ProductSnapshot;
use tracing::debug;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct ProductPage {
    #[serde(default)]
    products: Vec<ProductSnapshot>,
}

/// Product lookup backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpProductsService {
    api: ApiClient,
}

impl HttpProductsService {
    /// Look up products through `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ProductsService for HttpProductsService {
    #[tracing::instrument(name = "products.search", skip(self), err)]
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<ProductSnapshot>, ApiError> {
        let page: ProductPage = self
            .api
            .get_json(
                "/products",
                &[("search", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        debug!(found = page.products.len(), "product search finished");

        Ok(page.products)
    }

    #[tracing::instrument(name = "products.find_by_barcode", skip(self), err)]
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<ProductSnapshot>, ApiError> {
        let products = self.search(barcode, 1).await?;

        Ok(products
            .into_iter()
            .find(|product| product.has_barcode(barcode)))
    }
}

/// Catalog lookup.
#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Free-text search over name, barcode and SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<ProductSnapshot>, ApiError>;

    /// The product whose barcode is exactly `barcode`, if any.
    ///
    /// A text search may match on other fields; only an exact barcode match
    /// counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    /// No match is `Ok(None)`, not an error.
    async fn find_by_barcode(&self, barcode: &str) -> Result<Option<ProductSnapshot>, ApiError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;
    use crate::test::api_for;

    #[tokio::test]
    async fn search_reads_product_page() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "tequila"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{
                    "id": 12,
                    "name": "Tequila Blanco 750ml",
                    "barcode": "7501035010109",
                    "retailPrice": "289.90",
                    "wholesalePrice": "255.00",
                    "currentStock": 14,
                    "isActive": true,
                    "sku": "TEQ-BL-750"
                }],
                "pagination": { "total": 1 }
            })))
            .mount(&server)
            .await;

        let products = HttpProductsService::new(api_for(&server)?)
            .search("tequila", 20)
            .await?;

        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|p| p.retail_price), Some(289_90));
        assert_eq!(products.first().and_then(|p| p.wholesale_price), Some(255_00));

        Ok(())
    }

    #[tokio::test]
    async fn barcode_lookup_requires_exact_match() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "75010"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{
                    "id": 12,
                    "name": "Tequila Blanco 750ml",
                    "barcode": "7501035010109",
                    "retailPrice": "289.90",
                    "currentStock": 14
                }]
            })))
            .mount(&server)
            .await;

        let found = HttpProductsService::new(api_for(&server)?)
            .find_by_barcode("75010")
            .await?;

        assert!(found.is_none(), "partial barcode must not match");

        Ok(())
    }

    #[tokio::test]
    async fn barcode_lookup_returns_exact_match() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "7501035010109"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [{
                    "id": 12,
                    "name": "Tequila Blanco 750ml",
                    "barcode": "7501035010109",
                    "retailPrice": 289.9,
                    "currentStock": 14,
                    "isActive": false
                }]
            })))
            .mount(&server)
            .await;

        let found = HttpProductsService::new(api_for(&server)?)
            .find_by_barcode("7501035010109")
            .await?;

        assert_eq!(found.map(|p| (p.id.get(), p.is_active)), Some((12, false)));

        Ok(())
    }
}
