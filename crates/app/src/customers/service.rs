//! Customers service.

use async_trait::async_trait;
use mockall::automock;
use serde::Deserialize;
use till::customers::Customer;

use crate::api::{ApiClient, ApiError};

#[derive(Debug, Deserialize)]
struct CustomerPage {
    #[serde(default)]
    customers: Vec<Customer>,
}

/// Customer lookup backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpCustomersService {
    api: ApiClient,
}

impl HttpCustomersService {
    /// Search customers through `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CustomersService for HttpCustomersService {
    #[tracing::instrument(name = "customers.search", skip(self), err)]
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Customer>, ApiError> {
        let page: CustomerPage = self
            .api
            .get_json(
                "/customers",
                &[
                    ("search", query.to_string()),
                    ("limit", limit.to_string()),
                    ("page", "1".to_string()),
                ],
            )
            .await?;

        Ok(page.customers)
    }
}

/// Customer lookup.
#[automock]
#[async_trait]
pub trait CustomersService: Send + Sync {
    /// First page of customers matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be read.
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Customer>, ApiError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use till::customers::CustomerType;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use super::*;
    use crate::test::api_for;

    #[tokio::test]
    async fn search_reads_first_customer_page() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .and(query_param("search", "bar"))
            .and(query_param("limit", "20"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "customers": [
                    { "id": 4, "customerType": "business", "companyName": "Bar La Cantina" },
                    { "id": 9, "customerType": "individual", "firstName": "Ana", "lastName": "Barrera" }
                ]
            })))
            .mount(&server)
            .await;

        let customers = HttpCustomersService::new(api_for(&server)?)
            .search("bar", 20)
            .await?;

        let names: Vec<_> = customers.iter().map(Customer::display_name).collect();

        assert_eq!(names, ["Bar La Cantina", "Ana Barrera"]);
        assert_eq!(
            customers.first().map(|c| c.customer_type),
            Some(CustomerType::Business)
        );

        Ok(())
    }
}
