//! HTTP client for the store backend.

use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{ApiError, Session};

/// Backend address used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for connecting to the backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST API, e.g. `"http://localhost:3000/api"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// JSON client for the backend REST API.
///
/// Cloning is cheap; clones share the same session, so a login or token
/// refresh performed through one clone is seen by all of them.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: Arc<RwLock<Option<Session>>>,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Install session credentials, replacing any previous ones.
    pub async fn set_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    /// Forget the session credentials.
    pub async fn clear_session(&self) {
        *self.session.write().await = None;
    }

    /// Whether session credentials are installed.
    pub async fn has_session(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status or an
    /// unexpected response body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        self.send(Method::GET, path, query, None).await
    }

    /// `POST` a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport failure, non-2xx status or an
    /// unexpected response body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body).map_err(ApiError::Encode)?;

        self.send(Method::POST, path, &[], Some(body)).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let response = self
            .request(method.clone(), path, query, body.as_ref())
            .await
            .send()
            .await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            if !self.refresh().await? {
                return Err(error_from_response(response).await);
            }

            self.request(method, path, query, body.as_ref())
                .await
                .send()
                .await?
        } else {
            response
        };

        decode(response).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);

        debug!(%method, %url, "api request");

        let mut builder = self.http.request(method, url);

        if !query.is_empty() {
            builder = builder.query(query);
        }

        if let Some(session) = self.session.read().await.as_ref() {
            builder = builder.bearer_auth(session.token());
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder
    }

    /// Exchange the refresh token for a new session.
    ///
    /// Returns `Ok(false)` when there is no refresh token to try, so the
    /// original 401 is surfaced as-is.
    async fn refresh(&self) -> Result<bool, ApiError> {
        let Some(refresh_token) = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(Session::refresh_token)
            .map(str::to_string)
        else {
            return Ok(false);
        };

        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await;

        let refreshed = match response {
            Ok(response) => decode::<Session>(response).await,
            Err(error) => Err(ApiError::from(error)),
        };

        match refreshed {
            Ok(session) => {
                debug!("refreshed api session");
                self.set_session(session).await;

                Ok(true)
            }
            Err(error) => {
                warn!(%error, "session refresh failed; clearing credentials");
                self.clear_session().await;

                Err(ApiError::Unauthorized)
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,

    #[serde(default)]
    message: Option<String>,
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }

    let bytes = response.bytes().await?;

    serde_json::from_slice(&bytes).map_err(ApiError::Decode)
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|body| body.error.or(body.message))
        .or_else(|| Some(text.trim().to_string()).filter(|text| !text.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("error desconocido")
                .to_string()
        });

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path, query_param},
    };

    use super::*;

    fn client_for(server: &MockServer) -> Result<ApiClient, ApiError> {
        ApiClient::new(ApiConfig {
            base_url: format!("{}/api/", server.uri()),
            timeout: Duration::from_secs(5),
        })
    }

    #[tokio::test]
    async fn sends_bearer_token_and_query() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/products"))
            .and(query_param("search", "mezcal"))
            .and(header("authorization", "Bearer t1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        client.set_session(Session::new("t1", None)).await;

        let body: Value = client
            .get_json("/products", &[("search", "mezcal".to_string())])
            .await?;

        assert_eq!(body, json!({ "ok": true }));

        Ok(())
    }

    #[tokio::test]
    async fn server_error_message_is_kept_verbatim() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/sales"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "error": "Stock insuficiente para Tequila Añejo" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let result: Result<Value, ApiError> = client.post_json("/sales", &json!({})).await;

        let Err(ApiError::Status { status, message }) = &result else {
            return Err(format!("expected status error, got {result:?}").into());
        };

        assert_eq!(*status, 400);
        assert_eq!(message, "Stock insuficiente para Tequila Añejo");

        Ok(())
    }

    #[tokio::test]
    async fn expired_token_is_refreshed_once_and_replayed() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .and(header("authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .and(body_json(json!({ "refreshToken": "r1" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "token": "new", "refreshToken": "r2" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .and(header("authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "customers": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        client
            .set_session(Session::new("old", Some("r1".to_string())))
            .await;

        let body: Value = client.get_json("/customers", &[]).await?;

        assert_eq!(body, json!({ "customers": [] }));

        Ok(())
    }

    #[tokio::test]
    async fn failed_refresh_clears_session() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/api/auth/refresh"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "revoked" })))
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        client
            .set_session(Session::new("old", Some("r1".to_string())))
            .await;

        let result: Result<Value, ApiError> = client.get_json("/customers", &[]).await;

        assert!(matches!(result, Err(ApiError::Unauthorized)));
        assert!(!client.has_session().await);

        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_without_refresh_token_is_surfaced() -> TestResult {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/customers"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Token requerido" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server)?;
        let result: Result<Value, ApiError> = client.get_json("/customers", &[]).await;

        assert_eq!(result.err().map(|e| e.to_string()), Some("Token requerido".to_string()));

        Ok(())
    }
}
