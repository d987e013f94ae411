//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    api::{ApiClient, ApiError, Session},
    auth::{LoginRequest, LoginResponse, User},
};

/// Auth service backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    /// Authenticate through `api`.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    #[tracing::instrument(name = "auth.login", skip(self, password), err)]
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let response: LoginResponse = self
            .api
            .post_json("/auth/login", &LoginRequest { username, password })
            .await?;

        let LoginResponse {
            user,
            token,
            refresh_token,
        } = response;

        self.api.set_session(Session::new(token, refresh_token)).await;

        info!(user = %user.username, role = ?user.role, "logged in");

        Ok(user)
    }

    #[tracing::instrument(name = "auth.logout", skip(self))]
    async fn logout(&self) {
        let result: Result<Value, ApiError> = self.api.post_json("/auth/logout", &Value::Null).await;

        if let Err(error) = result {
            warn!(%error, "logout request failed");
        }

        self.api.clear_session().await;
    }
}

/// Cashier authentication.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Log in and install the returned session on the shared API client.
    ///
    /// # Errors
    ///
    /// [`ApiError::Status`] with the server's message when the credentials
    /// are refused, or a transport error when the backend is unreachable.
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError>;

    /// Tell the backend the session ends. Local credentials are always
    /// cleared, even if the request fails.
    async fn logout(&self);
}
