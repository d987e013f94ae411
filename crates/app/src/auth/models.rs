//! Auth models.

use serde::{Deserialize, Serialize};
use till::ids::RecordId;

/// Backend user id.
pub type UserId = RecordId<User>;

/// Role of a logged-in user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access
    Admin,

    /// Store manager
    Manager,

    /// Register operator
    #[default]
    Cashier,
}

/// The user a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: UserId,

    /// Login name
    pub username: String,

    /// Given name
    #[serde(default)]
    pub first_name: Option<String>,

    /// Family name
    #[serde(default)]
    pub last_name: Option<String>,

    /// Email address
    #[serde(default)]
    pub email: Option<String>,

    /// Role
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Name shown on the register: full name when known, else the username.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub(crate) username: &'a str,
    pub(crate) password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginResponse {
    pub(crate) user: User,
    pub(crate) token: String,

    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
}
