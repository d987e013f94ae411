//! Customers

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

/// Customer id
pub type CustomerId = RecordId<Customer>;

/// Kind of customer record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    /// A person, named by first and last name
    #[default]
    Individual,

    /// A company, named by its company name
    Business,
}

/// Customer record as returned by a customer search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer id
    pub id: CustomerId,

    /// Individual or business
    #[serde(default)]
    pub customer_type: CustomerType,

    /// First name (individuals)
    #[serde(default)]
    pub first_name: Option<String>,

    /// Last name (individuals)
    #[serde(default)]
    pub last_name: Option<String>,

    /// Company name (businesses)
    #[serde(default)]
    pub company_name: Option<String>,

    /// Contact email
    #[serde(default)]
    pub email: Option<String>,

    /// Contact phone
    #[serde(default)]
    pub phone: Option<String>,
}

impl Customer {
    /// Name shown to the cashier.
    pub fn display_name(&self) -> String {
        match self.customer_type {
            CustomerType::Business => self.company_name.clone().unwrap_or_default(),
            CustomerType::Individual => [self.first_name.as_deref(), self.last_name.as_deref()]
                .into_iter()
                .flatten()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}
