//! Sale models.

use serde::Deserialize;
use till::ids::RecordId;

/// Backend sale id.
pub type SaleId = RecordId<SaleReceipt>;

/// What the backend returns for a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    /// Sale id
    pub id: SaleId,

    /// Human-facing sale number, e.g. `"V-000123"`
    #[serde(default)]
    pub sale_number: Option<String>,
}

impl SaleReceipt {
    /// Identifier shown to the cashier: the sale number, or the id when the
    /// backend did not assign one.
    pub fn identifier(&self) -> String {
        self.sale_number
            .as_deref()
            .filter(|number| !number.trim().is_empty())
            .map_or_else(|| self.id.to_string(), str::to_string)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaleEnvelope {
    pub(crate) sale: SaleReceipt,
}
