use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while generating an invoice.
///
/// Every variant is fatal to the current generation attempt; nothing in
/// the core retries on its own. Variants raised at or after numbering
/// reservation leave a consumed (gapped) ordinal behind — see
/// [`crate::core::InvoiceNumbering`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturaError {
    /// The billing panel selection is missing or malformed.
    #[error("invalid panel selection: {0}")]
    InvalidSelection(String),

    /// No tenant with the selected id exists in the registry.
    #[error("tenant {0} not found in registry")]
    TenantNotFound(u32),

    /// A default or per-concept tax rate is outside the valid range.
    #[error("invalid tax rate: {0}")]
    InvalidTaxRate(String),

    /// An invoice for this tenant and period already exists.
    #[error("invoice already exists for tenant \"{tenant}\" in period {period}")]
    DuplicateInvoice { tenant: String, period: String },

    /// The numbering lock could not be acquired in time.
    #[error("could not acquire invoice numbering lock within {0:?}")]
    LockTimeout(Duration),

    /// The counter store or file listing is unreachable or corrupted.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Writing invoice content into the document failed.
    #[error("document rendering failed: {0}")]
    Render(String),

    /// Moving or creating a file in tenant storage failed.
    #[error("document storage failed: {0}")]
    Storage(String),
}
