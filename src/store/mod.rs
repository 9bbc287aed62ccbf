//! Boundary traits for the external collaborators: spreadsheet reads,
//! document/folder storage, and tax-rate configuration.
//!
//! The core never touches a spreadsheet or a drive directly — the
//! orchestrator receives these traits by injection, and tests
//! substitute the [`memory`] implementations.

mod memory;
mod rows;

pub use memory::*;
pub use rows::*;

use serde::Serialize;

use crate::core::{
    BillingContext, Concept, FacturaError, InvoiceTotals, PanelSelection, TaxRates, Tenant,
};

/// Read access to the billing panel selection (tenant, month, year).
pub trait PanelSource {
    fn read_selection(&self) -> Result<PanelSelection, FacturaError>;
}

/// Tenant registry lookup.
pub trait TenantRegistry {
    /// Fails with [`FacturaError::TenantNotFound`] for unknown ids.
    fn tenant_by_id(&self, id: u32) -> Result<Tenant, FacturaError>;
}

/// Period-specific extra concepts for a tenant, possibly empty.
pub trait ExtraConceptSource {
    fn extra_concepts(
        &self,
        tenant_id: u32,
        month: u32,
        year: i32,
    ) -> Result<Vec<Concept>, FacturaError>;
}

/// Default VAT and withholding rates from external configuration.
pub trait RateSource {
    fn default_rates(&self) -> Result<TaxRates, FacturaError>;
}

/// Handle to a created invoice document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    pub id: String,
    pub url: String,
}

/// The data written into the invoice document's named regions. Layout
/// and formatting belong to the store implementation; these are just
/// write targets.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedInvoice<'a> {
    pub invoice_id: &'a str,
    pub context: &'a BillingContext,
    pub totals: &'a InvoiceTotals,
}

/// Hierarchical document/folder storage: templates, generated invoices
/// and PDF snapshots, keyed by string names.
pub trait DocumentStore {
    /// Copy the invoice template into a fresh working document.
    fn create_from_template(&self, name: &str) -> Result<DocumentHandle, FacturaError>;

    /// Write invoice content into the document's named regions.
    fn render_invoice(
        &self,
        doc: &DocumentHandle,
        invoice: &RenderedInvoice<'_>,
    ) -> Result<(), FacturaError>;

    /// Whether any file in the tenant's folder starts with `name_prefix`.
    ///
    /// A listing failure is [`FacturaError::StorageUnavailable`], never
    /// silently "no match".
    fn find_in_tenant_folder(&self, tenant_id: u32, name_prefix: &str)
    -> Result<bool, FacturaError>;

    /// Move the document into the tenant's folder under `file_name`.
    fn file_in_tenant_folder(
        &self,
        doc: &DocumentHandle,
        tenant_id: u32,
        file_name: &str,
    ) -> Result<(), FacturaError>;

    /// Export a PDF snapshot of the document alongside it.
    fn export_pdf(
        &self,
        doc: &DocumentHandle,
        tenant_id: u32,
        file_name: &str,
    ) -> Result<(), FacturaError>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for std::sync::Arc<T> {
    fn create_from_template(&self, name: &str) -> Result<DocumentHandle, FacturaError> {
        (**self).create_from_template(name)
    }

    fn render_invoice(
        &self,
        doc: &DocumentHandle,
        invoice: &RenderedInvoice<'_>,
    ) -> Result<(), FacturaError> {
        (**self).render_invoice(doc, invoice)
    }

    fn find_in_tenant_folder(
        &self,
        tenant_id: u32,
        name_prefix: &str,
    ) -> Result<bool, FacturaError> {
        (**self).find_in_tenant_folder(tenant_id, name_prefix)
    }

    fn file_in_tenant_folder(
        &self,
        doc: &DocumentHandle,
        tenant_id: u32,
        file_name: &str,
    ) -> Result<(), FacturaError> {
        (**self).file_in_tenant_folder(doc, tenant_id, file_name)
    }

    fn export_pdf(
        &self,
        doc: &DocumentHandle,
        tenant_id: u32,
        file_name: &str,
    ) -> Result<(), FacturaError> {
        (**self).export_pdf(doc, tenant_id, file_name)
    }
}
