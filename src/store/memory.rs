//! In-memory implementations of the boundary traits.
//!
//! Used by the integration tests and by callers that have no real
//! spreadsheet or drive backend. The document store supports failure
//! injection so orchestrator error paths can be exercised.

use std::collections::HashMap;

use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::core::{Concept, FacturaError, PanelSelection, TaxRates, Tenant};

use super::{
    DocumentHandle, DocumentStore, ExtraConceptRow, ExtraConceptSource, PanelSource, RateSource,
    RenderedInvoice, TenantRegistry,
};

/// Panel source returning a fixed selection.
#[derive(Debug, Clone)]
pub struct FixedPanel(pub PanelSelection);

impl PanelSource for FixedPanel {
    fn read_selection(&self) -> Result<PanelSelection, FacturaError> {
        Ok(self.0)
    }
}

/// Rate source returning fixed default rates.
#[derive(Debug, Clone)]
pub struct FixedRates(pub TaxRates);

impl RateSource for FixedRates {
    fn default_rates(&self) -> Result<TaxRates, FacturaError> {
        Ok(self.0)
    }
}

/// Tenant registry backed by a map.
#[derive(Debug, Default)]
pub struct MemoryTenantRegistry {
    tenants: HashMap<u32, Tenant>,
}

impl MemoryTenantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tenant: Tenant) {
        self.tenants.insert(tenant.id, tenant);
    }
}

impl TenantRegistry for MemoryTenantRegistry {
    fn tenant_by_id(&self, id: u32) -> Result<Tenant, FacturaError> {
        self.tenants
            .get(&id)
            .cloned()
            .ok_or(FacturaError::TenantNotFound(id))
    }
}

/// Extra-concept source backed by a row list.
#[derive(Debug, Default)]
pub struct MemoryExtraConcepts {
    rows: Vec<ExtraConceptRow>,
}

impl MemoryExtraConcepts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ExtraConceptRow) {
        self.rows.push(row);
    }
}

impl ExtraConceptSource for MemoryExtraConcepts {
    fn extra_concepts(
        &self,
        tenant_id: u32,
        month: u32,
        year: i32,
    ) -> Result<Vec<Concept>, FacturaError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| r.matches(tenant_id, month, year))
            .map(|r| r.concept.clone())
            .collect())
    }
}

#[derive(Debug, Default)]
struct DocumentState {
    /// doc id → (working name, rendered invoice id + grand total).
    documents: HashMap<String, RenderedState>,
    /// tenant id → file names in the tenant's folder.
    folders: HashMap<u32, Vec<String>>,
    /// (tenant id, pdf file name).
    pdfs: Vec<(u32, String)>,
    next_id: u32,
    fail_render: bool,
    fail_filing: bool,
    fail_pdf: bool,
    fail_listing: bool,
}

#[derive(Debug, Default)]
struct RenderedState {
    invoice_id: Option<String>,
    grand_total: Option<Decimal>,
}

/// In-memory document/folder store with failure injection.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    state: Mutex<DocumentState>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a file in a tenant's folder (to simulate an existing
    /// invoice).
    pub fn seed_file(&self, tenant_id: u32, file_name: &str) {
        self.state
            .lock()
            .folders
            .entry(tenant_id)
            .or_default()
            .push(file_name.to_string());
    }

    pub fn fail_render(&self) {
        self.state.lock().fail_render = true;
    }

    pub fn fail_filing(&self) {
        self.state.lock().fail_filing = true;
    }

    pub fn fail_pdf_export(&self) {
        self.state.lock().fail_pdf = true;
    }

    pub fn fail_listing(&self) {
        self.state.lock().fail_listing = true;
    }

    /// File names currently in a tenant's folder.
    pub fn files_for(&self, tenant_id: u32) -> Vec<String> {
        self.state
            .lock()
            .folders
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default()
    }

    /// PDF file names exported for a tenant.
    pub fn pdfs_for(&self, tenant_id: u32) -> Vec<String> {
        self.state
            .lock()
            .pdfs
            .iter()
            .filter(|(t, _)| *t == tenant_id)
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Invoice id rendered into the given filed document, if any.
    pub fn rendered_invoice_id(&self, doc_id: &str) -> Option<String> {
        self.state
            .lock()
            .documents
            .get(doc_id)
            .and_then(|d| d.invoice_id.clone())
    }

    /// Grand total rendered into the given filed document, if any.
    pub fn rendered_grand_total(&self, doc_id: &str) -> Option<Decimal> {
        self.state
            .lock()
            .documents
            .get(doc_id)
            .and_then(|d| d.grand_total)
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn create_from_template(&self, name: &str) -> Result<DocumentHandle, FacturaError> {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = format!("doc-{}", state.next_id);
        state.documents.insert(id.clone(), RenderedState::default());

        Ok(DocumentHandle {
            url: format!("memory://{id}/{name}"),
            id,
        })
    }

    fn render_invoice(
        &self,
        doc: &DocumentHandle,
        invoice: &RenderedInvoice<'_>,
    ) -> Result<(), FacturaError> {
        let mut state = self.state.lock();
        if state.fail_render {
            return Err(FacturaError::Render("template regions unavailable".into()));
        }

        let rendered = state
            .documents
            .get_mut(&doc.id)
            .ok_or_else(|| FacturaError::Render(format!("unknown document {}", doc.id)))?;
        rendered.invoice_id = Some(invoice.invoice_id.to_string());
        rendered.grand_total = Some(invoice.totals.grand_total);
        Ok(())
    }

    fn find_in_tenant_folder(
        &self,
        tenant_id: u32,
        name_prefix: &str,
    ) -> Result<bool, FacturaError> {
        let state = self.state.lock();
        if state.fail_listing {
            return Err(FacturaError::StorageUnavailable(
                "folder listing failed".into(),
            ));
        }

        Ok(state
            .folders
            .get(&tenant_id)
            .is_some_and(|files| files.iter().any(|f| f.starts_with(name_prefix))))
    }

    fn file_in_tenant_folder(
        &self,
        doc: &DocumentHandle,
        tenant_id: u32,
        file_name: &str,
    ) -> Result<(), FacturaError> {
        let mut state = self.state.lock();
        if state.fail_filing {
            return Err(FacturaError::Storage("tenant folder not writable".into()));
        }
        if !state.documents.contains_key(&doc.id) {
            return Err(FacturaError::Storage(format!("unknown document {}", doc.id)));
        }

        state
            .folders
            .entry(tenant_id)
            .or_default()
            .push(file_name.to_string());
        Ok(())
    }

    fn export_pdf(
        &self,
        _doc: &DocumentHandle,
        tenant_id: u32,
        file_name: &str,
    ) -> Result<(), FacturaError> {
        let mut state = self.state.lock();
        if state.fail_pdf {
            return Err(FacturaError::Render("PDF conversion failed".into()));
        }

        state.pdfs.push((tenant_id, file_name.to_string()));
        Ok(())
    }
}
