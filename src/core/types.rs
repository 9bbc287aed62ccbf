use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One tenant record, as read from the tenant registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Registry id, unique per tenant.
    pub id: u32,
    /// Short name used for folder and file naming (e.g. "Sánchez_Macías").
    pub short_name: String,
    /// Full fiscal name printed on the invoice.
    pub fiscal_name: String,
    /// Tax identifier (NIF).
    pub tax_id: String,
    /// Postal address printed on the invoice.
    pub address: String,
    /// Description of the recurring base concept (monthly rent).
    pub base_concept: String,
    /// Pre-tax amount of the recurring base concept.
    pub base_amount: Decimal,
}

/// A single billable line item: base rent or an extra charge, with its
/// own tax treatment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub description: String,
    /// Pre-tax base for this line. Negative amounts (credit lines) are
    /// allowed; the calculator does not reject them.
    pub amount: Decimal,
    pub applies_vat: bool,
    pub applies_withholding: bool,
    /// Per-concept VAT override in (0, 1). When absent the configured
    /// default applies. Overrides are snapshotted into the invoice and
    /// never change retroactively.
    pub vat_rate: Option<Decimal>,
    /// Per-concept withholding (IRPF) override, same semantics.
    pub withholding_rate: Option<Decimal>,
}

impl Concept {
    /// The tenant's recurring base concept: VAT and withholding both
    /// apply at the configured default rates.
    pub fn base(name: impl Into<String>, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            amount,
            applies_vat: true,
            applies_withholding: true,
            vat_rate: None,
            withholding_rate: None,
        }
    }

    /// A period-specific extra charge. Extras never carry withholding.
    pub fn extra(name: impl Into<String>, amount: Decimal, applies_vat: bool) -> Self {
        let name = name.into();
        Self {
            description: name.clone(),
            name,
            amount,
            applies_vat,
            applies_withholding: false,
            vat_rate: None,
            withholding_rate: None,
        }
    }
}

/// Everything needed to generate one invoice: an immutable snapshot of
/// tenant data plus the concepts billed for the period.
///
/// `concepts[0]` is always the tenant's recurring base concept; the
/// rest are period-specific extras. Order matters for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingContext {
    pub tenant_id: u32,
    pub tenant_short_name: String,
    pub tenant_fiscal_name: String,
    pub tenant_tax_id: String,
    pub tenant_address: String,
    /// First day of the billing month.
    pub invoice_date: NaiveDate,
    /// Human-readable "Mes de Año" label, derived once at build time.
    pub period_label: String,
    pub concepts: Vec<Concept>,
}

impl BillingContext {
    /// Fiscal year used as the numbering scope.
    pub fn year(&self) -> i32 {
        self.invoice_date.year()
    }

    /// Billing month, 1-based.
    pub fn month(&self) -> u32 {
        self.invoice_date.month()
    }
}

/// Per-concept amounts, each independently rounded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptTotals {
    pub name: String,
    pub base: Decimal,
    pub vat: Decimal,
    pub withholding: Decimal,
    pub total: Decimal,
}

/// Calculated invoice totals. Derived data — never persisted apart
/// from the rendered invoice document.
///
/// Aggregates are sums of the already-rounded line values, rounded
/// again, so the printed lines always add up to the printed totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub lines: Vec<ConceptTotals>,
    pub base: Decimal,
    pub vat: Decimal,
    pub withholding: Decimal,
    pub grand_total: Decimal,
}

/// Validated billing panel selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSelection {
    pub tenant_id: u32,
    /// 1-based month.
    pub month: u32,
    pub year: i32,
}

/// Success report returned by the orchestrator, suitable for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceSummary {
    /// Canonical invoice id, `"<ordinal>-<year>"`.
    pub invoice_id: String,
    pub tenant_short_name: String,
    pub period_label: String,
    pub grand_total: Decimal,
    /// URL of the filed spreadsheet document.
    pub document_url: String,
}
