//! Invoice generation orchestration.
//!
//! One strictly ordered sequence per invocation, no branching back:
//! build context → duplicate check → reserve number → render → file →
//! PDF. Numbering is reserved as late as possible — after the
//! duplicate check and all validation — because a reserved ordinal is
//! consumed even if the invoice is never finished.

use tracing::{error, info, warn};

use crate::core::{
    BillingContext, Concept, CounterStore, FacturaError, InvoiceNumbering, InvoiceSummary,
    InvoiceTotals, calculate_invoice_totals, format_invoice_id, invoice_date,
    invoice_exists_for_period, invoice_file_name, period_label,
};
use crate::store::{
    DocumentHandle, DocumentStore, ExtraConceptSource, PanelSource, RateSource, RenderedInvoice,
    TenantRegistry,
};

/// The invoice generation entry point, with every external collaborator
/// injected.
pub struct InvoiceGenerator<S> {
    panel: Box<dyn PanelSource>,
    tenants: Box<dyn TenantRegistry>,
    extras: Box<dyn ExtraConceptSource>,
    rates: Box<dyn RateSource>,
    documents: Box<dyn DocumentStore>,
    numbering: InvoiceNumbering<S>,
}

impl<S: CounterStore> InvoiceGenerator<S> {
    pub fn new(
        panel: Box<dyn PanelSource>,
        tenants: Box<dyn TenantRegistry>,
        extras: Box<dyn ExtraConceptSource>,
        rates: Box<dyn RateSource>,
        documents: Box<dyn DocumentStore>,
        numbering: InvoiceNumbering<S>,
    ) -> Self {
        Self {
            panel,
            tenants,
            extras,
            rates,
            documents,
            numbering,
        }
    }

    /// The numbering service (exposed for counter inspection).
    pub fn numbering(&self) -> &InvoiceNumbering<S> {
        &self.numbering
    }

    /// Generate one invoice for the current panel selection.
    ///
    /// Errors before numbering reservation leave zero side effects.
    /// Errors at or after it leave a consumed ordinal (an accepted,
    /// logged gap) and possibly an orphaned working document. A failed
    /// PDF export alone does not fail the invoice: the spreadsheet
    /// document is the authoritative record.
    pub fn generate_invoice(&self) -> Result<InvoiceSummary, FacturaError> {
        let context = self.build_context()?;
        let (year, month) = (context.year(), context.month());

        if invoice_exists_for_period(
            self.documents.as_ref(),
            context.tenant_id,
            &context.tenant_short_name,
            year,
            month,
        )? {
            return Err(duplicate_error(&context));
        }

        // All remaining validation happens before the irreversible
        // reservation: rate resolution errors must not burn an ordinal.
        let rates = self.rates.default_rates()?;
        let totals = calculate_invoice_totals(&context, &rates)?;

        let ordinal = self.numbering.reserve(year)?;
        let invoice_id = format_invoice_id(ordinal, year);
        info!(%invoice_id, tenant = context.tenant_id, "invoice number reserved");

        let file_name = invoice_file_name(&context.tenant_short_name, year, month);
        let doc = match self.render_and_file(&context, &totals, &invoice_id, &file_name) {
            Ok(doc) => doc,
            Err(err) => {
                error!(
                    %invoice_id,
                    ordinal,
                    year,
                    %err,
                    "invoice aborted after numbering; the ordinal is consumed and leaves a gap"
                );
                return Err(err);
            }
        };

        if let Err(err) = self
            .documents
            .export_pdf(&doc, context.tenant_id, &format!("{file_name}.pdf"))
        {
            warn!(%invoice_id, %err, "PDF export failed; spreadsheet remains the record");
        }

        info!(
            %invoice_id,
            tenant = %context.tenant_short_name,
            period = %context.period_label,
            total = %totals.grand_total,
            "invoice generated"
        );

        Ok(InvoiceSummary {
            invoice_id,
            tenant_short_name: context.tenant_short_name,
            period_label: context.period_label,
            grand_total: totals.grand_total,
            document_url: doc.url,
        })
    }

    /// Assemble the billing context: panel selection, tenant snapshot,
    /// recurring base concept first, then the period's extras.
    fn build_context(&self) -> Result<BillingContext, FacturaError> {
        let selection = self.panel.read_selection()?;
        let tenant = self.tenants.tenant_by_id(selection.tenant_id)?;

        let mut concepts = vec![Concept::base(
            tenant.base_concept.clone(),
            tenant.base_concept,
            tenant.base_amount,
        )];
        concepts.extend(self.extras.extra_concepts(
            selection.tenant_id,
            selection.month,
            selection.year,
        )?);

        Ok(BillingContext {
            tenant_id: tenant.id,
            tenant_short_name: tenant.short_name,
            tenant_fiscal_name: tenant.fiscal_name,
            tenant_tax_id: tenant.tax_id,
            tenant_address: tenant.address,
            invoice_date: invoice_date(selection.month, selection.year)?,
            period_label: period_label(selection.month, selection.year),
            concepts,
        })
    }

    fn render_and_file(
        &self,
        context: &BillingContext,
        totals: &InvoiceTotals,
        invoice_id: &str,
        file_name: &str,
    ) -> Result<DocumentHandle, FacturaError> {
        let doc = self.documents.create_from_template(file_name)?;
        self.documents.render_invoice(
            &doc,
            &RenderedInvoice {
                invoice_id,
                context,
                totals,
            },
        )?;

        // Last line of defense: a racing invocation may have filed an
        // invoice between the duplicate check and now. Never overwrite.
        if self
            .documents
            .find_in_tenant_folder(context.tenant_id, file_name)?
        {
            return Err(duplicate_error(context));
        }

        self.documents
            .file_in_tenant_folder(&doc, context.tenant_id, file_name)?;
        Ok(doc)
    }
}

fn duplicate_error(context: &BillingContext) -> FacturaError {
    FacturaError::DuplicateInvoice {
        tenant: context.tenant_short_name.clone(),
        period: format!("{}-{:02}", context.year(), context.month()),
    }
}
