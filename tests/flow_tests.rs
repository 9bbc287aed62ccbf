use std::sync::Arc;

use rentomatic::core::*;
use rentomatic::flow::InvoiceGenerator;
use rentomatic::store::*;
use rust_decimal_macros::dec;

fn tenant() -> Tenant {
    Tenant {
        id: 1,
        short_name: "Sánchez_Macías".into(),
        fiscal_name: "Sánchez Macías S.L.".into(),
        tax_id: "B12345678".into(),
        address: "Calle Mayor 1, Madrid".into(),
        base_concept: "Alquiler local comercial".into(),
        base_amount: dec!(1000),
    }
}

struct Harness {
    documents: Arc<MemoryDocumentStore>,
    generator: InvoiceGenerator<MemoryCounterStore>,
}

fn harness(extras: Vec<ExtraConceptRow>) -> Harness {
    let documents = Arc::new(MemoryDocumentStore::new());

    let mut registry = MemoryTenantRegistry::new();
    registry.insert(tenant());

    let mut extra_source = MemoryExtraConcepts::new();
    for row in extras {
        extra_source.push(row);
    }

    let generator = InvoiceGenerator::new(
        Box::new(FixedPanel(PanelSelection {
            tenant_id: 1,
            month: 3,
            year: 2026,
        })),
        Box::new(registry),
        Box::new(extra_source),
        Box::new(FixedRates(TaxRates::new(dec!(0.21), dec!(0.19)).unwrap())),
        Box::new(Arc::clone(&documents)),
        InvoiceNumbering::new(MemoryCounterStore::new()),
    );

    Harness {
        documents,
        generator,
    }
}

#[test]
fn generates_files_and_exports_a_first_invoice() {
    let h = harness(vec![ExtraConceptRow {
        month: 3,
        year: 2026,
        tenant_id: 1,
        concept: Concept::extra("Plaza de garaje", dec!(100), true),
    }]);

    let summary = h.generator.generate_invoice().unwrap();

    assert_eq!(summary.invoice_id, "1-2026");
    assert_eq!(summary.tenant_short_name, "Sánchez_Macías");
    assert_eq!(summary.period_label, "Marzo de 2026");
    // 1100 base + 231 IVA - 190 IRPF
    assert_eq!(summary.grand_total, dec!(1141.00));
    assert!(summary.document_url.starts_with("memory://"));

    assert_eq!(h.documents.files_for(1), vec!["Sánchez_Macías 2026-03"]);
    assert_eq!(h.documents.pdfs_for(1), vec!["Sánchez_Macías 2026-03.pdf"]);
    assert_eq!(h.generator.numbering().peek(2026).unwrap(), 1);
}

#[test]
fn extras_for_other_periods_are_ignored() {
    let h = harness(vec![
        ExtraConceptRow {
            month: 2,
            year: 2026,
            tenant_id: 1,
            concept: Concept::extra("Obras febrero", dec!(500), true),
        },
        ExtraConceptRow {
            month: 3,
            year: 2026,
            tenant_id: 2,
            concept: Concept::extra("Otro inquilino", dec!(500), true),
        },
    ]);

    let summary = h.generator.generate_invoice().unwrap();
    // Base concept only: 1000 + 210 - 190.
    assert_eq!(summary.grand_total, dec!(1020.00));
}

#[test]
fn duplicate_period_aborts_before_any_mutation() {
    let h = harness(vec![]);
    h.documents.seed_file(1, "Sánchez_Macías 2026-03");

    let err = h.generator.generate_invoice().unwrap_err();
    assert!(matches!(err, FacturaError::DuplicateInvoice { .. }));

    // Terminal failure with zero side effects: no ordinal consumed,
    // nothing new filed.
    assert_eq!(h.generator.numbering().peek(2026).unwrap(), 0);
    assert_eq!(h.documents.files_for(1).len(), 1);
}

#[test]
fn duplicate_check_only_matches_same_period() {
    let h = harness(vec![]);
    h.documents.seed_file(1, "Sánchez_Macías 2026-02");
    h.documents.seed_file(1, "Sánchez_Macías 2025-03");

    assert!(h.generator.generate_invoice().is_ok());
}

#[test]
fn listing_failure_is_storage_unavailable_not_no_duplicate() {
    let h = harness(vec![]);
    h.documents.fail_listing();

    let err = h.generator.generate_invoice().unwrap_err();
    assert!(matches!(err, FacturaError::StorageUnavailable(_)));
    assert_eq!(h.generator.numbering().peek(2026).unwrap(), 0);
}

#[test]
fn render_failure_after_reservation_leaves_the_gap() {
    let h = harness(vec![]);
    h.documents.fail_render();

    let err = h.generator.generate_invoice().unwrap_err();
    // The original error propagates unchanged.
    assert!(matches!(err, FacturaError::Render(_)));
    assert_eq!(err.to_string(), "document rendering failed: template regions unavailable");

    // The ordinal was consumed; the gap is accepted, not rolled back.
    assert_eq!(h.generator.numbering().peek(2026).unwrap(), 1);
    assert!(h.documents.files_for(1).is_empty());
}

#[test]
fn filing_failure_surfaces_storage_error() {
    let h = harness(vec![]);
    h.documents.fail_filing();

    let err = h.generator.generate_invoice().unwrap_err();
    assert!(matches!(err, FacturaError::Storage(_)));
    assert_eq!(h.generator.numbering().peek(2026).unwrap(), 1);
}

#[test]
fn pdf_failure_is_not_fatal() {
    let h = harness(vec![]);
    h.documents.fail_pdf_export();

    let summary = h.generator.generate_invoice().unwrap();
    assert_eq!(summary.invoice_id, "1-2026");
    assert_eq!(h.documents.files_for(1), vec!["Sánchez_Macías 2026-03"]);
    assert!(h.documents.pdfs_for(1).is_empty());
}

#[test]
fn unknown_tenant_fails_before_numbering() {
    let documents = Arc::new(MemoryDocumentStore::new());
    let generator = InvoiceGenerator::new(
        Box::new(FixedPanel(PanelSelection {
            tenant_id: 99,
            month: 3,
            year: 2026,
        })),
        Box::new(MemoryTenantRegistry::new()),
        Box::new(MemoryExtraConcepts::new()),
        Box::new(FixedRates(TaxRates::new(dec!(0.21), dec!(0.19)).unwrap())),
        Box::new(Arc::clone(&documents)),
        InvoiceNumbering::new(MemoryCounterStore::new()),
    );

    let err = generator.generate_invoice().unwrap_err();
    assert!(matches!(err, FacturaError::TenantNotFound(99)));
    assert_eq!(generator.numbering().peek(2026).unwrap(), 0);
}

#[test]
fn second_invoice_same_year_takes_next_ordinal() {
    let h = harness(vec![]);
    assert_eq!(h.generator.generate_invoice().unwrap().invoice_id, "1-2026");

    // Same tenant, same period: blocked as a duplicate.
    assert!(matches!(
        h.generator.generate_invoice().unwrap_err(),
        FacturaError::DuplicateInvoice { .. }
    ));
    assert_eq!(h.generator.numbering().peek(2026).unwrap(), 1);
}
