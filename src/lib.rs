//! # rentomatic
//!
//! Monthly rent invoicing engine: concept-based fiscal totals
//! (IVA + IRPF withholding), atomic per-year invoice numbering, and
//! duplicate-safe filing into per-tenant storage.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating
//! point. Spreadsheet and drive access are behind the [`store`] traits;
//! the [`flow::InvoiceGenerator`] receives them by injection, so tests
//! run entirely against the in-memory backends.
//!
//! ## Quick Start
//!
//! ```rust
//! use rentomatic::core::*;
//! use rust_decimal_macros::dec;
//!
//! // Fiscal calculation: 21 % IVA added, 19 % IRPF withheld.
//! let context = BillingContext {
//!     tenant_id: 1,
//!     tenant_short_name: "Sánchez_Macías".into(),
//!     tenant_fiscal_name: "Sánchez Macías S.L.".into(),
//!     tenant_tax_id: "B12345678".into(),
//!     tenant_address: "Calle Mayor 1, Madrid".into(),
//!     invoice_date: invoice_date(3, 2026).unwrap(),
//!     period_label: period_label(3, 2026),
//!     concepts: vec![Concept::base("Alquiler", "Alquiler local", dec!(1000))],
//! };
//!
//! let rates = TaxRates::new(dec!(0.21), dec!(0.19)).unwrap();
//! let totals = calculate_invoice_totals(&context, &rates).unwrap();
//! assert_eq!(totals.grand_total, dec!(1020.00));
//!
//! // Numbering: sequential per fiscal year, exclusive under concurrency.
//! let numbering = InvoiceNumbering::new(MemoryCounterStore::new());
//! let ordinal = numbering.reserve(2026).unwrap();
//! assert_eq!(format_invoice_id(ordinal, 2026), "1-2026");
//! ```

pub mod core;
pub mod flow;
pub mod store;

// Re-export core types at crate root for convenience
pub use crate::core::*;
