use crate::store::DocumentStore;

use super::error::FacturaError;

/// Canonical invoice file name, `"<short_name> <year>-<MM>"`.
///
/// The zero-padded month keeps names sortable and matches the
/// historical archive, so existing invoices are found by the duplicate
/// guard.
pub fn invoice_file_name(short_name: &str, year: i32, month: u32) -> String {
    format!("{short_name} {year}-{month:02}")
}

/// Whether an invoice already exists for this tenant and period.
///
/// Must be consulted — and return `false` — before a number is reserved
/// and before any document is created: at most one invoice file per
/// tenant per calendar month.
pub fn invoice_exists_for_period(
    store: &dyn DocumentStore,
    tenant_id: u32,
    short_name: &str,
    year: i32,
    month: u32,
) -> Result<bool, FacturaError> {
    store.find_in_tenant_folder(tenant_id, &invoice_file_name(short_name, year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_zero_pads_month() {
        assert_eq!(invoice_file_name("Sánchez_Macías", 2026, 3), "Sánchez_Macías 2026-03");
        assert_eq!(invoice_file_name("Pérez", 2024, 11), "Pérez 2024-11");
    }
}
