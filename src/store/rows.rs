//! Typed mapping from positional spreadsheet rows to domain records.
//!
//! Sheet data arrives as rows of cells indexed by header position; all
//! of that fragility is confined to this adapter. Columns are located
//! by header name, never by fixed index, and every mapped value goes
//! through explicit parsing.

use crate::core::{
    Concept, FacturaError, PanelSelection, Tenant, extract_tenant_id, parse_euro_amount,
    parse_month, parse_year,
};

/// Header names of the tenant sheet ("Inquilinos").
pub mod tenant_columns {
    pub const ID: &str = "ID";
    pub const SHORT_NAME: &str = "Nombre corto";
    pub const FISCAL_NAME: &str = "Nombre fiscal";
    pub const TAX_ID: &str = "NIF";
    pub const ADDRESS: &str = "Dirección";
    pub const BASE_CONCEPT: &str = "Concepto base";
    pub const BASE_AMOUNT: &str = "Base (€)";
}

/// Header names of the extras sheet ("Conceptos extra").
pub mod extra_columns {
    pub const MONTH: &str = "Mes";
    pub const YEAR: &str = "Año";
    pub const TENANT_ID: &str = "ID inquilino";
    pub const NAME: &str = "Concepto";
    pub const AMOUNT: &str = "Importe";
    pub const APPLIES_VAT: &str = "Con IVA";
}

fn column<'a>(
    headers: &[String],
    row: &'a [String],
    name: &str,
    sheet: &str,
) -> Result<&'a str, FacturaError> {
    let idx = headers.iter().position(|h| h == name).ok_or_else(|| {
        FacturaError::StorageUnavailable(format!("sheet \"{sheet}\" is missing column \"{name}\""))
    })?;

    row.get(idx).map(String::as_str).ok_or_else(|| {
        FacturaError::StorageUnavailable(format!("row in \"{sheet}\" is shorter than its headers"))
    })
}

/// Map one tenant sheet row to a [`Tenant`].
pub fn map_tenant_row(headers: &[String], row: &[String]) -> Result<Tenant, FacturaError> {
    const SHEET: &str = "Inquilinos";

    let id: u32 = column(headers, row, tenant_columns::ID, SHEET)?
        .trim()
        .parse()
        .map_err(|_| FacturaError::StorageUnavailable(format!("non-numeric tenant id in {SHEET}")))?;

    Ok(Tenant {
        id,
        short_name: column(headers, row, tenant_columns::SHORT_NAME, SHEET)?.to_string(),
        fiscal_name: column(headers, row, tenant_columns::FISCAL_NAME, SHEET)?.to_string(),
        tax_id: column(headers, row, tenant_columns::TAX_ID, SHEET)?.to_string(),
        address: column(headers, row, tenant_columns::ADDRESS, SHEET)?.to_string(),
        base_concept: column(headers, row, tenant_columns::BASE_CONCEPT, SHEET)?.to_string(),
        base_amount: parse_euro_amount(column(headers, row, tenant_columns::BASE_AMOUNT, SHEET)?)?,
    })
}

/// One row of the extras sheet, scoped to a tenant and period.
#[derive(Debug, Clone)]
pub struct ExtraConceptRow {
    pub month: u32,
    pub year: i32,
    pub tenant_id: u32,
    pub concept: Concept,
}

impl ExtraConceptRow {
    pub fn matches(&self, tenant_id: u32, month: u32, year: i32) -> bool {
        self.tenant_id == tenant_id && self.month == month && self.year == year
    }
}

/// Map one extras sheet row. The applies-VAT cell holds `"Sí"`/`"No"`.
pub fn map_extra_concept_row(
    headers: &[String],
    row: &[String],
) -> Result<ExtraConceptRow, FacturaError> {
    const SHEET: &str = "Conceptos extra";

    let month = parse_month(column(headers, row, extra_columns::MONTH, SHEET)?)?;
    let year = parse_year(column(headers, row, extra_columns::YEAR, SHEET)?)?;
    let tenant_id: u32 = column(headers, row, extra_columns::TENANT_ID, SHEET)?
        .trim()
        .parse()
        .map_err(|_| {
            FacturaError::StorageUnavailable(format!("non-numeric tenant id in {SHEET}"))
        })?;

    let name = column(headers, row, extra_columns::NAME, SHEET)?.to_string();
    let amount = parse_euro_amount(column(headers, row, extra_columns::AMOUNT, SHEET)?)?;
    let applies_vat = column(headers, row, extra_columns::APPLIES_VAT, SHEET)?.trim() == "Sí";

    Ok(ExtraConceptRow {
        month,
        year,
        tenant_id,
        concept: Concept::extra(name, amount, applies_vat),
    })
}

/// Validate the three raw panel cells into a [`PanelSelection`].
///
/// The tenant reference must match `"<digits> - <name>"`; the month is
/// a number or a Spanish month name; the year must be ≥ 2000.
pub fn map_panel_selection(
    tenant_ref: &str,
    month: &str,
    year: &str,
) -> Result<PanelSelection, FacturaError> {
    if tenant_ref.trim().is_empty() {
        return Err(FacturaError::InvalidSelection("no tenant selected".into()));
    }
    if month.trim().is_empty() {
        return Err(FacturaError::InvalidSelection("no month selected".into()));
    }
    if year.trim().is_empty() {
        return Err(FacturaError::InvalidSelection("no year selected".into()));
    }

    Ok(PanelSelection {
        tenant_id: extract_tenant_id(tenant_ref)?,
        month: parse_month(month)?,
        year: parse_year(year)?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn tenant_headers() -> Vec<String> {
        strings(&[
            "ID",
            "Nombre corto",
            "Nombre fiscal",
            "NIF",
            "Dirección",
            "Concepto base",
            "Base (€)",
        ])
    }

    #[test]
    fn maps_tenant_row_by_header_name() {
        let row = strings(&[
            "1",
            "Sánchez_Macías",
            "Sánchez Macías S.L.",
            "B12345678",
            "Calle Mayor 1, Madrid",
            "Alquiler local comercial",
            "1.200,00 €",
        ]);

        let tenant = map_tenant_row(&tenant_headers(), &row).unwrap();
        assert_eq!(tenant.id, 1);
        assert_eq!(tenant.short_name, "Sánchez_Macías");
        assert_eq!(tenant.base_amount, dec!(1200.00));
    }

    #[test]
    fn tolerates_reordered_columns() {
        let headers = strings(&[
            "Nombre corto",
            "ID",
            "Base (€)",
            "Nombre fiscal",
            "NIF",
            "Dirección",
            "Concepto base",
        ]);
        let row = strings(&["Pérez", "2", "950", "Pérez S.A.", "A1", "Calle 2", "Alquiler"]);

        let tenant = map_tenant_row(&headers, &row).unwrap();
        assert_eq!(tenant.id, 2);
        assert_eq!(tenant.base_amount, dec!(950));
    }

    #[test]
    fn missing_column_is_storage_error() {
        let headers = strings(&["ID", "Nombre corto"]);
        let row = strings(&["1", "Sánchez_Macías"]);

        assert!(matches!(
            map_tenant_row(&headers, &row),
            Err(FacturaError::StorageUnavailable(_))
        ));
    }

    #[test]
    fn maps_extra_concept_row() {
        let headers = strings(&["Mes", "Año", "ID inquilino", "Concepto", "Importe", "Con IVA"]);
        let row = strings(&["Marzo", "2026", "1", "Plaza de garaje", "75,50", "Sí"]);

        let extra = map_extra_concept_row(&headers, &row).unwrap();
        assert!(extra.matches(1, 3, 2026));
        assert!(!extra.matches(1, 4, 2026));
        assert_eq!(extra.concept.amount, dec!(75.50));
        assert!(extra.concept.applies_vat);
        assert!(!extra.concept.applies_withholding);
    }

    #[test]
    fn panel_selection_is_validated() {
        let selection = map_panel_selection("001 - Sánchez_Macías", "Marzo", "2026").unwrap();
        assert_eq!(selection.tenant_id, 1);
        assert_eq!(selection.month, 3);
        assert_eq!(selection.year, 2026);

        assert!(map_panel_selection("", "3", "2026").is_err());
        assert!(map_panel_selection("001 - X", "", "2026").is_err());
        assert!(map_panel_selection("001 - X", "3", "1999").is_err());
        assert!(map_panel_selection("Sánchez", "3", "2026").is_err());
    }
}
