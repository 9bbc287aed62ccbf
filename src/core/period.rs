use chrono::NaiveDate;

use super::error::FacturaError;

/// Spanish month names, 1-based display form.
pub const SPANISH_MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Earliest year the panel accepts.
pub const MIN_YEAR: i32 = 2000;

/// Build the "Marzo de 2026" period label. `month` must be 1–12
/// (callers validate via [`parse_month`] / [`parse_year`] first).
pub fn period_label(month: u32, year: i32) -> String {
    format!("{} de {year}", SPANISH_MONTHS[month as usize - 1])
}

/// First day of the billing month, used as the invoice date.
pub fn invoice_date(month: u32, year: i32) -> Result<NaiveDate, FacturaError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| FacturaError::InvalidSelection(format!("invalid period: {month}/{year}")))
}

/// Parse a month from a panel cell: a number ("3") or a Spanish month
/// name, case-insensitive ("marzo", "MARZO").
pub fn parse_month(raw: &str) -> Result<u32, FacturaError> {
    let trimmed = raw.trim();

    if let Ok(n) = trimmed.parse::<u32>() {
        if (1..=12).contains(&n) {
            return Ok(n);
        }
        return Err(FacturaError::InvalidSelection(format!("invalid month: {raw}")));
    }

    let lowered = trimmed.to_lowercase();
    SPANISH_MONTHS
        .iter()
        .position(|m| m.to_lowercase() == lowered)
        .map(|i| i as u32 + 1)
        .ok_or_else(|| FacturaError::InvalidSelection(format!("invalid month: {raw}")))
}

/// Parse and validate the fiscal year (must be ≥ 2000).
pub fn parse_year(raw: &str) -> Result<i32, FacturaError> {
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| FacturaError::InvalidSelection(format!("invalid year: {raw}")))?;

    if year < MIN_YEAR {
        return Err(FacturaError::InvalidSelection(format!("invalid year: {raw}")));
    }
    Ok(year)
}

/// Extract the numeric tenant id from a panel reference such as
/// `"001 - Sánchez_Macías"`. The reference must start with digits
/// followed by a dash.
pub fn extract_tenant_id(raw: &str) -> Result<u32, FacturaError> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    let rest = trimmed[digits.len()..].trim_start();

    if digits.is_empty() || !rest.starts_with('-') {
        return Err(FacturaError::InvalidSelection(format!(
            "tenant reference must look like \"001 - Name\", got \"{raw}\""
        )));
    }

    digits
        .parse()
        .map_err(|_| FacturaError::InvalidSelection(format!("invalid tenant reference: \"{raw}\"")))
}
