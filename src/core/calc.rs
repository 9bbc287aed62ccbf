use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FacturaError;
use super::money::round_money;
use super::types::{BillingContext, ConceptTotals, InvoiceTotals};

/// Default tax rates from external configuration.
///
/// Both rates are decimals strictly between 0 and 1 (0.21 means 21 %).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    pub vat: Decimal,
    pub withholding: Decimal,
}

impl TaxRates {
    /// Build a validated rate pair; each rate must lie strictly in (0, 1).
    pub fn new(vat: Decimal, withholding: Decimal) -> Result<Self, FacturaError> {
        for (label, rate) in [("default VAT", vat), ("default withholding", withholding)] {
            if rate <= Decimal::ZERO || rate >= Decimal::ONE {
                return Err(FacturaError::InvalidTaxRate(format!(
                    "{label} rate must be a decimal between 0 and 1, got {rate}"
                )));
            }
        }
        Ok(Self { vat, withholding })
    }
}

/// Resolve the effective rate for one concept: zero when the tax does
/// not apply, otherwise the per-concept override or the default.
fn resolve_rate(
    applies: bool,
    override_rate: Option<Decimal>,
    default_rate: Decimal,
    label: &str,
) -> Result<Decimal, FacturaError> {
    if !applies {
        return Ok(Decimal::ZERO);
    }

    let rate = override_rate.unwrap_or(default_rate);
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(FacturaError::InvalidTaxRate(format!(
            "{label} rate {rate} is outside [0, 1)"
        )));
    }
    Ok(rate)
}

/// Compute per-concept and aggregate base / VAT / withholding / total.
///
/// Each line is rounded independently; the aggregates are sums of the
/// already-rounded line values, rounded again. Summing raw unrounded
/// amounts can disagree with the printed lines by a cent, so the
/// round-then-sum-then-round order is part of the contract.
pub fn calculate_invoice_totals(
    context: &BillingContext,
    rates: &TaxRates,
) -> Result<InvoiceTotals, FacturaError> {
    let mut lines = Vec::with_capacity(context.concepts.len());

    for concept in &context.concepts {
        let vat_rate = resolve_rate(concept.applies_vat, concept.vat_rate, rates.vat, "VAT")?;
        let withholding_rate = resolve_rate(
            concept.applies_withholding,
            concept.withholding_rate,
            rates.withholding,
            "withholding",
        )?;

        let base = round_money(concept.amount);
        let vat = round_money(base * vat_rate);
        let withholding = round_money(base * withholding_rate);
        let total = round_money(base + vat - withholding);

        lines.push(ConceptTotals {
            name: concept.name.clone(),
            base,
            vat,
            withholding,
            total,
        });
    }

    let base = round_money(lines.iter().map(|l| l.base).sum());
    let vat = round_money(lines.iter().map(|l| l.vat).sum());
    let withholding = round_money(lines.iter().map(|l| l.withholding).sum());
    let grand_total = round_money(lines.iter().map(|l| l.total).sum());

    Ok(InvoiceTotals {
        lines,
        base,
        vat,
        withholding,
        grand_total,
    })
}
