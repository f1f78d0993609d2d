use crate::tax::slab::{SlabTable, TaxSlab};
use rust_decimal::Decimal;
use serde::Serialize;

/// Tax charged within a single slab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdownEntry {
    /// Slab description, e.g. "₹4.00 to ₹8.00 lacs (5%)"
    pub label: String,
    #[serde(skip)]
    pub slab: TaxSlab,
    /// Portion of income that fell inside the slab
    pub taxable: Decimal,
    pub tax: Decimal,
}

/// Result of running an income through a slab table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TaxCalculation {
    pub breakdown: Vec<TaxBreakdownEntry>,
    pub total_tax: Decimal,
}

impl TaxCalculation {
    pub fn is_nil(&self) -> bool {
        self.total_tax.is_zero()
    }
}

/// Calculate progressive tax on `income`.
///
/// Income at or below `exemption_threshold` owes nothing and the slabs are not
/// consulted. Above it the whole income is taxed slab by slab, with only the
/// slabs that charge a positive amount appearing in the breakdown.
pub fn compute(income: Decimal, slabs: &SlabTable, exemption_threshold: Decimal) -> TaxCalculation {
    if income <= exemption_threshold {
        log::debug!(
            "Income {} within exemption threshold {}, no tax",
            income,
            exemption_threshold
        );
        return TaxCalculation::default();
    }

    let mut remaining = income;
    let mut total_tax = Decimal::ZERO;
    let mut breakdown = Vec::new();

    for slab in slabs {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable = match slab.width() {
            Some(width) => remaining.min(width),
            None => remaining,
        };
        let tax = taxable * slab.rate;

        log::debug!(
            "Slab {}: taxable {}, tax {}",
            slab.label(),
            taxable,
            tax
        );

        if tax > Decimal::ZERO {
            breakdown.push(TaxBreakdownEntry {
                label: slab.label(),
                slab: *slab,
                taxable,
                tax,
            });
        }

        total_tax += tax;
        remaining -= taxable;
    }

    TaxCalculation {
        breakdown,
        total_tax,
    }
}
