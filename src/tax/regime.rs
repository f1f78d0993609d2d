use crate::tax::calculator::{self, TaxCalculation};
use crate::tax::slab::{ConfigurationError, SlabTable, TaxSlab};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named slab table together with its zero-tax threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Regime {
    /// Display name, e.g. "New"
    pub name: String,
    /// Income at or below this amount owes no tax
    #[schemars(with = "f64")]
    pub exemption_threshold: Decimal,
    pub slabs: SlabTable,
}

impl Regime {
    pub fn new(
        name: impl Into<String>,
        exemption_threshold: Decimal,
        slabs: SlabTable,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if exemption_threshold < Decimal::ZERO {
            return Err(ConfigurationError::NegativeThreshold {
                name,
                threshold: exemption_threshold,
            });
        }
        Ok(Regime {
            name,
            exemption_threshold,
            slabs,
        })
    }

    /// New regime, no tax up to ₹12,00,000
    pub fn new_regime() -> Self {
        Regime {
            name: "New".to_string(),
            exemption_threshold: dec!(1200000),
            slabs: builtin_table(vec![
                TaxSlab::bounded(dec!(0), dec!(400000), dec!(0)),
                TaxSlab::bounded(dec!(400000), dec!(800000), dec!(0.05)),
                TaxSlab::bounded(dec!(800000), dec!(1200000), dec!(0.10)),
                TaxSlab::bounded(dec!(1200000), dec!(1600000), dec!(0.15)),
                TaxSlab::bounded(dec!(1600000), dec!(2000000), dec!(0.20)),
                TaxSlab::bounded(dec!(2000000), dec!(2400000), dec!(0.25)),
                TaxSlab::unbounded(dec!(2400000), dec!(0.30)),
            ]),
        }
    }

    /// Old regime, no tax up to ₹7,00,000
    pub fn old_regime() -> Self {
        Regime {
            name: "Old".to_string(),
            exemption_threshold: dec!(700000),
            slabs: builtin_table(vec![
                TaxSlab::bounded(dec!(0), dec!(250000), dec!(0)),
                TaxSlab::bounded(dec!(250000), dec!(500000), dec!(0.05)),
                TaxSlab::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
                TaxSlab::unbounded(dec!(1000000), dec!(0.30)),
            ]),
        }
    }

    pub fn defaults() -> Vec<Regime> {
        vec![Regime::new_regime(), Regime::old_regime()]
    }

    pub fn compute(&self, income: Decimal) -> TaxCalculation {
        calculator::compute(income, &self.slabs, self.exemption_threshold)
    }

    pub fn is_exempt(&self, income: Decimal) -> bool {
        income <= self.exemption_threshold
    }

    /// Rate applied to the next rupee earned, zero while exempt
    pub fn marginal_rate(&self, income: Decimal) -> Decimal {
        if self.is_exempt(income) {
            return Decimal::ZERO;
        }
        self.slabs.slab_for(income).map_or(Decimal::ZERO, |s| s.rate)
    }
}

fn builtin_table(slabs: Vec<TaxSlab>) -> SlabTable {
    match SlabTable::new(slabs) {
        Ok(table) => table,
        Err(e) => unreachable!("built-in slab table is malformed: {e}"),
    }
}

/// Calculation of one income under one regime
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeResult {
    pub regime: String,
    pub exemption_threshold: Decimal,
    pub exempt: bool,
    /// Rate of the slab the income falls in
    pub marginal_rate: Decimal,
    #[serde(flatten)]
    pub calculation: TaxCalculation,
}

impl RegimeResult {
    pub fn new(regime: &Regime, income: Decimal) -> Self {
        RegimeResult {
            regime: regime.name.clone(),
            exemption_threshold: regime.exemption_threshold,
            exempt: regime.is_exempt(income),
            marginal_rate: regime.marginal_rate(income),
            calculation: regime.compute(income),
        }
    }

    pub fn total_tax(&self) -> Decimal {
        self.calculation.total_tax
    }
}

/// Which regime is cheaper and by how much
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegimeComparison {
    /// Cheapest regime, `None` when the lowest total is shared
    pub cheapest: Option<String>,
    /// Gap between the cheapest and the next cheapest total
    pub savings: Decimal,
}

impl RegimeComparison {
    pub fn new(results: &[RegimeResult]) -> Self {
        let mut totals: Vec<_> = results.iter().map(|r| (r.total_tax(), &r.regime)).collect();
        totals.sort_by(|a, b| a.0.cmp(&b.0));

        match totals.as_slice() {
            [] => RegimeComparison {
                cheapest: None,
                savings: Decimal::ZERO,
            },
            [(_, only)] => RegimeComparison {
                cheapest: Some((*only).clone()),
                savings: Decimal::ZERO,
            },
            [(lowest, name), (next, _), ..] => RegimeComparison {
                cheapest: (lowest < next).then(|| (*name).clone()),
                savings: *next - *lowest,
            },
        }
    }
}

/// Every regime's result for one income, plus the comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub income: Decimal,
    pub results: Vec<RegimeResult>,
    pub comparison: RegimeComparison,
}

impl Assessment {
    pub fn new(income: Decimal, regimes: &[Regime]) -> Self {
        let results: Vec<_> = regimes.iter().map(|r| RegimeResult::new(r, income)).collect();
        let comparison = RegimeComparison::new(&results);
        Assessment {
            income,
            results,
            comparison,
        }
    }

    /// Whether any regime charges tax, otherwise there is nothing to compare
    pub fn has_tax(&self) -> bool {
        self.results.iter().any(|r| !r.calculation.is_nil())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_threshold_rejected() {
        let slabs = Regime::old_regime().slabs;
        assert_eq!(
            Regime::new("Custom", dec!(-1), slabs),
            Err(ConfigurationError::NegativeThreshold {
                name: "Custom".to_string(),
                threshold: dec!(-1),
            })
        );
    }

    #[test]
    fn exemption_notices() {
        let new = Regime::new_regime();
        let old = Regime::old_regime();
        assert!(new.is_exempt(dec!(1200000)));
        assert!(!new.is_exempt(dec!(1200000.01)));
        assert!(old.is_exempt(dec!(700000)));
        assert!(!old.is_exempt(dec!(900000)));
    }

    #[test]
    fn marginal_rates() {
        let new = Regime::new_regime();
        assert_eq!(new.marginal_rate(dec!(1000000)), dec!(0));
        assert_eq!(new.marginal_rate(dec!(1300000)), dec!(0.15));
        assert_eq!(new.marginal_rate(dec!(2400000)), dec!(0.30));
        assert_eq!(Regime::old_regime().marginal_rate(dec!(800000)), dec!(0.20));
    }

    #[test]
    fn new_regime_saves_at_fifteen_lakh() {
        let assessment = Assessment::new(dec!(1500000), &Regime::defaults());
        assert!(assessment.has_tax());
        // new: 20k + 40k + 45k
        assert_eq!(assessment.results[0].total_tax(), dec!(105000));
        assert_eq!(assessment.results[1].total_tax(), dec!(262500));
        assert_eq!(assessment.comparison.cheapest.as_deref(), Some("New"));
        assert_eq!(assessment.comparison.savings, dec!(157500));
    }

    #[test]
    fn only_old_regime_taxes_between_thresholds() {
        let assessment = Assessment::new(dec!(1000000), &Regime::defaults());
        assert!(assessment.results[0].exempt);
        assert!(!assessment.results[1].exempt);
        assert_eq!(assessment.comparison.cheapest.as_deref(), Some("New"));
        assert_eq!(assessment.comparison.savings, dec!(112500));
    }

    #[test]
    fn nothing_to_compare_below_both_thresholds() {
        let assessment = Assessment::new(dec!(500000), &Regime::defaults());
        assert!(!assessment.has_tax());
        assert_eq!(assessment.comparison.cheapest, None);
        assert_eq!(assessment.comparison.savings, dec!(0));
    }

    #[test]
    fn tie_has_no_cheapest() {
        let mut twin = Regime::old_regime();
        twin.name = "Twin".to_string();
        let assessment = Assessment::new(dec!(2000000), &[Regime::old_regime(), twin]);
        assert_eq!(assessment.comparison.cheapest, None);
        assert_eq!(assessment.comparison.savings, dec!(0));
    }

    #[test]
    fn savings_against_next_cheapest() {
        let mut flat = Regime::old_regime();
        flat.name = "Flat".to_string();
        flat.exemption_threshold = dec!(0);
        flat.slabs = SlabTable::new(vec![TaxSlab::unbounded(dec!(0), dec!(0.5))]).unwrap();

        let regimes = vec![Regime::new_regime(), Regime::old_regime(), flat];
        let assessment = Assessment::new(dec!(1500000), &regimes);
        assert_eq!(assessment.comparison.cheapest.as_deref(), Some("New"));
        assert_eq!(assessment.comparison.savings, dec!(157500));
    }
}
