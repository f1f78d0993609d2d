use crate::income::round_half_up;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("slab table is empty")]
    EmptySlabTable,
    #[error("first slab must start at 0, found {0}")]
    FirstSlabNotZero(Decimal),
    #[error("slab {index} starts at {min} but the previous slab ends at {expected}")]
    NonContiguousSlab {
        index: usize,
        min: Decimal,
        expected: Decimal,
    },
    #[error("slab {index} has upper bound {max} not above its lower bound {min}")]
    EmptySlabRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },
    #[error("slab {index} is unbounded but is not the last slab")]
    UnboundedSlabNotLast { index: usize },
    #[error("last slab must be unbounded, found upper bound {0}")]
    LastSlabBounded(Decimal),
    #[error("slab {index} has rate {rate} outside 0..=1")]
    InvalidRate { index: usize, rate: Decimal },
    #[error("regime '{name}' has negative exemption threshold {threshold}")]
    NegativeThreshold { name: String, threshold: Decimal },
    #[error("no regimes configured")]
    NoRegimes,
    #[error("duplicate regime name: {0}")]
    DuplicateRegime(String),
}

/// One income bracket taxed at a single marginal rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxSlab {
    /// Inclusive lower bound
    #[schemars(with = "f64")]
    pub min: Decimal,
    /// Exclusive upper bound, omitted (or null) for the top slab
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub max: Option<Decimal>,
    /// Fractional rate, e.g. 0.05 for 5%
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

impl TaxSlab {
    pub const fn bounded(min: Decimal, max: Decimal, rate: Decimal) -> Self {
        TaxSlab {
            min,
            max: Some(max),
            rate,
        }
    }

    pub const fn unbounded(min: Decimal, rate: Decimal) -> Self {
        TaxSlab {
            min,
            max: None,
            rate,
        }
    }

    /// Width of the slab, `None` for the unbounded top slab
    pub fn width(&self) -> Option<Decimal> {
        self.max.map(|max| max - self.min)
    }

    /// Rate expressed as a percentage, e.g. "5" or "12.5"
    pub fn rate_pct(&self) -> Decimal {
        (self.rate * dec!(100)).normalize()
    }

    /// Breakdown label with bounds in lakhs, e.g. "₹4.00 to ₹8.00 lacs (5%)"
    pub fn label(&self) -> String {
        let upper = match self.max {
            Some(max) => format!("₹{:.2}", round_half_up(max / LAKH)),
            None => "above".to_string(),
        };
        format!(
            "₹{:.2} to {} lacs ({}%)",
            round_half_up(self.min / LAKH),
            upper,
            self.rate_pct()
        )
    }
}

/// One lakh (100,000), the unit slab labels are expressed in
pub const LAKH: Decimal = dec!(100000);

/// Ordered slab table partitioning `[0, ∞)`.
///
/// Only constructed through [`SlabTable::new`], so holders can rely on the
/// slabs being contiguous and ascending, starting at zero, with exactly one
/// unbounded slab in last position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct SlabTable(Vec<TaxSlab>);

impl SlabTable {
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, ConfigurationError> {
        let first = slabs.first().ok_or(ConfigurationError::EmptySlabTable)?;
        if !first.min.is_zero() {
            return Err(ConfigurationError::FirstSlabNotZero(first.min));
        }

        let last_index = slabs.len() - 1;
        let mut expected_min = Decimal::ZERO;
        for (index, slab) in slabs.iter().enumerate() {
            if slab.min != expected_min {
                return Err(ConfigurationError::NonContiguousSlab {
                    index,
                    min: slab.min,
                    expected: expected_min,
                });
            }
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return Err(ConfigurationError::InvalidRate {
                    index,
                    rate: slab.rate,
                });
            }
            match slab.max {
                Some(max) if index == last_index => {
                    return Err(ConfigurationError::LastSlabBounded(max));
                }
                Some(max) if max <= slab.min => {
                    return Err(ConfigurationError::EmptySlabRange {
                        index,
                        min: slab.min,
                        max,
                    });
                }
                Some(max) => expected_min = max,
                None if index != last_index => {
                    return Err(ConfigurationError::UnboundedSlabNotLast { index });
                }
                None => {}
            }
        }

        Ok(SlabTable(slabs))
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.0
    }

    /// The slab whose range contains `income`
    pub fn slab_for(&self, income: Decimal) -> Option<&TaxSlab> {
        self.0
            .iter()
            .find(|s| income >= s.min && s.max.is_none_or(|max| income < max))
    }
}

impl<'a> IntoIterator for &'a SlabTable {
    type Item = &'a TaxSlab;
    type IntoIter = std::slice::Iter<'a, TaxSlab>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for SlabTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let slabs = Vec::<TaxSlab>::deserialize(deserializer)?;
        SlabTable::new(slabs).map_err(serde::de::Error::custom)
    }
}
