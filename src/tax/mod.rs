pub mod calculator;
pub mod regime;
pub mod slab;

pub use regime::{Assessment, Regime, RegimeResult};
pub use slab::{ConfigurationError, TaxSlab};
