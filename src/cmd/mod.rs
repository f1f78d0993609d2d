pub mod calc;
pub mod interactive;
pub mod schema;
pub mod slabs;

use crate::config;
use crate::tax::Regime;
use clap::Args;
use std::path::PathBuf;

/// Regime selection shared by the calculating commands
#[derive(Args, Debug, Clone)]
pub struct RegimeArgs {
    /// JSON file with custom regimes (defaults to the built-in new and old regimes)
    #[arg(short, long)]
    regimes: Option<PathBuf>,
}

impl RegimeArgs {
    pub fn load(&self) -> anyhow::Result<Vec<Regime>> {
        config::load_regimes(self.regimes.as_deref())
    }
}
