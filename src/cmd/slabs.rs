//! Slabs command - print the configured regimes

use super::RegimeArgs;
use crate::income::format_inr;
use crate::tax::{Regime, TaxSlab};
use clap::Args;
use std::io::{self, Write};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct SlabsCommand {
    #[command(flatten)]
    regimes: RegimeArgs,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

impl SlabsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let regimes = self.regimes.load()?;
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&regimes)?)?;
        } else {
            write_tables(&regimes, &mut out)?;
        }
        Ok(())
    }
}

#[derive(Debug, Tabled)]
struct SlabRow {
    #[tabled(rename = "From")]
    from: String,
    #[tabled(rename = "To")]
    to: String,
    #[tabled(rename = "Rate")]
    rate: String,
}

impl From<&TaxSlab> for SlabRow {
    fn from(slab: &TaxSlab) -> Self {
        SlabRow {
            from: format_inr(slab.min),
            to: slab.max.map_or("-".to_string(), format_inr),
            rate: format!("{}%", slab.rate_pct()),
        }
    }
}

pub fn write_tables<W: Write>(regimes: &[Regime], out: &mut W) -> io::Result<()> {
    for regime in regimes {
        writeln!(out)?;
        writeln!(
            out,
            "{} Tax Regime (no tax up to {})",
            regime.name,
            format_inr(regime.exemption_threshold)
        )?;
        let table = Table::new(regime.slabs.slabs().iter().map(SlabRow::from))
            .with(Style::rounded())
            .with(Modify::new(Columns::new(..)).with(Alignment::right()))
            .to_string();
        writeln!(out, "{}", table)?;
    }
    writeln!(out)
}
