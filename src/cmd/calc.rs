//! Calc command - tax under every regime for one income, with comparison

use super::RegimeArgs;
use crate::income::{format_inr, parse_income, round_half_up};
use crate::tax::{Assessment, RegimeResult};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io::{self, Write};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct CalcCommand {
    /// Annual income in rupees, e.g. 1500000 or ₹15,00,000
    #[arg(value_parser = parse_income, allow_hyphen_values = true)]
    income: Decimal,

    #[command(flatten)]
    regimes: RegimeArgs,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the breakdowns as CSV
    #[arg(long)]
    csv: bool,
}

impl CalcCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let regimes = self.regimes.load()?;
        let assessment = Assessment::new(self.income, &regimes);
        log::info!(
            "Calculated tax on {} under {} regimes",
            self.income,
            assessment.results.len()
        );

        let stdout = io::stdout();
        let mut out = stdout.lock();
        if self.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&assessment)?)?;
        } else if self.csv {
            write_csv(&assessment, &mut out)?;
        } else {
            write_text(&assessment, &mut out)?;
        }
        Ok(())
    }
}

/// Row for the breakdown table
#[derive(Debug, Clone, Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Income Slab")]
    slab: String,
    #[tabled(rename = "Taxable")]
    taxable: String,
    #[tabled(rename = "Tax Amount")]
    tax: String,
}

#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    regime: &'a str,
    slab: &'a str,
    rate_pct: Decimal,
    taxable: String,
    tax: String,
}

fn breakdown_rows(result: &RegimeResult) -> Vec<BreakdownRow> {
    let mut rows: Vec<_> = result
        .calculation
        .breakdown
        .iter()
        .map(|entry| BreakdownRow {
            slab: entry.label.clone(),
            taxable: format_inr(entry.taxable),
            tax: format_inr(entry.tax),
        })
        .collect();
    rows.push(BreakdownRow {
        slab: "Total Tax".to_string(),
        taxable: String::new(),
        tax: format_inr(result.total_tax()),
    });
    rows
}

/// Render the full report: notices, per-regime breakdown, comparison
pub fn write_text<W: Write>(assessment: &Assessment, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Your annual income is {}.", format_inr(assessment.income))?;
    for result in assessment.results.iter().filter(|r| r.exempt) {
        writeln!(
            out,
            "There is no tax applicable under the {} regime for annual income up to {}.",
            result.regime.to_lowercase(),
            format_inr(result.exemption_threshold)
        )?;
    }
    writeln!(out)?;

    if !assessment.has_tax() {
        return Ok(());
    }

    for result in &assessment.results {
        writeln!(out, "{} Tax Regime Breakdown", result.regime)?;
        if result.calculation.is_nil() {
            writeln!(out, "No tax applicable under this regime.")?;
        } else {
            let table = Table::new(breakdown_rows(result))
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
                .to_string();
            writeln!(out, "{}", table)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Tax Regime Comparison")?;
    for result in &assessment.results {
        writeln!(
            out,
            "  {} Regime Tax: {} (marginal rate {}%)",
            result.regime,
            format_inr(result.total_tax()),
            (result.marginal_rate * dec!(100)).normalize()
        )?;
    }
    match &assessment.comparison.cheapest {
        Some(name) => writeln!(
            out,
            "  Tax Savings with {} Regime: {}",
            name,
            format_inr(assessment.comparison.savings)
        )?,
        None => writeln!(out, "  Both regimes yield the same tax.")?,
    }
    writeln!(out)
}

pub fn write_csv<W: Write>(assessment: &Assessment, out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for result in &assessment.results {
        for entry in &result.calculation.breakdown {
            wtr.serialize(CsvRecord {
                regime: &result.regime,
                slab: &entry.label,
                rate_pct: entry.slab.rate_pct(),
                taxable: format!("{:.2}", round_half_up(entry.taxable)),
                tax: format!("{:.2}", round_half_up(entry.tax)),
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::Regime;

    fn render(income: Decimal) -> String {
        let assessment = Assessment::new(income, &Regime::defaults());
        let mut buf = Vec::new();
        write_text(&assessment, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn text_report_for_taxable_income() {
        let text = render(dec!(1500000));
        assert!(text.contains("Your annual income is ₹15,00,000.00."));
        assert!(text.contains("New Tax Regime Breakdown"));
        assert!(text.contains("Old Tax Regime Breakdown"));
        assert!(text.contains("₹10.00 to above lacs (30%)"));
        assert!(text.contains("New Regime Tax: ₹1,05,000.00"));
        assert!(text.contains("Old Regime Tax: ₹2,62,500.00 (marginal rate 30%)"));
        assert!(text.contains("Tax Savings with New Regime: ₹1,57,500.00"));
    }

    #[test]
    fn text_report_notes_exempt_regime() {
        let text = render(dec!(1000000));
        assert!(text.contains(
            "There is no tax applicable under the new regime for annual income up to ₹12,00,000.00."
        ));
        assert!(!text.contains("under the old regime"));
        assert!(text.contains("No tax applicable under this regime."));
    }

    #[test]
    fn text_report_without_tax_skips_comparison() {
        let text = render(dec!(600000));
        assert!(text.contains("under the new regime"));
        assert!(text.contains("under the old regime"));
        assert!(!text.contains("Tax Regime Comparison"));
    }

    #[test]
    fn csv_lists_every_taxed_slab() {
        let assessment = Assessment::new(dec!(1300000), &Regime::defaults());
        let mut buf = Vec::new();
        write_csv(&assessment, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "regime,slab,rate_pct,taxable,tax");
        // three new regime slabs plus three old regime slabs
        assert_eq!(lines.len(), 7);
        assert!(lines.contains(&"New,₹12.00 to ₹16.00 lacs (15%),15,100000.00,15000.00"));
    }

    #[test]
    fn csv_rounds_paise() {
        // 20% of 2,00,000.13 is 40,000.026
        let assessment = Assessment::new(dec!(700000.13), &[Regime::old_regime()]);
        let mut buf = Vec::new();
        write_csv(&assessment, &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.contains("Old,₹5.00 to ₹10.00 lacs (20%),20,200000.13,40000.03"));
    }
}
