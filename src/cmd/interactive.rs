//! Interactive command - repeated calculations from stdin

use super::calc::write_text;
use super::RegimeArgs;
use crate::income::{format_inr, parse_income};
use crate::tax::{Assessment, Regime};
use clap::Args;
use std::io::{self, BufRead, Write};

#[derive(Args, Debug)]
pub struct InteractiveCommand {
    #[command(flatten)]
    regimes: RegimeArgs,
}

impl InteractiveCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let regimes = self.regimes.load()?;
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut session = Session::new(regimes);
        session.run(stdin.lock(), stdout.lock())?;
        if let Some(last) = session.last() {
            log::info!("Session ended, last income {}", last.income);
        }
        Ok(())
    }
}

/// Calculator session. Holds the regimes and the most recent successful
/// assessment; an invalid entry leaves the previous assessment in place.
#[derive(Debug)]
pub struct Session {
    regimes: Vec<Regime>,
    last: Option<Assessment>,
}

impl Session {
    pub fn new(regimes: Vec<Regime>) -> Self {
        Session {
            regimes,
            last: None,
        }
    }

    pub fn last(&self) -> Option<&Assessment> {
        self.last.as_ref()
    }

    /// Handle a single line of input, returning `false` when the session should end
    pub fn submit<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return Ok(false);
        }
        if line.is_empty() {
            return Ok(true);
        }

        match parse_income(line) {
            Ok(income) => {
                let assessment = Assessment::new(income, &self.regimes);
                write_text(&assessment, out)?;
                self.last = Some(assessment);
            }
            Err(e) => {
                log::warn!("{}", e);
                writeln!(out, "Please enter a valid income amount")?;
                if let Some(last) = &self.last {
                    writeln!(out, "(showing results for {})", format_inr(last.income))?;
                }
            }
        }
        Ok(true)
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> io::Result<()> {
        write!(out, "Annual income (₹): ")?;
        out.flush()?;
        for line in input.lines() {
            if !self.submit(&line?, &mut out)? {
                break;
            }
            write!(out, "Annual income (₹): ")?;
            out.flush()?;
        }
        writeln!(out)
    }
}
