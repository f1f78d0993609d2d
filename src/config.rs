//! Regime definitions loaded from JSON

use crate::tax::{ConfigurationError, Regime};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Input root for a regime file
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RegimeFile {
    /// Regimes to calculate and compare, in display order
    pub regimes: Vec<Regime>,
}

impl RegimeFile {
    pub fn validate(self) -> Result<Vec<Regime>, ConfigurationError> {
        if self.regimes.is_empty() {
            return Err(ConfigurationError::NoRegimes);
        }

        let mut names = HashSet::new();
        let mut regimes = Vec::with_capacity(self.regimes.len());
        for regime in self.regimes {
            if !names.insert(regime.name.to_lowercase()) {
                return Err(ConfigurationError::DuplicateRegime(regime.name));
            }
            // Route through the constructor so file input gets the same checks
            regimes.push(Regime::new(
                regime.name,
                regime.exemption_threshold,
                regime.slabs,
            )?);
        }
        Ok(regimes)
    }
}

pub fn read_regimes_json<R: Read>(reader: R) -> anyhow::Result<Vec<Regime>> {
    let file: RegimeFile = serde_json::from_reader(reader)?;
    Ok(file.validate()?)
}

/// Load regimes from `path`, or the built-in new/old regimes when absent
pub fn load_regimes(path: Option<&Path>) -> anyhow::Result<Vec<Regime>> {
    let Some(path) = path else {
        log::debug!("Using built-in regimes");
        return Ok(Regime::defaults());
    };

    let file = File::open(path)
        .with_context(|| format!("Failed to open regime file {}", path.display()))?;
    let regimes = read_regimes_json(BufReader::new(file))
        .with_context(|| format!("Invalid regime file {}", path.display()))?;
    log::info!("Loaded {} regimes from {}", regimes.len(), path.display());
    Ok(regimes)
}
