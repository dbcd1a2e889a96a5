//! Fixed deposit rate tables

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annual percentage rates keyed by bank, then tenure label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<String, BTreeMap<String, f64>>);

impl RateTable {
    pub fn new() -> Self {
        RateTable(BTreeMap::new())
    }

    pub fn with_rate(mut self, bank: &str, tenure: &str, rate_percent: f64) -> Self {
        self.0
            .entry(bank.to_string())
            .or_default()
            .insert(tenure.to_string(), rate_percent);
        self
    }

    pub fn rate(&self, bank: &str, tenure: &str) -> Option<f64> {
        self.0.get(bank).and_then(|tenures| tenures.get(tenure)).copied()
    }

    pub fn banks(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, f64>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every rate must be a finite, strictly positive percentage.
    pub fn validate(&self) -> Result<()> {
        for (bank, tenures) in &self.0 {
            for (tenure, rate) in tenures {
                if !rate.is_finite() || *rate <= 0.0 {
                    bail!("Invalid FD rate {rate} for {bank} {tenure}: rates must be positive");
                }
            }
        }
        Ok(())
    }
}

impl Default for RateTable {
    /// SBI at 7.5% for one, two and three year tenures.
    fn default() -> Self {
        RateTable::new()
            .with_rate("SBI", "1 Year", 7.5)
            .with_rate("SBI", "2 Years", 7.5)
            .with_rate("SBI", "3 Years", 7.5)
    }
}

pub trait DepositRateProvider: Send + Sync {
    fn fetch_rates(&self) -> RateTable;
}

/// Serves a fixed table; performs no I/O and never fails.
pub struct StaticRateProvider {
    table: RateTable,
}

impl StaticRateProvider {
    pub fn new(table: RateTable) -> Self {
        StaticRateProvider { table }
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::new(RateTable::default())
    }
}

impl DepositRateProvider for StaticRateProvider {
    fn fetch_rates(&self) -> RateTable {
        self.table.clone()
    }
}
