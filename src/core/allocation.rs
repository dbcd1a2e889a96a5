use crate::core::error::CalculationError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Gold,
    FixedDeposits,
    EquityIndex,
}

impl AssetClass {
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Gold => "Gold",
            AssetClass::FixedDeposits => "Fixed Deposits",
            AssetClass::EquityIndex => "Equity Index",
        }
    }
}

/// A planned split of money across the three asset classes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllocationInput {
    pub gold: f64,
    /// Amounts keyed by bank, then tenure label.
    pub fixed_deposits: BTreeMap<String, BTreeMap<String, f64>>,
    pub index: f64,
}

impl AllocationInput {
    pub fn new(gold: f64, index: f64) -> Self {
        AllocationInput {
            gold,
            fixed_deposits: BTreeMap::new(),
            index,
        }
    }

    /// Adds to any amount already planned for the same bank and tenure.
    pub fn with_deposit(mut self, bank: &str, tenure: &str, amount: f64) -> Self {
        *self
            .fixed_deposits
            .entry(bank.to_string())
            .or_default()
            .entry(tenure.to_string())
            .or_default() += amount;
        self
    }

    pub fn deposit(&self, bank: &str, tenure: &str) -> Option<f64> {
        self.fixed_deposits
            .get(bank)
            .and_then(|tenures| tenures.get(tenure))
            .copied()
    }

    pub fn fixed_deposit_total(&self) -> f64 {
        self.fixed_deposits
            .values()
            .flat_map(|tenures| tenures.values())
            .sum()
    }

    pub fn validate(&self) -> Result<(), CalculationError> {
        check_amount("gold", self.gold)?;
        check_amount("index", self.index)?;
        for (bank, tenures) in &self.fixed_deposits {
            for (tenure, amount) in tenures {
                check_amount(&format!("{bank} {tenure}"), *amount)?;
            }
        }
        Ok(())
    }
}

fn check_amount(leg: &str, amount: f64) -> Result<(), CalculationError> {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(CalculationError::InvalidAmount {
            leg: leg.to_string(),
            amount,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationSlice {
    pub asset_class: AssetClass,
    pub amount: f64,
}

impl AllocationSlice {
    pub fn label(&self) -> &'static str {
        self.asset_class.label()
    }
}

/// Category totals in chart order: gold, fixed deposits, equity index.
pub fn summarize_allocation(allocation: &AllocationInput) -> Vec<AllocationSlice> {
    vec![
        AllocationSlice {
            asset_class: AssetClass::Gold,
            amount: allocation.gold,
        },
        AllocationSlice {
            asset_class: AssetClass::FixedDeposits,
            amount: allocation.fixed_deposit_total(),
        },
        AllocationSlice {
            asset_class: AssetClass::EquityIndex,
            amount: allocation.index,
        },
    ]
}
