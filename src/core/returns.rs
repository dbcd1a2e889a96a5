//! Flat growth projections for a planned allocation.
//!
//! Growth is applied once per leg with no notion of holding period: 5% on
//! gold, the quoted annual rate on each fixed deposit and 10% on the equity
//! index. Fetched index history does not influence the index leg.

use crate::core::allocation::AllocationInput;
use crate::core::error::CalculationError;
use crate::core::price::SpotPrice;
use crate::core::rates::RateTable;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

pub const GOLD_GROWTH: f64 = 1.05;
pub const INDEX_GROWTH: f64 = 1.10;

/// Which amounts make up the reported total investment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentBasis {
    /// Gold and index principal plus the already grown deposit value.
    #[default]
    GrownDeposits,
    /// Principal of every leg.
    Principal,
}

impl Display for InvestmentBasis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InvestmentBasis::GrownDeposits => "grown-deposits",
                InvestmentBasis::Principal => "principal",
            }
        )
    }
}

impl FromStr for InvestmentBasis {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grown-deposits" => Ok(InvestmentBasis::GrownDeposits),
            "principal" => Ok(InvestmentBasis::Principal),
            _ => Err(anyhow::anyhow!("Invalid investment basis: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepositLeg {
    pub bank: String,
    pub tenure: String,
    pub principal: f64,
    pub rate_percent: f64,
    pub grown: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationResult {
    /// Ounces of gold the allocation buys at spot, when representable.
    pub gold_units: Option<f64>,
    pub gold_grown: f64,
    pub deposit_legs: Vec<DepositLeg>,
    pub fd_grown: f64,
    pub index_grown: f64,
    pub basis: InvestmentBasis,
    pub total_investment: f64,
    pub total_return: f64,
}

/// Projects returns using the reported (grown deposit) investment basis.
pub fn calculate_returns(
    allocation: &AllocationInput,
    rates: &RateTable,
    spot: &SpotPrice,
) -> Result<CalculationResult, CalculationError> {
    calculate_returns_with_basis(allocation, rates, spot, InvestmentBasis::default())
}

pub fn calculate_returns_with_basis(
    allocation: &AllocationInput,
    rates: &RateTable,
    spot: &SpotPrice,
    basis: InvestmentBasis,
) -> Result<CalculationResult, CalculationError> {
    let Some(price) = spot.value().filter(|p| p.is_finite() && *p > 0.0) else {
        return Err(CalculationError::PriceUnavailable);
    };
    allocation.validate()?;

    // Units are informational; growth is flat on the amount whatever the price.
    let gold_units = Some(allocation.gold / price).filter(|units| units.is_finite());
    let gold_grown = allocation.gold * GOLD_GROWTH;

    // Deposits the rate table does not quote are left out.
    let mut deposit_legs = Vec::new();
    for (bank, tenures) in rates.banks() {
        for (tenure, rate_percent) in tenures {
            if let Some(principal) = allocation.deposit(bank, tenure) {
                deposit_legs.push(DepositLeg {
                    bank: bank.clone(),
                    tenure: tenure.clone(),
                    principal,
                    rate_percent: *rate_percent,
                    grown: principal * (1.0 + rate_percent / 100.0),
                });
            }
        }
    }
    let fd_grown: f64 = deposit_legs.iter().map(|leg| leg.grown).sum();

    let index_grown = allocation.index * INDEX_GROWTH;

    let total_investment = match basis {
        InvestmentBasis::GrownDeposits => allocation.gold + fd_grown + allocation.index,
        InvestmentBasis::Principal => {
            let fd_principal: f64 = deposit_legs.iter().map(|leg| leg.principal).sum();
            allocation.gold + fd_principal + allocation.index
        }
    };
    let total_return = gold_grown + fd_grown + index_grown;

    debug!(
        gold_grown,
        fd_grown, index_grown, total_investment, total_return, %basis,
        "Calculated returns"
    );

    Ok(CalculationResult {
        gold_units,
        gold_grown,
        deposit_legs,
        fd_grown,
        index_grown,
        basis,
        total_investment,
        total_return,
    })
}
