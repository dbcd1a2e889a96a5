//! Core business logic abstractions

pub mod allocation;
pub mod config;
pub mod error;
pub mod log;
pub mod price;
pub mod rates;
pub mod returns;

// Re-export main types for cleaner imports
pub use allocation::{AllocationInput, AllocationSlice, AssetClass, summarize_allocation};
pub use error::{CalculationError, DataUnavailable};
pub use price::{
    GoldPriceProvider, GoldQuote, IndexBar, IndexHistoryProvider, IndexSeries, SpotPrice,
};
pub use rates::{DepositRateProvider, RateTable, StaticRateProvider};
pub use returns::{
    CalculationResult, InvestmentBasis, calculate_returns, calculate_returns_with_basis,
};
