pub mod gold;
pub mod index;
pub mod plan;
pub mod rates;
pub mod setup;
pub mod ui;
