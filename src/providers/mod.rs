pub mod goldapi;
pub mod util;
pub mod yahoo_finance;
