use super::{gold, index, rates, ui};
use crate::core::config::AppConfig;
use crate::core::{
    AllocationInput, AllocationSlice, AssetClass, CalculationError, CalculationResult,
    DepositRateProvider, GoldPriceProvider, IndexHistoryProvider, InvestmentBasis, SpotPrice,
    calculate_returns_with_basis, summarize_allocation,
};
use anyhow::Result;
use comfy_table::{Cell, Color};
use tracing::{debug, warn};

const CHART_WIDTH: usize = 30;

/// What the user asked to plan.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub allocation: AllocationInput,
    /// Overrides the configured investment basis.
    pub basis: Option<InvestmentBasis>,
    pub history_rows: usize,
}

/// Percentage of the total held by each slice; all zero when nothing is allocated.
pub fn allocation_shares(slices: &[AllocationSlice]) -> Vec<f64> {
    let total: f64 = slices.iter().map(|s| s.amount).sum();
    slices
        .iter()
        .map(|s| {
            if total > 0.0 {
                s.amount / total * 100.0
            } else {
                0.0
            }
        })
        .collect()
}

fn slice_color(asset_class: AssetClass) -> Color {
    match asset_class {
        AssetClass::Gold => Color::Yellow,
        AssetClass::FixedDeposits => Color::Cyan,
        AssetClass::EquityIndex => Color::DarkGreen,
    }
}

pub fn render_allocation_chart(slices: &[AllocationSlice], currency: &str) -> String {
    let mut output = ui::section("Investment Allocation");
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell("Share"),
        ui::header_cell(""),
    ]);

    for (slice, share) in slices.iter().zip(allocation_shares(slices)) {
        table.add_row(vec![
            Cell::new(slice.label()),
            ui::right_cell(ui::format_currency(slice.amount, currency)),
            ui::right_cell(format!("{share:.1}%")),
            Cell::new(ui::share_bar(share, CHART_WIDTH)).fg(slice_color(slice.asset_class)),
        ]);
    }
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn render_calculation(
    result: &Result<CalculationResult, CalculationError>,
    index_name: &str,
    currency: &str,
) -> String {
    let mut output = ui::section("Projected Returns");
    let result = match result {
        Ok(result) => result,
        Err(e) => {
            output.push_str(&ui::error_line(&format!("{e}")));
            return output;
        }
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Leg"),
        ui::header_cell("Growth"),
        ui::header_cell("Projected"),
    ]);
    table.add_row(vec![
        Cell::new(
            result
                .gold_units
                .map_or("Gold".to_string(), |units| format!("Gold ({units:.4} oz)")),
        ),
        ui::right_cell("5.00%".to_string()),
        ui::right_cell(ui::format_currency(result.gold_grown, currency)),
    ]);
    for leg in &result.deposit_legs {
        table.add_row(vec![
            Cell::new(format!("FD {} {}", leg.bank, leg.tenure)),
            ui::right_cell(format!("{:.2}%", leg.rate_percent)),
            ui::right_cell(ui::format_currency(leg.grown, currency)),
        ]);
    }
    table.add_row(vec![
        Cell::new(index_name),
        ui::right_cell("10.00%".to_string()),
        ui::right_cell(ui::format_currency(result.index_grown, currency)),
    ]);
    output.push_str(&table.to_string());
    output.push_str("\n\n");

    output.push_str(&format!(
        "{} {}\n",
        ui::style_text("Total investment:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_currency(result.total_investment, currency),
            ui::StyleType::TotalValue
        )
    ));
    output.push_str(&format!(
        "{} {}\n",
        ui::style_text("Expected return:", ui::StyleType::TotalLabel),
        ui::style_text(
            &ui::format_currency(result.total_return, currency),
            ui::StyleType::TotalValue
        )
    ));
    output.push_str(&ui::style_text(
        &format!("Investment basis: {}\n", result.basis),
        ui::StyleType::Subtle,
    ));
    output
}

/// Fetches every feed, calculates and renders the full report.
///
/// Feed failures are reported inline; the rest of the report still renders.
pub async fn build_report(
    config: &AppConfig,
    gold_provider: &dyn GoldPriceProvider,
    rate_provider: &dyn DepositRateProvider,
    index_provider: &dyn IndexHistoryProvider,
    request: &PlanRequest,
) -> String {
    let index_name = &config.providers.yahoo.index_name;
    let window_days = config.history_window_days;

    let pb = ui::new_spinner("Fetching market data...");
    let (quote, series) = futures::join!(
        gold_provider.fetch_spot_price(),
        index_provider.fetch_history(window_days)
    );
    let rate_table = rate_provider.fetch_rates();
    pb.finish_and_clear();

    if let Err(e) = &quote {
        warn!(error = %e, "Gold price unavailable");
    }
    if let Err(e) = &series {
        warn!(error = %e, "Index history unavailable");
    }

    let spot = SpotPrice::from_quote(&quote);
    let basis = request.basis.unwrap_or(config.investment_basis);
    let calculation = calculate_returns_with_basis(&request.allocation, &rate_table, &spot, basis);
    debug!(?calculation, "Plan calculated");
    let slices = summarize_allocation(&request.allocation);

    let mut output = format!(
        "{}\n",
        ui::style_text("Investment Planning Assistant", ui::StyleType::Title)
    );
    output.push_str(&gold::render_gold_section(&quote));
    output.push_str(&rates::render_rates_section(&rate_table));
    output.push_str(&index::render_index_section(
        &series,
        index_name,
        window_days,
        request.history_rows,
    ));
    output.push_str(&render_calculation(&calculation, index_name, &config.currency));
    output.push_str(&render_allocation_chart(&slices, &config.currency));
    output
}

pub async fn run(
    config: &AppConfig,
    gold_provider: &dyn GoldPriceProvider,
    rate_provider: &dyn DepositRateProvider,
    index_provider: &dyn IndexHistoryProvider,
    request: &PlanRequest,
) -> Result<()> {
    let report = build_report(config, gold_provider, rate_provider, index_provider, request).await;
    println!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataUnavailable, GoldQuote, IndexBar, IndexSeries, StaticRateProvider};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct MockGoldProvider(Option<f64>);

    #[async_trait]
    impl GoldPriceProvider for MockGoldProvider {
        async fn fetch_spot_price(&self) -> Result<GoldQuote, DataUnavailable> {
            self.0
                .map(|price| GoldQuote {
                    price,
                    currency: "INR".to_string(),
                    metal: "XAU".to_string(),
                    price_per_gram_24k: None,
                    quoted_at: None,
                })
                .ok_or_else(|| DataUnavailable::new("gold price", "HTTP error: 403 Forbidden"))
        }
    }

    struct MockIndexProvider(bool);

    #[async_trait]
    impl IndexHistoryProvider for MockIndexProvider {
        async fn fetch_history(&self, _window_days: u32) -> Result<IndexSeries, DataUnavailable> {
            if !self.0 {
                return Err(DataUnavailable::new("index history", "request timed out"));
            }
            Ok(IndexSeries {
                symbol: "^NSEI".to_string(),
                currency: Some("INR".to_string()),
                bars: vec![IndexBar {
                    date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
                    open: Some(25100.0),
                    high: Some(25250.0),
                    low: Some(25050.0),
                    close: 25200.0,
                    volume: Some(300000),
                }],
            })
        }
    }

    fn request(basis: Option<InvestmentBasis>) -> PlanRequest {
        PlanRequest {
            allocation: AllocationInput::new(1000.0, 1500.0)
                .with_deposit("SBI", "1 Year", 2000.0)
                .with_deposit("SBI", "2 Years", 0.0)
                .with_deposit("SBI", "3 Years", 0.0),
            basis,
            history_rows: 5,
        }
    }

    #[test]
    fn test_allocation_shares() {
        let slices = summarize_allocation(&request(None).allocation);
        let shares = allocation_shares(&slices);
        assert!((shares[0] - 1000.0 / 4500.0 * 100.0).abs() < 1e-9);
        assert!((shares.iter().sum::<f64>() - 100.0).abs() < 1e-9);

        let zero = summarize_allocation(&AllocationInput::default());
        assert_eq!(allocation_shares(&zero), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_render_all_zero_chart() {
        let slices = summarize_allocation(&AllocationInput::default());
        let output = render_allocation_chart(&slices, "INR");
        assert!(output.contains("Fixed Deposits"));
        assert!(output.contains("0.0%"));
        assert!(!output.contains("NaN"));
    }

    #[tokio::test]
    async fn test_report_with_all_feeds() {
        let report = build_report(
            &AppConfig::default(),
            &MockGoldProvider(Some(6000.0)),
            &StaticRateProvider::default(),
            &MockIndexProvider(true),
            &request(None),
        )
        .await;

        assert!(report.contains("₹6,000.00"));
        assert!(report.contains("Total investment:"));
        assert!(report.contains("₹4,650.00"));
        assert!(report.contains("Expected return:"));
        assert!(report.contains("₹4,850.00"));
        assert!(report.contains("grown-deposits"));
        assert!(report.contains("2026-10-16"));
        assert!(report.contains("22.2%"));
        assert!(report.contains("44.4%"));
        assert!(report.contains("33.3%"));
    }

    #[tokio::test]
    async fn test_report_with_principal_basis() {
        let report = build_report(
            &AppConfig::default(),
            &MockGoldProvider(Some(6000.0)),
            &StaticRateProvider::default(),
            &MockIndexProvider(true),
            &request(Some(InvestmentBasis::Principal)),
        )
        .await;
        assert!(report.contains("₹4,500.00"));
        assert!(report.contains("₹4,850.00"));
    }

    #[tokio::test]
    async fn test_report_keeps_rendering_without_feeds() {
        let report = build_report(
            &AppConfig::default(),
            &MockGoldProvider(None),
            &StaticRateProvider::default(),
            &MockIndexProvider(false),
            &request(None),
        )
        .await;

        assert!(report.contains("Error fetching gold price data"));
        assert!(report.contains("Error fetching Nifty 50 data"));
        assert!(report.contains("Fixed Deposits Interest Rates"));
        assert!(report.contains("cannot calculate: gold price unavailable"));
        assert!(!report.contains("Total investment:"));
        assert!(report.contains("Investment Allocation"));
    }
}
