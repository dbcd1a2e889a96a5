use super::ui;
use crate::core::{DataUnavailable, IndexHistoryProvider, IndexSeries};
use anyhow::Result;
use comfy_table::Cell;
use tracing::warn;

/// Renders the most recent `rows` bars with their day-over-day change.
pub fn render_index_section(
    series: &Result<IndexSeries, DataUnavailable>,
    index_name: &str,
    window_days: u32,
    rows: usize,
) -> String {
    let mut output = ui::section(&format!("{index_name} (last {window_days} days)"));
    let series = match series {
        Ok(series) => series,
        Err(e) => {
            output.push_str(&ui::error_line(&format!(
                "Error fetching {index_name} data: {e}"
            )));
            return output;
        }
    };

    let currency = series.currency.as_deref().unwrap_or("");
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Open"),
        ui::header_cell("High"),
        ui::header_cell("Low"),
        ui::header_cell("Close"),
        ui::header_cell("Change"),
        ui::header_cell("Volume"),
    ]);

    let skip = series.bars.len().saturating_sub(rows);
    for (i, bar) in series.bars.iter().enumerate().skip(skip) {
        let change = i
            .checked_sub(1)
            .map(|prev| series.bars[prev].close)
            .filter(|prev| *prev > 0.0)
            .map(|prev| (bar.close - prev) / prev * 100.0);
        table.add_row(vec![
            Cell::new(bar.date.format("%Y-%m-%d")),
            ui::format_optional_cell(bar.open, |v| format!("{v:.2}")),
            ui::format_optional_cell(bar.high, |v| format!("{v:.2}")),
            ui::format_optional_cell(bar.low, |v| format!("{v:.2}")),
            ui::right_cell(format!("{:.2}", bar.close)),
            change.map_or_else(|| ui::na_cell(false), ui::change_cell),
            ui::format_optional_cell(bar.volume, |v| v.to_string()),
        ]);
    }
    output.push_str(&table.to_string());
    output.push('\n');

    output.push_str(&format!(
        "{} trading days of {} {}",
        series.bars.len(),
        series.symbol,
        currency
    ));
    if let Some(change) = series.window_change() {
        let style_type = if change >= 0.0 {
            ui::StyleType::TotalValue
        } else {
            ui::StyleType::Error
        };
        output.push_str(&format!(
            ", change over window: {}",
            ui::style_text(&format!("{change:.2}%"), style_type)
        ));
    }
    output.push('\n');
    output
}

pub async fn run(
    index_provider: &dyn IndexHistoryProvider,
    index_name: &str,
    window_days: u32,
    rows: usize,
) -> Result<()> {
    let pb = ui::new_spinner(&format!("Fetching {index_name} history..."));
    let series = index_provider.fetch_history(window_days).await;
    pb.finish_and_clear();

    if let Err(e) = &series {
        warn!(error = %e, "Index history unavailable");
    }
    println!(
        "{}",
        render_index_section(&series, index_name, window_days, rows)
    );
    series?;
    Ok(())
}
