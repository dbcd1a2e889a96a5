use super::ui;
use crate::core::{DepositRateProvider, RateTable};
use comfy_table::Cell;

pub fn render_rates_section(rates: &RateTable) -> String {
    let mut output = ui::section("Fixed Deposits Interest Rates");
    if rates.is_empty() {
        output.push_str(&ui::style_text("No rates configured\n", ui::StyleType::Subtle));
        return output;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Bank"),
        ui::header_cell("Tenure"),
        ui::header_cell("Rate (%)"),
    ]);
    for (bank, tenures) in rates.banks() {
        for (i, (tenure, rate)) in tenures.iter().enumerate() {
            let bank_cell = if i == 0 {
                Cell::new(bank)
            } else {
                Cell::new("")
            };
            table.add_row(vec![
                bank_cell,
                Cell::new(tenure),
                ui::right_cell(format!("{rate:.2}%")),
            ]);
        }
    }
    output.push_str(&table.to_string());
    output.push('\n');
    output
}

pub fn run(rate_provider: &dyn DepositRateProvider) {
    println!("{}", render_rates_section(&rate_provider.fetch_rates()));
}
