use super::ui;
use crate::core::{DataUnavailable, GoldPriceProvider, GoldQuote};
use anyhow::Result;
use tracing::warn;

pub fn render_gold_section(quote: &Result<GoldQuote, DataUnavailable>) -> String {
    let mut output = ui::section("Current Gold Price");
    match quote {
        Ok(quote) => {
            output.push_str(&format!(
                "Gold Price ({}): {} per troy ounce\n",
                quote.metal,
                ui::style_text(
                    &ui::format_currency(quote.price, &quote.currency),
                    ui::StyleType::TotalValue
                )
            ));
            if let Some(per_gram) = quote.price_per_gram_24k {
                output.push_str(&format!(
                    "24K per gram: {}\n",
                    ui::format_currency(per_gram, &quote.currency)
                ));
            }
            if let Some(quoted_at) = quote.quoted_at {
                output.push_str(&ui::style_text(
                    &format!("As of {}\n", quoted_at.format("%Y-%m-%d %H:%M UTC")),
                    ui::StyleType::Subtle,
                ));
            }
        }
        Err(e) => {
            output.push_str(&ui::error_line(&format!(
                "Error fetching gold price data: {e}"
            )));
        }
    }
    output
}

pub async fn run(gold_provider: &dyn GoldPriceProvider) -> Result<()> {
    let pb = ui::new_spinner("Fetching gold price...");
    let quote = gold_provider.fetch_spot_price().await;
    pb.finish_and_clear();

    if let Err(e) = &quote {
        warn!(error = %e, "Gold price unavailable");
    }
    println!("{}", render_gold_section(&quote));
    quote?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_available_quote() {
        let quote = Ok(GoldQuote {
            price: 187654.32,
            currency: "INR".to_string(),
            metal: "XAU".to_string(),
            price_per_gram_24k: Some(6033.11),
            quoted_at: None,
        });
        let output = render_gold_section(&quote);
        assert!(output.contains("Current Gold Price"));
        assert!(output.contains("₹187,654.32"));
        assert!(output.contains("₹6,033.11"));
    }

    #[test]
    fn test_render_unavailable_quote() {
        let quote = Err(DataUnavailable::new("gold price", "request timed out"));
        let output = render_gold_section(&quote);
        assert!(output.contains("Error fetching gold price data"));
        assert!(output.contains("request timed out"));
    }
}
