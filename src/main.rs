use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use invplan::cli::plan::PlanRequest;
use invplan::core::log::init_logging;
use invplan::core::{AllocationInput, InvestmentBasis};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch market data and project returns for an allocation
    Plan(PlanArgs),
    /// Display the current gold price
    Gold,
    /// Display fixed deposit interest rates
    Rates,
    /// Display equity index history
    Index {
        /// Number of most recent daily bars to show
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },
}

#[derive(Args)]
struct PlanArgs {
    /// Amount to invest in gold
    #[arg(long, default_value_t = 0.0, value_parser = parse_amount)]
    gold: f64,

    /// Fixed deposit amount as BANK:TENURE=AMOUNT, e.g. "SBI:1 Year=2000"
    #[arg(long = "fd", value_parser = parse_deposit)]
    deposits: Vec<(String, String, f64)>,

    /// Amount to invest in the equity index
    #[arg(long, default_value_t = 0.0, value_parser = parse_amount)]
    index: f64,

    /// How total investment is reported: grown-deposits or principal
    #[arg(long)]
    investment_basis: Option<InvestmentBasis>,

    /// Number of most recent daily index bars to show
    #[arg(long, default_value_t = 5)]
    history_rows: usize,
}

impl From<PlanArgs> for PlanRequest {
    fn from(args: PlanArgs) -> PlanRequest {
        let allocation = args.deposits.iter().fold(
            AllocationInput::new(args.gold, args.index),
            |allocation, (bank, tenure, amount)| allocation.with_deposit(bank, tenure, *amount),
        );
        PlanRequest {
            allocation,
            basis: args.investment_basis,
            history_rows: args.history_rows,
        }
    }
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("'{s}' must be a non-negative amount"));
    }
    Ok(amount)
}

fn parse_deposit(s: &str) -> Result<(String, String, f64), String> {
    let (leg, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("'{s}' is not of the form BANK:TENURE=AMOUNT"))?;
    let (bank, tenure) = leg
        .split_once(':')
        .ok_or_else(|| format!("'{s}' is not of the form BANK:TENURE=AMOUNT"))?;
    let (bank, tenure) = (bank.trim(), tenure.trim());
    if bank.is_empty() || tenure.is_empty() {
        return Err(format!("'{s}' needs both a bank and a tenure"));
    }
    Ok((bank.to_string(), tenure.to_string(), parse_amount(amount)?))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => invplan::cli::setup::setup(),
        Some(Commands::Plan(args)) => {
            invplan::run_command(invplan::AppCommand::Plan(args.into()), config_path).await
        }
        Some(Commands::Gold) => invplan::run_command(invplan::AppCommand::Gold, config_path).await,
        Some(Commands::Rates) => {
            invplan::run_command(invplan::AppCommand::Rates, config_path).await
        }
        Some(Commands::Index { rows }) => {
            invplan::run_command(invplan::AppCommand::Index { rows }, config_path).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deposit() {
        assert_eq!(
            parse_deposit("SBI:1 Year=2000"),
            Ok(("SBI".to_string(), "1 Year".to_string(), 2000.0))
        );
        assert_eq!(
            parse_deposit(" HDFC : 3 Years = 12.5 "),
            Ok(("HDFC".to_string(), "3 Years".to_string(), 12.5))
        );
        assert!(parse_deposit("SBI=2000").is_err());
        assert!(parse_deposit(":1 Year=2000").is_err());
        assert!(parse_deposit("SBI:1 Year=-5").is_err());
    }

    #[test]
    fn test_plan_args_build_allocation() {
        let cli = Cli::try_parse_from([
            "invplan",
            "plan",
            "--gold",
            "1000",
            "--fd",
            "SBI:1 Year=2000",
            "--fd",
            "SBI:2 Years=0",
            "--index",
            "1500",
            "--investment-basis",
            "principal",
        ])
        .unwrap();

        let Some(Commands::Plan(args)) = cli.command else {
            panic!("Expected plan command");
        };
        let request = PlanRequest::from(args);
        assert_eq!(request.allocation.gold, 1000.0);
        assert_eq!(request.allocation.index, 1500.0);
        assert_eq!(request.allocation.deposit("SBI", "1 Year"), Some(2000.0));
        assert_eq!(request.allocation.fixed_deposit_total(), 2000.0);
        assert_eq!(request.basis, Some(InvestmentBasis::Principal));
        assert_eq!(request.history_rows, 5);
    }

    #[test]
    fn test_negative_gold_rejected() {
        assert!(Cli::try_parse_from(["invplan", "plan", "--gold", "-1"]).is_err());
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }
}
