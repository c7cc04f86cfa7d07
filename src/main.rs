use anyhow::Result;
use carteira::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Path to the market snapshot file written by the collector
    #[arg(short, long, global = true)]
    market_data: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for carteira::AppCommand {
    fn from(cmd: Commands) -> carteira::AppCommand {
        match cmd {
            Commands::Report => carteira::AppCommand::Report,
            Commands::Drift => carteira::AppCommand::Drift,
            Commands::Contribute { amount } => carteira::AppCommand::Contribute { amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display the full daily portfolio report
    Report,
    /// Display allocation drift against the target policy
    Drift,
    /// Suggest how to distribute a contribution amount
    Contribute {
        /// Amount to distribute; defaults to the configured monthly one
        amount: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => carteira::run_command(
            cmd.into(),
            cli.config_path.as_deref(),
            cli.market_data.as_deref(),
        ),
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

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = carteira::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
holdings:
  - ticker: "BBAS3.SA"
    quantity: 37
    category: br_equity
  - ticker: "XPML11.SA"
    quantity: 3
    category: real_estate_fund
  - ticker: "B5P211.SA"
    quantity: 2
    category: etf
  - ticker: "O"
    quantity: 0.93
    category: us_reit
  - ticker: "HPQ"
    quantity: 1.82931885
    category: us_equity
  - ticker: "USDT-USD"
    quantity: 37.94885362
    category: crypto
  - ticker: "RDB"
    quantity: 1000.0
    category: fixed_income
    accruing: true

target_allocation:
  - category: "Fixed Income"
    weight: 0.35
  - category: "Equities BR"
    weight: 0.20
  - category: "ETFs"
    weight: 0.15
  - category: "Real Estate Funds"
    weight: 0.10
  - category: "US REITs"
    weight: 0.07
  - category: "US Equities"
    weight: 0.07
  - category: "Crypto"
    weight: 0.06
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
