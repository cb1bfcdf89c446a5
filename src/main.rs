use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use kyat::core::currency::parse_currency_code;
use kyat::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv to include HTTP traces)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for kyat::AppCommand {
    fn from(cmd: Commands) -> kyat::AppCommand {
        match cmd {
            Commands::Rates => kyat::AppCommand::Rates,
            Commands::Convert { amount, from, to } => kyat::AppCommand::Convert { amount, from, to },
            Commands::Interactive => kyat::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the latest rates against the Myanmar Kyat
    Rates,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert; invalid or negative input counts as zero
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,

        /// Source currency code
        #[arg(short, long, value_parser = parse_currency_code)]
        from: Option<String>,

        /// Target currency code
        #[arg(short, long, value_parser = parse_currency_code)]
        to: Option<String>,
    },
    /// Start an interactive converter session
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kyat::cli::setup::setup(),
        Some(cmd) => kyat::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
