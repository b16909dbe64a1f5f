mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::compare::CompareArgs;
use commands::emi::EmiArgs;
use commands::sip::SipArgs;
use commands::swp::SwpArgs;

/// Loan, SIP and SWP planning with decimal precision
#[derive(Parser)]
#[command(
    name = "welmora",
    version,
    about = "Loan, SIP and SWP planning with decimal precision",
    long_about = "A CLI for the Welmora calculators: EMI schedules, SIP accumulation and \
                  SWP depletion, each able to solve for any one of its inputs, plus \
                  side-by-side comparison of two plans."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log to stderr (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Loan EMI: installment, principal, rate or tenure
    Emi(EmiArgs),
    /// Systematic investment plan: maturity or the input that reaches a target
    Sip(SipArgs),
    /// Systematic withdrawal plan: final balance or the input that drains the corpus
    Swp(SwpArgs),
    /// Compare two plans of the same calculator and goal
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(output = ?cli.output, "welmora starting");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::emi::run_emi(args),
        Commands::Sip(args) => commands::sip::run_sip(args),
        Commands::Swp(args) => commands::swp::run_swp(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("welmora {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
