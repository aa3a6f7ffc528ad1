mod cmd;
mod host;
mod license;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::{OutputFormat, print_error};

/// msstore - exercise the Microsoft Store shim through its C ABI
#[derive(Parser)]
#[command(name = "msstore")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the license of the current app
  License {
    /// Print the license JSON exactly as the Store returned it
    #[arg(long)]
    raw: bool,
  },

  /// Request a purchase through the Store purchase flow
  Purchase {
    /// Store ID of the product or add-on
    store_id: String,
  },

  /// Show the rating and review dialog
  Review,
}

fn main() -> ExitCode {
  // Initialize logging
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cli = Cli::parse();

  let result = match cli.command {
    Commands::License { raw } => cmd::cmd_license(raw, cli.output),
    Commands::Purchase { store_id } => cmd::cmd_purchase(&store_id, cli.output),
    Commands::Review => cmd::cmd_review(cli.output),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
