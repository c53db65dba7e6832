mod scenarios; // Declare the scenarios module

use clap::{Parser, Subcommand};
use log::error;

/// Pulse: a synchronous publish/subscribe event bus, demonstrated
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post a cancellable event through prioritized static handlers
    Cancel,
    /// Show priority ordering across closure and discovered handlers
    Ordering,
    /// Deliver to a handler declared on an ancestor subscriber
    Inherit,
}

fn main() {
    env_logger::init();

    let args = CliArgs::parse();
    let result = match args.command {
        Commands::Cancel => scenarios::cancel(),
        Commands::Ordering => scenarios::ordering(),
        Commands::Inherit => scenarios::inherit(),
    };

    if let Err(e) = result {
        error!("Scenario failed: {}", e);
        std::process::exit(1);
    }
}
