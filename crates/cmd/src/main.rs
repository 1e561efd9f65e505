// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use prep::Stage;

use cmd::commands;
use cmd::common::{GridArgs, PrepContext};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "benchprep")]
/// Prepare raw benchmark results for plotting
struct Cli {
    #[command(flatten)]
    grid: GridArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage: tuples, tc, st, lat-vs-tp, scaling
    All,
    /// Merge and sort the tuples shards of each payload size
    Tuples,
    /// Normalize transaction counts of the reference run
    Tc,
    /// Normalize single-thread latencies for each worker count
    St,
    /// Compose latency against throughput percentiles
    LatVsTp,
    /// Aggregate scaling curves over payload sizes
    Scaling,
    /// List the raw inputs the grid needs and report missing ones
    Check,
    /// Print the effective configuration
    ShowConfig,
}

fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    let context = PrepContext::new(&cli.grid)?;
    let print = |line: &str| println!("{line}");

    match cli.command {
        Commands::All => commands::run_command(&context, &Stage::ALL, print),
        Commands::Tuples => commands::run_command(&context, &[Stage::Tuples], print),
        Commands::Tc => commands::run_command(&context, &[Stage::TransactionCounts], print),
        Commands::St => commands::run_command(&context, &[Stage::SingleThread], print),
        Commands::LatVsTp => commands::run_command(&context, &[Stage::LatVsTp], print),
        Commands::Scaling => commands::run_command(&context, &[Stage::Scaling], print),
        Commands::Check => commands::check_command(&context, print),
        Commands::ShowConfig => commands::show_config_command(&context, print),
    }
}
