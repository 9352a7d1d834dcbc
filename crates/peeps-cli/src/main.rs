//! Peeps CLI entry point.
//!
//! Usage:
//!   peeps build <SHEET> --out <DIR> [--root <CATEGORY>]
//!   peeps generate <CATALOG> [-n N] [--seed S] [--out DIR] [--styles] [--lint]

use std::process;
use std::str::FromStr;

use clap::Parser;
use log::LevelFilter;

use peeps_cli::Cli;

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    if let Err(err) = peeps_cli::run(&cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}
