//! Command-line argument definitions for the peeps CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use peeps_editor::figure::DEFAULT_ROOT_CATEGORY;

#[derive(Parser, Debug)]
#[command(name = "peeps")]
#[command(about = "Generate composite illustrations from a symbol catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render random figures from a fragment library
    Generate(GenerateArgs),

    /// Split an aggregate SVG sheet into a fragment library
    Build(BuildArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Catalog file (`directory.json`)
    pub catalog: PathBuf,

    /// Directory catalog locators are relative to (defaults to the
    /// catalog's directory)
    #[arg(short, long)]
    pub base: Option<PathBuf>,

    /// Number of figures to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Seed for reproducible figures
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Write `<i>.svg` files and an `index.html` into this directory
    /// instead of printing to stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Root category
    #[arg(short, long, default_value = DEFAULT_ROOT_CATEGORY)]
    pub root: String,

    /// Print each figure's selections and styles as JSON on stderr
    #[arg(long)]
    pub styles: bool,

    /// Report catalog structure issues and exit
    #[arg(long)]
    pub lint: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Aggregate SVG sheet with one `<g id="category/item">` per fragment
    pub sheet: PathBuf,

    /// Library directory to write fragments and `directory.json` into
    #[arg(short, long)]
    pub out: PathBuf,

    /// Root category; its fragments are stripped down to symbol structure
    #[arg(short, long, default_value = DEFAULT_ROOT_CATEGORY)]
    pub root: String,
}
