pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::matcher::ScoringMode;

#[derive(Parser)]
#[command(name = "dirscout")]
#[command(about = "Search a company directory and score companies against your profile", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/dirscout/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List industries in the directory
    Industries,
    /// List locations for an industry
    Countries {
        /// Industry name, or the industry page URL
        industry: String,
    },
    /// Scrape companies from a listing page URL
    Scrape {
        /// Listing page URL
        url: String,

        /// Stop after this many companies
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max: Option<u32>,

        /// Export to a .xlsx, .csv or .json file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Find companies for an industry and location, optionally scoring them
    Search(SearchArgs),
}

#[derive(Args)]
pub struct SearchArgs {
    /// Industry name as listed by `industries`
    #[arg(long)]
    pub industry: String,

    /// Location name as listed by `countries`
    #[arg(long)]
    pub country: String,

    /// Companies to collect, 10 to 200 in steps of 10 (default from config: 50)
    #[arg(long, value_parser = parse_max_results)]
    pub max: Option<u32>,

    /// File with resume or profile text; enables AI matching
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Scoring mode (default from config: single)
    #[arg(long, value_enum)]
    pub mode: Option<ScoringMode>,

    /// Export file (default: companies_<industry>_<country>.xlsx)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Accept result caps of 10..=200 in steps of 10
fn parse_max_results(s: &str) -> Result<u32, String> {
    let max: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not a number", s))?;
    if !(10..=200).contains(&max) || max % 10 != 0 {
        return Err(format!("{} must be a multiple of 10 between 10 and 200", max));
    }
    Ok(max)
}
