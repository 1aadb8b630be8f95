// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// - PathBuf: An owned filesystem path
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::crawl::DEFAULT_USER_AGENT;
use crate::extract::ExtractMode;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-harvester",
    version = "0.1.0",
    about = "Crawl a list of seed URLs and record every link each page points to",
    long_about = "link-harvester fetches every URL in a seed file concurrently, pulls the \
                  href targets out of each page, resolves them to absolute URLs and writes \
                  one tab-separated (source_url, parsed_url) line per link."
)]
pub struct Cli {
    /// File with one seed URL per line
    #[arg(short, long, default_value = "urls.txt")]
    pub input: PathBuf,

    /// Where to write the tab-separated results (overwritten)
    #[arg(short, long, default_value = "foundurls.txt")]
    pub output: PathBuf,

    /// Maximum number of pages fetched at the same time (0 = no limit)
    #[arg(long, default_value_t = 50)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Extra request header, e.g. -H "Accept-Language: en" (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    pub headers: Vec<String>,

    /// How links are pulled out of a page
    #[arg(long, value_enum, default_value_t = ExtractMode::Pattern)]
    pub extractor: ExtractMode,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub json: bool,
}
