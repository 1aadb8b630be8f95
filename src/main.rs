// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Read the seed file and write the output header
// 4. Crawl every seed concurrently, appending results as they arrive
// 5. Print a summary and exit (0 = run completed, 2 = error)
//
// Rust concepts used:
// - async/await: Because we fetch many pages concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Modules: Each concern lives in its own file or directory
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;      // src/cli.rs - command-line parsing
mod crawl;    // src/crawl/ - the concurrent crawl pipeline
mod extract;  // src/extract/ - pulling links out of pages
mod fetch;    // src/fetch/ - downloading pages
mod logging;  // src/logging.rs - tracing subscriber
mod seeds;    // src/seeds.rs - reading the seed file
mod sink;     // src/sink.rs - writing the output file

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use crawl::{CrawlConfig, CrawlSummary};
use sink::ResultSink;
use tracing::info;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = the batch ran to completion (individual URLs may have failed)
//   Err = startup problem or the output file could not be written
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init();

    let config = CrawlConfig::from_cli(&cli).context("invalid --header")?;

    let seeds = seeds::load_seeds(&cli.input).await?;
    info!("loaded {} seed url(s) from {}", seeds.len(), cli.input.display());

    // The header goes out before any task starts
    let sink = ResultSink::create(&cli.output).await?;

    let summary = crawl::crawl_all(&seeds, &sink, &config).await?;

    print_summary(&summary, &cli)?;
    Ok(0)
}

// Prints the summary either as text or JSON
fn print_summary(summary: &CrawlSummary, cli: &Cli) -> Result<()> {
    if cli.json {
        let json_output = serde_json::to_string_pretty(summary)?;
        println!("{}", json_output);
        return Ok(());
    }

    println!("📊 Summary:");
    println!("   🌱 Seeds: {}", summary.seeds);
    println!("   ✅ Pages with links: {}", summary.pages_with_links);
    println!("   📭 Pages without links: {}", summary.pages_without_links);
    println!("   ❌ Fetch failures: {}", summary.fetch_failures);
    println!("   ⚠️  Unexpected failures: {}", summary.unexpected_failures);
    println!("   📋 Records written: {} -> {}", summary.records_written, cli.output.display());
    Ok(())
}
