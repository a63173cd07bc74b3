// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// url-sentry is a single-purpose tool, so unlike multi-command CLIs there
// are no subcommands here - just the target URLs and a few flags.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "url-sentry",
    version = "0.1.0",
    about = "A CLI tool to health-check a batch of URLs concurrently",
    long_about = "url-sentry fires one HTTP GET per target URL, all at the same time, \
                  and reports which targets answered (and with what status) and which \
                  did not. Handy for a quick 'is everything up?' sweep over a list of \
                  services or endpoints."
)]
pub struct Cli {
    /// URLs to check (e.g., https://example.com)
    ///
    /// Positional; repeat to check several. May be omitted when --file
    /// supplies the targets instead.
    #[arg(required_unless_present = "file")]
    pub urls: Vec<String>,

    /// Read additional target URLs from a file
    ///
    /// One URL per line; blank lines and lines starting with '#' are skipped.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Per-request timeout in seconds
    ///
    /// Covers the whole request: connecting, sending, and reading the
    /// response status. Must be at least 1.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Maximum number of checks in flight at once
    ///
    /// By default every URL is checked simultaneously (one task per URL).
    /// For very large target lists that can exhaust sockets, so set a cap.
    /// Must be at least 1.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: Option<u64>,

    /// Output results in JSON format instead of text lines
    ///
    /// This is an optional flag: --json
    #[arg(long)]
    pub json: bool,
}
