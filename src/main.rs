// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Assemble the target URL list (arguments + optional file)
// 3. Kick off the concurrent checks and print each result as it lands
// 4. Exit with proper code (0 = all up, 1 = something down, 2 = error)
//
// Rust concepts used:
// - async/await: Because we make many network requests concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - Channels: The checker streams results to us as they complete
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker;       // src/checker/ - concurrent health-check logic
mod cli;           // src/cli.rs - command-line parsing
mod targets;       // src/targets.rs - target list assembly

use clap::Parser;  // Parser trait enables the parse() method
use cli::Cli;

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;
use checker::CheckResult;
use std::time::Duration;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = every target answered
//   Ok(1) = at least one target is down
//   Err = setup error (bad targets file, etc.), reported as exit code 2
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    let targets = targets::assemble_targets(cli.urls, cli.file.as_deref())?;
    let timeout = Duration::from_secs(cli.timeout);

    if !cli.json {
        println!("🩺 Checking {} URL(s) with a {}s timeout...\n", targets.len(), cli.timeout);
    }

    // Fire off all checks at once; the receiver hands us results in
    // completion order and closes once every target is accounted for
    let concurrency = cli.concurrency.map(|n| n as usize);
    let mut rx = checker::check_urls(targets, timeout, concurrency);

    let mut results = Vec::new();
    while let Some(result) = rx.recv().await {
        if !cli.json {
            // Text mode streams one line per URL the moment its check ends
            println!("{}", format_result_line(&result));
        }
        results.push(result);
    }

    if cli.json {
        // JSON mode holds everything back and emits one pretty document
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_summary(&results);
    }

    // Count how many targets never answered
    let down_count = results.iter().filter(|r| !r.is_up()).count();

    if down_count > 0 {
        Ok(1)  // Exit code 1 = something is down
    } else {
        Ok(0)  // Exit code 0 = all good
    }
}

// Formats one check result as a single report line
fn format_result_line(result: &CheckResult) -> String {
    match result {
        CheckResult::Up { url, status } => {
            format!("[SUCCESS] {} - Status: {}", url, status)
        }
        CheckResult::Down { url, error } => {
            format!("[FAIL] {} - Error: {}", url, error)
        }
    }
}

// Prints the closing up/down tally
fn print_summary(results: &[CheckResult]) {
    let up_count = results.iter().filter(|r| r.is_up()).count();
    let down_count = results.len() - up_count;

    println!();
    println!("📊 Summary:");
    println!("   ✅ Up: {}", up_count);
    println!("   ❌ Down: {}", down_count);
    println!("   📋 Total: {}", results.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn up_result_formats_as_success_line() {
        let result = CheckResult::Up {
            url: "http://example.com/".to_string(),
            status: 200,
        };
        assert_eq!(
            format_result_line(&result),
            "[SUCCESS] http://example.com/ - Status: 200"
        );
    }

    #[test]
    fn down_result_formats_as_fail_line() {
        let result = CheckResult::Down {
            url: "http://localhost:9/".to_string(),
            error: "Connection failed: connection refused".to_string(),
        };
        assert_eq!(
            format_result_line(&result),
            "[FAIL] http://localhost:9/ - Error: Connection failed: connection refused"
        );
    }
}
