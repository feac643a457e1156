//! Basic usage example
//!
//! Logs through the console defaults without any configuration call.
//!
//! Run with: cargo run --example basic_usage

use aelog::prelude::*;

fn handle_request(id: u32) {
    // The function name and line are attached automatically
    info!("handling request", id);
}

fn main() {
    println!("=== aelog - Basic Usage Example ===\n");

    println!("1. Logging at different levels (stdout, errors also on stderr):");
    debug!("This is a debug message");
    info!("This is an info message");
    warning!("This is a warning message");
    error!("This is an error message");
    critical!("This is a critical message");

    println!("\n2. Several values and separators:");
    info!("Processing", 100, "items in", 2.5, "seconds");
    info!(sep = ", ", "alpha", "beta", "gamma");

    println!("\n3. Caller attribution:");
    handle_request(7);

    println!("\n4. Errors with their context:");
    if let Err(err) = "forty-two".parse::<u32>() {
        exception!(&err, "could not parse the retry count");
    }

    println!("\n=== Example completed successfully! ===");
}
