//! File logging example
//!
//! Configures an access log with a derived error log and small rotation
//! limits, then shows which records land in which file.
//!
//! Run with: cargo run --example file_logging

use aelog::prelude::*;

fn main() -> Result<()> {
    println!("=== aelog - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("aelog-file-logging");
    let access = dir.join("application.log");

    aelog::configure(
        &LogOptions::new()
            .access_file(&access)
            .console(true)
            .level(LogLevel::Debug)
            .max_bytes(4 * 1024)
            .backup_count(3),
    )?;

    println!("1. Logging to console and files:");
    info!("Application started");
    debug!("Loading configuration...");
    info!("Configuration loaded successfully");
    warning!("Using default settings for some options");
    error!("Failed to load optional plugin");

    println!("\n2. Enough records to rotate:");
    for i in 1..=100 {
        info!("Processing item", i, "of", 100);
    }

    println!("\n3. Reconfiguring replaces every sink:");
    aelog::configure(&LogOptions::new().level_name("warning")?)?;
    info!("Console only now, and this one is filtered");
    warning!("Console only now");

    println!("\n=== Example completed successfully! ===");
    println!("Access log: {}", access.display());
    println!("Error log:  {}", dir.join("application_error.log").display());
    println!("Backups:    {}.1 .. .3", access.display());

    Ok(())
}
