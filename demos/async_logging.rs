//! Async logging example
//!
//! Hands writes to the worker pool and awaits their completion handles.
//!
//! Run with: cargo run --example async_logging

use aelog::prelude::*;
use std::thread;

async fn serve(request: u32) -> Result<()> {
    async_info!("request", request, "accepted").await?;
    if request % 4 == 0 {
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
        async_exception!(&err, "request", request, "failed").await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== aelog - Async Logging Example ===\n");

    let dir = std::env::temp_dir().join("aelog-async-logging");
    aelog::configure(&LogOptions::new().access_file(dir.join("async.log")).console(true))?;

    println!("1. Awaiting handles from async code:");
    for request in 1..=8 {
        serve(request).await?;
    }

    println!("\n2. Fire from threads, wait on the handles:");
    let workers: Vec<_> = (0..4)
        .map(|t| {
            thread::spawn(move || {
                let handles: Vec<LogHandle> = (0..5)
                    .map(|i| async_debug!("thread", t, "message", i))
                    .collect();
                handles.into_iter().map(LogHandle::wait).collect::<Result<Vec<_>>>()
            })
        })
        .collect();
    for worker in workers {
        match worker.join() {
            Ok(outcome) => {
                outcome?;
            }
            Err(_) => eprintln!("worker thread panicked"),
        }
    }
    println!("   Records from different threads may appear in any order");

    println!("\n=== Example completed successfully! ===");
    println!("Check {} for file output", dir.join("async.log").display());

    Ok(())
}
