//! Piping example
//!
//! Demonstrates child loggers forwarding their records to a shared parent,
//! which alone writes.
//!
//! Run with: cargo run --example piping

use logality::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Logality - Piping Example ===\n");

    let root = Logger::builder().app_name("gateway").build()?;
    root.use_middleware(|record, piped| {
        if piped {
            record.assign("context.via", json!("gateway"))
        } else {
            Ok(())
        }
    });

    let billing = Logger::builder().app_name("billing").build()?;
    let search = Logger::builder().app_name("search").build()?;
    root.pipe_all([&billing, &search])?;

    println!("1. Children forward to the root:");
    billing.get().info("Invoice created", None)?;
    search.get().warn("Index is stale", None)?;

    println!("\n2. A child may swallow records:");
    let audit = Logger::builder()
        .app_name("audit")
        .output(|payload, _piped| {
            let keep = payload
                .as_record()
                .map_or(true, |record| record.severity() <= Level::Warn.severity());
            if keep {
                Ok(payload.into())
            } else {
                Ok(Output::Nothing)
            }
        })
        .build()?;
    root.pipe(&audit)?;
    audit.get().debug("Not forwarded", None)?;
    audit.get().alert("Forwarded", None)?;

    println!("\n3. A logger has at most one parent:");
    let other = Logger::builder().app_name("other").build()?;
    if let Err(e) = other.pipe(&billing) {
        println!("   {}", e);
    }

    println!(
        "\nRoot wrote {} records; audit suppressed {}",
        root.metrics().written_count(),
        audit.metrics().suppressed_count()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
