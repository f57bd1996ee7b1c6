//! Basic logger usage example
//!
//! Demonstrates synchronous JSON logging, serializers, middleware and
//! pretty output.
//!
//! Run with: cargo run --example basic_usage

use logality::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Logality - Basic Usage Example ===\n");

    // JSON lines on stdout
    let logger = Logger::builder().app_name("basic-demo").build()?;
    let log = logger.get();

    println!("1. Logging at different levels:");
    log.emergency("This is an emergency message", None)?;
    log.error("This is an error message", None)?;
    log.warn("This is a warning message", None)?;
    log.info("This is an info message", None)?;
    log.debug("This is a debug message", None)?;

    println!("\n2. Built-in serializers:");
    let request = HttpRequest::new("GET", "shop.example.com", "/cart")
        .secure(true)
        .header("Authorization", "Bearer secret")
        .query_param("ref", "newsletter");
    let input = LogInput::new()
        .user(&UserData::new(42, "user@example.com"))
        .request(&request)
        .custom(json!({"cart_items": 3}));
    log.notice("Cart viewed", Some(input))?;

    println!("\n3. Middleware enriching every record:");
    logger.use_middleware(|record, _piped| record.assign("context.deploy.region", json!("eu-west-1")));
    log.info("Enriched by middleware", None)?;

    println!("\n4. Minimum level filtering:");
    let quiet = Logger::builder()
        .app_name("quiet-demo")
        .min_level(Level::Warn)
        .build()?;
    let quiet_log = quiet.get();
    quiet_log.info("Info message (hidden)", None)?;
    quiet_log.warn("Warning message (visible)", None)?;

    println!("\n5. Pretty output:");
    let pretty = Logger::builder()
        .app_name("pretty-demo")
        .pretty_print(PrettyOptions::new())
        .build()?;
    let pretty_log = pretty.get();
    let error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "db unreachable");
    pretty_log.error(
        "Database connection failed",
        Some(LogInput::new().error(&ErrorData::from_error(&error))),
    )?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
