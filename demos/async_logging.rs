//! Async logging example
//!
//! Demonstrates an asynchronous logger with async middleware, an async
//! output function and concurrent log calls.
//!
//! Run with: cargo run --example async_logging

use async_trait::async_trait;
use logality::prelude::*;
use logality::AsyncMiddleware;
use serde_json::json;
use std::time::Duration;

/// Pretends to look up the tenant of a user before the record is written
struct TenantLookup;

#[async_trait]
impl AsyncMiddleware for TenantLookup {
    async fn handle(&self, record: &mut LogRecord, _piped: bool) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        record.assign("context.tenant", json!("acme"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Logality - Async Logging Example ===\n");

    let logger = Logger::builder()
        .app_name("async-demo")
        .async_mode()
        .async_output(|payload, _piped| async move {
            // Simulate a slow transport; the log call resolves after this
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(Output::from(payload))
        })
        .build()?;
    logger.use_async_middleware(TenantLookup)?;

    let log = logger.get();

    println!("1. Awaited log calls:");
    log.info_async("Service starting", None).await?;
    log.notice_async("Listening on port 8080", None).await?;

    println!("\n2. Concurrent tasks:");
    let mut handles = Vec::new();
    for task_id in 0..5 {
        let log = log.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..3 {
                log.info_async(format!("Task {} - Message {}", task_id, i), None)
                    .await?;
            }
            Ok::<(), LoggerError>(())
        }));
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| LoggerError::Other(e.to_string()))??;
    }

    println!("\n3. Rejections surface to the caller:");
    let failing = Logger::builder()
        .app_name("failing-demo")
        .async_mode()
        .async_output(|_payload, _piped| async { Err(LoggerError::output("transport down")) })
        .build()?;
    if let Err(e) = failing.get().error_async("Never written", None).await {
        println!("   log call rejected: {}", e);
    }

    println!(
        "\nWritten: {}, failed: {}",
        logger.metrics().written_count(),
        failing.metrics().failed_count()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
