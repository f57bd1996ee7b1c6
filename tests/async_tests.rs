//! Asynchronous mode tests
//!
//! These tests verify:
//! - The log call completes only after the output has been processed
//! - Async middleware runs sequentially in registration order
//! - Rejections from middleware, output and sink reach the caller
//! - Mode mismatches are reported

use async_trait::async_trait;
use logality::prelude::*;
use logality::{AsyncMiddleware, FixedClock, StaticIdentity};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn async_builder(sink: &MemorySink) -> LoggerBuilder {
    Logger::builder()
        .app_name("async-svc")
        .async_mode()
        .clock(FixedClock::parse("2018-05-18T16:25:57.815Z").expect("valid timestamp"))
        .identity(StaticIdentity::new("localhost", 36255, "async-test"))
        .sink(sink.clone())
}

struct Tag {
    name: &'static str,
    delay: Duration,
}

#[async_trait]
impl AsyncMiddleware for Tag {
    async fn handle(&self, record: &mut LogRecord, _piped: bool) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        let trail = record
            .context
            .get("trail")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        record.assign("context.trail", json!(format!("{}{}", trail, self.name)))
    }
}

struct Reject;

#[async_trait]
impl AsyncMiddleware for Reject {
    async fn handle(&self, _record: &mut LogRecord, _piped: bool) -> Result<()> {
        Err(LoggerError::middleware("async rejection"))
    }
}

#[tokio::test]
async fn test_async_default_output_writes_json() {
    let sink = MemorySink::new();
    let logger = async_builder(&sink).build().unwrap();

    logger.get_for("/a.rs").info_async("hello", None).await.unwrap();

    let record: Value = serde_json::from_str(&sink.contents()).unwrap();
    assert_eq!(record["message"], "hello");
    assert_eq!(record["severity"], 6);
}

#[tokio::test]
async fn test_call_resolves_after_output_processed() {
    let sink = MemorySink::new();
    let done = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&done);
    let logger = async_builder(&sink)
        .async_output(move |payload, _piped| {
            let flag = Arc::clone(&flag);
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                flag.store(true, Ordering::SeqCst);
                let record = payload.into_record().unwrap();
                Ok(Output::Text(format!("{}\n", record.message)))
            }
        })
        .build()
        .unwrap();

    let log = logger.get_for("/a.rs");
    let pending = log.notice_async("late", None);
    assert!(!done.load(Ordering::SeqCst));

    pending.await.unwrap();
    assert!(done.load(Ordering::SeqCst));
    assert_eq!(sink.contents(), "late\n");
}

#[tokio::test]
async fn test_async_middleware_sequential_order() {
    let sink = MemorySink::new();
    let logger = async_builder(&sink).build().unwrap();

    // The slowest stage runs first; the trail still follows registration order
    logger
        .use_async_middleware(Tag { name: "a", delay: Duration::from_millis(15) })
        .unwrap();
    logger.use_middleware(|record, _piped| {
        let trail = record.context["trail"].as_str().unwrap_or("").to_string();
        record.assign("context.trail", json!(format!("{}b", trail)))
    });
    logger
        .use_async_middleware(Tag { name: "c", delay: Duration::from_millis(1) })
        .unwrap();

    logger.get_for("/a.rs").info_async("ordered", None).await.unwrap();

    let record: Value = serde_json::from_str(&sink.contents()).unwrap();
    assert_eq!(record["context"]["trail"], "abc");
}

#[tokio::test]
async fn test_async_middleware_rejection() {
    let sink = MemorySink::new();
    let logger = async_builder(&sink).build().unwrap();
    logger.use_async_middleware(Reject).unwrap();

    let err = logger.get_for("/a.rs").info_async("x", None).await.unwrap_err();
    assert!(matches!(err, LoggerError::Middleware(ref m) if m == "async rejection"));
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_rejecting_output_rejects_call() {
    let sink = MemorySink::new();
    let logger = async_builder(&sink)
        .async_output(|_payload, _piped| async { Err(LoggerError::output("transport down")) })
        .build()
        .unwrap();

    let err = logger.get_for("/a.rs").error_async("x", None).await.unwrap_err();
    assert!(matches!(err, LoggerError::Output(ref m) if m == "transport down"));
    assert_eq!(logger.metrics().failed_count(), 1);
}

#[tokio::test]
async fn test_failing_sink_rejects_call() {
    let sink = MemorySink::failing("stream closed");
    let logger = async_builder(&sink).build().unwrap();

    let result = logger.get_for("/a.rs").warn_async("x", None).await;
    assert!(matches!(result, Err(LoggerError::Output(_))));
}

#[tokio::test]
async fn test_invalid_level_reported_before_future() {
    let logger = async_builder(&MemorySink::new()).build().unwrap();
    let log = logger.get_for("/a.rs");
    assert!(matches!(
        log.log_async("chatty", "x", None),
        Err(LoggerError::InvalidLevel(_))
    ));

    log.log_async("warning", "x", None).unwrap().await.unwrap();
}

#[tokio::test]
async fn test_sync_output_in_async_mode() {
    let sink = MemorySink::new();
    let logger = async_builder(&sink)
        .output(|payload, _piped| Ok(Output::Text(payload.into_record().unwrap().message)))
        .build()
        .unwrap();

    logger.get_for("/a.rs").debug_async("plain", None).await.unwrap();
    assert_eq!(sink.contents(), "plain");
}

#[tokio::test]
async fn test_object_mode_async() {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let store = Arc::clone(&captured);
    let sink = MemorySink::new();
    let logger = async_builder(&sink)
        .object_mode()
        .async_output(move |payload, piped| {
            let store = Arc::clone(&store);
            async move {
                let message = payload.as_record().unwrap().message.clone();
                store.lock().unwrap().push((message, piped));
                Ok(Output::from(payload))
            }
        })
        .build()
        .unwrap();

    logger.get_for("/a.rs").info_async("raw", None).await.unwrap();

    assert!(sink.is_empty());
    assert_eq!(*captured.lock().unwrap(), vec![("raw".to_string(), false)]);
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let sink = MemorySink::new();
    let logger = async_builder(&sink).build().unwrap();
    logger.use_middleware(|record, _piped| {
        let message = record.message.clone();
        record.assign("context.echo", json!(message))
    });

    let mut handles = Vec::new();
    for i in 0..16 {
        let log = logger.get_for("/a.rs");
        handles.push(tokio::spawn(async move {
            log.info_async(format!("call {}", i), None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(sink.len(), 16);
    for line in sink.messages() {
        let record: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(record["message"], record["context"]["echo"]);
    }
}

#[test]
fn test_sync_call_on_async_logger_fails() {
    let logger = async_builder(&MemorySink::new()).build().unwrap();
    let err = logger.get_for("/a.rs").info("x", None).unwrap_err();
    assert!(matches!(err, LoggerError::ModeMismatch(_)));
}

#[test]
fn test_async_middleware_rejected_by_sync_logger() {
    let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
    let err = logger
        .use_async_middleware(Tag { name: "a", delay: Duration::ZERO })
        .unwrap_err();
    assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
}
