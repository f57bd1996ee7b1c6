//! Output resolution
//!
//! The output function receives the finished record (or text rendered by a
//! piped child) and decides what, if
//! anything, is written: already-rendered text, a record for the logger to
//! serialize, or nothing at all.

use super::error::{LoggerError, Result};
use super::metrics::LoggerMetrics;
use super::options::PrettyOptions;
use super::record::LogRecord;
use super::sink::Sink;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// What an output function hands back to the logger
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// Written verbatim
    Text(String),
    /// Serialized by the logger (JSON line or pretty) before writing
    Record(Box<LogRecord>),
    /// The output function took care of the record itself
    Nothing,
}

impl From<LogRecord> for Output {
    fn from(record: LogRecord) -> Self {
        Output::Record(Box::new(record))
    }
}

impl From<String> for Output {
    fn from(text: String) -> Self {
        Output::Text(text)
    }
}

impl From<&str> for Output {
    fn from(text: &str) -> Self {
        Output::Text(text.to_string())
    }
}

impl From<()> for Output {
    fn from(_: ()) -> Self {
        Output::Nothing
    }
}

/// What an output function receives: the finished record, or text an
/// upstream piped logger has already rendered
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Record(Box<LogRecord>),
    Text(String),
}

impl Payload {
    pub fn as_record(&self) -> Option<&LogRecord> {
        match self {
            Payload::Record(record) => Some(record),
            Payload::Text(_) => None,
        }
    }

    pub fn into_record(self) -> Option<LogRecord> {
        match self {
            Payload::Record(record) => Some(*record),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Record(_) => None,
        }
    }
}

impl From<LogRecord> for Payload {
    fn from(record: LogRecord) -> Self {
        Payload::Record(Box::new(record))
    }
}

impl From<Payload> for Output {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::Record(record) => Output::Record(record),
            Payload::Text(text) => Output::Text(text),
        }
    }
}

pub trait OutputFn: Send + Sync {
    fn emit(&self, payload: Payload, piped: bool) -> Result<Output>;
}

impl<F> OutputFn for F
where
    F: Fn(Payload, bool) -> Result<Output> + Send + Sync,
{
    fn emit(&self, payload: Payload, piped: bool) -> Result<Output> {
        self(payload, piped)
    }
}

#[async_trait]
pub trait AsyncOutputFn: Send + Sync {
    async fn emit(&self, payload: Payload, piped: bool) -> Result<Output>;
}

/// Adapts a closure returning a future
pub(crate) struct AsyncClosure<F>(pub(crate) F);

#[async_trait]
impl<F, Fut> AsyncOutputFn for AsyncClosure<F>
where
    F: Fn(Payload, bool) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Output>> + Send + 'static,
{
    async fn emit(&self, payload: Payload, piped: bool) -> Result<Output> {
        (self.0)(payload, piped).await
    }
}

#[derive(Clone, Default)]
pub(crate) enum OutputStage {
    /// No output function configured: the payload passes through unchanged
    #[default]
    Identity,
    Sync(Arc<dyn OutputFn>),
    Async(Arc<dyn AsyncOutputFn>),
}

impl OutputStage {
    pub(crate) fn is_async(&self) -> bool {
        matches!(self, OutputStage::Async(_))
    }

    pub(crate) fn is_custom(&self) -> bool {
        !matches!(self, OutputStage::Identity)
    }

    fn invoke(&self, payload: Payload, piped: bool) -> Result<Output> {
        match self {
            OutputStage::Identity => Ok(payload.into()),
            OutputStage::Sync(output) => output.emit(payload, piped),
            OutputStage::Async(_) => Err(LoggerError::config(
                "output",
                "asynchronous output cannot run on the synchronous path",
            )),
        }
    }

    async fn invoke_async(&self, payload: Payload, piped: bool) -> Result<Output> {
        match self {
            OutputStage::Identity => Ok(payload.into()),
            OutputStage::Sync(output) => output.emit(payload, piped),
            OutputStage::Async(output) => output.emit(payload, piped).await,
        }
    }
}

/// Invokes the output function and writes what it returns
pub struct OutputResolver {
    stage: OutputStage,
    object_mode: bool,
    pretty: Option<PrettyOptions>,
    sink: Mutex<Box<dyn Sink>>,
    metrics: Arc<LoggerMetrics>,
}

impl OutputResolver {
    pub(crate) fn new(
        stage: OutputStage,
        object_mode: bool,
        pretty: Option<PrettyOptions>,
        sink: Box<dyn Sink>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        Self {
            stage,
            object_mode,
            pretty,
            sink: Mutex::new(sink),
            metrics,
        }
    }

    pub fn invoke(&self, payload: Payload, piped: bool) -> Result<Output> {
        self.stage.invoke(payload, piped)
    }

    pub async fn invoke_async(&self, payload: Payload, piped: bool) -> Result<Output> {
        self.stage.invoke_async(payload, piped).await
    }

    pub fn pretty(&self) -> Option<&PrettyOptions> {
        self.pretty.as_ref()
    }

    /// Turn an output into the message to write, if any.
    ///
    /// In object mode nothing is ever rendered: the output function owns the
    /// record.
    pub fn render(&self, output: Output) -> Result<Option<String>> {
        if self.object_mode {
            return Ok(None);
        }
        match output {
            Output::Text(text) => Ok(Some(text)),
            Output::Record(record) => match self.pretty {
                Some(ref options) => pretty_line(&record, options).map(Some),
                None => record.to_json_line().map(Some),
            },
            Output::Nothing => Ok(None),
        }
    }

    /// Render and write; returns whether anything reached the sink
    pub fn write(&self, output: Output) -> Result<bool> {
        match self.render(output)? {
            Some(message) => {
                self.sink.lock().write(&message)?;
                self.metrics.record_written();
                Ok(true)
            }
            None => {
                self.metrics.record_suppressed();
                Ok(false)
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    pub fn sink_name(&self) -> String {
        self.sink.lock().name().to_string()
    }
}

#[cfg(feature = "pretty")]
fn pretty_line(record: &LogRecord, options: &PrettyOptions) -> Result<String> {
    super::pretty::write_pretty(record, options)
}

#[cfg(not(feature = "pretty"))]
fn pretty_line(_record: &LogRecord, _options: &PrettyOptions) -> Result<String> {
    Err(LoggerError::config(
        "prettyPrint",
        "crate built without the `pretty` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::level::Level;
    use crate::core::record::Origin;
    use crate::sinks::MemorySink;

    fn record() -> LogRecord {
        let origin = Origin {
            application: "app".to_string(),
            hostname: "localhost".to_string(),
            pid: 7,
            process_name: "test".to_string(),
        };
        LogRecord::new(Level::Notice, "2018-05-18T16:25:57.815Z", "hi", "/a.rs", &origin)
    }

    fn resolver(stage: OutputStage, object_mode: bool, sink: &MemorySink) -> OutputResolver {
        OutputResolver::new(
            stage,
            object_mode,
            None,
            Box::new(sink.clone()),
            Arc::new(LoggerMetrics::new()),
        )
    }

    #[test]
    fn test_identity_writes_json_line() {
        let sink = MemorySink::new();
        let resolver = resolver(OutputStage::Identity, false, &sink);
        let output = resolver.invoke(record().into(), false).unwrap();
        assert!(resolver.write(output).unwrap());

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("{\"level\":\"notice\",\"severity\":5,"));
        assert!(messages[0].ends_with("}\n"));
    }

    #[test]
    fn test_text_written_verbatim() {
        let sink = MemorySink::new();
        let stage = OutputStage::Sync(Arc::new(|payload: Payload, _piped: bool| -> Result<Output> {
            let record = payload.into_record().unwrap();
            Ok(format!("{}|{}", record.level(), record.message).into())
        }));
        let resolver = resolver(stage, false, &sink);
        let output = resolver.invoke(record().into(), false).unwrap();
        resolver.write(output).unwrap();
        assert_eq!(sink.contents(), "notice|hi");
    }

    #[test]
    fn test_identity_passes_forwarded_text_through() {
        let sink = MemorySink::new();
        let resolver = resolver(OutputStage::Identity, false, &sink);
        let output = resolver
            .invoke(Payload::Text("rendered upstream\n".to_string()), true)
            .unwrap();
        assert_eq!(output, Output::Text("rendered upstream\n".to_string()));
        resolver.write(output).unwrap();
        assert_eq!(sink.contents(), "rendered upstream\n");
    }

    #[test]
    fn test_nothing_writes_nothing() {
        let sink = MemorySink::new();
        let stage = OutputStage::Sync(Arc::new(|_: Payload, _: bool| -> Result<Output> {
            Ok(Output::Nothing)
        }));
        let resolver = resolver(stage, false, &sink);
        let output = resolver.invoke(record().into(), false).unwrap();
        assert!(!resolver.write(output).unwrap());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_object_mode_never_writes() {
        let sink = MemorySink::new();
        let resolver = resolver(OutputStage::Identity, true, &sink);
        assert!(!resolver.write(record().into()).unwrap());
        assert!(!resolver.write("text".into()).unwrap());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_errors_propagate() {
        let sink = MemorySink::failing("disk full");
        let resolver = resolver(OutputStage::Identity, false, &sink);
        let err = resolver.write(record().into()).unwrap_err();
        assert!(matches!(err, LoggerError::Output(_)));
    }

    #[tokio::test]
    async fn test_async_stage_awaited() {
        let sink = MemorySink::new();
        let stage = OutputStage::Async(Arc::new(AsyncClosure(|payload: Payload, _piped: bool| async move {
            tokio::task::yield_now().await;
            let message = payload.as_record().map(|r| r.message.clone()).unwrap_or_default();
            Ok::<Output, LoggerError>(Output::Text(message))
        })));
        let resolver = resolver(stage.clone(), false, &sink);
        assert!(stage.is_async());
        assert!(resolver.invoke(record().into(), false).is_err());

        let output = resolver.invoke_async(record().into(), false).await.unwrap();
        resolver.write(output).unwrap();
        assert_eq!(sink.contents(), "hi");
    }
}
