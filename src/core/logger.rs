//! Main logger implementation
//!
//! A log call flows through: record construction, serializers, the
//! middleware chain, and the output function. The root of a pipe chain
//! writes the result to its sink; a piped logger hands it to its parent,
//! which runs its own middleware and output on it with `piped = true`.

use super::{
    bound::BoundLogger,
    clock::{Clock, SystemClock},
    error::{LoggerError, Result},
    identity::{IdentityProvider, SystemIdentity},
    level::Level,
    metrics::LoggerMetrics,
    middleware::{AsyncMiddleware, Middleware, MiddlewareChain},
    options::{ExecutionMode, LoggerOptions, MinLevel, PrettyOptions},
    output::{AsyncClosure, Output, OutputResolver, OutputStage, Payload},
    record::{LogRecord, Origin},
    serializer::{LogInput, Serializer, SerializerRegistry},
    sink::Sink,
};
use crate::sinks::StdoutSink;
use std::future::Future;
use std::panic::Location;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

/// Application name used when none is configured
pub const DEFAULT_APP_NAME: &str = "Logality";

/// Future returned by asynchronous log calls
pub type LogFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

pub struct Logger {
    origin: Origin,
    mode: ExecutionMode,
    /// Records with a greater severity are dropped
    threshold: u8,
    clock: Arc<dyn Clock>,
    serializers: SerializerRegistry,
    middleware: MiddlewareChain,
    output: OutputResolver,
    /// Set at most once, by `pipe()` on the parent
    parent: OnceLock<Arc<Logger>>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a synchronous logger writing JSON lines to stdout
    #[must_use]
    pub fn new() -> Arc<Self> {
        LoggerBuilder::new().assemble()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use logality::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .app_name("svc")
    ///     .min_level(Level::Notice)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(logger.app_name(), "svc");
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Bind a logging handle to the caller's source file.
    ///
    /// The path is resolved once here and reused by every call made through
    /// the returned handle.
    #[track_caller]
    pub fn get(self: &Arc<Self>) -> BoundLogger {
        let file_name = Location::caller().file();
        self.get_for(file_name)
    }

    /// Bind a logging handle to an explicit source path
    pub fn get_for(self: &Arc<Self>, file_name: impl Into<String>) -> BoundLogger {
        BoundLogger::new(Arc::clone(self), file_name.into())
    }

    pub fn app_name(&self) -> &str {
        &self.origin.application
    }

    pub fn hostname(&self) -> &str {
        &self.origin.hostname
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn is_async(&self) -> bool {
        self.mode == ExecutionMode::Async
    }

    /// Numeric severity threshold
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn serializers(&self) -> &SerializerRegistry {
        &self.serializers
    }

    /// Append a synchronous middleware to the chain
    pub fn use_middleware<F>(&self, middleware: F)
    where
        F: Fn(&mut LogRecord, bool) -> Result<()> + Send + Sync + 'static,
    {
        self.middleware.push(middleware);
    }

    /// Append a middleware implemented as a type
    pub fn use_handler<M: Middleware + 'static>(&self, middleware: M) {
        self.middleware.push(middleware);
    }

    /// Append an asynchronous middleware; only asynchronous loggers accept one
    pub fn use_async_middleware<M: AsyncMiddleware + 'static>(&self, middleware: M) -> Result<()> {
        self.middleware.push_async(middleware)
    }

    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    /// The logger this one forwards to, if piped
    pub fn parent(&self) -> Option<&Arc<Logger>> {
        self.parent.get()
    }

    pub fn is_piped(&self) -> bool {
        self.parent.get().is_some()
    }

    /// Make this logger the forwarding parent of `child`
    pub fn pipe(self: &Arc<Self>, child: &Arc<Logger>) -> Result<()> {
        self.pipe_all([child])
    }

    /// Make this logger the forwarding parent of every logger in `children`.
    ///
    /// All targets are validated before any link is made. A logger listed
    /// twice is rejected as already piped.
    pub fn pipe_all<'a, I>(self: &Arc<Self>, children: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Arc<Logger>>,
    {
        let children: Vec<&Arc<Logger>> = children.into_iter().collect();
        for (i, child) in children.iter().enumerate() {
            self.check_pipe(child)?;
            if children[..i].iter().any(|seen| Arc::ptr_eq(seen, child)) {
                return Err(LoggerError::AlreadyPiped(child.app_name().to_string()));
            }
        }
        for child in children {
            child
                .parent
                .set(Arc::clone(self))
                .map_err(|_| LoggerError::AlreadyPiped(child.app_name().to_string()))?;
        }
        Ok(())
    }

    fn check_pipe(self: &Arc<Self>, child: &Arc<Logger>) -> Result<()> {
        if child.is_piped() {
            return Err(LoggerError::AlreadyPiped(child.app_name().to_string()));
        }
        if !child.is_async() && self.is_async() {
            return Err(LoggerError::config(
                "pipe",
                "a synchronous logger cannot be piped into an asynchronous one",
            ));
        }

        let mut ancestor = Some(self);
        while let Some(current) = ancestor {
            if Arc::ptr_eq(current, child) {
                return Err(LoggerError::pipe_cycle(child.app_name(), self.app_name()));
            }
            ancestor = current.parent();
        }
        Ok(())
    }

    /// Render a record the way pretty mode would, without touching it
    #[cfg(feature = "pretty")]
    pub fn write_pretty(&self, record: &LogRecord, options: &PrettyOptions) -> Result<String> {
        super::pretty::write_pretty(record, options)
    }

    pub fn flush(&self) -> Result<()> {
        self.output.flush()
    }

    /// Build the record for one call; `None` when the threshold drops it
    fn prepare(
        &self,
        file_name: &str,
        level: Level,
        message: String,
        input: Option<&LogInput>,
    ) -> Result<Option<LogRecord>> {
        if !level.passes(self.threshold) {
            self.metrics.record_filtered();
            return Ok(None);
        }

        let mut record = LogRecord::new(level, self.clock.timestamp(), message, file_name, &self.origin);
        if let Some(input) = input {
            self.serializers.apply(&mut record, input)?;
        }
        Ok(Some(record))
    }

    pub(crate) fn log_sync(
        &self,
        file_name: &str,
        level: Level,
        message: String,
        input: Option<LogInput>,
    ) -> Result<()> {
        if self.is_async() {
            return Err(LoggerError::ModeMismatch(self.app_name().to_string()));
        }

        let result = match self.prepare(file_name, level, message, input.as_ref()) {
            Ok(Some(record)) => self.dispatch(record.into(), false),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        if result.is_err() {
            self.metrics.record_failed();
        }
        result
    }

    pub(crate) fn log_async<'a>(
        &'a self,
        file_name: &'a str,
        level: Level,
        message: String,
        input: Option<LogInput>,
    ) -> LogFuture<'a> {
        Box::pin(async move {
            let result = match self.prepare(file_name, level, message, input.as_ref()) {
                Ok(Some(record)) => self.dispatch_async(record.into(), false).await,
                Ok(None) => Ok(()),
                Err(e) => Err(e),
            };
            if result.is_err() {
                self.metrics.record_failed();
            }
            result
        })
    }

    /// Middleware (records only), then output, then delivery
    fn dispatch(&self, mut payload: Payload, piped: bool) -> Result<()> {
        if let Payload::Record(record) = &mut payload {
            self.middleware.run(record, piped)?;
        }
        let output = self.output.invoke(payload, piped)?;
        self.deliver(output)
    }

    fn deliver(&self, output: Output) -> Result<()> {
        let Some(parent) = self.parent() else {
            return self.output.write(output).map(|_| ());
        };
        match forwardable(output) {
            Some(payload) => {
                self.metrics.record_forwarded();
                parent.dispatch(payload, true)
            }
            None => {
                self.metrics.record_suppressed();
                Ok(())
            }
        }
    }

    fn dispatch_async(&self, mut payload: Payload, piped: bool) -> LogFuture<'_> {
        Box::pin(async move {
            if let Payload::Record(record) = &mut payload {
                self.middleware.run_async(record, piped).await?;
            }
            let output = self.output.invoke_async(payload, piped).await?;
            self.deliver_async(output).await
        })
    }

    fn deliver_async(&self, output: Output) -> LogFuture<'_> {
        Box::pin(async move {
            let Some(parent) = self.parent() else {
                return self.output.write(output).map(|_| ());
            };
            match forwardable(output) {
                Some(payload) => {
                    self.metrics.record_forwarded();
                    parent.dispatch_async(payload, true).await
                }
                None => {
                    self.metrics.record_suppressed();
                    Ok(())
                }
            }
        })
    }
}

/// What a piped logger hands to its parent; `None` stops propagation
fn forwardable(output: Output) -> Option<Payload> {
    match output {
        Output::Record(record) => Some(Payload::Record(record)),
        Output::Text(text) => Some(Payload::Text(text)),
        Output::Nothing => None,
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("app_name", &self.origin.application)
            .field("mode", &self.mode)
            .field("threshold", &self.threshold)
            .field("middleware", &self.middleware)
            .field("serializers", &self.serializers)
            .field("sink", &self.output.sink_name())
            .field("parent", &self.parent().map(|p| p.app_name().to_string()))
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use logality::prelude::*;
///
/// let logger = Logger::builder()
///     .app_name("svc")
///     .async_mode()
///     .async_output(|payload, _piped| async move { Ok(Output::from(payload)) })
///     .sink(MemorySink::new())
///     .build()
///     .unwrap();
/// assert!(logger.is_async());
/// ```
pub struct LoggerBuilder {
    app_name: String,
    hostname: Option<String>,
    mode: ExecutionMode,
    object_mode: bool,
    pretty: Option<PrettyOptions>,
    min_level: Option<MinLevel>,
    output: OutputStage,
    serializers: SerializerRegistry,
    sink: Option<Box<dyn Sink>>,
    clock: Arc<dyn Clock>,
    identity: Arc<dyn IdentityProvider>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            hostname: None,
            mode: ExecutionMode::Sync,
            object_mode: false,
            pretty: None,
            min_level: None,
            output: OutputStage::Identity,
            serializers: SerializerRegistry::with_defaults(),
            sink: None,
            clock: Arc::new(SystemClock),
            identity: Arc::new(SystemIdentity),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Override the hostname reported in `context.system`
    #[must_use = "builder methods return a new value"]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Render records for humans instead of JSON lines
    #[must_use = "builder methods return a new value"]
    pub fn pretty_print(mut self, options: PrettyOptions) -> Self {
        self.pretty = Some(options);
        self
    }

    /// Log calls return futures and may run asynchronous stages
    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self) -> Self {
        self.mode = ExecutionMode::Async;
        self
    }

    /// The output function receives the record and nothing is written automatically.
    /// Requires an output function.
    #[must_use = "builder methods return a new value"]
    pub fn object_mode(mut self) -> Self {
        self.object_mode = true;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, min_level: impl Into<MinLevel>) -> Self {
        self.min_level = Some(min_level.into());
        self
    }

    /// Replace the final output step
    #[must_use = "builder methods return a new value"]
    pub fn output<F>(mut self, output: F) -> Self
    where
        F: Fn(Payload, bool) -> Result<Output> + Send + Sync + 'static,
    {
        self.output = OutputStage::Sync(Arc::new(output));
        self
    }

    /// Replace the final output step with an asynchronous function.
    /// Requires [`async_mode`](Self::async_mode).
    #[must_use = "builder methods return a new value"]
    pub fn async_output<F, Fut>(mut self, output: F) -> Self
    where
        F: Fn(Payload, bool) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Output>> + Send + 'static,
    {
        self.output = OutputStage::Async(Arc::new(AsyncClosure(output)));
        self
    }

    /// Register a serializer, overriding a built-in one with the same key
    #[must_use = "builder methods return a new value"]
    pub fn serializer<S: Serializer + 'static>(mut self, key: impl Into<String>, serializer: S) -> Self {
        self.serializers.register(key, serializer);
        self
    }

    /// Where the root logger writes; stdout by default
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn identity<I: IdentityProvider + 'static>(mut self, identity: I) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    /// Apply deserialized construction options
    #[must_use = "builder methods return a new value"]
    pub fn options(mut self, options: LoggerOptions) -> Self {
        if let Some(app_name) = options.app_name {
            self.app_name = app_name;
        }
        if let Some(hostname) = options.hostname {
            self.hostname = Some(hostname);
        }
        if let Some(pretty) = options.pretty_print {
            self.pretty = pretty.into_options();
        }
        if options.async_mode {
            self.mode = ExecutionMode::Async;
        }
        if options.object_mode {
            self.object_mode = true;
        }
        if let Some(min_level) = options.min_level {
            self.min_level = Some(min_level);
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.object_mode && !self.output.is_custom() {
            return Err(LoggerError::config(
                "objectMode",
                "object mode requires an output function",
            ));
        }
        if self.mode == ExecutionMode::Sync && self.output.is_async() {
            return Err(LoggerError::config(
                "output",
                "an asynchronous output function requires async mode",
            ));
        }
        if cfg!(not(feature = "pretty")) && self.pretty.is_some() {
            return Err(LoggerError::config(
                "prettyPrint",
                "crate built without the `pretty` feature",
            ));
        }
        Ok(())
    }

    /// Build the Logger
    pub fn build(self) -> Result<Arc<Logger>> {
        self.validate()?;
        Ok(self.assemble())
    }

    fn assemble(self) -> Arc<Logger> {
        let origin = Origin {
            application: self.app_name,
            hostname: self
                .hostname
                .unwrap_or_else(|| self.identity.hostname()),
            pid: self.identity.pid(),
            process_name: self.identity.process_name(),
        };
        let metrics = Arc::new(LoggerMetrics::new());
        let sink = self.sink.unwrap_or_else(|| Box::new(StdoutSink::new()));
        let threshold = self
            .min_level
            .map(MinLevel::threshold)
            .unwrap_or(Level::Debug.severity());

        Arc::new(Logger {
            origin,
            mode: self.mode,
            threshold,
            clock: self.clock,
            serializers: self.serializers,
            middleware: MiddlewareChain::new(self.mode),
            output: OutputResolver::new(
                self.output,
                self.object_mode,
                self.pretty,
                sink,
                Arc::clone(&metrics),
            ),
            parent: OnceLock::new(),
            metrics,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<LoggerOptions> for LoggerBuilder {
    fn from(options: LoggerOptions) -> Self {
        LoggerBuilder::new().options(options)
    }
}
