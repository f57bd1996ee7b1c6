//! # Logality
//!
//! Structured JSON logging with a middleware pipeline, pluggable
//! serializers and logger-to-logger piping.
//!
//! ## Features
//!
//! - **Structured Records**: Every call produces one JSON line with a fixed
//!   field order (`level`, `severity`, `dt`, `message`, `context`, `event`)
//! - **Serializers**: Named inputs (`user`, `error`, `req`, `custom`) are
//!   turned into placements on the record
//! - **Middleware**: Ordered, mutating stages that run before output
//! - **Piping**: Child loggers forward their records to a parent, which
//!   alone writes
//! - **Sync or Async**: Pick the execution mode per logger
//! - **Pretty Output**: Colored human-readable rendering behind the
//!   `pretty` feature
//!
//! ## Example
//!
//! ```
//! use logality::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .app_name("svc")
//!     .sink(sink.clone())
//!     .build()
//!     .unwrap();
//!
//! let log = logger.get();
//! log.info("service started", None).unwrap();
//! assert_eq!(sink.len(), 1);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        BoundLogger, ErrorData, ExecutionMode, HttpRequest, Level, LogInput, LogRecord, Logger,
        LoggerBuilder, LoggerError, LoggerOptions, MinLevel, Output, Payload, PrettyOptions,
        Result, UserData,
    };
    pub use crate::sinks::{MemorySink, StdoutSink};
}

pub use crate::core::{
    assign_path, AsyncMiddleware, AsyncOutputFn, BoundLogger, Clock, ErrorData, ExecutionMode,
    FixedClock, HttpRequest, IdentityProvider, Level, LogFuture, LogInput, LogRecord, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, LoggerOptions, Middleware, MiddlewareChain,
    MinLevel, Origin, Output, OutputFn, Payload, Placement, PrettyOptions, PrettyPrint, Result,
    Serialized, Serializer, SerializerRegistry, Sink, StaticIdentity, SystemClock,
    SystemIdentity, UserData, DEFAULT_APP_NAME, REDACTED_HEADER,
};
#[cfg(feature = "pretty")]
pub use crate::core::write_pretty;
pub use crate::sinks::{MemorySink, StdoutSink};
