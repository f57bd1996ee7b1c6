//! Core logger types and traits

pub mod bound;
pub mod clock;
pub mod error;
pub mod identity;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod middleware;
pub mod options;
pub mod output;
pub mod path;
#[cfg(feature = "pretty")]
pub mod pretty;
pub mod record;
pub mod serializer;
pub mod sink;

pub use bound::BoundLogger;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{LoggerError, Result};
pub use identity::{IdentityProvider, StaticIdentity, SystemIdentity};
pub use level::Level;
pub use logger::{LogFuture, Logger, LoggerBuilder, DEFAULT_APP_NAME};
pub use metrics::LoggerMetrics;
pub use middleware::{AsyncMiddleware, Middleware, MiddlewareChain};
pub use options::{ExecutionMode, LoggerOptions, MinLevel, PrettyOptions, PrettyPrint};
pub use output::{AsyncOutputFn, Output, OutputFn, Payload};
pub use path::assign_path;
#[cfg(feature = "pretty")]
pub use pretty::write_pretty;
pub use record::{LogRecord, Origin};
pub use serializer::{
    ErrorData, HttpRequest, LogInput, Placement, Serialized, Serializer, SerializerRegistry,
    UserData, REDACTED_HEADER,
};
pub use sink::Sink;
