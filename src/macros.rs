//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a [`BoundLogger`](crate::BoundLogger) and format the
//! message like `format!`. They log without serializer input and evaluate
//! to the `Result` of the call.
//!
//! # Examples
//!
//! ```
//! use logality::prelude::*;
//! use logality::info;
//!
//! let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
//! let log = logger.get();
//!
//! info!(log, "Server started").unwrap();
//!
//! let port = 8080;
//! info!(log, "Server listening on port {}", port).unwrap();
//! ```

/// Log a message at the given [`Level`](crate::Level).
///
/// # Examples
///
/// ```
/// # use logality::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// # let log = logger.get();
/// use logality::log;
/// log!(log, Level::Notice, "Simple message").unwrap();
/// log!(log, Level::Error, "Error code: {}", 500).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_level($level, format!($($arg)+), None)
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Emergency, $($arg)+)
    };
}

#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Alert, $($arg)+)
    };
}

#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Critical, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use logality::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// # let log = logger.get();
/// use logality::error;
/// error!(log, "Failed to connect to {}", "db-1").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! notice {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Notice, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use logality::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// # let log = logger.get();
/// use logality::debug;
/// debug!(log, "Counter value: {}", 10).unwrap();
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn test_macros_format_and_level() {
        let sink = MemorySink::new();
        let logger = Logger::builder().sink(sink.clone()).build().unwrap();
        let log = logger.get_for("/macros.rs");

        crate::warn!(log, "disk at {}%", 91).unwrap();
        crate::log!(log, Level::Alert, "plain").unwrap();

        let lines = sink.messages();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(first["message"], "disk at 91%");
        assert_eq!(first["level"], "warn");
        let second: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(second["severity"], 1);
    }
}
