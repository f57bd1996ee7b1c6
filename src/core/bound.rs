//! Logging handle bound to one source file

use super::error::Result;
use super::level::Level;
use super::logger::{LogFuture, Logger};
use super::serializer::LogInput;
use std::sync::Arc;

/// Handle returned by [`Logger::get`]; every record it emits carries the
/// bound file name in `context.source.file_name`.
#[derive(Clone)]
pub struct BoundLogger {
    logger: Arc<Logger>,
    file_name: Arc<str>,
}

macro_rules! level_shortcuts {
    ($($name:ident, $name_async:ident => $level:expr;)+) => {
        $(
            #[doc = concat!("Log at `", stringify!($name), "` level")]
            pub fn $name(
                &self,
                message: impl Into<String>,
                input: Option<LogInput>,
            ) -> Result<()> {
                self.log_level($level, message, input)
            }

            #[doc = concat!("Log at `", stringify!($name), "` level on an asynchronous logger")]
            pub fn $name_async(
                &self,
                message: impl Into<String>,
                input: Option<LogInput>,
            ) -> LogFuture<'_> {
                self.log_level_async($level, message, input)
            }
        )+
    };
}

impl BoundLogger {
    pub(crate) fn new(logger: Arc<Logger>, file_name: String) -> Self {
        Self {
            logger,
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    /// Log with a level given by name.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidLevel`](super::LoggerError::InvalidLevel)
    /// when the name is unknown, before any other work is done.
    pub fn log(
        &self,
        level: &str,
        message: impl Into<String>,
        input: Option<LogInput>,
    ) -> Result<()> {
        let level: Level = level.parse()?;
        self.log_level(level, message, input)
    }

    pub fn log_level(
        &self,
        level: Level,
        message: impl Into<String>,
        input: Option<LogInput>,
    ) -> Result<()> {
        self.logger
            .log_sync(&self.file_name, level, message.into(), input)
    }

    /// Asynchronous counterpart of [`log`](Self::log). An unknown level name
    /// is reported immediately rather than through the future.
    pub fn log_async(
        &self,
        level: &str,
        message: impl Into<String>,
        input: Option<LogInput>,
    ) -> Result<LogFuture<'_>> {
        let level: Level = level.parse()?;
        Ok(self.log_level_async(level, message, input))
    }

    pub fn log_level_async(
        &self,
        level: Level,
        message: impl Into<String>,
        input: Option<LogInput>,
    ) -> LogFuture<'_> {
        self.logger
            .log_async(&self.file_name, level, message.into(), input)
    }

    level_shortcuts! {
        emergency, emergency_async => Level::Emergency;
        alert, alert_async => Level::Alert;
        critical, critical_async => Level::Critical;
        error, error_async => Level::Error;
        warn, warn_async => Level::Warn;
        notice, notice_async => Level::Notice;
        info, info_async => Level::Info;
        debug, debug_async => Level::Debug;
    }
}

impl std::fmt::Debug for BoundLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundLogger")
            .field("app_name", &self.logger.app_name())
            .field("file_name", &self.file_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::sinks::MemorySink;

    #[test]
    fn test_get_binds_caller_file() {
        let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
        let log = logger.get();
        assert!(log.file_name().ends_with("bound.rs"));
    }

    #[test]
    fn test_invalid_level_name() {
        let sink = MemorySink::new();
        let logger = Logger::builder().sink(sink.clone()).build().unwrap();
        let log = logger.get_for("/app.rs");

        let err = log.log("verbose", "x", None).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(ref l) if l == "verbose"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shortcuts_use_their_level() {
        let sink = MemorySink::new();
        let logger = Logger::builder().sink(sink.clone()).build().unwrap();
        let log = logger.get_for("/app.rs");

        log.warn("careful", None).unwrap();
        log.log("warning", "alias", None).unwrap();

        for line in sink.messages() {
            let value: serde_json::Value = serde_json::from_str(&line).unwrap();
            assert_eq!(value["level"], "warn");
            assert_eq!(value["severity"], 4);
        }
        assert_eq!(sink.len(), 2);
    }

    #[tokio::test]
    async fn test_async_shortcut() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .async_mode()
            .sink(sink.clone())
            .build()
            .unwrap();
        let log = logger.get_for("/app.rs");

        log.notice_async("hi", Some(LogInput::new().custom(1))).await.unwrap();
        assert!(log.log_async("nope", "x", None).is_err());
        assert_eq!(sink.len(), 1);
    }
}
