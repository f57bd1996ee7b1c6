//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level name not present in the severity table
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Dot-path could not be walked or assigned
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Dot-path targets a field derived by the logger itself
    #[error("Path '{0}' is reserved and cannot be assigned")]
    ReservedPath(String),

    /// Serializer rejected its input
    #[error("Serializer '{key}' failed: {message}")]
    Serializer { key: String, message: String },

    /// Middleware aborted the pipeline
    #[error("Middleware error: {0}")]
    Middleware(String),

    /// Output function failed
    #[error("Output error: {0}")]
    Output(String),

    /// Pipe target already has a parent
    #[error("Logger '{0}' is already piped to another parent")]
    AlreadyPiped(String),

    /// Pipe would make a logger its own ancestor
    #[error("Piping '{child}' into '{parent}' would create a cycle")]
    PipeCycle { child: String, parent: String },

    /// Synchronous entry point used on an asynchronous logger
    #[error("Logger '{0}' is asynchronous, use the *_async entry points")]
    ModeMismatch(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(level.into())
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LoggerError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a serializer error for the given input key
    pub fn serializer(key: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Serializer {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a middleware error
    pub fn middleware<S: Into<String>>(msg: S) -> Self {
        LoggerError::Middleware(msg.into())
    }

    /// Create an output error
    pub fn output<S: Into<String>>(msg: S) -> Self {
        LoggerError::Output(msg.into())
    }

    /// Create a pipe cycle error
    pub fn pipe_cycle(child: impl Into<String>, parent: impl Into<String>) -> Self {
        LoggerError::PipeCycle {
            child: child.into(),
            parent: parent.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("verbose");
        assert!(matches!(err, LoggerError::InvalidLevel(_)));

        let err = LoggerError::config("LoggerBuilder", "objectMode requires an output function");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::serializer("user", "expected an object");
        assert!(matches!(err, LoggerError::Serializer { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("verbose");
        assert_eq!(err.to_string(), "Invalid log level: 'verbose'");

        let err = LoggerError::invalid_path("context.user.id", "'user' is not an object");
        assert_eq!(
            err.to_string(),
            "Invalid path 'context.user.id': 'user' is not an object"
        );

        let err = LoggerError::pipe_cycle("child", "parent");
        assert_eq!(
            err.to_string(),
            "Piping 'child' into 'parent' would create a cycle"
        );

        let err = LoggerError::AlreadyPiped("child".to_string());
        assert_eq!(
            err.to_string(),
            "Logger 'child' is already piped to another parent"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LoggerError = json_err.into();
        assert!(matches!(err, LoggerError::JsonError(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }
}
