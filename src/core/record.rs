//! The canonical log record
//!
//! A `LogRecord` is born once per log call, travels through serializers,
//! middleware and the output stage, and is dropped after the final write.
//! `severity` is never stored: it is always derived from `level`.

use super::error::{LoggerError, Result};
use super::level::Level;
use super::path::assign_path;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Process and application identity stamped on every record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub application: String,
    pub hostname: String,
    pub pid: u32,
    pub process_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    level: Level,
    dt: String,
    pub message: String,
    /// `runtime`, `source`, `system` plus whatever serializers and middleware add
    pub context: Map<String, Value>,
    pub event: Map<String, Value>,
    /// Top-level keys added by middleware, emitted after `event`
    pub extra: Map<String, Value>,
}

impl LogRecord {
    /// Build a record from its call-site inputs
    pub fn new(
        level: Level,
        dt: impl Into<String>,
        message: impl Into<String>,
        file_name: &str,
        origin: &Origin,
    ) -> Self {
        let mut context = Map::new();
        context.insert(
            "runtime".to_string(),
            json!({ "application": origin.application }),
        );
        context.insert("source".to_string(), json!({ "file_name": file_name }));
        context.insert(
            "system".to_string(),
            json!({
                "hostname": origin.hostname,
                "pid": origin.pid,
                "process_name": origin.process_name,
            }),
        );

        Self {
            level,
            dt: dt.into(),
            message: message.into(),
            context,
            event: Map::new(),
            extra: Map::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn severity(&self) -> u8 {
        self.level.severity()
    }

    pub fn dt(&self) -> &str {
        &self.dt
    }

    /// Change the level; severity follows
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Originating file, as captured when the bound logger was created
    pub fn file_name(&self) -> Option<&str> {
        self.context
            .get("source")
            .and_then(|source| source.get("file_name"))
            .and_then(Value::as_str)
    }

    pub fn application(&self) -> Option<&str> {
        self.context
            .get("runtime")
            .and_then(|runtime| runtime.get("application"))
            .and_then(Value::as_str)
    }

    /// Splice `value` into the record at a dot-delimited path such as
    /// `event.error` or `context.user`.
    pub fn assign(&mut self, path: &str, value: Value) -> Result<()> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        match (head, rest) {
            ("level" | "severity" | "dt" | "message", _) => {
                Err(LoggerError::ReservedPath(path.to_string()))
            }
            ("context", Some(rest)) => assign_path(&mut self.context, rest, value),
            ("event", Some(rest)) => assign_path(&mut self.event, rest, value),
            ("context", None) => {
                self.context = into_object(path, value)?;
                Ok(())
            }
            ("event", None) => {
                self.event = into_object(path, value)?;
                Ok(())
            }
            _ => assign_path(&mut self.extra, path, value),
        }
    }

    /// Single-line JSON followed by a newline
    pub fn to_json_line(&self) -> Result<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn into_object(path: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoggerError::invalid_path(path, "value must be an object")),
    }
}

impl Serialize for LogRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(6 + self.extra.len()))?;
        map.serialize_entry("level", &self.level)?;
        map.serialize_entry("severity", &self.level.severity())?;
        map.serialize_entry("dt", &self.dt)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("context", &self.context)?;
        map.serialize_entry("event", &self.event)?;
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin {
            application: "svc".to_string(),
            hostname: "localhost".to_string(),
            pid: 36255,
            process_name: "worker".to_string(),
        }
    }

    fn record() -> LogRecord {
        LogRecord::new(
            Level::Info,
            "2018-05-18T16:25:57.815Z",
            "hello world",
            "/app/src/main.rs",
            &origin(),
        )
    }

    #[test]
    fn test_wire_format() {
        let line = record().to_json_line().unwrap();
        assert_eq!(
            line,
            "{\"level\":\"info\",\"severity\":6,\"dt\":\"2018-05-18T16:25:57.815Z\",\
             \"message\":\"hello world\",\"context\":{\"runtime\":{\"application\":\"svc\"},\
             \"source\":{\"file_name\":\"/app/src/main.rs\"},\
             \"system\":{\"hostname\":\"localhost\",\"pid\":36255,\"process_name\":\"worker\"}},\
             \"event\":{}}\n"
        );
    }

    #[test]
    fn test_severity_follows_level() {
        let mut record = record();
        assert_eq!(record.severity(), 6);
        record.set_level(Level::Alert);
        assert_eq!(record.severity(), 1);
        assert_eq!(record.to_value().unwrap()["severity"], 1);
    }

    #[test]
    fn test_assign_routes_by_head() {
        let mut record = record();
        record.assign("context.user", json!({"id": 1})).unwrap();
        record.assign("event.error.name", json!("Error")).unwrap();
        record.assign("middleware", json!(true)).unwrap();

        assert_eq!(record.context["user"], json!({"id": 1}));
        assert_eq!(record.event["error"], json!({"name": "Error"}));
        assert_eq!(record.extra["middleware"], json!(true));
        // fixed keys survive
        assert!(record.context.contains_key("runtime"));
        assert!(record.context.contains_key("system"));
    }

    #[test]
    fn test_reserved_paths() {
        let mut record = record();
        assert!(matches!(
            record.assign("severity", json!(0)),
            Err(LoggerError::ReservedPath(_))
        ));
        assert!(matches!(
            record.assign("level.x", json!(0)),
            Err(LoggerError::ReservedPath(_))
        ));
        assert_eq!(record.severity(), 6);
    }

    #[test]
    fn test_extra_keys_follow_event() {
        let mut record = record();
        record.assign("zeta", json!(1)).unwrap();
        let line = record.to_json_line().unwrap();
        assert!(line.ends_with("\"event\":{},\"zeta\":1}\n"));
    }

    #[test]
    fn test_accessors() {
        let record = record();
        assert_eq!(record.file_name(), Some("/app/src/main.rs"));
        assert_eq!(record.application(), Some("svc"));
        assert_eq!(record.dt(), "2018-05-18T16:25:57.815Z");
    }
}
