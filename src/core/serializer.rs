//! Serializer registry
//!
//! Call sites attach tagged payloads (`user`, `error`, `req`, `custom`, or any
//! user-defined tag) through [`LogInput`]. For every tag that has a registered
//! serializer, the serializer turns the payload into one or more
//! [`Placement`]s which are spliced into the record. Tags without a
//! serializer are ignored.

use super::error::{LoggerError, Result};
use super::record::LogRecord;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Replacement value for sensitive request headers
pub const REDACTED_HEADER: &str = "-- REMOVED FOR SAFETY --";

/// Headers never logged verbatim
const SENSITIVE_HEADERS: [&str; 2] = ["cookie", "authorization"];

/// Where a serialized value lands in the record
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub path: String,
    pub value: Value,
}

impl Placement {
    pub fn new(path: impl Into<String>, value: Value) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// A serializer yields either one placement or several
#[derive(Debug, Clone, PartialEq)]
pub enum Serialized {
    One(Placement),
    Many(Vec<Placement>),
}

impl From<Placement> for Serialized {
    fn from(placement: Placement) -> Self {
        Serialized::One(placement)
    }
}

impl From<Vec<Placement>> for Serialized {
    fn from(placements: Vec<Placement>) -> Self {
        Serialized::Many(placements)
    }
}

impl Serialized {
    fn apply(self, record: &mut LogRecord) -> Result<()> {
        match self {
            Serialized::One(placement) => record.assign(&placement.path, placement.value),
            Serialized::Many(placements) => placements
                .into_iter()
                .try_for_each(|placement| record.assign(&placement.path, placement.value)),
        }
    }
}

pub trait Serializer: Send + Sync {
    fn serialize(&self, value: &Value) -> Result<Serialized>;
}

impl<F> Serializer for F
where
    F: Fn(&Value) -> Result<Serialized> + Send + Sync,
{
    fn serialize(&self, value: &Value) -> Result<Serialized> {
        self(value)
    }
}

/// Mapping from input tag to serializer
#[derive(Clone)]
pub struct SerializerRegistry {
    serializers: HashMap<String, Arc<dyn Serializer>>,
}

impl SerializerRegistry {
    /// Registry without any serializer
    pub fn empty() -> Self {
        Self {
            serializers: HashMap::new(),
        }
    }

    /// Registry with the built-in `user`, `error`, `req` and `custom` serializers
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("user", serialize_user);
        registry.register("error", serialize_error);
        registry.register("req", serialize_request);
        registry.register("custom", serialize_custom);
        registry
    }

    /// Register a serializer, replacing any previous one under the same key
    pub fn register<S: Serializer + 'static>(&mut self, key: impl Into<String>, serializer: S) {
        self.serializers.insert(key.into(), Arc::new(serializer));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.serializers.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.serializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty()
    }

    /// Run every matching serializer over `input` and splice results into `record`
    pub fn apply(&self, record: &mut LogRecord, input: &LogInput) -> Result<()> {
        for (key, value) in input.iter() {
            if let Some(serializer) = self.serializers.get(key) {
                serializer.serialize(value)?.apply(record)?;
            }
        }
        Ok(())
    }
}

impl Default for SerializerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.serializers.keys().collect();
        keys.sort();
        f.debug_struct("SerializerRegistry")
            .field("keys", &keys)
            .finish()
    }
}

fn expect_object<'a>(key: &str, value: &'a Value) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| LoggerError::serializer(key, "expected an object"))
}

fn field(object: &Map<String, Value>, name: &str) -> Value {
    object.get(name).cloned().unwrap_or(Value::Null)
}

/// `user` -> `context.user` with `id` and `email`
pub fn serialize_user(value: &Value) -> Result<Serialized> {
    let user = expect_object("user", value)?;
    Ok(Placement::new(
        "context.user",
        json!({
            "id": field(user, "id"),
            "email": field(user, "email"),
        }),
    )
    .into())
}

/// `error` -> `event.error` with `name`, `message` and `backtrace`
pub fn serialize_error(value: &Value) -> Result<Serialized> {
    let error = expect_object("error", value)?;
    let backtrace = match error.get("stack").or_else(|| error.get("backtrace")) {
        Some(Value::String(stack)) if !stack.is_empty() => Value::String(stack.clone()),
        _ => Value::Null,
    };
    Ok(Placement::new(
        "event.error",
        json!({
            "name": field(error, "name"),
            "message": field(error, "message"),
            "backtrace": backtrace,
        }),
    )
    .into())
}

/// `req` -> `event.http_request`, with sensitive headers redacted
pub fn serialize_request(value: &Value) -> Result<Serialized> {
    let req = expect_object("req", value)?;
    let query_string = match req.get("query") {
        Some(query) => serde_json::to_string(query)?,
        None => "{}".to_string(),
    };
    let secure = req.get("secure").and_then(Value::as_bool).unwrap_or(false);
    let scheme = if secure { "https" } else { "http" };

    Ok(Placement::new(
        "event.http_request",
        json!({
            "headers": sanitize_headers(field(req, "headers")),
            "host": field(req, "hostname"),
            "method": field(req, "method"),
            "path": field(req, "path"),
            "query_string": query_string,
            "scheme": scheme,
        }),
    )
    .into())
}

/// `custom` -> `context.custom`, verbatim
pub fn serialize_custom(value: &Value) -> Result<Serialized> {
    Ok(Placement::new("context.custom", value.clone()).into())
}

/// Replace `cookie` and `authorization` header values, matching case-insensitively
pub fn sanitize_headers(headers: Value) -> Value {
    match headers {
        Value::Object(mut map) => {
            for (name, value) in map.iter_mut() {
                let sensitive = SENSITIVE_HEADERS
                    .iter()
                    .any(|header| name.eq_ignore_ascii_case(header));
                if sensitive && !value.is_null() {
                    *value = Value::String(REDACTED_HEADER.to_string());
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// User identity attached under the `user` tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserData {
    pub id: Value,
    pub email: Option<String>,
}

impl UserData {
    pub fn new(id: impl Into<Value>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: Some(email.into()),
        }
    }
}

/// Error description attached under the `error` tag
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorData {
    pub name: String,
    pub message: String,
    pub stack: Option<String>,
}

impl ErrorData {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Describe a Rust error; the stack is the rendered `source()` chain
    pub fn from_error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let name = std::any::type_name::<E>()
            .rsplit("::")
            .next()
            .unwrap_or("Error")
            .to_string();

        let mut stack = format!("{}: {}", name, error);
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            name,
            message: error.to_string(),
            stack: Some(stack),
        }
    }
}

/// HTTP request attached under the `req` tag
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HttpRequest {
    pub method: String,
    pub hostname: String,
    pub path: String,
    pub query: Map<String, Value>,
    pub secure: bool,
    pub headers: Map<String, Value>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            hostname: hostname.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), Value::String(value.into()));
        self
    }

    #[must_use]
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }
}

/// Tagged payloads supplied at the call site, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogInput {
    entries: Map<String, Value>,
}

impl LogInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a payload under an arbitrary tag
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn user(self, user: &UserData) -> Self {
        self.with(
            "user",
            json!({ "id": user.id, "email": user.email }),
        )
    }

    #[must_use]
    pub fn error(self, error: &ErrorData) -> Self {
        self.with(
            "error",
            json!({ "name": error.name, "message": error.message, "stack": error.stack }),
        )
    }

    #[must_use]
    pub fn request(self, req: &HttpRequest) -> Self {
        self.with(
            "req",
            json!({
                "method": req.method,
                "hostname": req.hostname,
                "path": req.path,
                "query": req.query,
                "secure": req.secure,
                "headers": req.headers,
            }),
        )
    }

    #[must_use]
    pub fn custom(self, value: impl Into<Value>) -> Self {
        self.with("custom", value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for LogInput {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}
