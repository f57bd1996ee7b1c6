//! In-memory sink
//!
//! Keeps every written message. Clones share the same buffer, so a test can
//! hand one clone to the logger and inspect the other.

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
    fail_with: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes always fail with the given message
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            messages: Arc::default(),
            fail_with: Some(message.into()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Everything written so far, concatenated
    pub fn contents(&self) -> String {
        self.messages.lock().concat()
    }

    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&mut self, message: &str) -> Result<()> {
        if let Some(ref reason) = self.fail_with {
            return Err(LoggerError::output(reason.clone()));
        }
        self.messages.lock().push(message.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();
        writer.write("one\n").unwrap();
        writer.write("two\n").unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.contents(), "one\ntwo\n");
        sink.clear();
        assert!(writer.is_empty());
    }

    #[test]
    fn test_failing_sink() {
        let mut sink = MemorySink::failing("420");
        let err = sink.write("x").unwrap_err();
        assert!(matches!(err, LoggerError::Output(ref m) if m == "420"));
        assert!(sink.is_empty());
    }
}
