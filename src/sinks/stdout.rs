//! Standard output sink

use crate::core::{Result, Sink};
use std::io::Write;

/// Writes rendered records to the process standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn write(&mut self, message: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(message.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}
