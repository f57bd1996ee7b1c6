//! Sink trait for the final write of rendered records

use super::error::Result;

/// Destination of rendered records. Only the root of a pipe chain writes.
pub trait Sink: Send + Sync {
    /// Write one already-rendered message, newline included
    fn write(&mut self, message: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
