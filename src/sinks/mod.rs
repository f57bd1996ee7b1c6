//! Sink implementations

pub mod memory;
pub mod stdout;

pub use memory::MemorySink;
pub use stdout::StdoutSink;

// Re-export the trait next to its implementations
pub use crate::core::Sink;
