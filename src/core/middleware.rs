//! Middleware chain
//!
//! Middleware run in registration order, one after the other, on the record
//! of a single log call. Each receives the record mutably plus the `piped`
//! flag. The chain is append-only; a run works on a snapshot so that
//! registrations never block, or are observed halfway through, a log call.

use super::error::{LoggerError, Result};
use super::options::ExecutionMode;
use super::record::LogRecord;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

/// Synchronous middleware
pub trait Middleware: Send + Sync {
    fn handle(&self, record: &mut LogRecord, piped: bool) -> Result<()>;
}

impl<F> Middleware for F
where
    F: Fn(&mut LogRecord, bool) -> Result<()> + Send + Sync,
{
    fn handle(&self, record: &mut LogRecord, piped: bool) -> Result<()> {
        self(record, piped)
    }
}

/// Asynchronous middleware, only accepted by asynchronous loggers
///
/// # Example
///
/// ```
/// use logality::{AsyncMiddleware, LogRecord, Result};
/// use async_trait::async_trait;
///
/// struct TagRegion;
///
/// #[async_trait]
/// impl AsyncMiddleware for TagRegion {
///     async fn handle(&self, record: &mut LogRecord, _piped: bool) -> Result<()> {
///         record.assign("context.region", "eu-west-1".into())
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncMiddleware: Send + Sync {
    async fn handle(&self, record: &mut LogRecord, piped: bool) -> Result<()>;
}

#[derive(Clone)]
enum Stage {
    Sync(Arc<dyn Middleware>),
    Async(Arc<dyn AsyncMiddleware>),
}

pub struct MiddlewareChain {
    mode: ExecutionMode,
    stages: RwLock<Vec<Stage>>,
}

impl MiddlewareChain {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            stages: RwLock::new(Vec::new()),
        }
    }

    /// Append a synchronous middleware
    pub fn push<M: Middleware + 'static>(&self, middleware: M) {
        self.stages.write().push(Stage::Sync(Arc::new(middleware)));
    }

    /// Append an asynchronous middleware; fails on a synchronous chain
    pub fn push_async<M: AsyncMiddleware + 'static>(&self, middleware: M) -> Result<()> {
        if self.mode == ExecutionMode::Sync {
            return Err(LoggerError::config(
                "middleware",
                "asynchronous middleware requires an asynchronous logger",
            ));
        }
        self.stages.write().push(Stage::Async(Arc::new(middleware)));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Stage> {
        self.stages.read().clone()
    }

    /// Run the chain without suspension; the first error aborts the rest
    pub fn run(&self, record: &mut LogRecord, piped: bool) -> Result<()> {
        for stage in self.snapshot() {
            match stage {
                Stage::Sync(middleware) => middleware.handle(record, piped)?,
                Stage::Async(_) => {
                    return Err(LoggerError::config(
                        "middleware",
                        "asynchronous middleware cannot run on the synchronous path",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Run the chain, awaiting each asynchronous stage before the next
    pub async fn run_async(&self, record: &mut LogRecord, piped: bool) -> Result<()> {
        for stage in self.snapshot() {
            match stage {
                Stage::Sync(middleware) => middleware.handle(record, piped)?,
                Stage::Async(middleware) => middleware.handle(record, piped).await?,
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("mode", &self.mode)
            .field("len", &self.len())
            .finish()
    }
}
