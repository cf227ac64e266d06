//! In-memory publisher
//!
//! 用于单元测试的 mock 实现，支持注入失败场景。

use std::sync::{Arc, Mutex, PoisonError};

use contracts::{ContractError, Record, StreamPublisher};
use tracing::debug;

/// Publisher that captures published payloads in memory, in arrival order.
///
/// Can be told to fail its next N publish calls to exercise failure
/// policies; a failed call captures nothing.
pub struct MemoryPublisher {
    name: String,
    captured: Arc<Mutex<Vec<Record>>>,
    remaining_failures: usize,
    closed: bool,
}

impl MemoryPublisher {
    /// Create a publisher named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            captured: Arc::new(Mutex::new(Vec::new())),
            remaining_failures: 0,
            closed: false,
        }
    }

    /// Fail the next `n` publish calls before behaving normally again.
    pub fn with_transient_failures(mut self, n: usize) -> Self {
        self.remaining_failures = n;
        self
    }

    /// Shared handle to the captured payloads; clones see later publishes.
    pub fn captured(&self) -> Arc<Mutex<Vec<Record>>> {
        Arc::clone(&self.captured)
    }

    /// Snapshot of everything published so far.
    pub fn published(&self) -> Vec<Record> {
        self.captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StreamPublisher for MemoryPublisher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn publish(&mut self, records: &[Record]) -> Result<(), ContractError> {
        if self.closed {
            return Err(ContractError::publisher_write(&self.name, "closed"));
        }
        if self.remaining_failures > 0 {
            self.remaining_failures -= 1;
            return Err(ContractError::publisher_write(
                &self.name,
                "injected transient failure",
            ));
        }

        let mut captured = self
            .captured
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        captured.extend_from_slice(records);
        debug!(
            publisher = %self.name,
            records = records.len(),
            total = captured.len(),
            "batch captured"
        );
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ContractError> {
        self.closed = true;
        Ok(())
    }
}
