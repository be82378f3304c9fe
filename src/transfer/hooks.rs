//! Caller-supplied hooks around copy and paste

use crate::error::TransferError;
use crate::models::{ClipboardPayload, TableSnapshot};
use async_trait::async_trait;

/// Injection points in the copy, paste and export pipelines
///
/// Every method has a pass-through default, so implementors only override
/// what they need. Returning an error from a hook aborts the pipeline.
#[async_trait(?Send)]
pub trait TransferHooks {
    /// Rewrite the snapshot before it is serialized (copy and export)
    async fn before_copy(&self, snapshot: TableSnapshot) -> anyhow::Result<TableSnapshot> {
        Ok(snapshot)
    }

    /// Observe the snapshot that was written (copy and export)
    async fn after_copy(&self, _snapshot: &TableSnapshot) -> anyhow::Result<()> {
        Ok(())
    }

    /// Rewrite the raw clipboard payload before it is decoded
    async fn before_paste(&self, payload: ClipboardPayload) -> anyhow::Result<ClipboardPayload> {
        Ok(payload)
    }

    /// Observe the decoded snapshot before it is handed to the sink
    async fn after_paste(&self, _snapshot: &TableSnapshot) -> anyhow::Result<()> {
        Ok(())
    }

    /// Observe a pipeline failure before it is returned
    fn on_error(&self, _error: &TransferError) {}
}

/// Hooks that do nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl TransferHooks for NoHooks {}
