//! Runs commands and routes their log entries

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{Execute, Operation, Value};
use crate::types::TaskId;

/// Executes commands against a context, appending logged results to the
/// global activity log and, for entries that name a task, to that task's
/// own log. Optionally attributes every entry to an actor.
#[derive(Debug, Default)]
pub struct KanbanOperationProcessor {
    actor: Option<String>,
}

impl KanbanOperationProcessor {
    /// Create a processor with no actor attribution
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor attributing operations to the given actor
    pub fn with_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
        }
    }

    /// Execute a command, persist its log entry, and return its value
    pub async fn process<O>(&self, op: &O, ctx: &KanbanContext) -> Result<Value>
    where
        O: Execute<KanbanContext, KanbanError> + Operation + Sync,
    {
        tracing::debug!(op = %op.op_string(), "executing");

        let (value, log_entry) = op.execute(ctx).await.split();

        if let Some(mut entry) = log_entry {
            if let Some(actor) = &self.actor {
                entry = entry.with_actor(actor.clone());
            }
            ctx.append_activity(&entry).await?;

            // Entries whose output names a single task also land in that
            // task's own log.
            if let Ok(output) = &value {
                if let Some(id) = output.get("id").and_then(Value::as_str) {
                    ctx.append_task_log(&TaskId::from_string(id), &entry).await?;
                }
            }
        }

        if let Err(error) = &value {
            tracing::warn!(op = %op.op_string(), %error, "operation failed");
        }

        value
    }
}
