//! InitBoard command

use crate::context::KanbanContext;
use crate::error::{KanbanError, Result};
use crate::ops::{async_trait, Execute, ExecutionResult, Operation, Value};
use crate::types::{BoardMeta, LogEntry};
use serde::{Deserialize, Serialize};

/// Initialize a new board store
#[derive(Debug, Deserialize, Serialize)]
pub struct InitBoard {
    /// The board name
    pub name: String,
    /// Optional board description
    pub description: Option<String>,
}

impl InitBoard {
    /// Create a new InitBoard command
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Operation for InitBoard {
    fn verb(&self) -> &'static str {
        "init"
    }
    fn noun(&self) -> &'static str {
        "board"
    }
}

#[async_trait]
impl Execute<KanbanContext, KanbanError> for InitBoard {
    async fn execute(&self, ctx: &KanbanContext) -> ExecutionResult<Value, KanbanError> {
        let start = std::time::Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);

        let result: Result<Value> = async {
            if ctx.is_initialized() {
                return Err(KanbanError::AlreadyExists {
                    path: ctx.root().to_path_buf(),
                });
            }

            ctx.create_directories().await?;

            let mut meta = BoardMeta::new(self.name.clone());
            if let Some(description) = &self.description {
                meta = meta.with_description(description.clone());
            }
            ctx.write_board_meta(&meta).await?;

            Ok(serde_json::to_value(&meta)?)
        }
        .await;

        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(value) => ExecutionResult::Logged {
                value: value.clone(),
                log_entry: LogEntry::new(self.op_string(), input, value, None, duration_ms),
            },
            Err(error) => ExecutionResult::Failed {
                error,
                log_entry: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_board() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".stride"));

        let result = InitBoard::new("Atlas")
            .with_description("Launch board")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(result["name"], "Atlas");
        assert_eq!(result["description"], "Launch board");
        assert!(ctx.is_initialized());
        assert!(ctx.tasks_dir().exists());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = KanbanContext::new(temp.path().join(".stride"));

        InitBoard::new("Atlas")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let result = InitBoard::new("Atlas").execute(&ctx).await.into_result();
        assert!(matches!(result, Err(KanbanError::AlreadyExists { .. })));
    }
}
