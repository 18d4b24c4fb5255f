//! KanbanContext - I/O primitives for the task store
//!
//! The context provides access to storage and utilities. No business logic
//! methods, just data access primitives. Commands do all the work.
//!
//! One `.stride` directory is one board. Task documents are individual JSON
//! files; operation logs are JSONL and append-only - a task's log survives
//! deletion of its document as the audit trail.

use crate::error::{KanbanError, Result};
use crate::types::{BoardMeta, LogEntry, Task, TaskId, WorkspaceId};
use fs2::FileExt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Context passed to every command - provides access, not logic
pub struct KanbanContext {
    /// Path to the .stride directory
    root: PathBuf,
}

impl KanbanContext {
    /// Create a new context for the given .stride directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a context by finding the .stride directory upward from a
    /// starting path
    pub fn find(start: impl AsRef<Path>) -> Result<Self> {
        let mut current = start.as_ref().to_path_buf();

        loop {
            let stride_dir = current.join(".stride");
            if stride_dir.is_dir() {
                return Ok(Self::new(stride_dir));
            }

            if !current.pop() {
                return Err(KanbanError::NotInitialized {
                    path: start.as_ref().to_path_buf(),
                });
            }
        }
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root .stride directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to board.json
    pub fn board_path(&self) -> PathBuf {
        self.root.join("board.json")
    }

    /// Path to the tasks directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    /// Path to a task's JSON document
    pub fn task_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }

    /// Path to a task's operation log
    pub fn task_log_path(&self, id: &TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.jsonl", id))
    }

    /// Path to the activity directory
    pub fn activity_dir(&self) -> PathBuf {
        self.root.join("activity")
    }

    /// Path to the current activity log
    pub fn activity_path(&self) -> PathBuf {
        self.activity_dir().join("current.jsonl")
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Check if the board is initialized
    pub fn is_initialized(&self) -> bool {
        self.board_path().exists()
    }

    /// Create the directory structure for a new board.
    /// Idempotent - safe to call multiple times.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        fs::create_dir_all(self.tasks_dir()).await?;
        fs::create_dir_all(self.activity_dir()).await?;
        Ok(())
    }

    // =========================================================================
    // Board metadata I/O
    // =========================================================================

    /// Read the board metadata file
    pub async fn read_board_meta(&self) -> Result<BoardMeta> {
        let path = self.board_path();
        if !path.exists() {
            return Err(KanbanError::NotInitialized {
                path: self.root.clone(),
            });
        }

        let content = fs::read_to_string(&path).await?;
        let meta: BoardMeta = serde_json::from_str(&content)?;
        Ok(meta)
    }

    /// Write the board metadata file (atomic write via temp file)
    pub async fn write_board_meta(&self, meta: &BoardMeta) -> Result<()> {
        let content = serde_json::to_string_pretty(meta)?;
        atomic_write(&self.board_path(), content.as_bytes()).await
    }

    // =========================================================================
    // Task I/O
    // =========================================================================

    /// Read a task document
    pub async fn read_task(&self, id: &TaskId) -> Result<Task> {
        let path = self.task_path(id);
        if !path.exists() {
            return Err(KanbanError::TaskNotFound { id: id.to_string() });
        }

        let content = fs::read_to_string(&path).await?;
        let task: Task = serde_json::from_str(&content)?;
        Ok(task)
    }

    /// Write a task document (atomic write via temp file)
    pub async fn write_task(&self, task: &Task) -> Result<()> {
        let content = serde_json::to_string_pretty(task)?;
        atomic_write(&self.task_path(&task.id), content.as_bytes()).await
    }

    /// Delete a task document. The task's operation log is left in place.
    pub async fn delete_task_document(&self, id: &TaskId) -> Result<()> {
        let path = self.task_path(id);
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    /// List all task IDs by reading the tasks directory
    pub async fn list_task_ids(&self) -> Result<Vec<TaskId>> {
        let tasks_dir = self.tasks_dir();
        if !tasks_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&tasks_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(TaskId::from_string(stem));
                }
            }
        }

        Ok(ids)
    }

    /// Read all task documents
    pub async fn read_all_tasks(&self) -> Result<Vec<Task>> {
        let ids = self.list_task_ids().await?;
        let mut tasks = Vec::with_capacity(ids.len());

        for id in ids {
            tasks.push(self.read_task(&id).await?);
        }

        Ok(tasks)
    }

    /// Read all tasks belonging to one workspace
    pub async fn read_workspace_tasks(&self, workspace: &WorkspaceId) -> Result<Vec<Task>> {
        let tasks = self.read_all_tasks().await?;
        Ok(tasks
            .into_iter()
            .filter(|task| &task.workspace == workspace)
            .collect())
    }

    // =========================================================================
    // Activity logging
    // =========================================================================

    /// Append a log entry to the global activity log
    pub async fn append_activity(&self, entry: &LogEntry) -> Result<()> {
        self.append_log(&self.activity_path(), entry).await
    }

    /// Append a log entry to a task's log
    pub async fn append_task_log(&self, task_id: &TaskId, entry: &LogEntry) -> Result<()> {
        self.append_log(&self.task_log_path(task_id), entry).await
    }

    /// Append a log entry to a JSONL file
    async fn append_log(&self, path: &Path, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// Read activity log entries, newest first
    pub async fn read_activity(&self, limit: Option<usize>) -> Result<Vec<LogEntry>> {
        let path = self.activity_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).await?;
        let mut entries: Vec<LogEntry> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();

        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }

    // =========================================================================
    // Locking
    // =========================================================================

    /// Try to acquire the store's exclusive lock (non-blocking).
    /// Multi-document writers hold this for the duration of their batch.
    pub async fn lock(&self) -> Result<KanbanLock> {
        let lock_path = self.lock_path();

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(KanbanLock { file }),
            Err(_) => Err(KanbanError::LockBusy),
        }
    }
}

/// RAII lock guard - releases on drop
pub struct KanbanLock {
    file: std::fs::File,
}

impl Drop for KanbanLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename is atomic on the same filesystem
    fs::rename(&temp_path, path).await?;

    Ok(())
}
