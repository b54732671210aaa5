use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, RwLock};

use crate::message::AgentMessage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access message log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Per-run overview used by the run picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub pipeline_run_id: String,
    pub message_count: usize,
    pub first_at: DateTime<Utc>,
    pub last_at: DateTime<Utc>,
}

/// Append-only log of agent messages, partitioned by pipeline run.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, message: AgentMessage) -> Result<(), StoreError>;

    async fn get(&self, run_id: &str, id: &str) -> Result<Option<AgentMessage>, StoreError>;

    /// Messages of `run_id` in non-decreasing `created_at` order. Messages with
    /// equal timestamps keep insertion order. With `participant`, only messages
    /// it sent or received are returned.
    async fn list_by_run(
        &self,
        run_id: &str,
        participant: Option<&str>,
    ) -> Result<Vec<AgentMessage>, StoreError>;

    /// One summary per run, most recently active first.
    async fn list_runs(&self) -> Result<Vec<RunSummary>, StoreError>;
}

#[derive(Default)]
pub struct InMemoryMessageStore {
    messages: RwLock<Vec<AgentMessage>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store whose insertion order is the order of `messages`.
    pub fn from_messages(messages: Vec<AgentMessage>) -> Self {
        Self {
            messages: RwLock::new(messages),
        }
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn insert(&self, message: AgentMessage) -> Result<(), StoreError> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn get(&self, run_id: &str, id: &str) -> Result<Option<AgentMessage>, StoreError> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .find(|m| m.pipeline_run_id == run_id && m.id == id)
            .cloned())
    }

    async fn list_by_run(
        &self,
        run_id: &str,
        participant: Option<&str>,
    ) -> Result<Vec<AgentMessage>, StoreError> {
        let mut selected: Vec<AgentMessage> = {
            let messages = self.messages.read().await;
            messages
                .iter()
                .filter(|m| m.pipeline_run_id == run_id)
                .filter(|m| participant.map_or(true, |agent| m.involves(agent)))
                .cloned()
                .collect()
        };
        // stable: ties keep insertion order
        selected.sort_by_key(|m| m.created_at);
        Ok(selected)
    }

    async fn list_runs(&self) -> Result<Vec<RunSummary>, StoreError> {
        let messages = self.messages.read().await;
        let mut runs: HashMap<&str, RunSummary> = HashMap::new();
        for m in messages.iter() {
            runs.entry(m.pipeline_run_id.as_str())
                .and_modify(|run| {
                    run.message_count += 1;
                    run.first_at = run.first_at.min(m.created_at);
                    run.last_at = run.last_at.max(m.created_at);
                })
                .or_insert_with(|| RunSummary {
                    pipeline_run_id: m.pipeline_run_id.clone(),
                    message_count: 1,
                    first_at: m.created_at,
                    last_at: m.created_at,
                });
        }
        let mut runs: Vec<RunSummary> = runs.into_values().collect();
        runs.sort_by(|a, b| {
            b.last_at
                .cmp(&a.last_at)
                .then_with(|| a.pipeline_run_id.cmp(&b.pipeline_run_id))
        });
        Ok(runs)
    }
}

/// Message store backed by a JSON-lines file, one record per line.
///
/// The whole file is replayed into memory on open; inserts are appended to the
/// file before they become visible to readers.
pub struct JsonlMessageStore {
    path: PathBuf,
    memory: InMemoryMessageStore,
    writer: Mutex<()>,
}

impl JsonlMessageStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io { path: parent.to_path_buf(), source })?;
        }

        let messages = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                if !contents.is_empty() && !contents.ends_with('\n') {
                    terminate_last_line(&path).await?;
                }
                parse_lines(&path, &contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        tracing::info!(path = %path.display(), messages = messages.len(), "opened message log");

        Ok(Self {
            path,
            memory: InMemoryMessageStore::from_messages(messages),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Closes a torn trailing record so the next append starts on its own line.
async fn terminate_last_line(path: &Path) -> Result<(), StoreError> {
    tracing::warn!(path = %path.display(), "message log ends mid-record; terminating the last line");
    let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };
    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .await
        .map_err(io_err)?;
    file.write_all(b"\n").await.map_err(io_err)?;
    file.flush().await.map_err(io_err)
}

async fn write_record(file: &mut tokio::fs::File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

fn parse_lines(path: &Path, contents: &str) -> Vec<AgentMessage> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str::<AgentMessage>(line) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!(path = %path.display(), line = index + 1, error = %e, "skipping malformed message record");
                None
            }
        })
        .collect()
}

#[async_trait]
impl MessageStore for JsonlMessageStore {
    async fn insert(&self, message: AgentMessage) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');

        let _guard = self.writer.lock().await;
        let io_err = |source| StoreError::Io { path: self.path.clone(), source };
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        let start = file.metadata().await.map_err(io_err)?.len();
        if let Err(source) = write_record(&mut file, line.as_bytes()).await {
            if let Err(e) = file.set_len(start).await {
                tracing::error!(path = %self.path.display(), error = %e, "failed to roll back partial record");
            }
            return Err(io_err(source));
        }

        self.memory.insert(message).await
    }

    async fn get(&self, run_id: &str, id: &str) -> Result<Option<AgentMessage>, StoreError> {
        self.memory.get(run_id, id).await
    }

    async fn list_by_run(
        &self,
        run_id: &str,
        participant: Option<&str>,
    ) -> Result<Vec<AgentMessage>, StoreError> {
        self.memory.list_by_run(run_id, participant).await
    }

    async fn list_runs(&self) -> Result<Vec<RunSummary>, StoreError> {
        self.memory.list_runs().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::tests::message;

    fn ids(messages: &[AgentMessage]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[tokio::test]
    async fn equal_timestamps_keep_insertion_order() {
        let store = InMemoryMessageStore::new();
        store.insert(message("b", "r1", "a", None, 5)).await.unwrap();
        store.insert(message("a", "r1", "a", None, 5)).await.unwrap();
        store.insert(message("first", "r1", "a", None, 1)).await.unwrap();

        let listed = store.list_by_run("r1", None).await.unwrap();
        assert_eq!(ids(&listed), vec!["first", "b", "a"]);
    }

    #[tokio::test]
    async fn runs_are_isolated() {
        let store = InMemoryMessageStore::from_messages(vec![
            message("1", "r1", "a", None, 1),
            message("2", "r2", "a", None, 2),
        ]);
        assert_eq!(ids(&store.list_by_run("r2", None).await.unwrap()), vec!["2"]);
        assert!(store.get("r1", "2").await.unwrap().is_none());
        assert!(store.get("r2", "2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn run_summaries_most_recent_first() {
        let store = InMemoryMessageStore::from_messages(vec![
            message("1", "old", "a", None, 1),
            message("2", "new", "a", None, 50),
            message("3", "old", "a", None, 10),
        ]);
        let runs = store.list_runs().await.unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].pipeline_run_id, "new");
        assert_eq!(runs[1].pipeline_run_id, "old");
        assert_eq!(runs[1].message_count, 2);
        assert!(runs[1].first_at < runs[1].last_at);
    }

    #[tokio::test]
    async fn jsonl_store_replays_appended_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("messages.jsonl");

        let store = JsonlMessageStore::open(&path).await.unwrap();
        store.insert(message("1", "r1", "planner", Some("coder"), 1)).await.unwrap();
        store.insert(message("2", "r1", "coder", Some("planner"), 2)).await.unwrap();
        drop(store);

        let reopened = JsonlMessageStore::open(&path).await.unwrap();
        let listed = reopened.list_by_run("r1", Some("coder")).await.unwrap();
        assert_eq!(ids(&listed), vec!["1", "2"]);
        assert_eq!(listed[0], message("1", "r1", "planner", Some("coder"), 1));
    }

    #[tokio::test]
    async fn jsonl_store_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.jsonl");
        let good = serde_json::to_string(&message("ok", "r1", "a", None, 1)).unwrap();
        std::fs::write(&path, format!("{{not json\n\n{good}\n")).unwrap();

        let store = JsonlMessageStore::open(&path).await.unwrap();
        assert_eq!(ids(&store.list_by_run("r1", None).await.unwrap()), vec!["ok"]);
        assert_eq!(store.path(), path.as_path());
    }

    #[tokio::test]
    async fn torn_last_record_does_not_swallow_the_next_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.jsonl");
        let good = serde_json::to_string(&message("ok", "r1", "a", None, 1)).unwrap();
        std::fs::write(&path, format!("{good}\n{{\"id\":\"torn")).unwrap();

        let store = JsonlMessageStore::open(&path).await.unwrap();
        store.insert(message("next", "r1", "a", None, 2)).await.unwrap();
        drop(store);

        let reopened = JsonlMessageStore::open(&path).await.unwrap();
        assert_eq!(ids(&reopened.list_by_run("r1", None).await.unwrap()), vec!["ok", "next"]);
        assert!(std::fs::read_to_string(&path).unwrap().ends_with('\n'));
    }
}
