use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::store::{MessageStore, RunSummary};

/// A message exchanged between two agents of a pipeline run, as persisted.
///
/// Records are append-only. `parent_id` always names an earlier message of the
/// same run; [`MessageService::append`] refuses anything else.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub id: String,
    pub pipeline_run_id: String,
    pub from_agent: String,
    pub from_role: String,
    #[serde(default)]
    pub to_agent: Option<String>,
    #[serde(default)]
    pub to_role: Option<String>,
    pub message_type: String, // "request", "response", "error", ... (open set)
    pub content: Value,
    pub phase: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl AgentMessage {
    /// True when `agent` sent or received this message.
    pub fn involves(&self, agent: &str) -> bool {
        self.from_agent == agent || self.to_agent.as_deref() == Some(agent)
    }

    pub fn projection(&self) -> MessageProjection {
        MessageProjection {
            id: self.id.clone(),
            from_agent: self.from_agent.clone(),
            from_role: self.from_role.clone(),
            to_agent: self.to_agent.clone(),
            message_type: self.message_type.clone(),
            content: self.content.clone(),
            phase: self.phase.clone(),
            parent_id: self.parent_id.clone(),
            created_at: self.created_at,
        }
    }
}

/// The subset of a message returned to clients for rendering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageProjection {
    pub id: String,
    pub from_agent: String,
    pub from_role: String,
    pub to_agent: Option<String>,
    pub message_type: String,
    pub content: Value,
    pub phase: String,
    pub parent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageListResponse {
    pub messages: Vec<MessageProjection>,
    pub total: usize,
}

/// Query string of `GET /api/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub pipeline_run_id: Option<String>,
    pub agent: Option<String>,
}

/// Body of `POST /api/pipeline-runs/{run_id}/messages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub from_agent: String,
    pub from_role: String,
    #[serde(default)]
    pub to_agent: Option<String>,
    #[serde(default)]
    pub to_role: Option<String>,
    pub message_type: String,
    #[serde(default)]
    pub content: Value,
    pub phase: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Read and append operations over the message log of pipeline runs.
#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Returns every message of the run, oldest first.
    ///
    /// With an agent filter the result holds the messages that agent sent OR
    /// received. The store is not consulted when the run id is missing.
    pub async fn list(&self, query: &MessageQuery) -> ApiResult<MessageListResponse> {
        let run_id = query
            .pipeline_run_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::InvalidRequest("pipelineRunId is required".to_string()))?;
        let agent = query.agent.as_deref().filter(|a| !a.is_empty());

        let messages: Vec<MessageProjection> = self
            .store
            .list_by_run(run_id, agent)
            .await?
            .iter()
            .map(AgentMessage::projection)
            .collect();

        tracing::debug!(run_id, agent, total = messages.len(), "listed messages");
        let total = messages.len();
        Ok(MessageListResponse { messages, total })
    }

    /// Appends a message to a run, assigning its id and (if absent) its timestamp.
    pub async fn append(&self, run_id: &str, new: NewMessage) -> ApiResult<MessageProjection> {
        let run_id = run_id.trim();
        if run_id.is_empty() {
            return Err(ApiError::InvalidRequest("pipelineRunId is required".to_string()));
        }
        for (field, value) in [
            ("fromAgent", &new.from_agent),
            ("fromRole", &new.from_role),
            ("messageType", &new.message_type),
            ("phase", &new.phase),
        ] {
            if value.trim().is_empty() {
                return Err(ApiError::InvalidRequest(format!("{field} must not be empty")));
            }
        }

        if let Some(parent_id) = new.parent_id.as_deref() {
            if self.store.get(run_id, parent_id).await?.is_none() {
                return Err(ApiError::InvalidRequest(format!(
                    "parentId {parent_id} is not a message of run {run_id}"
                )));
            }
        }

        let message = AgentMessage {
            id: Uuid::new_v4().to_string(),
            pipeline_run_id: run_id.to_string(),
            from_agent: new.from_agent,
            from_role: new.from_role,
            to_agent: new.to_agent.filter(|a| !a.is_empty()),
            to_role: new.to_role,
            message_type: new.message_type,
            content: new.content,
            phase: new.phase,
            parent_id: new.parent_id,
            created_at: new.created_at.unwrap_or_else(Utc::now),
            metadata: new.metadata,
        };
        let projection = message.projection();
        self.store.insert(message).await?;

        tracing::info!(
            run_id,
            message_id = %projection.id,
            from = %projection.from_agent,
            message_type = %projection.message_type,
            "appended message"
        );
        Ok(projection)
    }

    pub async fn runs(&self) -> ApiResult<Vec<RunSummary>> {
        Ok(self.store.list_runs().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::store::{InMemoryMessageStore, StoreError};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn message(id: &str, run: &str, from: &str, to: Option<&str>, secs: i64) -> AgentMessage {
        AgentMessage {
            id: id.to_string(),
            pipeline_run_id: run.to_string(),
            from_agent: from.to_string(),
            from_role: from.to_string(),
            to_agent: to.map(str::to_string),
            to_role: None,
            message_type: "request".to_string(),
            content: json!(format!("{from} says hi")),
            phase: "plan".to_string(),
            parent_id: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            metadata: Some(json!({ "tokens": 12 })),
        }
    }

    fn service_with(messages: Vec<AgentMessage>) -> MessageService {
        MessageService::new(Arc::new(InMemoryMessageStore::from_messages(messages)))
    }

    fn ids(response: &MessageListResponse) -> Vec<&str> {
        response.messages.iter().map(|m| m.id.as_str()).collect()
    }

    fn query(run: &str, agent: Option<&str>) -> MessageQuery {
        MessageQuery {
            pipeline_run_id: Some(run.to_string()),
            agent: agent.map(str::to_string),
        }
    }

    #[derive(Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MessageStore for CountingStore {
        async fn insert(&self, _message: AgentMessage) -> Result<(), StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn get(&self, _run_id: &str, _id: &str) -> Result<Option<AgentMessage>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
        async fn list_by_run(
            &self,
            _run_id: &str,
            _participant: Option<&str>,
        ) -> Result<Vec<AgentMessage>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
        async fn list_runs(&self) -> Result<Vec<RunSummary>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn planner_coder_scenario() {
        let service = service_with(vec![
            message("1", "r1", "planner", Some("coder"), 1),
            message("2", "r1", "coder", Some("planner"), 2),
        ]);

        let all = service.list(&query("r1", None)).await.unwrap();
        assert_eq!(ids(&all), vec!["1", "2"]);
        assert_eq!(all.total, 2);

        let coder = service.list(&query("r1", Some("coder"))).await.unwrap();
        assert_eq!(ids(&coder), vec!["1", "2"]);

        let reviewer = service.list(&query("r1", Some("reviewer"))).await.unwrap();
        assert_eq!(reviewer.total, 0);
        assert!(reviewer.messages.is_empty());
    }

    #[tokio::test]
    async fn agent_filter_is_sender_or_recipient() {
        let service = service_with(vec![
            message("a", "r1", "x", Some("y"), 1),
            message("b", "r1", "y", Some("x"), 2),
            message("c", "r1", "y", Some("z"), 3),
            message("d", "r1", "x", None, 4),
        ]);
        let result = service.list(&query("r1", Some("x"))).await.unwrap();
        assert_eq!(ids(&result), vec!["a", "b", "d"]);
        assert_eq!(result.total, 3);
    }

    #[tokio::test]
    async fn orders_by_created_at_regardless_of_insertion() {
        let service = service_with(vec![
            message("t3", "r1", "a", None, 30),
            message("t1", "r1", "a", None, 10),
            message("t2", "r1", "a", None, 20),
        ]);
        let result = service.list(&query("r1", None)).await.unwrap();
        assert_eq!(ids(&result), vec!["t1", "t2", "t3"]);
    }

    #[tokio::test]
    async fn repeated_reads_are_identical() {
        let service = service_with(vec![
            message("1", "r1", "a", Some("b"), 5),
            message("2", "r1", "b", Some("a"), 5),
            message("3", "r2", "a", Some("b"), 1),
        ]);
        let first = service.list(&query("r1", None)).await.unwrap();
        let second = service.list(&query("r1", None)).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn missing_or_blank_run_id_never_reaches_the_store() {
        let store = Arc::new(CountingStore::default());
        let service = MessageService::new(store.clone());

        for run in [None, Some(""), Some("   ")] {
            let q = MessageQuery {
                pipeline_run_id: run.map(str::to_string),
                agent: Some("x".to_string()),
            };
            let err = service.list(&q).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidRequest(_)));
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn projection_hides_internal_fields() {
        let service = service_with(vec![message("1", "r1", "a", Some("b"), 1)]);
        let result = service.list(&query("r1", None)).await.unwrap();
        let value = serde_json::to_value(&result.messages[0]).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("fromAgent"));
        assert!(object.contains_key("createdAt"));
        assert!(!object.contains_key("metadata"));
        assert!(!object.contains_key("pipelineRunId"));
    }

    fn new_message(parent: Option<&str>) -> NewMessage {
        NewMessage {
            from_agent: "coder-1".to_string(),
            from_role: "coder".to_string(),
            to_agent: Some("planner-1".to_string()),
            to_role: Some("planner".to_string()),
            message_type: "response".to_string(),
            content: json!({ "diff": "+1 -0" }),
            phase: "implement".to_string(),
            parent_id: parent.map(str::to_string),
            created_at: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn append_assigns_id_and_keeps_content_verbatim() {
        let service = service_with(Vec::new());
        let stored = service.append("r9", new_message(None)).await.unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(stored.content, json!({ "diff": "+1 -0" }));

        let listed = service.list(&query("r9", None)).await.unwrap();
        assert_eq!(listed.messages, vec![stored]);
    }

    #[tokio::test]
    async fn append_rejects_parent_from_another_run() {
        let service = service_with(vec![message("p", "other", "a", None, 1)]);
        let err = service.append("r1", new_message(Some("p"))).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));

        let reply_service = service_with(vec![message("p", "r1", "a", None, 1)]);
        let reply = reply_service.append("r1", new_message(Some("p"))).await.unwrap();
        assert_eq!(reply.parent_id.as_deref(), Some("p"));
    }

    #[tokio::test]
    async fn append_rejects_blank_required_fields() {
        let service = service_with(Vec::new());
        let mut blank = new_message(None);
        blank.from_role = " ".to_string();
        let err = service.append("r1", blank).await.unwrap_err();
        assert_eq!(err.to_string(), "fromRole must not be empty");
    }
}
