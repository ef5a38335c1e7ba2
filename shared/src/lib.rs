use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub mod buckets;
pub mod routes;

pub use buckets::{Bucket, Bucketed, TaskBuckets};

/// Identifier assigned by the control plane.
///
/// The API has emitted both integer ids and hex object ids over time, so this
/// accepts either and keeps the textual form used in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(id) => Self::from(id),
            Raw::Text(id) => Self(id),
        })
    }
}

/// Reads a string field that the control plane may send as `null`.
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub created: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub color: String,
}

impl App {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Lifecycle of a task as reported by the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TaskStatus {
    #[default]
    Authoring,
    InProgress,
    Completed,
    /// A status this client does not know about, kept verbatim.
    Other(String),
}

impl TaskStatus {
    pub fn as_wire(&self) -> &str {
        match self {
            TaskStatus::Authoring => "authoring",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Other(raw) => raw,
        }
    }

    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "authoring" => TaskStatus::Authoring,
            // Older control planes used the column key as the status.
            "in-progress" | "inProgress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            other => TaskStatus::Other(other.to_string()),
        }
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            TaskStatus::Authoring => Bucket::Authoring,
            TaskStatus::InProgress => Bucket::InProgress,
            TaskStatus::Completed => Bucket::Completed,
            TaskStatus::Other(raw) => Bucket::Other(raw.clone()),
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_wire(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// `None` for a draft that only exists in the browser.
    #[serde(default)]
    pub id: Option<RecordId>,
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub created: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "nullable_string")]
    pub color: String,
    #[serde(default)]
    pub progress: Option<i64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub completed_date: String,
}

impl Task {
    pub const DRAFT_TITLE: &'static str = "New Task";
    pub const DRAFT_DESCRIPTION: &'static str = "Describe what you want to build...";
    pub const DRAFT_COLOR: &'static str = "from-yellow-400 to-yellow-500";

    /// A not-yet-persisted task for the authoring column.
    pub fn draft(created: impl Into<String>) -> Self {
        Self {
            id: None,
            title: Self::DRAFT_TITLE.to_string(),
            description: Self::DRAFT_DESCRIPTION.to_string(),
            created: created.into(),
            status: TaskStatus::Authoring,
            color: Self::DRAFT_COLOR.to_string(),
            progress: None,
            completed_date: String::new(),
        }
    }

    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Progress to draw as a bar, if any. Zero counts as no progress.
    pub fn progress_percent(&self) -> Option<u8> {
        match self.progress {
            Some(0) | None => None,
            Some(value) => Some(value.clamp(0, 100) as u8),
        }
    }

    pub fn completed_on(&self) -> Option<&str> {
        if self.completed_date.is_empty() {
            None
        } else {
            Some(&self.completed_date)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogMessage {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Update,
    ToolExecution,
}

impl LogKind {
    pub fn label(self) -> &'static str {
        match self {
            LogKind::Update => "Update",
            LogKind::ToolExecution => "Tool Execution",
        }
    }
}

impl LogMessage {
    pub fn kind(&self) -> LogKind {
        if self.title == "update" {
            LogKind::Update
        } else {
            LogKind::ToolExecution
        }
    }
}

/// Execution log snapshot for one task. Each snapshot supersedes the last.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Log {
    #[serde(rename = "taskID", alias = "taskId", default)]
    pub task_id: String,
    #[serde(default)]
    pub messages: Vec<LogMessage>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in both name and description")]
    MissingAppFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppRequest {
    pub name: String,
    pub description: String,
}

impl CreateAppRequest {
    /// Both fields must contain something other than whitespace. Values are
    /// sent as typed.
    pub fn new(name: &str, description: &str) -> Result<Self, ValidationError> {
        if name.trim().is_empty() || description.trim().is_empty() {
            return Err(ValidationError::MissingAppFields);
        }
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
        })
    }
}

/// Body for creating a task or editing its content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskContentRequest {
    pub title: String,
    pub description: String,
}

/// Body that hands a task over for execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitTaskRequest {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

impl SubmitTaskRequest {
    pub fn for_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: TaskStatus::InProgress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn app_accepts_integer_and_string_ids() {
        let numeric: App = serde_json::from_value(json!({
            "id": 1, "name": "Demo", "description": "d",
            "created": "2024-01-01", "status": "Active", "color": "c"
        }))
        .unwrap();
        assert_eq!(numeric.id, RecordId::new("1"));
        assert!(numeric.is_active());

        let hex: App = serde_json::from_value(json!({
            "id": "665f1c2ab1e3", "name": "Other", "status": "active",
            "created": "2024-06-04T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(hex.id, RecordId::new("665f1c2ab1e3"));
        assert_eq!(hex.color, "");
        assert!(hex.is_active());
    }

    #[test]
    fn status_maps_wire_values() {
        let task: Task = serde_json::from_value(json!({
            "id": 5, "title": "T1", "description": "...", "status": "in-progress",
            "created": "2024-01-02", "color": "c", "progress": 40, "completedDate": ""
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.status.bucket(), Bucket::InProgress);
        assert_eq!(task.progress_percent(), Some(40));
        assert_eq!(task.completed_on(), None);

        assert_eq!(
            TaskStatus::from_wire("paused"),
            TaskStatus::Other("paused".to_string())
        );
        assert_eq!(TaskStatus::Other("paused".into()).as_wire(), "paused");
    }

    #[test]
    fn task_tolerates_control_plane_shape() {
        let task: Task = serde_json::from_value(json!({
            "title": "Build login",
            "description": "Add a login page",
            "appId": "665f1c2ab1e3",
            "id": "665f1c2ab1e4",
            "status": "completed",
            "created": "2024-06-04T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(task.id, Some(RecordId::new("665f1c2ab1e4")));
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.progress, None);
    }

    #[test]
    fn null_strings_read_as_empty() {
        let tasks: Vec<Task> = serde_json::from_value(json!([
            { "id": 1, "title": "A", "status": "authoring", "completedDate": null },
            { "id": 2, "title": "B", "status": "completed", "description": null,
              "completedDate": "2024-02-01" }
        ]))
        .unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].completed_on(), None);
        assert_eq!(tasks[1].description, "");
        assert_eq!(tasks[1].completed_on(), Some("2024-02-01"));

        let app: App = serde_json::from_value(json!({
            "id": 3, "name": "Demo", "status": null, "color": null
        }))
        .unwrap();
        assert_eq!(app.status, "");
        assert!(!app.is_active());
    }

    #[test]
    fn column_key_spelling_is_in_progress() {
        assert_eq!(TaskStatus::from_wire("inProgress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::InProgress.as_wire(), "in-progress");
    }

    #[test]
    fn progress_bar_only_for_nonzero_values() {
        let mut task = Task::draft("2024-01-01");
        assert_eq!(task.progress_percent(), None);
        task.progress = Some(0);
        assert_eq!(task.progress_percent(), None);
        task.progress = Some(140);
        assert_eq!(task.progress_percent(), Some(100));
        task.completed_date = "2024-02-01".into();
        assert_eq!(task.completed_on(), Some("2024-02-01"));
    }

    #[test]
    fn draft_has_no_id_and_authoring_status() {
        let draft = Task::draft("2024-03-03");
        assert!(draft.is_draft());
        assert_eq!(draft.status, TaskStatus::Authoring);
        assert_eq!(draft.title, "New Task");
        assert_eq!(draft.created, "2024-03-03");
    }

    #[test]
    fn log_accepts_both_task_id_spellings() {
        let pushed: Log = serde_json::from_str(
            r#"{"taskID":"5","messages":[{"time":"t1","title":"tool","text":"ran build"}]}"#,
        )
        .unwrap();
        assert_eq!(pushed.task_id, "5");
        assert_eq!(pushed.messages.len(), 1);
        assert_eq!(pushed.messages[0].kind(), LogKind::ToolExecution);
        assert_eq!(pushed.messages[0].kind().label(), "Tool Execution");

        let stored: Log = serde_json::from_value(json!({
            "id": "abc", "taskId": "665f", "messages": [{"title": "update", "text": "done"}]
        }))
        .unwrap();
        assert_eq!(stored.task_id, "665f");
        assert_eq!(stored.messages[0].kind(), LogKind::Update);
        assert_eq!(stored.messages[0].time, "");
    }

    #[test]
    fn create_app_rejects_blank_fields() {
        assert_eq!(
            CreateAppRequest::new("   ", "something"),
            Err(ValidationError::MissingAppFields)
        );
        assert_eq!(
            CreateAppRequest::new("Name", "\n\t"),
            Err(ValidationError::MissingAppFields)
        );
        let request = CreateAppRequest::new(" Shop ", "sells things").unwrap();
        assert_eq!(request.name, " Shop ");
    }

    #[test]
    fn submit_request_sets_in_progress_on_the_wire() {
        let mut task = Task::draft("2024-01-01");
        task.title = "Ship".into();
        let body = serde_json::to_value(SubmitTaskRequest::for_task(&task)).unwrap();
        assert_eq!(
            body,
            json!({"title": "Ship", "description": Task::DRAFT_DESCRIPTION, "status": "in-progress"})
        );
    }
}
