// src/models.rs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// --- LESSON MODELS (wire format of the grading service) ---

/// A lesson as returned by `GET /lessons/{token}` and by the reset/submit endpoints.
///
/// The command list is positional: results are submitted in exactly this order
/// and the grader correlates them by index.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Lesson {
    pub id: String,
    #[serde(default)]
    pub cli_commands: Vec<String>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A gradable checkpoint inside a lesson. Owned by the server, only displayed here.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Completed,
    Failed,
    /// Also the landing spot for any status this client does not know.
    #[default]
    #[serde(other)]
    Pending,
}

impl TaskStatus {
    /// The glyph shown in front of a task title in the status table.
    pub fn glyph(self) -> &'static str {
        match self {
            TaskStatus::Completed => "✅",
            TaskStatus::Failed => "❌",
            TaskStatus::Pending => "⚪",
        }
    }
}

/// The captured outcome of one lesson command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub command: String,
    pub stdout: String,
    pub stderr: String,
}

/// Body of `POST /lessons/{token}/submit`.
///
/// Serializes as `{"type": "COMMAND_RESULTS", "cli_command_results": [...]}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionBatch {
    CommandResults {
        cli_command_results: Vec<CommandResult>,
    },
}

impl SubmissionBatch {
    pub fn command_results(results: Vec<CommandResult>) -> Self {
        SubmissionBatch::CommandResults {
            cli_command_results: results,
        }
    }

    pub fn results(&self) -> &[CommandResult] {
        match self {
            SubmissionBatch::CommandResults {
                cli_command_results,
            } => cli_command_results,
        }
    }
}

// --- LAB MODELS ---

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LabInfo {
    #[serde(default)]
    pub user_lesson_id: String,
    #[serde(default)]
    pub lesson_id: String,
    pub title: String,
    #[serde(default)]
    pub course: LabCourse,
    #[serde(default)]
    pub user: LabUser,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LabCourse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LabUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// One downloadable file of a lab scaffold. `url` is usually pre-signed.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LabFile {
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub size: u64,
}

/// The file listing endpoints have answered with three different shapes over time.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum LabFileListing {
    Flat(Vec<LabFile>),
    Wrapped { files: Vec<LabFile> },
    Grouped { files: GroupedLabFiles },
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct GroupedLabFiles {
    #[serde(default)]
    pub public: Vec<LabFile>,
    #[serde(default)]
    pub bootstrap: Vec<LabFile>,
    #[serde(default)]
    pub other: Vec<LabFile>,
}

impl LabFileListing {
    /// Flattens any listing shape into a single list (public, bootstrap, other).
    pub fn into_files(self) -> Vec<LabFile> {
        match self {
            LabFileListing::Flat(files) | LabFileListing::Wrapped { files } => files,
            LabFileListing::Grouped { files } => {
                let GroupedLabFiles {
                    public,
                    bootstrap,
                    other,
                } = files;
                public.into_iter().chain(bootstrap).chain(other).collect()
            }
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct LabFileUrl {
    pub url: String,
    #[serde(default)]
    pub file_path: String,
}

// --- CONFIGURATION MODELS ---

/// On-disk shape of both the global `config.toml` and the project `.mtc.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

/// Which layer supplied a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    Global(PathBuf),
    Project(PathBuf),
    Environment,
    Flag,
}

impl ConfigSource {
    /// Precedence of the layer; a higher rank overrides a lower one.
    pub fn rank(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::Global(_) => 1,
            ConfigSource::Project(_) => 2,
            ConfigSource::Environment => 3,
            ConfigSource::Flag => 4,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "built-in default"),
            ConfigSource::Global(path) => write!(f, "global config ({})", path.display()),
            ConfigSource::Project(path) => write!(f, "project config ({})", path.display()),
            ConfigSource::Environment => write!(f, "environment (MTC_API_BASE_URL)"),
            ConfigSource::Flag => write!(f, "command line (--api-base-url)"),
        }
    }
}

/// The fully resolved, immutable configuration of one `mtc` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_base_url_source: ConfigSource,
    /// Location of the project file, whether or not it exists yet.
    pub project_config_path: PathBuf,
    pub project_config_present: bool,
}

impl AppConfig {
    /// Returns a new configuration with a freshly written project layer applied.
    /// Layers that outrank the project file (environment, flag) keep winning.
    pub fn with_project_layer(&self, api_base_url: &str, path: PathBuf) -> Self {
        let source = ConfigSource::Project(path.clone());
        let (url, url_source) = if source.rank() >= self.api_base_url_source.rank() {
            (api_base_url.to_string(), source)
        } else {
            (self.api_base_url.clone(), self.api_base_url_source.clone())
        };
        Self {
            api_base_url: url,
            api_base_url_source: url_source,
            project_config_path: path,
            project_config_present: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_batch_wire_shape() {
        let batch = SubmissionBatch::command_results(vec![CommandResult {
            exit_code: 0,
            command: "echo hi".to_string(),
            stdout: "hi".to_string(),
            stderr: String::new(),
        }]);
        let value = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "COMMAND_RESULTS",
                "cli_command_results": [
                    {"exit_code": 0, "command": "echo hi", "stdout": "hi", "stderr": ""}
                ]
            })
        );
    }

    #[test]
    fn test_lesson_decodes_statuses_and_tolerates_unknown() {
        let lesson: Lesson = serde_json::from_value(json!({
            "id": "l1",
            "cli_commands": ["docker ps"],
            "tasks": [
                {"id": "t1", "title": "Run a container", "status": "COMPLETED"},
                {"id": "t2", "title": "Expose a port", "status": "FAILED"},
                {"id": "t3", "title": "Clean up", "status": "PENDING"},
                {"id": "t4", "title": "Mystery", "status": "IN_REVIEW"},
                {"id": "t5", "title": "No status"}
            ],
            "created_at": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let statuses: Vec<TaskStatus> = lesson.tasks.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            vec![
                TaskStatus::Completed,
                TaskStatus::Failed,
                TaskStatus::Pending,
                TaskStatus::Pending,
                TaskStatus::Pending
            ]
        );
        assert_eq!(lesson.cli_commands, vec!["docker ps".to_string()]);
    }

    #[test]
    fn test_task_status_round_trips_through_wire_names() {
        assert_eq!(serde_json::to_value(TaskStatus::Pending).unwrap(), json!("PENDING"));
        assert_eq!(serde_json::to_value(TaskStatus::Completed).unwrap(), json!("COMPLETED"));
        let task: Task = serde_json::from_value(json!({
            "id": "t1",
            "title": "Run a container",
            "status": "FAILED"
        }))
        .unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }

    #[test]
    fn test_lab_file_listing_shapes() {
        let flat: LabFileListing =
            serde_json::from_value(json!([{"path": "a.txt", "url": "u"}])).unwrap();
        assert_eq!(flat.into_files().len(), 1);

        let wrapped: LabFileListing = serde_json::from_value(json!({"files": []})).unwrap();
        assert!(wrapped.into_files().is_empty());

        let grouped: LabFileListing = serde_json::from_value(json!({
            "files": {
                "public": [{"path": "public/readme.md", "url": "u1"}],
                "bootstrap": [{"path": "bootstrap/setup.sh", "url": "u2"}],
                "other": [{"path": "main.tf", "url": "u3"}]
            }
        }))
        .unwrap();
        let paths: Vec<String> = grouped.into_files().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["public/readme.md", "bootstrap/setup.sh", "main.tf"]);
    }

    #[test]
    fn test_project_layer_respects_higher_precedence() {
        let base = AppConfig {
            api_base_url: "https://global".to_string(),
            api_base_url_source: ConfigSource::Global(PathBuf::from("/g/config.toml")),
            project_config_path: PathBuf::from(".mtc.toml"),
            project_config_present: false,
        };
        let applied = base.with_project_layer("https://project", PathBuf::from(".mtc.toml"));
        assert_eq!(applied.api_base_url, "https://project");
        assert!(applied.project_config_present);

        let flagged = AppConfig {
            api_base_url_source: ConfigSource::Flag,
            ..base
        };
        let kept = flagged.with_project_layer("https://project", PathBuf::from(".mtc.toml"));
        assert_eq!(kept.api_base_url, "https://global");
        assert_eq!(kept.api_base_url_source, ConfigSource::Flag);
    }
}
