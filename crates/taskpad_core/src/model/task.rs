//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical record stored in the durable task blob.
//! - Define input records for create/update use-cases.
//! - Own title validation and free-text normalization.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-empty after trimming.
//! - `modified_at` never moves backwards and is never earlier than `created_at`.
//!
//! # Wire format
//! - Keys are camelCase (`createdAt`, `modifiedAt`).
//! - `deadline` is `YYYY-MM-DD` or `""`; `""`, `null` and a missing key all
//!   decode to `None`.
//! - `priority` is `low|medium|high`, anything else decodes to `Unspecified`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque, collection-unique task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Task urgency.
///
/// `Unspecified` covers both "never set" and any unknown persisted value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    #[default]
    Unspecified,
}

impl Priority {
    /// Strict parse used by input surfaces. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "" | "none" => Some(Self::Unspecified),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unspecified => "",
        }
    }

    /// Ordering weight used by priority sorting.
    pub fn weight(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unspecified => 0,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.as_str().to_string()
    }
}

/// Validation failures for task input and persisted records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title is required"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "deadline_format")]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Free-text quick note, stored verbatim.
    #[serde(default)]
    pub note: String,
}

impl Task {
    /// Builds a fresh task from create-form input.
    ///
    /// # Invariants
    /// - `created_at == modified_at == now`.
    /// - `completed` is `false` and `note` is empty.
    pub fn create(
        id: TaskId,
        input: NewTask,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let title = normalize_title(&input.title)?;
        Ok(Self {
            id,
            title,
            description: input.description.trim().to_string(),
            assignee: input.assignee.trim().to_string(),
            priority: input.priority,
            deadline: input.deadline,
            category: input.category.trim().to_string(),
            completed: false,
            created_at: now,
            modified_at: now,
            note: String::new(),
        })
    }

    /// Applies a partial edit. Leaves `self` untouched on validation failure.
    pub fn apply_patch(&mut self, patch: &TaskPatch) -> Result<(), TaskValidationError> {
        let title = match patch.title.as_deref() {
            Some(value) => Some(normalize_title(value)?),
            None => None,
        };

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = patch.description.as_deref() {
            self.description = description.trim().to_string();
        }
        if let Some(assignee) = patch.assignee.as_deref() {
            self.assignee = assignee.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(deadline) = patch.deadline {
            self.deadline = deadline;
        }
        if let Some(category) = patch.category.as_deref() {
            self.category = category.trim().to_string();
        }
        Ok(())
    }

    /// Stamps a mutation time without ever moving `modified_at` backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.modified_at {
            self.modified_at = now;
        }
    }

    /// Checks record-level invariants for data read back from storage.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Create-form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assignee: String,
    pub priority: Priority,
    pub deadline: Option<NaiveDate>,
    pub category: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates input before any identity or timestamp is allocated.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        normalize_title(&self.title).map(|_| ())
    }
}

/// Partial edit. `None` leaves the field unchanged.
///
/// `deadline` is doubly optional: `Some(None)` clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
    pub deadline: Option<Option<NaiveDate>>,
    pub category: Option<String>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn normalize_title(value: &str) -> Result<String, TaskValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

mod deadline_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
