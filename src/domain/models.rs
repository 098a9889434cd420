use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Categories offered by the dashboard. The store itself accepts any label.
pub const CATEGORIES: [&str; 4] = ["Personal", "Work", "Health", "Study"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl Task {
    /// Label used for per-category statistics.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct CreateTask {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTask {
    pub id: String,
    pub completed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTask {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Calm,
    Focused,
    Tired,
    Motivated,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Calm, Mood::Focused, Mood::Tired, Mood::Motivated];

    /// Exact, case-sensitive match on the wire label.
    pub fn from_label(label: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|mood| mood.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Focused => "focused",
            Mood::Tired => "tired",
            Mood::Motivated => "motivated",
        }
    }
}

/// Mood stays a raw string so unrecognized labels reach the generator.
#[derive(Debug, Serialize, Deserialize)]
pub struct ReflectionRequest {
    #[serde(default)]
    pub mood: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub reflection: String,
}
