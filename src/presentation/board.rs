//! Client-side model of the dashboard.
//!
//! The board shows a sign-in gate until a session is known, then mirrors the
//! user's task list. The mirror only changes at explicit invalidation points:
//! a successful server response wrapped in a [`Mutation`]. Failed responses
//! leave it as it was, except `Unauthorized`, which returns to the gate.

use crate::application::stats::{TaskStats, category_counts, completion_rate};
use crate::domain::models::{CATEGORIES, CreateTask, Mood, Task, UpdateTask};
use crate::domain::user::Identity;
use crate::presentation::error::ApiError;
use std::collections::BTreeMap;
use tracing::debug;

pub const REFLECTION_PLACEHOLDER: &str = "Loading your atmosphere...";
pub const REFLECTION_PENDING: &str = "Composing something soft...";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    Loading,
    Unauthenticated,
    Authenticated(Identity),
}

/// What the dashboard renders for the current auth status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    SignInGate,
    Board,
}

/// Successful server responses that invalidate the mirror.
#[derive(Debug, Clone)]
pub enum Mutation {
    Loaded(Vec<Task>),
    Created(Task),
    Updated(Task),
    Deleted(String),
}

/// Changes whenever a new reflection should be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectionKey {
    pub mood: Mood,
    pub refresh: u64,
}

#[derive(Debug, Clone)]
pub struct TaskBoard {
    auth: AuthStatus,
    tasks: Vec<Task>,
    loaded: bool,
    mood: Mood,
    refresh: u64,
    category: String,
    reflection: String,
    /// Last text that was not a pending marker, restored on failed fetches.
    settled_reflection: String,
    requested: Option<ReflectionKey>,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self {
            auth: AuthStatus::Loading,
            tasks: Vec::new(),
            loaded: false,
            mood: Mood::Calm,
            refresh: 0,
            category: CATEGORIES[0].to_string(),
            reflection: REFLECTION_PLACEHOLDER.to_string(),
            settled_reflection: REFLECTION_PLACEHOLDER.to_string(),
            requested: None,
        }
    }
}

impl TaskBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn auth(&self) -> &AuthStatus {
        &self.auth
    }

    pub fn view(&self) -> View {
        match self.auth {
            AuthStatus::Loading => View::Loading,
            AuthStatus::Unauthenticated => View::SignInGate,
            AuthStatus::Authenticated(_) => View::Board,
        }
    }

    /// Session lookup finished. `None` shows the sign-in gate.
    pub fn set_session(&mut self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                if !matches!(&self.auth, AuthStatus::Authenticated(current) if *current == identity) {
                    self.reset_mirror();
                }
                self.auth = AuthStatus::Authenticated(identity);
            }
            None => self.sign_out(),
        }
    }

    pub fn sign_out(&mut self) {
        self.auth = AuthStatus::Unauthenticated;
        self.reset_mirror();
    }

    fn reset_mirror(&mut self) {
        self.tasks.clear();
        self.loaded = false;
        self.requested = None;
        self.reflection = REFLECTION_PLACEHOLDER.to_string();
        self.settled_reflection = REFLECTION_PLACEHOLDER.to_string();
    }

    /// True once per session, until the first list response lands.
    pub fn needs_initial_load(&self) -> bool {
        matches!(self.auth, AuthStatus::Authenticated(_)) && !self.loaded
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Applies a server response. Returns whether the mirror changed.
    pub fn apply(&mut self, outcome: Result<Mutation, ApiError>) -> bool {
        let mutation = match outcome {
            Ok(mutation) => mutation,
            Err(ApiError::Unauthorized(_)) => {
                debug!("Session rejected, back to sign-in gate");
                self.sign_out();
                return true;
            }
            Err(e) => {
                debug!(error = %e, "Ignoring failed response");
                return false;
            }
        };

        if self.view() != View::Board {
            debug!("Dropping response received outside the board");
            return false;
        }

        match mutation {
            Mutation::Loaded(tasks) => {
                self.tasks = tasks;
                self.loaded = true;
                true
            }
            Mutation::Created(task) => {
                self.tasks.insert(0, task);
                true
            }
            Mutation::Updated(task) => match self.tasks.iter_mut().find(|t| t.id == task.id) {
                Some(existing) => {
                    *existing = task;
                    true
                }
                None => false,
            },
            Mutation::Deleted(id) => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t.id != id);
                self.tasks.len() != before
            }
        }
    }

    /// Request body for a new task, `None` when the input is blank.
    pub fn create_request(&self, input: &str) -> Option<CreateTask> {
        if input.trim().is_empty() {
            return None;
        }
        Some(CreateTask {
            text: input.to_string(),
            category: Some(self.category.clone()),
        })
    }

    pub fn toggle_request(task: &Task) -> UpdateTask {
        UpdateTask {
            id: task.id.clone(),
            completed: !task.completed,
        }
    }

    pub fn select_category(&mut self, category: &str) {
        self.category = category.to_string();
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn select_mood(&mut self, mood: Mood) {
        self.mood = mood;
    }

    pub fn refresh_reflection(&mut self) {
        self.refresh += 1;
    }

    pub fn reflection_key(&self) -> ReflectionKey {
        ReflectionKey {
            mood: self.mood,
            refresh: self.refresh,
        }
    }

    pub fn reflection(&self) -> &str {
        &self.reflection
    }

    /// Starts a reflection fetch when the key moved since the last one.
    pub fn begin_reflection(&mut self) -> Option<ReflectionKey> {
        let key = self.reflection_key();
        if self.view() != View::Board || self.requested == Some(key) {
            return None;
        }
        self.requested = Some(key);
        self.reflection = REFLECTION_PENDING.to_string();
        Some(key)
    }

    /// Responses for an outdated key are dropped. Returns whether the text changed.
    pub fn receive_reflection(&mut self, key: ReflectionKey, outcome: Result<String, ApiError>) -> bool {
        if self.requested != Some(key) {
            debug!(?key, "Dropping stale reflection");
            return false;
        }
        match outcome {
            Ok(reflection) => {
                self.settled_reflection = reflection.clone();
                self.reflection = reflection;
                true
            }
            Err(ApiError::Unauthorized(_)) => {
                self.sign_out();
                true
            }
            Err(e) => {
                debug!(error = %e, "Reflection fetch failed");
                self.reflection = self.settled_reflection.clone();
                true
            }
        }
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn progress(&self) -> u32 {
        completion_rate(self.completed_count(), self.total_count())
    }

    pub fn category_breakdown(&self) -> BTreeMap<String, usize> {
        category_counts(&self.tasks)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(id: &str, category: &str) -> Task {
        Task {
            id: id.to_string(),
            text: id.to_string(),
            completed: false,
            category: Some(category.to_string()),
            created_at: Utc::now(),
            user_id: "u-1".to_string(),
        }
    }

    fn alice() -> Identity {
        Identity::new("alice@example.com", "Alice")
    }

    fn signed_in() -> TaskBoard {
        let mut board = TaskBoard::new();
        board.set_session(Some(alice()));
        board
    }

    fn ok(mutation: Mutation) -> Result<Mutation, ApiError> {
        Ok(mutation)
    }

    #[test]
    fn test_gate_follows_auth_status() {
        let mut board = TaskBoard::new();
        assert_eq!(board.view(), View::Loading);
        assert!(!board.needs_initial_load());

        board.set_session(None);
        assert_eq!(board.view(), View::SignInGate);
        assert!(!board.needs_initial_load());

        board.set_session(Some(alice()));
        assert_eq!(board.view(), View::Board);
        assert_eq!(board.auth(), &AuthStatus::Authenticated(alice()));
    }

    #[test]
    fn test_initial_load_happens_once() {
        let mut board = signed_in();
        assert!(board.needs_initial_load());

        board.apply(ok(Mutation::Loaded(vec![task("a", "Work")])));
        assert!(!board.needs_initial_load());

        board.apply(ok(Mutation::Created(task("b", "Work"))));
        assert!(!board.needs_initial_load());

        // Re-confirming the same session keeps the mirror.
        board.set_session(Some(alice()));
        assert!(!board.needs_initial_load());
        assert_eq!(board.total_count(), 2);
    }

    #[test]
    fn test_failed_initial_load_is_retried() {
        let mut board = signed_in();
        assert!(!board.apply(Err(ApiError::Internal("boom".to_string()))));
        assert!(board.needs_initial_load());
    }

    #[test]
    fn test_unauthorized_returns_to_gate() {
        let mut board = signed_in();
        board.apply(ok(Mutation::Loaded(vec![task("a", "Work")])));

        assert!(board.apply(Err(ApiError::Unauthorized("expired".to_string()))));
        assert_eq!(board.view(), View::SignInGate);
        assert_eq!(board.total_count(), 0);

        board.set_session(Some(alice()));
        assert!(board.needs_initial_load());
    }

    #[test]
    fn test_responses_outside_board_are_dropped() {
        let mut board = TaskBoard::new();
        board.set_session(None);
        assert!(!board.apply(ok(Mutation::Loaded(vec![task("a", "Work")]))));
        assert_eq!(board.total_count(), 0);
    }

    #[test]
    fn test_switching_user_resets_mirror() {
        let mut board = signed_in();
        board.apply(ok(Mutation::Loaded(vec![task("a", "Work")])));

        board.set_session(Some(Identity::new("bob@example.com", "Bob")));
        assert_eq!(board.total_count(), 0);
        assert!(board.needs_initial_load());
    }

    #[test]
    fn test_created_tasks_are_prepended() {
        let mut board = signed_in();
        assert!(board.apply(ok(Mutation::Loaded(vec![task("old", "Work")]))));
        assert!(board.apply(ok(Mutation::Created(task("new", "Personal")))));

        let ids: Vec<&str> = board.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn test_failed_responses_leave_mirror_untouched() {
        let mut board = signed_in();
        board.apply(ok(Mutation::Loaded(vec![task("a", "Work")])));

        assert!(!board.apply(Err(ApiError::Internal("500".to_string()))));
        assert!(!board.apply(Err(ApiError::Validation("Missing text".to_string()))));
        assert_eq!(board.total_count(), 1);
        assert_eq!(board.view(), View::Board);
    }

    #[test]
    fn test_update_and_delete_recompute_stats() {
        let mut board = signed_in();
        board.apply(ok(Mutation::Created(task("milk", "Personal"))));
        board.apply(ok(Mutation::Created(task("report", "Work"))));
        assert_eq!(board.progress(), 0);

        let toggle = TaskBoard::toggle_request(&board.tasks()[1]);
        assert_eq!(toggle.id, "milk");
        assert!(toggle.completed);

        let mut done = task("milk", "Personal");
        done.completed = true;
        assert!(board.apply(ok(Mutation::Updated(done))));
        assert_eq!(board.completed_count(), 1);
        assert_eq!(board.progress(), 50);

        assert!(board.apply(ok(Mutation::Deleted("report".to_string()))));
        assert_eq!(board.progress(), 100);
        assert_eq!(board.category_breakdown().get("Work"), None);
        assert_eq!(board.stats().categories.get("Personal"), Some(&1));
    }

    #[test]
    fn test_unknown_ids_do_not_change_mirror() {
        let mut board = signed_in();
        board.apply(ok(Mutation::Created(task("a", "Work"))));

        assert!(!board.apply(ok(Mutation::Updated(task("ghost", "Work")))));
        assert!(!board.apply(ok(Mutation::Deleted("ghost".to_string()))));
        assert_eq!(board.total_count(), 1);
    }

    #[test]
    fn test_create_request_uses_selected_category() {
        let mut board = TaskBoard::new();
        assert_eq!(board.category(), "Personal");
        assert!(board.create_request("   ").is_none());

        board.select_category("Study");
        let req = board.create_request("Read chapter 3").unwrap();
        assert_eq!(req.text, "Read chapter 3");
        assert_eq!(req.category.as_deref(), Some("Study"));
    }

    #[test]
    fn test_reflection_key_changes_on_mood_and_refresh() {
        let mut board = TaskBoard::new();
        let initial = board.reflection_key();
        assert_eq!(initial.mood, Mood::Calm);

        board.select_mood(Mood::Tired);
        let after_mood = board.reflection_key();
        assert_ne!(initial, after_mood);

        board.refresh_reflection();
        assert_ne!(after_mood, board.reflection_key());
        assert_eq!(board.reflection_key().mood, Mood::Tired);
    }

    #[test]
    fn test_reflection_fetch_only_when_key_moves() {
        let mut board = TaskBoard::new();
        assert_eq!(board.reflection(), REFLECTION_PLACEHOLDER);
        assert!(board.begin_reflection().is_none());

        board.set_session(Some(alice()));
        let key = board.begin_reflection().unwrap();
        assert_eq!(board.reflection(), REFLECTION_PENDING);
        assert!(board.begin_reflection().is_none());

        assert!(board.receive_reflection(key, Ok("Clarity is your compass.".to_string())));
        assert_eq!(board.reflection(), "Clarity is your compass.");

        board.refresh_reflection();
        assert!(board.begin_reflection().is_some());
    }

    #[test]
    fn test_stale_reflection_is_dropped() {
        let mut board = signed_in();
        let calm = board.begin_reflection().unwrap();

        board.select_mood(Mood::Motivated);
        let motivated = board.begin_reflection().unwrap();

        assert!(!board.receive_reflection(calm, Ok("calm text".to_string())));
        assert_eq!(board.reflection(), REFLECTION_PENDING);

        assert!(board.receive_reflection(motivated, Ok("motivated text".to_string())));
        assert_eq!(board.reflection(), "motivated text");
    }

    #[test]
    fn test_failed_reflection_keeps_previous_text() {
        let mut board = signed_in();
        let key = board.begin_reflection().unwrap();
        board.receive_reflection(key, Ok("first".to_string()));

        board.refresh_reflection();
        let key = board.begin_reflection().unwrap();
        assert_eq!(board.reflection(), REFLECTION_PENDING);
        board.receive_reflection(key, Err(ApiError::Internal("500".to_string())));
        assert_eq!(board.reflection(), "first");

        let key = board.reflection_key();
        assert!(board.receive_reflection(key, Err(ApiError::Unauthorized("gone".to_string()))));
        assert_eq!(board.view(), View::SignInGate);
        assert_eq!(board.reflection(), REFLECTION_PLACEHOLDER);
    }
}
