use crate::diag::{DiagnosticSink, StderrSink};
use crate::model::{Filter, Task, TaskUpdate};
use crate::storage::{SNAPSHOT_KEY, SnapshotStore, store_from_env};
use time::OffsetDateTime;

/// Time source for `created_at` stamps and id generation.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Session-local task container: an ordered list (newest first) plus a
/// view filter, mirrored to the snapshot backend after every mutation.
///
/// Persistence is best-effort. A failed write is reported to the
/// diagnostic sink and the in-memory change stands; a snapshot that
/// cannot be parsed at startup resets the list to empty. No operation
/// here returns an error.
pub struct TaskStore {
    tasks: Vec<Task>,
    filter: Filter,
    backend: Box<dyn SnapshotStore>,
    diagnostics: Box<dyn DiagnosticSink>,
    clock: Box<dyn Clock>,
}

impl TaskStore {
    pub fn new(backend: Box<dyn SnapshotStore>, diagnostics: Box<dyn DiagnosticSink>) -> Self {
        Self::with_clock(backend, diagnostics, Box::new(SystemClock))
    }

    pub fn with_clock(
        backend: Box<dyn SnapshotStore>,
        diagnostics: Box<dyn DiagnosticSink>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            tasks: Vec::new(),
            filter: Filter::All,
            backend,
            diagnostics,
            clock,
        }
    }

    pub fn from_env() -> Self {
        Self::new(store_from_env(), Box::new(StderrSink))
    }

    /// Hydrate from the persisted snapshot. Absent key leaves the list
    /// empty; an unreadable or unparseable snapshot is reported to the
    /// sink and the list is reset. Skipped entirely when the backend is
    /// unreachable in this context.
    pub fn initialize(&mut self) {
        if !self.backend.is_available() {
            return;
        }

        match self.backend.get(SNAPSHOT_KEY) {
            Ok(None) => {}
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Task>>(&raw) {
                Ok(tasks) => self.tasks = tasks,
                Err(err) => {
                    self.diagnostics.record(
                        "load snapshot",
                        &crate::error::AppError::invalid_data(err.to_string()),
                    );
                    self.tasks.clear();
                }
            },
            Err(err) => {
                self.diagnostics.record("load snapshot", &err);
                self.tasks.clear();
            }
        }
    }

    fn persist(&self) {
        if !self.backend.is_available() {
            return;
        }

        let encoded = match serde_json::to_string(&self.tasks) {
            Ok(encoded) => encoded,
            Err(err) => {
                self.diagnostics.record(
                    "save snapshot",
                    &crate::error::AppError::invalid_data(err.to_string()),
                );
                return;
            }
        };

        if let Err(err) = self.backend.set(SNAPSHOT_KEY, &encoded) {
            self.diagnostics.record("save snapshot", &err);
        }
    }

    /// Base-36 clock millis plus a base-36 random suffix. Unique enough
    /// within one list; no cross-session guarantee is needed.
    fn generate_id(&self) -> String {
        let millis = self.clock.now().unix_timestamp_nanos() / 1_000_000;
        let suffix: u64 = rand::random();
        format!(
            "{}{}",
            base36(millis.max(0) as u128),
            base36(suffix as u128)
        )
    }

    /// Create a task and prepend it. A title that is empty after
    /// trimming makes this a no-op: nothing is created or persisted.
    pub fn add(&mut self, title: &str, description: Option<&str>) -> Option<Task> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return None;
        }

        let task = Task {
            id: self.generate_id(),
            title: trimmed.to_string(),
            description: description.map(str::trim).unwrap_or("").to_string(),
            completed: false,
            created_at: self.clock.now(),
        };

        self.tasks.insert(0, task.clone());
        self.persist();

        Some(task)
    }

    /// Apply the present fields of `update` to the task with `id`.
    /// Returns whether a task was found; an unknown id changes nothing
    /// and triggers no snapshot write.
    pub fn update(&mut self, id: &str, update: TaskUpdate) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };

        if let Some(title) = update.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            task.description = description.trim().to_string();
        }
        if let Some(completed) = update.completed {
            task.completed = completed;
        }

        self.persist();
        true
    }

    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return false;
        };

        task.completed = !task.completed;
        self.persist();
        true
    }

    /// Remove the task with `id`, keeping the relative order of the
    /// rest. Silent no-op on an unknown id.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return false;
        };

        self.tasks.remove(index);
        self.persist();
        true
    }

    /// Mark every task completed. Persists even when the list is empty
    /// or already fully completed.
    pub fn mark_all_completed(&mut self) {
        for task in &mut self.tasks {
            task.completed = true;
        }
        self.persist();
    }

    /// Drop every completed task, preserving the order of the rest.
    pub fn delete_completed(&mut self) {
        self.tasks.retain(|task| !task.completed);
        self.persist();
    }

    /// Set the view filter. A view preference only: deliberately not
    /// persisted.
    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.persist();
    }

    pub fn task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The tasks admitted by the active filter, in list order.
    pub fn filtered_tasks(&self) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| self.filter.admits(task.completed))
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }

    /// True only for a non-empty, fully completed list.
    pub fn all_completed(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|task| task.completed)
    }

    pub fn has_completed(&self) -> bool {
        self.tasks.iter().any(|task| task.completed)
    }
}

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36_DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
