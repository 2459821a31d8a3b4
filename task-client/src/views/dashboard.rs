// task-client/src/views/dashboard.rs
use common::models::task::{Task, TaskDraft, TaskPatch};
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::api::{AuthApi, TasksApi};
use crate::boundary::{Admission, ProtectedBoundary, ViewOutcome};
use crate::error::ApiError;
use crate::routes::Route;

use super::{display_message, ViewAction};

const LOAD_FAILED: &str = "Failed to load tasks";
const DELETE_FAILED: &str = "Failed to delete task";
const SAVE_FAILED: &str = "Failed to save task";

#[derive(Default)]
struct DashboardState {
    admission: Option<Admission>,
    tasks: Vec<Task>,
    error: Option<String>,
    loading: bool,
    // Task ids with a delete outstanding
    deleting: HashSet<String>,
}

impl DashboardState {
    fn reset(&mut self) {
        *self = DashboardState::default();
    }
}

/// Protected task list.
///
/// Methods take `&self` so a view layer can fire overlapping actions; the
/// state lock is never held across a request.
pub struct DashboardView {
    boundary: ProtectedBoundary,
    tasks_api: TasksApi,
    auth: AuthApi,
    state: Mutex<DashboardState>,
}

impl DashboardView {
    pub fn new(boundary: ProtectedBoundary, tasks_api: TasksApi, auth: AuthApi) -> Self {
        Self {
            boundary,
            tasks_api,
            auth,
            state: Mutex::new(DashboardState::default()),
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.lock().deleting.contains(id)
    }

    /// Enter through the boundary and fetch the task list
    pub async fn mount(&self) -> ViewAction {
        {
            let mut state = self.lock();
            state.loading = true;
            state.error = None;
        }

        let (admission, outcome) = self.boundary.mount(|| self.tasks_api.list()).await;

        let mut state = self.lock();
        state.loading = false;
        state.admission = admission;
        match outcome {
            ViewOutcome::Render(tasks) => {
                tracing::debug!("Dashboard loaded {} tasks", tasks.len());
                state.tasks = tasks;
                ViewAction::Stay
            },
            ViewOutcome::Failed(e) => {
                tracing::debug!("Dashboard load failed: {}", e);
                state.error = Some(display_message(&e, LOAD_FAILED));
                ViewAction::Stay
            },
            ViewOutcome::Redirect(route) => {
                state.reset();
                ViewAction::Navigate(route)
            }
        }
    }

    /// Delete a task. A second delete for the same id while the first is
    /// outstanding is dropped.
    pub async fn delete(&self, id: &str) -> ViewAction {
        let admission = {
            let mut state = self.lock();
            let admission = match self.live_admission(&mut state) {
                Ok(admission) => admission,
                Err(action) => return action,
            };
            if !state.deleting.insert(id.to_string()) {
                tracing::debug!("Delete for task {} already in flight", id);
                return ViewAction::Busy;
            }
            admission
        };

        let result = self.tasks_api.delete(id).await;

        let mut state = self.lock();
        state.deleting.remove(id);
        self.apply(&mut state, &admission, result, DELETE_FAILED, |state, ()| {
            state.tasks.retain(|task| task.id != id);
        })
    }

    pub async fn create(&self, draft: &TaskDraft) -> ViewAction {
        let admission = match self.live_admission(&mut self.lock()) {
            Ok(admission) => admission,
            Err(action) => return action,
        };

        let result = self.tasks_api.create(draft).await;

        let mut state = self.lock();
        self.apply(&mut state, &admission, result, SAVE_FAILED, |state, task| {
            state.tasks.push(task);
        })
    }

    pub async fn update(&self, id: &str, patch: &TaskPatch) -> ViewAction {
        let admission = match self.live_admission(&mut self.lock()) {
            Ok(admission) => admission,
            Err(action) => return action,
        };

        let result = self.tasks_api.update(id, patch).await;

        let mut state = self.lock();
        self.apply(&mut state, &admission, result, SAVE_FAILED, |state, updated| {
            if let Some(task) = state.tasks.iter_mut().find(|task| task.id == updated.id) {
                *task = updated;
            }
        })
    }

    pub fn logout(&self) -> ViewAction {
        self.auth.logout();
        self.lock().reset();
        ViewAction::Navigate(Route::Login)
    }

    // Admission for a new call, or the redirect to take instead
    fn live_admission(&self, state: &mut DashboardState) -> Result<Admission, ViewAction> {
        match state.admission.filter(|admission| self.boundary.is_current(admission)) {
            Some(admission) => Ok(admission),
            None => {
                state.reset();
                Err(ViewAction::Navigate(Route::Login))
            }
        }
    }

    fn apply<T>(
        &self,
        state: &mut DashboardState,
        admission: &Admission,
        result: Result<T, ApiError>,
        fallback: &str,
        on_render: impl FnOnce(&mut DashboardState, T),
    ) -> ViewAction {
        match self.boundary.settle(admission, result) {
            ViewOutcome::Render(value) => {
                state.error = None;
                on_render(state, value);
                ViewAction::Stay
            },
            ViewOutcome::Failed(e) => {
                tracing::debug!("Dashboard action failed: {}", e);
                state.error = Some(display_message(&e, fallback));
                ViewAction::Stay
            },
            ViewOutcome::Redirect(route) => {
                state.reset();
                ViewAction::Navigate(route)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
