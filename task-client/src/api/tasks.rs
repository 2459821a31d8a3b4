// task-client/src/api/tasks.rs
use common::models::task::{Task, TaskDraft, TaskPatch};
use std::sync::Arc;

use crate::error::ApiError;
use crate::gateway::{ApiGateway, Method};

/// Typed task calls; all of them require an established session
#[derive(Clone)]
pub struct TasksApi {
    gateway: Arc<ApiGateway>,
}

impl TasksApi {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.gateway
            .request_json::<_, ()>(Method::GET, "/tasks", None)
            .await
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.gateway
            .request_json(Method::POST, "/tasks", Some(draft))
            .await
    }

    pub async fn update(&self, id: &str, patch: &TaskPatch) -> Result<Task, ApiError> {
        let path = task_path(id)?;
        self.gateway
            .request_json(Method::PUT, &path, Some(patch))
            .await
    }

    /// Whatever the service sends back on delete is ignored
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = task_path(id)?;
        self.gateway.request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}

fn task_path(id: &str) -> Result<String, ApiError> {
    if id.is_empty() || id == "." || id == ".." || id.contains('/') {
        return Err(ApiError::rejected_locally(format!("invalid task id {:?}", id)));
    }
    Ok(format!("/tasks/{}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_path_rejects_traversal() {
        assert_eq!(task_path("65f0").unwrap(), "/tasks/65f0");
        assert!(task_path("").is_err());
        assert!(task_path("..").is_err());
        assert!(task_path("1/../../auth").is_err());
    }
}
