//! Task handlers. Every operation is scoped to the authenticated owner.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use taskdeck_core::models::TaskChanges;
use taskdeck_core::tasks::CreateTask;

use crate::AppState;
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{CreateTaskRequest, SuccessResponse, TaskResponse, UpdateTaskRequest};

/// GET /tasks
pub async fn list_tasks_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<Vec<TaskResponse>>> {
    let owner = caller.user_id()?;
    let tasks = state.tasks.list(&owner).await?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// POST /tasks
pub async fn create_task_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    AppJson(body): AppJson<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<TaskResponse>)> {
    let owner = caller.user_id()?;
    let task = state
        .tasks
        .create(
            &owner,
            CreateTask {
                title: body.title,
                description: body.description,
                status: body.status,
                due_date: body.due_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /tasks/{id}
pub async fn get_task_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<TaskResponse>> {
    let owner = caller.user_id()?;
    let task = state.tasks.get(&owner, &id).await?;
    Ok(Json(task.into()))
}

/// PUT /tasks/{id}
pub async fn update_task_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    AppJson(body): AppJson<UpdateTaskRequest>,
) -> AppResult<Json<TaskResponse>> {
    let owner = caller.user_id()?;
    let changes = TaskChanges {
        title: body.title,
        description: body.description,
        status: body.status,
        due_date: body.due_date,
    };
    let task = state.tasks.update(&owner, &id, changes).await?;
    Ok(Json(task.into()))
}

/// DELETE /tasks/{id}
pub async fn delete_task_handler(
    State(state): State<AppState>,
    axum::Extension(caller): axum::Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    let owner = caller.user_id()?;
    state.tasks.delete(&owner, &id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
