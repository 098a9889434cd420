use crate::application::reflection::ReflectionGenerator;
use crate::application::service::TaskService;
use crate::application::session_service::SessionService;
use crate::data::memory::InMemoryTaskRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::models::{
    CreateTask, DeleteResponse, DeleteTask, ReflectionRequest, ReflectionResponse, UpdateTask,
};
use crate::domain::user::Identity;
use crate::presentation::error::ApiError;
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};

pub struct AppState {
    pub tasks: TaskService<InMemoryTaskRepository, InMemoryUserRepository>,
    pub reflections: ReflectionGenerator,
    pub sessions: Arc<SessionService>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[instrument(skip(state, user), fields(email = %user.0.email, mood = %req.mood))]
pub async fn reflection(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ReflectionRequest>,
) -> Result<HttpResponse, ApiError> {
    let reflection = state.reflections.generate(&req.mood)?;
    info!("Reflection served");
    Ok(HttpResponse::Ok().json(ReflectionResponse { reflection }))
}

#[instrument(skip(state, user), fields(email = %user.0.email))]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let tasks = state.tasks.list_tasks(&user.0).await.map_err(|e| {
        error!(error = %e, "Failed to list tasks");
        e
    })?;
    info!(count = tasks.len(), "Tasks listed");
    Ok(HttpResponse::Ok().json(tasks))
}

#[instrument(skip(state, user, req), fields(email = %user.0.email, task_id))]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateTask>,
) -> Result<HttpResponse, ApiError> {
    let task = state
        .tasks
        .create_task(&user.0, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create task");
            e
        })?;
    tracing::Span::current().record("task_id", task.id.as_str());
    info!(category = ?task.category, "Task created successfully");
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, user), fields(email = %user.0.email, task_id = %req.id, completed = req.completed))]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateTask>,
) -> Result<HttpResponse, ApiError> {
    let task = state
        .tasks
        .set_completion(&user.0, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update task");
            e
        })?;
    info!("Task updated successfully");
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, user), fields(email = %user.0.email, task_id = %req.id))]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<DeleteTask>,
) -> Result<HttpResponse, ApiError> {
    state.tasks.delete_task(&user.0, &req.id).await.map_err(|e| {
        error!(error = %e, "Failed to delete task");
        e
    })?;
    info!("Task deleted successfully");
    Ok(HttpResponse::Ok().json(DeleteResponse { success: true }))
}

#[instrument(skip(state, user), fields(email = %user.0.email))]
pub async fn profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let stats = state.tasks.profile_stats(&user.0).await?;
    info!(
        total = stats.total_tasks,
        completed = stats.completed_tasks,
        "Profile statistics computed"
    );
    Ok(HttpResponse::Ok().json(stats))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub access_token: String,
}

/// Development stand-in for the identity provider.
#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn create_session(
    state: web::Data<AppState>,
    req: web::Json<SessionRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    let identity = Identity::new(req.email, req.name.unwrap_or_default());
    let access_token = state.sessions.issue_token(&identity)?;
    info!("Development session issued");
    Ok(HttpResponse::Ok().json(SessionResponse { access_token }))
}
