use crate::{
    auth::Principal,
    error::AppError,
    models::{TaskInput, TaskQuery},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Retrieves the authenticated user's tasks.
///
/// Only the caller's own tasks are ever listed; there is no way to see
/// another user's tasks through this endpoint. Results are ordered by
/// creation date, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): keep only tasks in this state ("PENDING" or "COMPLETED").
/// - `search` (optional): keep only tasks whose title or description contains
///   this term (case-insensitive).
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects.
/// - `401 Unauthorized`: the request carries no valid authentication.
#[get("")]
pub async fn get_tasks(
    service: web::Data<TaskService>,
    principal: Principal,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = service.list(&principal, &query_params).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`:
/// - `title`: 1 to 200 characters (required).
/// - `description` (optional): up to 500 characters.
/// - `status`: "PENDING" or "COMPLETED" (required).
///
/// ## Responses:
/// - `201 Created`: the stored `Task` object as JSON.
/// - `400 Bad Request`: validation failed; body maps fields to messages.
/// - `401 Unauthorized`: the request carries no valid authentication.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    principal: Principal,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = service.create(&principal, task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task by id.
///
/// ## Path Parameters:
/// - `id`: the UUID of the task.
///
/// ## Responses:
/// - `200 OK`: the `Task` object as JSON.
/// - `401 Unauthorized`: the request carries no valid authentication.
/// - `404 Not Found`: no such task exists for this user. A task owned by
///   someone else answers exactly the same way.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    principal: Principal,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = service
        .get(&principal, task_id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Replaces a task's title, description and status.
///
/// ## Path Parameters:
/// - `id`: the UUID of the task.
///
/// ## Request Body:
/// A JSON object matching `TaskInput`; see `create_task`.
///
/// ## Responses:
/// - `200 OK`: the updated `Task` object as JSON.
/// - `400 Bad Request`: validation failed.
/// - `401 Unauthorized`: the request carries no valid authentication.
/// - `404 Not Found`: no such task exists for this user.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    principal: Principal,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = service
        .update(&principal, task_id.into_inner(), task_data.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by id.
///
/// ## Path Parameters:
/// - `id`: the UUID of the task.
///
/// ## Responses:
/// - `204 No Content`: the task is gone.
/// - `401 Unauthorized`: the request carries no valid authentication.
/// - `404 Not Found`: no such task exists for this user.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    principal: Principal,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let deleted = service.delete(&principal, task_id.into_inner()).await?;
    if !deleted {
        return Err(AppError::NotFound("Task not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
