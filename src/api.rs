use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::card::export::{export_card, ExportFormat};
use crate::model::{InsertTeacher, UpdateTeacher};
use crate::state::AppState;
use crate::storage::StorageError;

const MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/teachers", get(list_teachers).post(create_teacher))
        .route("/api/teachers/recent", get(recent_teachers))
        .route(
            "/api/teachers/:id",
            get(get_teacher).patch(update_teacher).delete(delete_teacher),
        )
        .route("/api/teachers/:id/card", get(teacher_card))
        .route(
            "/api/upload",
            post(upload_photo).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/uploads/:file", get(serve_upload))
        .route("/api/stats", get(stats))
        .route("/health", get(health))
        .with_state(state)
}

fn message(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "message": msg }))).into_response()
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check"))
)]
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    responses((status = 200, description = "All teachers, newest first", body = [crate::model::Teacher]))
)]
pub async fn list_teachers(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.store.all())
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentParams {
    pub limit: Option<usize>,
}

#[utoipa::path(
    get,
    path = "/api/teachers/recent",
    params(RecentParams),
    responses((status = 200, description = "Most recent teachers", body = [crate::model::Teacher]))
)]
pub async fn recent_teachers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> impl IntoResponse {
    Json(state.store.recent(params.limit.unwrap_or(5)))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = String, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Teacher", body = crate::model::Teacher),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_teacher(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.get(&id) {
        Some(teacher) => Json(teacher).into_response(),
        None => message(StatusCode::NOT_FOUND, "Teacher not found"),
    }
}

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = InsertTeacher,
    responses(
        (status = 201, description = "Created", body = crate::model::Teacher),
        (status = 400, description = "Validation error or duplicate employee id")
    )
)]
pub async fn create_teacher(
    State(state): State<Arc<AppState>>,
    Json(insert): Json<InsertTeacher>,
) -> Response {
    if let Err(errors) = insert.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "Validation error", "errors": errors })),
        )
            .into_response();
    }
    match state.store.create(insert) {
        Ok(teacher) => {
            info!(id = %teacher.id, employee_id = %teacher.employee_id, "teacher created");
            (StatusCode::CREATED, Json(teacher)).into_response()
        }
        Err(StorageError::DuplicateEmployeeId) => {
            message(StatusCode::BAD_REQUEST, "Employee ID already exists")
        }
        Err(StorageError::NotFound) => message(StatusCode::NOT_FOUND, "Teacher not found"),
    }
}

#[utoipa::path(
    patch,
    path = "/api/teachers/{id}",
    params(("id" = String, Path, description = "Teacher id")),
    request_body = UpdateTeacher,
    responses(
        (status = 200, description = "Updated", body = crate::model::Teacher),
        (status = 400, description = "Duplicate employee id"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_teacher(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<UpdateTeacher>,
) -> Response {
    match state.store.update(&id, updates) {
        Ok(teacher) => Json(teacher).into_response(),
        Err(StorageError::NotFound) => message(StatusCode::NOT_FOUND, "Teacher not found"),
        Err(StorageError::DuplicateEmployeeId) => {
            message(StatusCode::BAD_REQUEST, "Employee ID already exists")
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = String, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_teacher(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    if state.store.delete(&id) {
        message(StatusCode::OK, "Teacher deleted successfully")
    } else {
        message(StatusCode::NOT_FOUND, "Teacher not found")
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CardParams {
    /// Overrides the template stored on the record.
    pub template: Option<String>,
    /// "png" (default) or "pdf".
    pub format: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}/card",
    params(("id" = String, Path, description = "Teacher id"), CardParams),
    responses(
        (status = 200, description = "Rendered ID card", content_type = "image/png"),
        (status = 400, description = "Unknown format"),
        (status = 404, description = "Not found"),
        (status = 500, description = "Render failed")
    )
)]
pub async fn teacher_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<CardParams>,
) -> Response {
    let Some(teacher) = state.store.get(&id) else {
        return message(StatusCode::NOT_FOUND, "Teacher not found");
    };

    let format = match params.format.as_deref() {
        None => ExportFormat::Png,
        Some(s) => match ExportFormat::parse(s) {
            Some(f) => f,
            None => return message(StatusCode::BAD_REQUEST, "Unknown format, expected png or pdf"),
        },
    };
    let template_id = params.template.as_deref().unwrap_or(&teacher.template);

    match export_card(&state.http, &state.upload_dir, &teacher, template_id, format).await {
        Ok(export) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(export.content_type),
            );
            let disposition = format!("attachment; filename=\"{}\"", export.filename);
            if let Ok(v) = HeaderValue::from_str(&disposition) {
                headers.insert(header::CONTENT_DISPOSITION, v);
            }
            (StatusCode::OK, headers, export.bytes).into_response()
        }
        Err(err) => {
            error!(teacher = %id, error = %err, "card export failed");
            message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate card")
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "File uploaded"),
        (status = 400, description = "Missing, oversized or non-image file")
    )
)]
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return message(StatusCode::BAD_REQUEST, &err.to_string()),
        };
        if field.name() != Some("photo") {
            continue;
        }

        let content_type = field.content_type().unwrap_or("").to_string();
        if !content_type.starts_with("image/") {
            return message(StatusCode::BAD_REQUEST, "Only image files are allowed");
        }

        let extension = field
            .file_name()
            .and_then(|n| n.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()))
            .unwrap_or_else(|| "png".to_string());

        let bytes = match field.bytes().await {
            Ok(b) => b,
            Err(err) => return message(StatusCode::BAD_REQUEST, &err.to_string()),
        };
        if bytes.len() > MAX_UPLOAD_BYTES {
            return message(StatusCode::BAD_REQUEST, "File too large (max 2MB)");
        }

        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        let path = state.upload_dir.join(&filename);
        if let Err(err) = tokio::fs::write(&path, &bytes).await {
            error!(path = %path.display(), error = %err, "failed to persist upload");
            return message(StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload file");
        }

        return Json(json!({
            "message": "File uploaded successfully",
            "photoUrl": format!("/uploads/{filename}"),
        }))
        .into_response();
    }

    message(StatusCode::BAD_REQUEST, "No file uploaded")
}

pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(file): Path<String>,
) -> Response {
    // no traversal out of the upload dir
    if file.contains("..") || file.contains('/') || file.contains('\\') {
        return message(StatusCode::NOT_FOUND, "Not found");
    }
    let path = state.upload_dir.join(&file);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = match file.rsplit_once('.').map(|(_, e)| e) {
                Some("png") => "image/png",
                Some("jpg") | Some("jpeg") => "image/jpeg",
                Some("gif") => "image/gif",
                Some("webp") => "image/webp",
                _ => "application/octet-stream",
            };
            (
                [(header::CONTENT_TYPE, content_type)],
                bytes,
            )
                .into_response()
        }
        Err(_) => message(StatusCode::NOT_FOUND, "Not found"),
    }
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses((status = 200, description = "Card statistics"))
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let teachers = state.store.all();
    let today = Utc::now().date_naive();
    let today_cards = teachers
        .iter()
        .filter(|t| t.created_at.date_naive() == today)
        .count();

    Json(json!({
        "totalCards": teachers.len(),
        "todayCards": today_cards,
        "activeTeachers": teachers.len(),
        "avgTime": "২.৫সে",
    }))
}
