use axum::{extract::Path, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::form::{FieldUpdate, FormState, ProjectField};
use crate::presenter::export::ExportedDocument;
use crate::presenter::RenderedResult;
use crate::state::AppState;
use crate::wizard::session::{TranslationExport, WizardView};

#[derive(Serialize)]
pub struct ProjectAddedResponse {
    pub index: usize,
    pub form: FormState,
}

#[derive(Deserialize)]
pub struct ProjectUpdateRequest {
    pub field: ProjectField,
    pub value: String,
}

// ── Form ───────────────────────────────────────────────────────────────────

/// GET /api/v1/form
pub async fn handle_get_form(State(state): State<AppState>) -> Json<FormState> {
    Json(state.session.form().await)
}

/// PATCH /api/v1/form
pub async fn handle_update_field(
    State(state): State<AppState>,
    Json(update): Json<FieldUpdate>,
) -> Json<FormState> {
    Json(state.session.update_field(update).await)
}

/// DELETE /api/v1/form
pub async fn handle_reset_form(State(state): State<AppState>) -> Json<FormState> {
    Json(state.session.reset().await)
}

/// POST /api/v1/form/projects
pub async fn handle_add_project(
    State(state): State<AppState>,
) -> (StatusCode, Json<ProjectAddedResponse>) {
    let (index, form) = state.session.add_project().await;
    (StatusCode::CREATED, Json(ProjectAddedResponse { index, form }))
}

/// PATCH /api/v1/form/projects/:index
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<ProjectUpdateRequest>,
) -> Result<Json<FormState>, AppError> {
    let form = state
        .session
        .update_project(index, req.field, req.value)
        .await?;
    Ok(Json(form))
}

/// DELETE /api/v1/form/projects/:index
pub async fn handle_remove_project(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<FormState>, AppError> {
    Ok(Json(state.session.remove_project(index).await?))
}

// ── Wizard ─────────────────────────────────────────────────────────────────

/// GET /api/v1/wizard
pub async fn handle_get_wizard(State(state): State<AppState>) -> Json<WizardView> {
    Json(state.session.wizard().await)
}

/// POST /api/v1/wizard/next
pub async fn handle_next(State(state): State<AppState>) -> Json<WizardView> {
    Json(state.session.next().await)
}

/// POST /api/v1/wizard/prev
pub async fn handle_prev(State(state): State<AppState>) -> Json<WizardView> {
    Json(state.session.prev().await)
}

/// POST /api/v1/wizard/submit
pub async fn handle_submit(
    State(state): State<AppState>,
) -> Result<Json<RenderedResult>, AppError> {
    Ok(Json(state.session.submit().await?))
}

// ── Result ─────────────────────────────────────────────────────────────────

/// GET /api/v1/result
pub async fn handle_get_result(
    State(state): State<AppState>,
) -> Result<Json<RenderedResult>, AppError> {
    Ok(Json(state.session.result().await?))
}

/// POST /api/v1/result/copy
pub async fn handle_copy_result(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.copy_result().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/result/export
pub async fn handle_export_result(
    State(state): State<AppState>,
) -> Result<Json<ExportedDocument>, AppError> {
    Ok(Json(state.session.export_result().await?))
}

/// POST /api/v1/result/translate
pub async fn handle_translate_result(
    State(state): State<AppState>,
) -> Result<Json<TranslationExport>, AppError> {
    Ok(Json(state.session.translate_and_export().await?))
}
