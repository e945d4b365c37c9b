/// Notes API routes
use crate::{
    api::viewable_contact, error::Result, middleware::AuthenticatedSession, state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use dolphin_core::{ContactId, CreateNote, Note};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct AddNoteRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub success: bool,
    pub notes: Vec<Note>,
}

/// GET /api/contacts/:id/notes
pub async fn list_notes(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(contact_id): Path<ContactId>,
) -> Result<Json<NotesResponse>> {
    viewable_contact(&state, &session, contact_id).await?;

    let notes = dolphin_storage::notes::list_for_contact(&state.pool, contact_id).await?;

    Ok(Json(NotesResponse {
        success: true,
        notes,
    }))
}

/// POST /api/contacts/:id/notes
pub async fn add_note(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(contact_id): Path<ContactId>,
    payload: std::result::Result<Json<AddNoteRequest>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(req) = payload?;

    viewable_contact(&state, &session, contact_id).await?;

    let note = dolphin_storage::notes::add(
        &state.pool,
        CreateNote {
            contact_id,
            comment: req.comment,
            created_by: session.user_id,
        },
    )
    .await?;

    tracing::info!("User {} added note {} to contact {}", session.user_id, note.id, contact_id);

    Ok(Json(json!({
        "success": true,
        "message": "Note added successfully!",
        "note": note,
    })))
}
