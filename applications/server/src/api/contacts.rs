/// Contacts API routes
use crate::{
    api::viewable_contact, error::Result, middleware::AuthenticatedSession, state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use dolphin_core::{Contact, ContactFilter, ContactForm, ContactId, ContactStats};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

/// Contact row as the dashboard table renders it
#[derive(Debug, Serialize)]
pub struct ContactSummary {
    #[serde(flatten)]
    pub contact: Contact,
    pub name: String,
    pub assigned_to_name: String,
    pub created_by_name: String,
    pub badge_class: &'static str,
}

impl From<Contact> for ContactSummary {
    fn from(contact: Contact) -> Self {
        Self {
            name: contact.display_name(),
            assigned_to_name: contact.assignee_name(),
            created_by_name: contact.creator_name(),
            badge_class: contact.contact_type.badge_class(),
            contact,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListContactsResponse {
    pub success: bool,
    pub contacts: Vec<ContactSummary>,
    pub stats: ContactStats,
    pub filter: &'static str,
}

/// GET /api/contacts?filter=all|sales|support|assigned
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListContactsResponse>> {
    let filter = ContactFilter::from_query(query.filter.as_deref());

    let contacts = dolphin_storage::contacts::list(&state.pool, filter, session.user_id).await?;
    let stats = dolphin_storage::contacts::stats_for(&state.pool, session.user_id).await?;

    Ok(Json(ListContactsResponse {
        success: true,
        contacts: contacts.into_iter().map(ContactSummary::from).collect(),
        stats,
        filter: filter.as_str(),
    }))
}

/// POST /api/contacts
pub async fn create_contact(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    payload: std::result::Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(form) = payload?;
    let contact = form.validate()?;

    let contact_id =
        dolphin_storage::contacts::create(&state.pool, contact, session.user_id).await?;

    tracing::info!("User {} created contact {}", session.user_id, contact_id);

    Ok(Json(json!({
        "success": true,
        "message": "Contact added successfully!",
        "contact_id": contact_id,
    })))
}

/// GET /api/contacts/:id
pub async fn get_contact(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<ContactId>,
) -> Result<Json<Value>> {
    let contact = viewable_contact(&state, &session, id).await?;

    Ok(Json(json!({
        "success": true,
        "contact": ContactSummary::from(contact),
    })))
}

/// POST /api/contacts/:id/assign
/// Assign the contact to the caller
pub async fn assign_contact(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<ContactId>,
) -> Result<Json<Value>> {
    viewable_contact(&state, &session, id).await?;

    dolphin_storage::contacts::reassign(&state.pool, id, session.user_id).await?;

    tracing::info!("Contact {} assigned to user {}", id, session.user_id);

    Ok(Json(json!({
        "success": true,
        "message": "Contact assigned to you successfully!",
        "assigned_to_name": session.display_name(),
    })))
}

/// POST /api/contacts/:id/toggle-type
pub async fn toggle_type(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<ContactId>,
) -> Result<Json<Value>> {
    viewable_contact(&state, &session, id).await?;

    let new_type = dolphin_storage::contacts::toggle_type(&state.pool, id).await?;

    tracing::info!("Contact {} switched to {} by user {}", id, new_type, session.user_id);

    Ok(Json(json!({
        "success": true,
        "message": "Contact type updated successfully!",
        "new_type": new_type.as_str(),
        "badge_class": new_type.badge_class(),
    })))
}
