/// API route modules
pub mod auth;
pub mod contacts;
pub mod health;
pub mod notes;
pub mod pages;
pub mod users;

use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use dolphin_core::{access, Access, Contact, ContactId, Session};

/// Load a contact the session may see.
///
/// Missing and foreign contacts fail identically.
pub(crate) async fn viewable_contact(
    state: &AppState,
    session: &Session,
    id: ContactId,
) -> Result<Contact> {
    let contact = dolphin_storage::contacts::find_by_id(&state.pool, id).await?;

    match (access::check_contact(session, contact.as_ref()), contact) {
        (Access::Allowed, Some(contact)) => Ok(contact),
        (Access::Denied { reason }, _) => Err(ServerError::NotFound(reason.to_string())),
        (Access::Allowed, None) => Err(ServerError::NotFound(access::CONTACT_DENIED.to_string())),
    }
}
