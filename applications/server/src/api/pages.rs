/// Server-rendered pages
///
/// Stored text was HTML-escaped when it was written and is interpolated
/// as-is. Only values echoed back from the current request go through
/// `html::escape` here.
use crate::{
    api::viewable_contact,
    cookies,
    error::{Result, ServerError},
    middleware::{auth::resolve_session, AuthenticatedSession},
    state::AppState,
};
use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use dolphin_core::{
    access::{self, Access},
    html, time, validation, Contact, ContactFilter, ContactId, ContactStats, CrmError, Note,
    Session, User,
};
use serde::Deserialize;
use std::fmt::Write as _;

/// Flash key set when a non-administrator opens the users page
const FLASH_ADMIN_REQUIRED: &str = "admin_required";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn layout(title: &str, session: Option<&Session>, body: &str) -> Html<String> {
    let nav = match session {
        Some(session) => {
            let users_link = if access::can_manage_users(session) {
                r#"<a href="/users">Users</a>"#
            } else {
                ""
            };
            format!(
                r#"<nav><a href="/dashboard">Home</a> {users_link} <span class="user">{name} ({role})</span> <a href="/logout">Logout</a></nav>"#,
                name = session.display_name(),
                role = session.role,
            )
        }
        None => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Dolphin CRM - {title}</title>
</head>
<body>
{nav}
<main>
{body}
</main>
</body>
</html>
"#
    ))
}

fn render_login(error: Option<&str>, email: &str) -> Html<String> {
    let error = error
        .map(|msg| format!(r#"<div class="alert alert-error">{}</div>"#, html::escape(msg)))
        .unwrap_or_default();

    layout(
        "Login",
        None,
        &format!(
            r#"<h1>Dolphin CRM</h1>
{error}
<form method="post" action="/login">
<label>Email <input type="email" name="email" value="{email}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Login</button>
</form>"#,
            email = html::escape(email),
        ),
    )
}

/// GET /login
pub async fn login_form(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if resolve_session(&state, &headers).await.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    render_login(None, "").into_response()
}

/// POST /login
pub async fn login_submit(
    State(state): State<AppState>,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Response> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!("Rejected login form: {}", rejection.body_text());
            let page = render_login(Some("Invalid form data. Please try again."), "");
            return Ok((StatusCode::BAD_REQUEST, page).into_response());
        }
    };
    let email = form.email.trim();

    if email.is_empty() || form.password.is_empty() {
        return Ok(render_login(Some("Please enter both email and password."), email).into_response());
    }
    if !validation::is_valid_email(email) {
        return Ok(render_login(Some("Please enter a valid email address."), email).into_response());
    }

    match state
        .auth_service
        .authenticate(&state.pool, email, &form.password)
        .await
    {
        Ok((session, token)) => {
            tracing::info!("User {} logged in", session.user_id);
            let cookie = cookies::session_cookie(
                &token,
                state.auth_service.session_ttl().num_seconds(),
                state.secure_cookie,
            )?;
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/dashboard")).into_response())
        }
        Err(ServerError::Crm(CrmError::InvalidCredentials)) => {
            tracing::info!("Failed login for {}", email);
            Ok(render_login(Some("Invalid email or password."), email).into_response())
        }
        Err(e) => Err(e),
    }
}

/// GET /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    if let Some(session) = resolve_session(&state, &headers).await {
        state.auth_service.destroy(&state.pool, &session).await?;
        tracing::info!("User {} logged out", session.user_id);
    }

    let cookie = cookies::clear_cookie(cookies::SESSION_COOKIE, state.secure_cookie)?;
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response())
}

/// GET /
pub async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

fn render_stats(stats: &ContactStats) -> String {
    format!(
        r#"<section class="stats">
<div class="stat"><h3>Total Contacts</h3><p>{}</p></div>
<div class="stat"><h3>Sales Leads</h3><p>{}</p></div>
<div class="stat"><h3>Support</h3><p>{}</p></div>
<div class="stat"><h3>Assigned to Me</h3><p>{}</p></div>
</section>"#,
        stats.total, stats.sales, stats.support, stats.assigned_to_user
    )
}

fn render_contact_rows(contacts: &[Contact]) -> String {
    if contacts.is_empty() {
        return r#"<tr><td colspan="5">No contacts found.</td></tr>"#.to_string();
    }

    let mut rows = String::new();
    for contact in contacts {
        let _ = write!(
            rows,
            r#"<tr><td>{name}</td><td>{email}</td><td>{company}</td><td><span class="badge {badge}">{kind}</span></td><td><a href="/contacts/{id}">View</a></td></tr>"#,
            name = contact.display_name(),
            email = contact.email,
            company = contact.company,
            badge = contact.contact_type.badge_class(),
            kind = contact.contact_type,
            id = contact.id,
        );
    }
    rows
}

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    headers: HeaderMap,
) -> Result<Response> {
    let stats = dolphin_storage::contacts::stats_for(&state.pool, session.user_id).await?;
    let contacts =
        dolphin_storage::contacts::list(&state.pool, ContactFilter::All, session.user_id).await?;

    let flash = cookies::parse_cookie(&headers, cookies::FLASH_COOKIE);
    let alert = match flash.as_deref() {
        Some(FLASH_ADMIN_REQUIRED) => {
            format!(r#"<div class="alert alert-error">{}</div>"#, access::ADMIN_REQUIRED)
        }
        _ => String::new(),
    };

    let body = format!(
        r#"<h1>Dashboard</h1>
{alert}
{stats}
<div class="filters">
<a href="?filter=all" data-filter="all">All</a>
<a href="?filter=sales" data-filter="sales">Sales Leads</a>
<a href="?filter=support" data-filter="support">Support</a>
<a href="?filter=assigned" data-filter="assigned">Assigned to me</a>
</div>
<table class="contacts">
<thead><tr><th>Name</th><th>Email</th><th>Company</th><th>Type</th><th></th></tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        stats = render_stats(&stats),
        rows = render_contact_rows(&contacts),
    );

    let page = layout("Dashboard", Some(&session), &body);

    if flash.is_some() {
        let cleared = cookies::clear_cookie(cookies::FLASH_COOKIE, state.secure_cookie)?;
        return Ok(([(header::SET_COOKIE, cleared)], page).into_response());
    }
    Ok(page.into_response())
}

fn render_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return r#"<p class="empty">No notes yet.</p>"#.to_string();
    }

    let mut out = String::new();
    for note in notes {
        let _ = write!(
            out,
            r#"<article class="note"><header><strong>{author}</strong> <time>{at}</time></header><p>{comment}</p></article>"#,
            author = note.created_by_name,
            at = note.created_at,
            comment = note.comment,
        );
    }
    out
}

/// GET /contacts/:id
pub async fn contact_page(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
    Path(id): Path<ContactId>,
) -> Result<Response> {
    let contact = match viewable_contact(&state, &session, id).await {
        Ok(contact) => contact,
        Err(ServerError::NotFound(_)) => return Ok(Redirect::to("/dashboard").into_response()),
        Err(e) => return Err(e),
    };
    let notes = dolphin_storage::notes::list_for_contact(&state.pool, id).await?;

    let body = format!(
        r#"<h1>{name}</h1>
<p>Created on {created} by {creator}</p>
<p>Updated on {updated}</p>
<dl>
<dt>Email</dt><dd>{email}</dd>
<dt>Telephone</dt><dd>{telephone}</dd>
<dt>Company</dt><dd>{company}</dd>
<dt>Assigned To</dt><dd id="assigned-to">{assignee}</dd>
<dt>Type</dt><dd><span id="contact-type" class="badge {badge}">{kind}</span></dd>
</dl>
<section class="notes" data-contact-id="{id}">
<h2>Notes</h2>
{notes}
</section>"#,
        name = contact.display_name(),
        created = time::format_date(&contact.created_at),
        creator = contact.creator_name(),
        updated = time::format_date(&contact.updated_at),
        email = contact.email,
        telephone = contact.telephone,
        company = contact.company,
        assignee = contact.assignee_name(),
        badge = contact.contact_type.badge_class(),
        kind = contact.contact_type,
        id = contact.id,
        notes = render_notes(&notes),
    );

    Ok(layout("Contact", Some(&session), &body).into_response())
}

fn render_user_rows(users: &[User]) -> String {
    let mut rows = String::new();
    for user in users {
        let _ = write!(
            rows,
            r#"<tr><td>{name}</td><td>{email}</td><td><span class="badge {badge}">{role}</span></td><td>{created}</td></tr>"#,
            name = user.full_name(),
            email = user.email,
            badge = user.role.badge_class(),
            role = user.role,
            created = time::format_date(&user.created_at),
        );
    }
    rows
}

/// GET /users
pub async fn users_page(
    State(state): State<AppState>,
    AuthenticatedSession(session): AuthenticatedSession,
) -> Result<Response> {
    if let Access::Denied { .. } = access::check_manage_users(&session) {
        let flash = cookies::flash_cookie(FLASH_ADMIN_REQUIRED, state.secure_cookie)?;
        return Ok(([(header::SET_COOKIE, flash)], Redirect::to("/dashboard")).into_response());
    }

    let users = dolphin_storage::users::get_all(&state.pool).await?;

    let body = format!(
        r#"<h1>Users</h1>
<table class="users">
<thead><tr><th>Name</th><th>Email</th><th>Role</th><th>Created</th></tr></thead>
<tbody>{rows}</tbody>
</table>"#,
        rows = render_user_rows(&users),
    );

    Ok(layout("Users", Some(&session), &body).into_response())
}
