//! Contacts: filtered listing, creation, reassignment, type toggling

use crate::{now_millis, users};
use dolphin_core::{
    html, time, Contact, ContactFilter, ContactId, ContactStats, ContactType, CreateContact,
    CrmError, Result, UserId,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Contact columns plus assignee and creator names. A missing assignee
/// leaves the `assigned_*` columns NULL.
const SELECT_CONTACT: &str = r#"
    SELECT
        c.id, c.title, c.firstname, c.lastname, c.email, c.telephone, c.company,
        c.type, c.assigned_to, c.created_by, c.created_at, c.updated_at,
        u1.firstname AS assigned_firstname,
        u1.lastname AS assigned_lastname,
        u2.firstname AS created_firstname,
        u2.lastname AS created_lastname
    FROM contacts c
    LEFT JOIN users u1 ON c.assigned_to = u1.id
    LEFT JOIN users u2 ON c.created_by = u2.id
"#;

const NEWEST_FIRST: &str = " ORDER BY c.created_at DESC, c.id DESC";

fn contact_from_row(row: &SqliteRow) -> Result<Contact> {
    let contact_type: String = row.get("type");
    Ok(Contact {
        id: row.get("id"),
        title: row.get("title"),
        firstname: row.get("firstname"),
        lastname: row.get("lastname"),
        email: row.get("email"),
        telephone: row.get("telephone"),
        company: row.get("company"),
        contact_type: parse_type(&contact_type)?,
        assigned_to: row.get("assigned_to"),
        created_by: row.get("created_by"),
        created_at: time::from_millis(row.get("created_at"))?,
        updated_at: time::from_millis(row.get("updated_at"))?,
        assigned_firstname: row.get("assigned_firstname"),
        assigned_lastname: row.get("assigned_lastname"),
        created_firstname: row.get("created_firstname"),
        created_lastname: row.get("created_lastname"),
    })
}

fn parse_type(value: &str) -> Result<ContactType> {
    value
        .parse::<ContactType>()
        .map_err(|_| CrmError::storage(format!("Unknown contact type in contacts table: {value}")))
}

/// List contacts matching `filter`, newest first.
///
/// `user_id` is only consulted by [`ContactFilter::Assigned`].
pub async fn list(pool: &SqlitePool, filter: ContactFilter, user_id: UserId) -> Result<Vec<Contact>> {
    let rows = match filter {
        ContactFilter::All => {
            sqlx::query(&format!("{SELECT_CONTACT}{NEWEST_FIRST}"))
                .fetch_all(pool)
                .await?
        }
        ContactFilter::Sales | ContactFilter::Support => {
            let contact_type = if filter == ContactFilter::Sales {
                ContactType::SalesLead
            } else {
                ContactType::Support
            };
            sqlx::query(&format!("{SELECT_CONTACT} WHERE c.type = ?{NEWEST_FIRST}"))
                .bind(contact_type.as_str())
                .fetch_all(pool)
                .await?
        }
        ContactFilter::Assigned => {
            sqlx::query(&format!("{SELECT_CONTACT} WHERE c.assigned_to = ?{NEWEST_FIRST}"))
                .bind(user_id)
                .fetch_all(pool)
                .await?
        }
    };

    rows.iter().map(contact_from_row).collect()
}

/// Get contact by ID, `None` if it does not exist
pub async fn find_by_id(pool: &SqlitePool, id: ContactId) -> Result<Option<Contact>> {
    let row = sqlx::query(&format!("{SELECT_CONTACT} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(contact_from_row).transpose()
}

/// Get contact by ID, [`CrmError::NotFound`] if it does not exist
pub async fn get_by_id(pool: &SqlitePool, id: ContactId) -> Result<Contact> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| CrmError::not_found("Contact", id))
}

/// Create a contact owned by `created_by`.
///
/// The assignee must be an existing user. Free-text fields are escaped on
/// write; the email was restricted to a safe alphabet by validation.
pub async fn create(
    pool: &SqlitePool,
    contact: CreateContact,
    created_by: UserId,
) -> Result<ContactId> {
    if !users::exists(pool, contact.assigned_to).await? {
        return Err(CrmError::validation("Invalid user selected."));
    }

    let now = now_millis();
    let result = sqlx::query(
        r#"
        INSERT INTO contacts
            (title, firstname, lastname, email, telephone, company, type,
             assigned_to, created_by, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(html::escape(contact.title.trim()))
    .bind(html::escape(contact.firstname.trim()))
    .bind(html::escape(contact.lastname.trim()))
    .bind(contact.email.trim())
    .bind(html::escape(contact.telephone.trim()))
    .bind(html::escape(contact.company.trim()))
    .bind(contact.contact_type.as_str())
    .bind(contact.assigned_to)
    .bind(created_by)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Assign a contact to `assignee` and bump `updated_at`.
///
/// Concurrent reassignments are last-write-wins.
pub async fn reassign(pool: &SqlitePool, id: ContactId, assignee: UserId) -> Result<()> {
    let result = sqlx::query("UPDATE contacts SET assigned_to = ?, updated_at = ? WHERE id = ?")
        .bind(assignee)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CrmError::not_found("Contact", id));
    }

    Ok(())
}

/// Flip Sales Lead ↔ Support, bump `updated_at`, return the new type.
///
/// A single statement, so concurrent toggles queue on the write lock and
/// each one flips the type it sees. Callers check `can_view_contact` first.
pub async fn toggle_type(pool: &SqlitePool, id: ContactId) -> Result<ContactType> {
    let row = sqlx::query(
        r#"
        UPDATE contacts
        SET type = CASE type WHEN 'Sales Lead' THEN 'Support' ELSE 'Sales Lead' END,
            updated_at = ?
        WHERE id = ?
        RETURNING type
        "#,
    )
    .bind(now_millis())
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| CrmError::not_found("Contact", id))?;

    parse_type(&row.get::<String, _>("type"))
}

/// Bump `updated_at` on the given connection. Returns false when no contact
/// has that id.
///
/// Issued first in the note transaction so it takes the write lock up front.
pub(crate) async fn touch(conn: &mut SqliteConnection, id: ContactId, at: i64) -> Result<bool> {
    let result = sqlx::query("UPDATE contacts SET updated_at = ? WHERE id = ?")
        .bind(at)
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Dashboard counters: total, sales leads, support, assigned to `user_id`
pub async fn stats_for(pool: &SqlitePool, user_id: UserId) -> Result<ContactStats> {
    let row = sqlx::query(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN type = 'Sales Lead' THEN 1 ELSE 0 END), 0) AS sales,
            COALESCE(SUM(CASE WHEN type = 'Support' THEN 1 ELSE 0 END), 0) AS support,
            COALESCE(SUM(CASE WHEN assigned_to = ? THEN 1 ELSE 0 END), 0) AS assigned
        FROM contacts
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(ContactStats {
        total: row.get("total"),
        sales: row.get("sales"),
        support: row.get("support"),
        assigned_to_user: row.get("assigned"),
    })
}
