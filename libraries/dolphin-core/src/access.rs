//! Access control
//!
//! Pure predicates over an authenticated [`Session`] and a target resource.
//! Unauthenticated requests never get this far: the server's middleware
//! rejects them before any handler runs.
//!
//! Contact ownership comes from two independent columns, `assigned_to` and
//! `created_by`. Administrators bypass both.

use crate::error::CrmError;
use crate::types::{Contact, Role, Session};

/// Reason given for any contact a session may not touch, including contacts
/// that do not exist.
pub const CONTACT_DENIED: &str = "Contact not found or access denied";

/// Reason given when a non-administrator reaches a user-management action
pub const ADMIN_REQUIRED: &str = "Access denied. Administrator privileges required.";

/// Outcome of a capability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied { reason: &'static str },
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allowed)
    }

    /// `Denied` becomes [`CrmError::Unauthorized`]
    pub fn into_result(self) -> crate::Result<()> {
        match self {
            Access::Allowed => Ok(()),
            Access::Denied { reason } => Err(CrmError::Unauthorized(reason.to_string())),
        }
    }
}

pub fn is_administrator(session: &Session) -> bool {
    session.role == Role::Administrator
}

pub fn can_manage_users(session: &Session) -> bool {
    is_administrator(session)
}

/// Administrator, assignee, or creator
pub fn can_view_contact(session: &Session, contact: &Contact) -> bool {
    is_administrator(session)
        || contact.assigned_to == Some(session.user_id)
        || contact.created_by == session.user_id
}

pub fn check_manage_users(session: &Session) -> Access {
    if can_manage_users(session) {
        Access::Allowed
    } else {
        Access::Denied {
            reason: ADMIN_REQUIRED,
        }
    }
}

/// Gate on a contact lookup result.
///
/// A missing contact is denied with exactly the same reason as a contact
/// owned by someone else.
pub fn check_contact(session: &Session, contact: Option<&Contact>) -> Access {
    match contact {
        Some(contact) if can_view_contact(session, contact) => Access::Allowed,
        _ => Access::Denied {
            reason: CONTACT_DENIED,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContactType, UserId};
    use chrono::{Duration, Utc};

    fn session(user_id: UserId, role: Role) -> Session {
        let now = Utc::now();
        Session {
            id: format!("session-{user_id}"),
            user_id,
            role,
            firstname: "Test".to_string(),
            lastname: "User".to_string(),
            email: format!("user{user_id}@example.com"),
            login_time: now,
            expires_at: now + Duration::hours(1),
        }
    }

    fn contact(assigned_to: Option<UserId>, created_by: UserId) -> Contact {
        let now = Utc::now();
        Contact {
            id: 10,
            title: "Mr".to_string(),
            firstname: "Michael".to_string(),
            lastname: "Scott".to_string(),
            email: "michael@example.com".to_string(),
            telephone: "555-0199".to_string(),
            company: "Dunder Mifflin".to_string(),
            contact_type: ContactType::SalesLead,
            assigned_to,
            created_by,
            created_at: now,
            updated_at: now,
            assigned_firstname: None,
            assigned_lastname: None,
            created_firstname: None,
            created_lastname: None,
        }
    }

    #[test]
    fn test_administrator_sees_everything() {
        let admin = session(1, Role::Administrator);
        assert!(is_administrator(&admin));
        assert!(can_manage_users(&admin));
        assert!(can_view_contact(&admin, &contact(Some(2), 3)));
        assert!(can_view_contact(&admin, &contact(None, 3)));
    }

    #[test]
    fn test_assignee_and_creator_may_view() {
        let member = session(5, Role::Member);
        assert!(can_view_contact(&member, &contact(Some(5), 9)));
        assert!(can_view_contact(&member, &contact(None, 5)));
        assert!(can_view_contact(&member, &contact(Some(2), 5)));
    }

    #[test]
    fn test_other_members_may_not_view() {
        let member = session(5, Role::Member);
        assert!(!can_view_contact(&member, &contact(Some(2), 3)));
        assert!(!can_view_contact(&member, &contact(None, 3)));
        assert!(!can_manage_users(&member));
    }

    #[test]
    fn test_exhaustive_ownership_table() {
        // Every combination of role x assignee x creator over three users.
        let users = [1, 2, 3];
        for role in [Role::Member, Role::Administrator] {
            for &me in &users {
                let s = session(me, role);
                for assignee in [None, Some(1), Some(2), Some(3)] {
                    for &creator in &users {
                        let c = contact(assignee, creator);
                        let expected = role == Role::Administrator
                            || assignee == Some(me)
                            || creator == me;
                        assert_eq!(can_view_contact(&s, &c), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_missing_and_foreign_contacts_are_indistinguishable() {
        let member = session(5, Role::Member);
        let foreign = contact(Some(1), 1);

        let missing = check_contact(&member, None);
        let denied = check_contact(&member, Some(&foreign));
        assert_eq!(missing, denied);
        assert!(!missing.is_allowed());

        let err = denied.into_result().unwrap_err();
        assert!(matches!(err, CrmError::Unauthorized(ref r) if r == CONTACT_DENIED));
    }

    #[test]
    fn test_check_manage_users() {
        assert_eq!(
            check_manage_users(&session(1, Role::Administrator)),
            Access::Allowed
        );
        assert_eq!(
            check_manage_users(&session(2, Role::Member)),
            Access::Denied {
                reason: ADMIN_REQUIRED
            }
        );
    }
}
