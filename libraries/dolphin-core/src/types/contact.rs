/// Contact domain types
use super::ids::{ContactId, UserId};
use crate::error::CrmError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of contact record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactType {
    /// Prospective customer
    #[serde(rename = "Sales Lead")]
    SalesLead,
    /// Existing customer needing help
    Support,
}

impl ContactType {
    /// Stored and displayed name
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::SalesLead => "Sales Lead",
            ContactType::Support => "Support",
        }
    }

    /// The other type. Applying it twice gives back the original.
    pub fn toggled(&self) -> Self {
        match self {
            ContactType::SalesLead => ContactType::Support,
            ContactType::Support => ContactType::SalesLead,
        }
    }

    /// CSS badge used by the pages
    pub fn badge_class(&self) -> &'static str {
        match self {
            ContactType::SalesLead => "badge-sales",
            ContactType::Support => "badge-support",
        }
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactType {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sales Lead" => Ok(ContactType::SalesLead),
            "Support" => Ok(ContactType::Support),
            _ => Err(CrmError::validation("Invalid contact type.")),
        }
    }
}

/// Dashboard filter over the contact list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactFilter {
    /// No predicate
    #[default]
    All,
    /// `type = 'Sales Lead'`
    Sales,
    /// `type = 'Support'`
    Support,
    /// `assigned_to = <current user>`
    Assigned,
}

impl ContactFilter {
    /// Parse a query-string value. Missing or unknown values mean `All`.
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("sales") => ContactFilter::Sales,
            Some("support") => ContactFilter::Support,
            Some("assigned") => ContactFilter::Assigned,
            _ => ContactFilter::All,
        }
    }

    /// Query-string name
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactFilter::All => "all",
            ContactFilter::Sales => "sales",
            ContactFilter::Support => "support",
            ContactFilter::Assigned => "assigned",
        }
    }

    /// Whether `contact` belongs in this filter's result for `user_id`
    pub fn matches(&self, contact: &Contact, user_id: UserId) -> bool {
        match self {
            ContactFilter::All => true,
            ContactFilter::Sales => contact.contact_type == ContactType::SalesLead,
            ContactFilter::Support => contact.contact_type == ContactType::Support,
            ContactFilter::Assigned => contact.assigned_to == Some(user_id),
        }
    }
}

/// Contact enriched with assignee and creator names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub title: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub telephone: String,
    pub company: String,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    pub assigned_to: Option<UserId>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Denormalized fields for display
    pub assigned_firstname: Option<String>,
    pub assigned_lastname: Option<String>,
    pub created_firstname: Option<String>,
    pub created_lastname: Option<String>,
}

impl Contact {
    /// "Title Firstname Lastname"
    pub fn display_name(&self) -> String {
        format!("{} {} {}", self.title, self.firstname, self.lastname)
    }

    /// Assignee's name, or "Unassigned" when nobody (or a missing user) holds it
    pub fn assignee_name(&self) -> String {
        join_name(
            self.assigned_firstname.as_deref(),
            self.assigned_lastname.as_deref(),
        )
        .unwrap_or_else(|| "Unassigned".to_string())
    }

    /// Creator's name, or "Unknown" if the user row is gone
    pub fn creator_name(&self) -> String {
        join_name(
            self.created_firstname.as_deref(),
            self.created_lastname.as_deref(),
        )
        .unwrap_or_else(|| "Unknown".to_string())
    }
}

fn join_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    if first.is_none() && last.is_none() {
        return None;
    }
    let name = format!("{} {}", first.unwrap_or_default(), last.unwrap_or_default());
    Some(name.trim().to_string())
}

/// Validated data for creating a contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContact {
    pub title: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub telephone: String,
    pub company: String,
    pub contact_type: ContactType,
    pub assigned_to: UserId,
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactStats {
    pub total: i64,
    pub sales: i64,
    pub support: i64,
    #[serde(rename = "assigned")]
    pub assigned_to_user: i64,
}
