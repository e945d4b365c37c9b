//! Input validation
//!
//! Raw request bodies deserialize into the `*Form` types, which validate
//! into the `Create*` values the storage layer accepts. Every failing field
//! contributes one message; callers get them all at once.

use crate::error::{CrmError, Result};
use crate::types::{ContactType, CreateContact, CreateUser, Role, UserId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Narrower than RFC 5322: quotes, `&` and other HTML-significant
/// characters are rejected, so emails are stored and rendered unescaped.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Email format check.
///
/// The accepted alphabet contains no HTML-special characters, so a valid
/// email is stored verbatim.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least eight characters with an uppercase letter, a lowercase letter
/// and a digit
pub fn password_meets_policy(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Contact creation request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub title: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub telephone: Option<String>,
    pub company: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    /// Page scripts send the `<select>` value as a string; API clients may
    /// send a number.
    pub assigned_to: Option<serde_json::Value>,
}

impl ContactForm {
    /// Validate and trim every field.
    ///
    /// Whether `assigned_to` names an existing user is checked by the
    /// storage layer, which can see the users table.
    pub fn validate(&self) -> Result<CreateContact> {
        let mut errors = Vec::new();

        let mut require = |name: &str, value: Option<&str>| -> String {
            match trimmed(value) {
                Some(v) => v.to_string(),
                None => {
                    errors.push(format!("{name} is required."));
                    String::new()
                }
            }
        };

        let title = require("Title", self.title.as_deref());
        let firstname = require("Firstname", self.firstname.as_deref());
        let lastname = require("Lastname", self.lastname.as_deref());
        let email = require("Email", self.email.as_deref());
        let telephone = require("Telephone", self.telephone.as_deref());
        let company = require("Company", self.company.as_deref());
        let contact_type = require("Type", self.contact_type.as_deref());

        if !email.is_empty() && !is_valid_email(&email) {
            errors.push("Please enter a valid email address.".to_string());
        }

        let contact_type = if contact_type.is_empty() {
            None
        } else {
            match contact_type.parse::<ContactType>() {
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push("Invalid contact type.".to_string());
                    None
                }
            }
        };

        let assigned_to = match parse_user_id(self.assigned_to.as_ref()) {
            Ok(id) => Some(id),
            Err(message) => {
                errors.push(message);
                None
            }
        };

        match (contact_type, assigned_to) {
            (Some(contact_type), Some(assigned_to)) if errors.is_empty() => Ok(CreateContact {
                title,
                firstname,
                lastname,
                email,
                telephone,
                company,
                contact_type,
                assigned_to,
            }),
            _ => Err(CrmError::Validation(errors)),
        }
    }
}

fn parse_user_id(value: Option<&serde_json::Value>) -> std::result::Result<UserId, String> {
    let id = match value {
        None | Some(serde_json::Value::Null) => return Err("Assigned to is required.".to_string()),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => {
            return Err("Assigned to is required.".to_string())
        }
        Some(serde_json::Value::String(s)) => s.trim().parse::<UserId>().ok(),
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(_) => None,
    };

    match id {
        Some(id) if id > 0 => Ok(id),
        _ => Err("Invalid user selected.".to_string()),
    }
}

/// User creation request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// Only the page form sends this
    pub confirm_password: Option<String>,
    /// Defaults to `Member`
    pub role: Option<String>,
}

/// A user form that passed validation. Holds the plaintext password until
/// it is hashed.
#[derive(Debug, Clone)]
pub struct ValidatedUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl ValidatedUser {
    /// Swap the plaintext password for its hash
    pub fn into_create_user(self, password_hash: String) -> CreateUser {
        CreateUser {
            firstname: self.firstname,
            lastname: self.lastname,
            email: self.email,
            password_hash,
            role: self.role,
        }
    }
}

impl UserForm {
    /// Required fields, email format, password policy, role.
    ///
    /// Email uniqueness needs the database and is checked at insert time.
    pub fn validate(&self) -> Result<ValidatedUser> {
        let mut errors = Vec::new();

        let firstname = trimmed(self.firstname.as_deref()).unwrap_or_default();
        if firstname.is_empty() {
            errors.push("First name is required.".to_string());
        }

        let lastname = trimmed(self.lastname.as_deref()).unwrap_or_default();
        if lastname.is_empty() {
            errors.push("Last name is required.".to_string());
        }

        let email = trimmed(self.email.as_deref()).unwrap_or_default();
        if email.is_empty() {
            errors.push("Email is required.".to_string());
        } else if !is_valid_email(email) {
            errors.push("Please enter a valid email address.".to_string());
        }

        // Passwords are taken verbatim, never trimmed.
        let password = self.password.as_deref().unwrap_or_default();
        if password.is_empty() {
            errors.push("Password is required.".to_string());
        } else if !password_meets_policy(password) {
            errors.push(
                "Password must be at least 8 characters with uppercase, lowercase, and number."
                    .to_string(),
            );
        }

        if let Some(confirm) = self.confirm_password.as_deref() {
            if confirm != password {
                errors.push("Passwords do not match.".to_string());
            }
        }

        let role = match trimmed(self.role.as_deref()) {
            None => Role::default(),
            Some(role) => role.parse::<Role>().unwrap_or_else(|_| {
                errors.push("Invalid role selected.".to_string());
                Role::default()
            }),
        };

        if !errors.is_empty() {
            return Err(CrmError::Validation(errors));
        }

        Ok(ValidatedUser {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
        })
    }
}
