//! Input validation for commands, applied before any actor is called.

use crate::naming::to_kebab_case;
use thiserror::Error;

pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Registration payload as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Tenant creation payload as received from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantInput {
    pub name: String,
    pub description: String,
}

/// Checks a registration payload and returns it trimmed.
pub fn validate_registration(
    input: &RegistrationInput,
) -> Result<RegistrationInput, ValidationError> {
    let email = input.email.trim();
    validate_email(email)?;
    let first_name = required("firstName", &input.first_name, MAX_NAME_LEN)?;
    let last_name = required("lastName", &input.last_name, MAX_NAME_LEN)?;
    Ok(RegistrationInput {
        email: email.to_string(),
        first_name,
        last_name,
    })
}

/// Checks a tenant payload and returns it trimmed together with the derived
/// system name.
pub fn validate_tenant(input: &TenantInput) -> Result<(String, TenantInput), ValidationError> {
    let name = required("name", &input.name, MAX_NAME_LEN)?;
    let system_name = to_kebab_case(&name);
    if system_name.is_empty() {
        return Err(ValidationError::new(
            "name",
            "must contain at least one letter or digit",
        ));
    }
    let description = input.description.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::new(
            "description",
            format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
        ));
    }
    Ok((
        system_name,
        TenantInput {
            name,
            description: description.to_string(),
        },
    ))
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(value.to_string())
}

/// Structural email check: one `@`, non-empty local part, dotted domain.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("email", "is required"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::new(
            "email",
            format!("must be at most {} characters", MAX_EMAIL_LEN),
        ));
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .split('.')
                    .all(|label| !label.is_empty())
                && domain.contains('.')
        }
        None => false,
    };
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("email", "is not a valid email address"))
    }
}
