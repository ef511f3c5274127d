//! Login and registration form checks run before anything is sent.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use crate::net::auth::Registration;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// Raw registration form input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Loose shape check: one `@`, non-empty local part, dotted domain, no spaces.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() { Err(ValidationError::Required(field)) } else { Ok(trimmed.to_owned()) }
}

fn email(value: &str) -> Result<String, ValidationError> {
    let email = required(value, "Email")?;
    if is_valid_email(&email) { Ok(email) } else { Err(ValidationError::InvalidEmail) }
}

/// Returns the trimmed email and the untouched password.
///
/// # Errors
///
/// The first failing field, in form order.
pub fn validate_login(email_input: &str, password: &str) -> Result<(String, String), ValidationError> {
    let email = email(email_input)?;
    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    Ok((email, password.to_owned()))
}

/// Build the registration request from form input.
///
/// # Errors
///
/// The first failing field, in form order.
pub fn validate_registration(form: &RegistrationForm) -> Result<Registration, ValidationError> {
    let first_name = required(&form.first_name, "First name")?;
    let last_name = required(&form.last_name, "Last name")?;
    let email = email(&form.email)?;
    if form.password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    if form.password != form.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(Registration {
        first_name,
        last_name,
        email,
        password: form.password.clone(),
        phone: Some(form.phone.trim().to_owned()).filter(|p| !p.is_empty()),
    })
}
