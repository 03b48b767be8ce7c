pub mod auth;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod products;
pub mod suppliers;

/// Field checks shared by the client forms and the reference backend.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub(crate) fn require_name(name: &str, what: &str, max_len: usize) -> Result<(), String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("The {what} name cannot be empty"));
    }
    if trimmed.chars().count() > max_len {
        return Err(format!("The {what} name must be at most {max_len} characters"));
    }
    Ok(())
}

pub(crate) fn require_email(email: &str) -> Result<(), String> {
    let trimmed = email.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(format!("'{trimmed}' is not a valid e-mail address")),
    }
}

/// Blank optional text is sent as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
