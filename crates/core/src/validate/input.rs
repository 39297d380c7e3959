#![forbid(unsafe_code)]

use url::Url;

/// Malformed input, rejected before any invariant is consulted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must not be empty")]
    Blank { field: &'static str },
    #[error("email address is malformed")]
    InvalidEmail,
    #[error("attachment url is malformed")]
    InvalidUrl,
    #[error("attachment url must use http or https (got {scheme})")]
    UnsupportedUrlScheme { scheme: String },
    #[error("no fields to update")]
    EmptyPatch,
    #[error("invalid assignee filter {raw:?}: expected \"me\" or a numeric user id")]
    InvalidAssignee { raw: String },
    #[error("limit {limit} outside 1..={max}")]
    LimitOutOfRange { limit: usize, max: usize },
}

/// Trims `value` and rejects it when nothing is left.
pub fn required_text(field: &'static str, value: &str) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InputError::Blank { field });
    }
    Ok(trimmed.to_string())
}

/// Lowercases and trims an email; requires a non-empty local part and domain.
pub fn normalize_email(raw: &str) -> Result<String, InputError> {
    let email = raw.trim().to_lowercase();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(InputError::InvalidEmail);
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(InputError::InvalidEmail);
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(InputError::InvalidEmail);
    }
    Ok(email)
}

/// Parses an attachment URL; only http(s) is accepted. Returns the normalized form.
pub fn attachment_url(raw: &str) -> Result<String, InputError> {
    let url = Url::parse(raw.trim()).map_err(|_| InputError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(InputError::UnsupportedUrlScheme {
                scheme: other.to_string(),
            });
        }
    }
    if url.host_str().is_none() {
        return Err(InputError::InvalidUrl);
    }
    Ok(url.into())
}
