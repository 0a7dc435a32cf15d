use crate::utils::AppError;

/// A submitted field that must be present and non-blank.
pub fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(AppError::MissingField(field.to_string())),
    }
}

/// Like `required`, but returns the value exactly as submitted. Used for
/// passwords, where surrounding whitespace is significant.
pub fn required_verbatim(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field.to_string())),
    }
}

/// Canonical form under which emails are stored and looked up.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_string()
}

pub fn parse_f64(field: &str, raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::invalid_number(field, raw))
}

pub fn parse_i64(field: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_number(field, raw))
}
