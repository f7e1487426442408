//! Endpoint value checks shared by the HTTP backend

use crate::llm::InvokeError;

fn invalid(field: &str, reason: impl Into<String>) -> InvokeError {
    InvokeError::InvalidEndpoint {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Reject values that cannot travel in an HTTP header
///
/// Control characters (including newlines, carriage returns, null bytes and
/// DEL) are not allowed.
pub fn sanitize_for_header(value: &str, field_name: &str) -> Result<String, InvokeError> {
    if value.is_empty() {
        return Err(invalid(field_name, "cannot be empty"));
    }

    if let Some((index, ch)) = value.char_indices().find(|(_, ch)| ch.is_control()) {
        return Err(invalid(
            field_name,
            format!(
                "contains invalid character at position {} ({:#06x})",
                index, ch as u32
            ),
        ));
    }

    Ok(value.to_string())
}

/// Validate an API key can be used in an Authorization header
pub fn validate_api_key(api_key: &str) -> Result<String, InvokeError> {
    let trimmed = api_key.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Err(invalid("API key", "is empty or set to 'none'"));
    }

    sanitize_for_header(trimmed, "API key")?;

    format!("Bearer {}", trimmed)
        .parse::<reqwest::header::HeaderValue>()
        .map_err(|_| {
            invalid(
                "API key",
                format!(
                    "results in an invalid Authorization header ({} characters)",
                    trimmed.len()
                ),
            )
        })?;

    Ok(trimmed.to_string())
}

/// Sanitize a base URL for API requests
///
/// Rejects empty values, URL-encoded separators (a sign of double
/// encoding) and anything that is not http(s). Trailing slashes are removed.
pub fn sanitize_base_url(url: &str, field_name: &str) -> Result<String, InvokeError> {
    let trimmed = url.trim();

    if trimmed.is_empty() {
        return Err(invalid(field_name, "cannot be empty"));
    }

    if trimmed.contains("%2F") || trimmed.contains("%3D") || trimmed.contains("%20") {
        return Err(invalid(
            field_name,
            "appears to contain URL-encoded characters (e.g. %2F, %3D, %20)",
        ));
    }

    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(invalid(
            field_name,
            format!("must start with 'http://' or 'https://', got: {}", trimmed),
        ));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}
