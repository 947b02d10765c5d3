//! Input helpers shared by the service layers

use std::sync::LazyLock;

use crate::MAX_PAGE_SIZE;
use crate::error::BeaconError;

/// Regex pattern for validating identifiers (projectId, stored names, etc.)
static VALID_PATTERN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new("^[a-zA-Z0-9_.:-]*$").expect("Invalid regex pattern"));

/// Checks if a string contains only identifier characters
///
/// Valid characters: alphanumeric, underscore, dot, colon, hyphen
pub fn is_valid(str: &str) -> bool {
    VALID_PATTERN.is_match(str)
}

/// Trims an optional string, mapping blank values to `None`
pub fn optional_trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Returns the trimmed value or a validation error naming the missing field
pub fn required(field: &str, value: Option<&str>) -> Result<String, BeaconError> {
    optional_trimmed(value).ok_or_else(|| BeaconError::Validation(format!("{field} is required")))
}

/// Validates a project identifier
pub fn project_id(value: Option<&str>) -> Result<String, BeaconError> {
    let project_id = required("projectId", value)?;
    if !is_valid(&project_id) {
        return Err(BeaconError::Validation(format!(
            "projectId '{project_id}' contains invalid characters"
        )));
    }
    Ok(project_id)
}

/// Resolves a 1-based page window, applying the default size when absent.
///
/// The row offset of the window must fit a signed 64-bit integer.
pub fn page_window(
    page: Option<u64>,
    page_size: Option<u64>,
    default_size: u64,
) -> Result<(u64, u64), BeaconError> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(default_size);

    if page < 1 {
        return Err(BeaconError::Validation("page must be >= 1".to_string()));
    }
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(BeaconError::Validation(format!(
            "pageSize must be between 1 and {MAX_PAGE_SIZE}"
        )));
    }
    let in_range = (page - 1)
        .checked_mul(page_size)
        .is_some_and(|offset| offset <= i64::MAX as u64);
    if !in_range {
        return Err(BeaconError::Validation(format!("page {page} is out of range")));
    }

    Ok((page, page_size))
}
