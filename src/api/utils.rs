//! API utility functions
//!
//! Request validation shared by handlers.

use crate::error::AppError;

/// Maximum query length in characters
pub const MAX_QUERY_LENGTH: usize = 10_000;

/// Validate query string
///
/// # Arguments
/// * `query` - Query string to validate
///
/// # Returns
/// * `Ok(())` - Query is valid
/// * `Err(AppError)` - Query is invalid (empty or too long)
pub fn validate_query(query: &str) -> Result<(), AppError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidRequest("Query cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(AppError::InvalidRequest(format!(
            "Query exceeds maximum length of {} characters",
            MAX_QUERY_LENGTH
        )));
    }
    Ok(())
}
