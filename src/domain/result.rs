//! Result type alias for MediCode

use super::errors::MedicodeError;

/// Result type alias for MediCode operations
///
/// # Examples
///
/// ```
/// use medicode::domain::result::Result;
/// use medicode::domain::errors::MedicodeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MedicodeError::InvalidInput("missing code".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MedicodeError>;
