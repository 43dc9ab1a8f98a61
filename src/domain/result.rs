//! Result type alias for Vigil

use super::errors::VigilError;

/// Result type alias for Vigil operations
///
/// # Examples
///
/// ```
/// use vigil::domain::result::Result;
/// use vigil::domain::errors::VigilError;
///
/// fn failing_function() -> Result<()> {
///     Err(VigilError::Validation("Invalid input".to_string()))
/// }
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, VigilError>;
