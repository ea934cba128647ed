//! Result type alias for Cardex

use super::errors::CardexError;

/// Result type alias for Cardex operations
///
/// # Examples
///
/// ```
/// use cardex::domain::result::Result;
/// use cardex::domain::errors::CardexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(CardexError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, CardexError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::CardexError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(CardexError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
