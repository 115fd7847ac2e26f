//! Result type alias for Docseed

use super::errors::DocseedError;

/// Result type alias for Docseed operations
///
/// # Examples
///
/// ```
/// use docseed::domain::result::Result;
/// use docseed::domain::errors::DocseedError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DocseedError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DocseedError>;

#[cfg(test)]
mod tests {
    use super::*;

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
