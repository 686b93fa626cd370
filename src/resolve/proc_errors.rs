/// Interface resolution error type.
/// A role without matches is not an error, it resolves to a sentinel.
#[derive(Debug)]
pub enum ResolveError {
    /// A role's pattern is not a valid regular expression.
    InvalidPattern {
        role: String,
        error: regex::Error,
    },
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::InvalidPattern{role, error} => write!(f, "- Invalid pattern for role {}:\n{}", role, error),
            ResolveError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<String> for ResolveError {
    fn from(error: String) -> Self {
        ResolveError::StringOnly(error)
    }
}

/// Result type for the `resolve` module.
pub type ProcResult<T> = std::result::Result<T, ResolveError>;

/// Create a `ResolveError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(ResolveError::StringOnly(error_str.to_string()))
}
