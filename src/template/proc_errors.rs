use crate::template::Layer;

/// Template substitution error type.
#[derive(Debug)]
pub enum TemplateError {
    /// IO error.
    IoError(crate::io::IoError),
    /// Key outside the reserved token alphabet.
    InvalidKey {
        layer: Layer,
        key: String,
    },
    /// Same key twice in one layer.
    DuplicateKey {
        layer: Layer,
        key: String,
    },
    /// A replacement value contains another key, so the result would depend on order.
    ValueContainsKey {
        key: String,
        contained: String,
    },
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::IoError(error) => write!(f, "- IO Error:\n{}", error),
            TemplateError::InvalidKey{layer, key} => write!(f, "- Invalid placeholder key in {} layer: '{}'", layer, key),
            TemplateError::DuplicateKey{layer, key} => write!(f, "- Placeholder key repeated in {} layer: '{}'", layer, key),
            TemplateError::ValueContainsKey{key, contained} => write!(f, "- Value of '{}' contains the placeholder '{}'", key, contained),
            TemplateError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<crate::io::IoError> for TemplateError {
    fn from(error: crate::io::IoError) -> Self {
        TemplateError::IoError(error)
    }
}
impl From<String> for TemplateError {
    fn from(error: String) -> Self {
        TemplateError::StringOnly(error)
    }
}

/// Result type for the `template` module.
pub type ProcResult<T> = std::result::Result<T, TemplateError>;

/// Create a `TemplateError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(TemplateError::StringOnly(error_str.to_string()))
}
