use crate::{
    resolve,
    template,
};

/// Project generation error type.
/// Only configuration problems and output I/O end up here; content problems go to the validation report.
#[derive(Debug)]
pub enum GenError {
    /// IO error.
    IoError(crate::io::IoError),
    /// Interface role error.
    ResolveError(resolve::ResolveError),
    /// Replacement map or substitution error.
    TemplateError(template::TemplateError),
    /// StringOnly error.
    StringOnly(String),
}
impl std::fmt::Display for GenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenError::IoError(error) => write!(f, "- IO Error:\n{}", error),
            GenError::ResolveError(error) => write!(f, "- Interface Resolution Error:\n{}", error),
            GenError::TemplateError(error) => write!(f, "- Template Error:\n{}", error),
            GenError::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}
impl From<crate::io::IoError> for GenError {
    fn from(error: crate::io::IoError) -> Self {
        GenError::IoError(error)
    }
}
impl From<resolve::ResolveError> for GenError {
    fn from(error: resolve::ResolveError) -> Self {
        GenError::ResolveError(error)
    }
}
impl From<template::TemplateError> for GenError {
    fn from(error: template::TemplateError) -> Self {
        GenError::TemplateError(error)
    }
}
impl From<String> for GenError {
    fn from(error: String) -> Self {
        GenError::StringOnly(error)
    }
}

/// Result type for the `generate` module.
pub type ProcResult<T> = std::result::Result<T, GenError>;

/// Create a `GenError::StringOnly` from a string.
pub fn err_str<T>(error_str: &str) -> ProcResult<T> {
    Err(GenError::StringOnly(error_str.to_string()))
}
