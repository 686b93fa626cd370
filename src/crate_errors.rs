use crate::{
    args,
    generate,
    mesh,
};

/// Error-type enum for the `meshcouple` crate.
/// Only configuration and output problems reach here; mesh and interface problems are reported instead.
#[derive(Debug)]
pub enum MeshcoupleError {
    ArgError(args::ArgError),
    MeshError(mesh::MeshError),
    GenError(generate::GenError),
    StringOnly(String),
}
impl std::fmt::Display for MeshcoupleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshcoupleError::ArgError(error) => write!(f, "! ARGUMENT ERROR:\n{}", error),
            MeshcoupleError::MeshError(error) => write!(f, "! MESH ERROR:\n{}", error),
            MeshcoupleError::GenError(error) => write!(f, "! GENERATION ERROR:\n{}", error),
            MeshcoupleError::StringOnly(error) => write!(f, "! MESHCOUPLE ERROR:\n- {}", error),
        }
    }
}
impl From<String> for MeshcoupleError {
    fn from(error: String) -> Self {
        MeshcoupleError::StringOnly(error)
    }
}
impl From<args::ArgError> for MeshcoupleError {
    fn from(error: args::ArgError) -> Self {
        MeshcoupleError::ArgError(error)
    }
}
impl From<mesh::MeshError> for MeshcoupleError {
    fn from(error: mesh::MeshError) -> Self {
        MeshcoupleError::MeshError(error)
    }
}
impl From<generate::GenError> for MeshcoupleError {
    fn from(error: generate::GenError) -> Self {
        MeshcoupleError::GenError(error)
    }
}

/// Result type for the `meshcouple` crate.
pub type MeshcoupleResult<T> = std::result::Result<T, MeshcoupleError>;

/// Create a `MeshcoupleResult` with an `Err` from a string.
/// Shorthand to avoid writing `Err(crate::MeshcoupleError::StringOnly(error_str))`.
pub fn err_str<T>(error_str: &str) -> MeshcoupleResult<T> {
    Err(MeshcoupleError::StringOnly(error_str.to_string()))
}
