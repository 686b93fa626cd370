use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum IoErrorType {
    File(std::io::Error),
    SerdeJson(serde_json::Error),
    SerdeYaml(serde_yaml::Error),
    TomlDe(toml::de::Error),
    StringOnly(String),
}
impl std::fmt::Display for IoErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoErrorType::File(error) => write!(f, "- File IO Error:\n{}", error),
            IoErrorType::SerdeJson(error) => write!(f, "- JSON Deserialization Error:\n{}", error),
            IoErrorType::SerdeYaml(error) => write!(f, "- YAML Deserialization Error:\n{}", error),
            IoErrorType::TomlDe(error) => write!(f, "- TOML Deserialization Error:\n{}", error),
            IoErrorType::StringOnly(error) => write!(f, "- {}", error),
        }
    }
}

/// Custom verbose IO error struct.
#[derive(Debug)]
pub struct IoError {
    /// Filepath facing an error.
    pub file: Option<String>,
    /// Error cause.
    pub cause: IoErrorType,
}
impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.file {
            Some(ref file) => write!(f, "- Error with file: {}\n{}", file, self.cause),
            None => write!(f, "{}", self.cause),
        }
    }
}
impl IoError {
    /// Wrap a `std::io::Error` with the path it happened on.
    pub fn file(path: &Path, error: std::io::Error) -> Self {
        IoError{file: Some(path.display().to_string()), cause: IoErrorType::File(error)}
    }
}

pub type IoResult<T> = std::result::Result<T, IoError>;

/// Open a file with verbose errors.
pub fn open(path: &Path) -> IoResult<std::fs::File> {
    std::fs::File::open(path).map_err(|error| IoError::file(path, error))
}

/// Create a file with verbose errors.
/// Missing parent directories are created first.
pub fn create(path: &Path) -> IoResult<std::fs::File> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::File::create(path).map_err(|error| IoError::file(path, error))
}

/// Create a directory and its parents with verbose errors.
pub fn create_dir_all(path: &Path) -> IoResult<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(path).map_err(|error| IoError::file(path, error))
}

/// Read a file to a string with verbose errors.
pub fn read_to_string(path: &Path) -> IoResult<String> {
    std::fs::read_to_string(path).map_err(|error| IoError::file(path, error))
}

/// Read a file as text, replacing any invalid UTF-8 sequences.
/// Only fails if the file can't be read at all.
pub fn read_lossy(path: &Path) -> IoResult<String> {
    let bytes = std::fs::read(path).map_err(|error| IoError::file(path, error))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a file as text, returning `None` if the content is not valid UTF-8.
pub fn read_text(path: &Path) -> IoResult<Option<String>> {
    let bytes = std::fs::read(path).map_err(|error| IoError::file(path, error))?;
    Ok(String::from_utf8(bytes).ok())
}

/// Write string to file with verbose errors.
pub fn write_to_file(path: &Path, buffer: &str) -> IoResult<()> {
    let mut f = create(path)?;
    f.write_all(buffer.as_bytes()).map_err(|error| IoError::file(path, error))
}

/// Copy a single file, creating the destination's parent directories.
pub fn copy_file(from: &Path, to: &Path) -> IoResult<()> {
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    std::fs::copy(from, to).map_err(|error| IoError::file(from, error))?;
    Ok(())
}

/// Copy a directory tree into `to`, merging with whatever is already there.
/// Existing files are overwritten. Returns the copied destination paths.
pub fn copy_dir_recursive(from: &Path, to: &Path) -> IoResult<Vec<PathBuf>> {
    let mut copied = Vec::new();
    create_dir_all(to)?;
    for entry in list_dir(from)? {
        let target = to.join(entry.file_name().unwrap_or_default());
        if entry.is_dir() {
            copied.extend(copy_dir_recursive(&entry, &target)?);
        } else {
            copy_file(&entry, &target)?;
            copied.push(target);
        }
    }
    Ok(copied)
}

/// List the entries of a directory, sorted by path.
pub fn list_dir(path: &Path) -> IoResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(path).map_err(|error| IoError::file(path, error))?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|error| IoError::file(path, error))?;
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

/// Recursively collect every regular file under `root`, sorted by path.
pub fn walk_files(root: &Path) -> IoResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in list_dir(root)? {
        if entry.is_dir() {
            files.extend(walk_files(&entry)?);
        } else if entry.is_file() {
            files.push(entry);
        }
    }
    Ok(files)
}

/// Read in cfg files from the supported filetypes.
pub fn read_cfg_file<T>(path: &Path) -> IoResult<T>
where T: serde::de::DeserializeOwned
{
    let file_name = path.display().to_string();
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => {
            serde_json::from_reader(open(path)?)
                .map_err(|error| IoError{file: Some(file_name), cause: IoErrorType::SerdeJson(error)})
        },
        Some("toml") => {
            toml::from_str(&read_to_string(path)?)
                .map_err(|error| IoError{file: Some(file_name), cause: IoErrorType::TomlDe(error)})
        },
        Some("yaml") | Some("yml") => {
            serde_yaml::from_reader(open(path)?)
                .map_err(|error| IoError{file: Some(file_name), cause: IoErrorType::SerdeYaml(error)})
        },
        _ => {
            let supported_filetypes = vec!["json", "toml", "yaml", "yml"];
            let error_string = format!("Unsupported filetype for config file: {}\nSupported filetypes: {:?}", file_name, supported_filetypes);
            Err(IoError{file: Some(file_name), cause: IoErrorType::StringOnly(error_string)})
        },
    }
}
