use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadAddress(String),
    DirectoryDoesNotExist(String),
    BadLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadAddress(e) => write!(f, "Bind address error: {}", e),
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
            ConfigError::BadLogLevel(e) => write!(f, "Unknown log level: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    ReadFailed(String),
    WriteFailed(String),
    /// The file exists but does not hold the expected JSON shape.
    Corrupt { file: String, reason: String },
    /// The file is required on this read path and is absent.
    Missing(String),
    LockPoisoned(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadFailed(file) => write!(f, "Storage read failed: {}", file),
            StorageError::WriteFailed(file) => write!(f, "Storage write failed: {}", file),
            StorageError::Corrupt { file, reason } => {
                write!(f, "Storage file {} is corrupt: {}", file, reason)
            }
            StorageError::Missing(file) => write!(f, "Storage file {} not found", file),
            StorageError::LockPoisoned(file) => write!(f, "Storage lock poisoned: {}", file),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    NotFound(String),
    Conflict(String),
    /// A request body that cannot be read as the targeted record.
    InvalidRecord(String),
    Storage(StorageError),
    Internal(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(e) => write!(f, "{}", e),
            CatalogError::Conflict(e) => write!(f, "{}", e),
            CatalogError::InvalidRecord(e) => write!(f, "Invalid record: {}", e),
            CatalogError::Storage(e) => write!(f, "{}", e),
            CatalogError::Internal(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<StorageError> for CatalogError {
    fn from(err: StorageError) -> Self {
        CatalogError::Storage(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::InvalidRecord(err.to_string())
    }
}

#[derive(Debug)]
pub enum WebError {
    BindFailed(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BindFailed(e) => write!(f, "Web server bind failed: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

#[derive(Debug)]
pub enum ControllerError {
    ConfigurationError(ConfigError),
    StorageError(StorageError),
    WebError(WebError),
    InitializationFailed(String),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ConfigurationError(e) => write!(f, "Configuration error: {}", e),
            ControllerError::StorageError(e) => write!(f, "Storage error: {}", e),
            ControllerError::WebError(e) => write!(f, "Web error: {}", e),
            ControllerError::InitializationFailed(e) => write!(f, "Initialization failed: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}

impl From<ConfigError> for ControllerError {
    fn from(err: ConfigError) -> Self {
        ControllerError::ConfigurationError(err)
    }
}

impl From<StorageError> for ControllerError {
    fn from(err: StorageError) -> Self {
        ControllerError::StorageError(err)
    }
}

impl From<WebError> for ControllerError {
    fn from(err: WebError) -> Self {
        ControllerError::WebError(err)
    }
}
