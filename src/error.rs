use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum OmnigageError {
    #[error("File {} not found.", path.display())]
    FileNotFound { path: PathBuf },
    #[error("Only PNG or JPG files accepted: {}", path.display())]
    UnsupportedFileType { path: PathBuf },
    #[error("Storage upload failed with status {status}: {body}")]
    StorageUploadFailed { status: u16, body: String },
    #[error("API request failed with status {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("Uploaded {uploads} file(s) but the template references {files}")]
    FileCountMismatch { uploads: usize, files: usize },
    #[error("Missing configuration value. Please set the {0} environment variable.")]
    MissingConfig(&'static str),
    #[error("Invalid request header: {0}")]
    InvalidHeader(String),
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Failed to parse API response: {0}")]
    ResponseParseFailed(#[from] serde_json::Error),
    #[error("URL parsing failed: {0}")]
    UrlParseFailed(#[from] url::ParseError),
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::header::InvalidHeaderValue> for OmnigageError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for OmnigageError {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        Self::InvalidHeader(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OmnigageError>;
