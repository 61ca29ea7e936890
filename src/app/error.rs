use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirscoutError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Timed out after {secs}s loading {url}")]
    Timeout { url: String, secs: u64 },

    #[error("AI scoring error: {0}")]
    Ai(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<rust_xlsxwriter::XlsxError> for DirscoutError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        DirscoutError::Export(e.to_string())
    }
}

impl From<csv::Error> for DirscoutError {
    fn from(e: csv::Error) -> Self {
        DirscoutError::Export(e.to_string())
    }
}

impl From<async_openai::error::OpenAIError> for DirscoutError {
    fn from(e: async_openai::error::OpenAIError) -> Self {
        DirscoutError::Ai(e.to_string())
    }
}

impl From<crate::config::ConfigError> for DirscoutError {
    fn from(e: crate::config::ConfigError) -> Self {
        DirscoutError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DirscoutError>;
