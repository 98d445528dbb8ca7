use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Site errors
    #[error("Invalid site URL: {0}")]
    InvalidUrl(String),

    #[error("Site not found: {0}")]
    SiteNotFound(String),

    #[error("Site already exists: {0}")]
    SiteAlreadyExists(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed fetch failed: {url} returned HTTP {status}")]
    FeedUnavailable { url: String, status: u16 },

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    #[error("OPML parsing failed: {0}")]
    OpmlParse(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Batch errors
    #[error("A check is already in progress")]
    BatchInProgress,

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    // Notification errors
    #[error("Notification failed: {0}")]
    Notification(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<url::ParseError> for WatchError {
    fn from(err: url::ParseError) -> Self {
        WatchError::InvalidUrl(err.to_string())
    }
}

impl From<rss::Error> for WatchError {
    fn from(err: rss::Error) -> Self {
        WatchError::FeedParse(err.to_string())
    }
}

pub type WatchResult<T> = Result<T, WatchError>;
