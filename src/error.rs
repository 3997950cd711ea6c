use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResultsError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed results document: {0}")]
    Malformed(#[from] quick_xml::DeError),

    #[error("invalid server address: {0}")]
    InvalidServer(#[from] url::ParseError),
}

impl ResultsError {
    /// True when the agent answered but the body was not a results document.
    pub fn is_malformed(&self) -> bool {
        matches!(self, ResultsError::Malformed(_))
    }
}

pub type ResultsResult<T> = Result<T, ResultsError>;
