use thiserror::Error;

#[derive(Debug, Error)]
pub enum WompiApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    RestResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The gateway response was missing required fields: {0}")]
    UnexpectedResponse(String),
}

impl WompiApiError {
    /// True when the gateway itself answered with a non-success status, as opposed to a
    /// transport-level failure where no answer arrived at all.
    pub fn is_rejection(&self) -> bool {
        matches!(self, WompiApiError::QueryError { .. })
    }
}
