use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;
use tienda_payment_engine::CheckoutError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid request. {0}")]
    InvalidRequest(String),
    #[error("Malformed webhook payload. {0}")]
    MalformedWebhook(String),
    #[error("Event signature invalid or not provided")]
    InvalidSignature,
    #[error("The transaction is not known to this server. {0}")]
    UnknownTransaction(String),
    #[error("The order was not found. {0}")]
    OrderNotFound(String),
    #[error("The payment gateway rejected the request. {0}")]
    GatewayRejected(String),
    #[error("The payment gateway could not be reached. {0}")]
    GatewayUnavailable(String),
    #[error("An error occurred on the backend of the server. {0}")]
    PersistenceError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Checkout conversion error. {0}")]
    CheckoutConversionError(#[from] CheckoutConversionError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MalformedWebhook(_) => StatusCode::BAD_REQUEST,
            Self::CheckoutConversionError(_) => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::UnknownTransaction(_) => StatusCode::NOT_FOUND,
            Self::OrderNotFound(_) => StatusCode::NOT_FOUND,
            Self::GatewayRejected(_) => StatusCode::BAD_GATEWAY,
            Self::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PersistenceError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Error)]
#[error("Could not convert checkout request into a payment request. {0}.")]
pub struct CheckoutConversionError(pub String);

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::DatabaseError(e) => Self::PersistenceError(format!("Database error: {e}")),
            CheckoutError::OrderAlreadyExists(_) => Self::InvalidRequest(e.to_string()),
            CheckoutError::TransactionAlreadyExists { .. } => Self::InvalidRequest(e.to_string()),
            CheckoutError::TransactionNotFound(id) => Self::UnknownTransaction(id),
            CheckoutError::OrderNotFound(id) => Self::OrderNotFound(id.to_string()),
        }
    }
}
