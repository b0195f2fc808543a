use actix_web::{
    error::{InternalError, JsonPayloadError, QueryPayloadError},
    HttpRequest, HttpResponse,
};

mod health_check;
mod subscribers;
mod subscriptions;

pub use health_check::health_check;
pub use subscribers::{list_subscribers, ListSubscribersError};
pub use subscriptions::{subscribe, SubscribeError};

/// Body of every error response. Clients display `detail` as is.
#[derive(Debug, serde::Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

impl ErrorDetail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Malformed or incomplete JSON bodies are reported as 422, like any other invalid input.
pub fn json_error_handler(err: JsonPayloadError, _: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", err);
    let response = HttpResponse::UnprocessableEntity().json(ErrorDetail::new(err.to_string()));

    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected query string: {}", err);
    let response = HttpResponse::UnprocessableEntity().json(ErrorDetail::new(err.to_string()));

    InternalError::from_response(err, response).into()
}
