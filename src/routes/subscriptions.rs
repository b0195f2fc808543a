use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};

use crate::{
    domain::new_subscriber::{NewSubscriber, NewSubscriberBody},
    routes::ErrorDetail,
    store::{StoreError, SubscriberStore},
};

const ALREADY_REGISTERED: &str = "Email already registered";

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, store),
    fields(
        subscriber_email = %body.email
    )
)]
pub async fn subscribe(
    body: web::Json<NewSubscriberBody>,
    store: web::Data<SubscriberStore>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;

    // The session is released on every return path below
    let mut session = store.session().await?;

    if session
        .find_by_email(&new_subscriber.email)
        .await?
        .is_some()
    {
        return Err(SubscribeError::AlreadyRegistered);
    }

    let subscriber = session.create(&new_subscriber.email).await?;

    tracing::info!("New subscriber {} stored", subscriber.id);

    Ok(HttpResponse::Ok().json(subscriber))
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Email already registered.")]
    AlreadyRegistered,
    #[error("Failed to store the new subscriber.")]
    StorageUnavailable(#[source] StoreError),
}

impl From<StoreError> for SubscribeError {
    fn from(err: StoreError) -> Self {
        match err {
            // Another request stored the same email between the lookup and the insert
            StoreError::DuplicateEmail => SubscribeError::AlreadyRegistered,
            err => SubscribeError::StorageUnavailable(err),
        }
    }
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscribeError::StorageUnavailable(err) => {
                write!(f, "{}\nCaused by:\n\t{:?}", self, err)
            }
            _ => write!(f, "{}", self),
        }
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SubscribeError::AlreadyRegistered => StatusCode::BAD_REQUEST,
            SubscribeError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            SubscribeError::ValidationError(message) => message.as_str(),
            SubscribeError::AlreadyRegistered => ALREADY_REGISTERED,
            SubscribeError::StorageUnavailable(_) => "Internal server error",
        };

        HttpResponse::build(self.status_code()).json(ErrorDetail::new(detail))
    }
}
