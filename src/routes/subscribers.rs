use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};

use crate::{
    domain::pagination::Pagination,
    routes::ErrorDetail,
    store::{StoreError, SubscriberStore},
};

#[tracing::instrument(name = "Listing subscribers handler", skip(store))]
pub async fn list_subscribers(
    pagination: web::Query<Pagination>,
    store: web::Data<SubscriberStore>,
) -> Result<HttpResponse, ListSubscribersError> {
    let mut session = store.session().await?;
    let subscribers = session.list(pagination.into_inner()).await?;

    Ok(HttpResponse::Ok().json(subscribers))
}

#[derive(thiserror::Error)]
pub enum ListSubscribersError {
    #[error("Failed to get subscribers from the database.")]
    StorageUnavailable(#[from] StoreError),
}

impl std::fmt::Debug for ListSubscribersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListSubscribersError::StorageUnavailable(err) => {
                write!(f, "{}\nCaused by:\n\t{:?}", self, err)
            }
        }
    }
}

impl ResponseError for ListSubscribersError {
    fn status_code(&self) -> StatusCode {
        match self {
            ListSubscribersError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorDetail::new("Internal server error"))
    }
}
