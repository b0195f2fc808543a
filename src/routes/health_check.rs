use actix_web::{HttpRequest, HttpResponse, Responder};

#[derive(serde::Serialize)]
struct HealthStatus {
    status: &'static str,
}

/// Endpoint used by clients to know if the server is working. It never touches the storage.
#[tracing::instrument(name = "Health Check handler")]
pub async fn health_check(_: HttpRequest) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus { status: "ok" })
}
