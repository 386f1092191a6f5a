use actix_web::HttpResponse;

/// Liveness check; answers `200 OK` with an empty body whenever the server is up.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}
