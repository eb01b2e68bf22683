use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use tracing_actix_web::TracingLogger;

use crate::backend::ContactBackend;
use crate::controller::contact;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener.
/// The contact backend is created once by the caller and shared by every worker.
pub fn run(listener: TcpListener, backend: Arc<dyn ContactBackend>) -> anyhow::Result<Server> {
    // Wrap application data
    let backend: web::Data<dyn ContactBackend> = web::Data::from(backend);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(backend.clone())
            .app_data(web::PayloadConfig::new(contact::MAX_BODY_BYTES))
            .service(health_check)
            .service(contact::scope())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
