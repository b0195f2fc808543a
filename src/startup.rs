use actix_cors::Cors;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use sqlx::migrate::MigrateError;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::config::Settings;
use crate::routes::{
    health_check, json_error_handler, list_subscribers, query_error_handler, subscribe,
};
use crate::store::SubscriberStore;

pub struct Application {
    pub port: u16,
    pub server: Server,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, StartupError> {
        let store =
            SubscriberStore::connect_lazy(&config.database).map_err(StartupError::Database)?;

        store.migrate().await?;

        let listener = TcpListener::bind(config.get_address())?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            "Server listening on {}:{}",
            config.application.get_host(),
            port
        );

        let server = run(listener, store)?;

        Ok(Self { port, server })
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, store: SubscriberStore) -> Result<Server, std::io::Error> {
    let store = web::Data::new(store);

    let server = HttpServer::new(move || {
        // App is where your application logic lives: routing, middlewares, request handler, etc
        App::new()
            // Any origin, method and header is accepted
            .wrap(Cors::permissive())
            // 'wrap' method adds a middleware to the App. This specific middleware provide incoming
            // request logger
            .wrap(TracingLogger::default())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api")
                    .route("/subscribe", web::post().to(subscribe))
                    .route("/subscribers", web::get().to(list_subscribers)),
            )
            .app_data(store.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

#[derive(thiserror::Error)]
pub enum StartupError {
    #[error("Failed to serve on the configured address.")]
    Io(#[from] std::io::Error),
    #[error("Invalid database connection settings.")]
    Database(#[source] sqlx::Error),
    #[error("Failed to run the database migrations.")]
    Migration(#[from] MigrateError),
}

impl std::fmt::Debug for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::Io(err) => write!(f, "{}\nCaused by:\n\t{:?}", self, err),
            StartupError::Database(err) => write!(f, "{}\nCaused by:\n\t{:?}", self, err),
            StartupError::Migration(err) => write!(f, "{}\nCaused by:\n\t{:?}", self, err),
        }
    }
}
