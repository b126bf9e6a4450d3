use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use taskbox::auth::{AuthMiddleware, TokenCodec};
use taskbox::config::Config;
use taskbox::routes;
use taskbox::services::{CredentialService, TaskService};
use taskbox::storage::{
    self, MemoryTaskStore, MemoryUserStore, PgTaskStore, PgUserStore, TaskStore, UserStore,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let codec = TokenCodec::new(&config.jwt_secret, config.token_ttl_secs);

    let (users, tasks): (Arc<dyn UserStore>, Arc<dyn TaskStore>) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .expect("Failed to connect to database");
            storage::init_schema(&pool)
                .await
                .expect("Failed to initialize database schema");
            log::info!("Using Postgres storage");
            (
                Arc::new(PgUserStore::new(pool.clone())),
                Arc::new(PgTaskStore::new(pool)),
            )
        }
        None => {
            log::warn!("DATABASE_URL not set; using in-memory storage, data is lost on restart");
            (
                Arc::new(MemoryUserStore::default()),
                Arc::new(MemoryTaskStore::default()),
            )
        }
    };

    let credentials = web::Data::new(CredentialService::new(users, codec.clone()));
    let task_service = web::Data::new(TaskService::new(tasks));

    log::info!("Starting Taskbox server at {}", config.server_url());

    let bind_addr = (config.server_host.clone(), config.server_port);
    HttpServer::new(move || {
        App::new()
            .app_data(credentials.clone())
            .app_data(task_service.clone())
            // Registration order is the reverse of execution order:
            // CORS answers preflights first, then the request is logged,
            // then the authentication gate runs.
            .wrap(AuthMiddleware::new(codec.clone()))
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(routes::config)
    })
    .bind(bind_addr)?
    .run()
    .await
}
