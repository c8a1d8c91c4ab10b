pub mod application;
pub mod client;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::error::Error;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::order_item_service::OrderItemService;
use application::order_service::OrderService;
use errors::AppError;
use handlers::{openapi::ApiDoc, order_items, orders};
use infrastructure::order_item_repo::DieselOrderItemRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};
pub use infrastructure::order_repo::verify_aggregation_query;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type OrderServiceHandle = OrderService<DieselOrderRepository>;
pub type OrderItemServiceHandle = OrderItemService<DieselOrderItemRepository, DieselOrderRepository>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Register the `/orders` and `/orderitems` routes plus the extractor error
/// handlers that turn malformed input into `400` responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(err.to_string()).into()
    }))
    .service(
        web::scope("/orders")
            .service(
                web::resource("")
                    .route(web::get().to(orders::list_orders))
                    .route(web::post().to(orders::create_order)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(orders::get_order))
                    .route(web::put().to(orders::update_order))
                    .route(web::delete().to(orders::delete_order)),
            ),
    )
    .service(
        web::scope("/orderitems")
            .service(
                web::resource("")
                    .route(web::get().to(order_items::list_items))
                    .route(web::post().to(order_items::create_item)),
            )
            // before "/{id}" so that "makes" is not taken for an id
            .route("/makes", web::get().to(order_items::list_makes))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(order_items::get_item))
                    .route(web::put().to(order_items::update_item))
                    .route(web::delete().to(order_items::delete_item)),
            )
            .route("/{make}/models", web::get().to(order_items::list_models))
            .route(
                "/{make}/{model}/years",
                web::get().to(order_items::list_years),
            ),
    );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let order_service = web::Data::new(OrderService::new(DieselOrderRepository::new(pool.clone())));
    let item_service = web::Data::new(OrderItemService::new(
        DieselOrderItemRepository::new(pool.clone()),
        DieselOrderRepository::new(pool),
    ));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(order_service.clone())
            .app_data(item_service.clone())
            .wrap(Logger::default())
            .configure(configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
