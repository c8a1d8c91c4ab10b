use std::error::Error;

use dotenvy::dotenv;
use orders_app::config::Settings;
use orders_app::{build_server, create_pool, run_migrations, verify_aggregation_query};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::load()?;

    let pool = create_pool(&settings.database_url)?;
    run_migrations(&pool)?;
    verify_aggregation_query(&pool)?;

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(pool, &settings.host, settings.port)?.await?;
    Ok(())
}
