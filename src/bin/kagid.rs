use clap::Parser;

use kagi::config::Settings;
use kagi::db::DbStore;
use kagi::http::server::Server;
use kagi::provider::AuthorizationProvider;
use kagi::service::MessageHandler;
use kagi::util::net::is_host_available;

use tracing::{event, Level};

async fn kagid(settings: Settings) -> Result<(), String> {
    let (host, port) = settings.database.endpoint().map_err(|e| e.to_string())?;
    if !is_host_available(&host, port, settings.connect_timeout()).await {
        return Err(format!("database at {}:{} is not reachable", host, port));
    }

    let store = DbStore::acquire(&settings.database.database_url, settings.database.pool_size)
        .map_err(|e| e.to_string())?;
    store.migrate().map_err(|e| e.to_string())?;

    let handler = MessageHandler::new(
        AuthorizationProvider::new(store),
        settings.service.service_name.clone(),
    );
    Server::new(handler, settings.listen_address).serve().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let settings = Settings::parse();
    tracing_subscriber::fmt()
        .with_max_level(settings.service.log_level)
        .init();

    event!(
        Level::INFO,
        service = %settings.service.service_name,
        version = env!("CARGO_PKG_VERSION"),
        "Starting"
    );

    if let Err(e) = kagid(settings).await {
        event!(Level::ERROR, error = %e, "Start-up failed");
        std::process::exit(1);
    }
}
