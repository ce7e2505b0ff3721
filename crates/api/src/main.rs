use std::sync::Arc;

use anyhow::Context;

use orla_api::app::services::AppServices;
use orla_api::config::AppConfig;
use orla_auth::TokenService;
use orla_infra::PostgresStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    orla_observability::init();

    let config = AppConfig::from_env();
    let tokens = TokenService::new(&config.secret_key, config.token_ttl);

    let services = match &config.database_url {
        Some(url) => {
            let store = PostgresStore::connect(url)
                .await
                .context("connecting to database")?;
            store.migrate().await.context("running schema migration")?;
            tracing::info!("using postgres store");
            let store = Arc::new(store);
            AppServices::new(store.clone(), store, tokens)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using volatile in-memory store");
            AppServices::in_memory(tokens)
        }
    };

    let app = orla_api::app::build_app(Arc::new(services));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
