use forum::{
    AppState, Config, build_router,
    db::MongoStore,
    states::spawn_purge_task,
    upload::S3Storage,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forum=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let store = Arc::new(MongoStore::connect(&config.db_url, &config.db_name).await?);
    let uploads = Arc::new(S3Storage::from_config(&config).await);

    let state = AppState::new(config.clone(), store.clone(), store, uploads);
    spawn_purge_task(state.clone(), config.session_ttl());

    let app = build_router(state);

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Routes:");
    info!("  GET    /                  - Home");
    info!("  GET    /posts/list[/:id]  - List posts, 5 per page");
    info!("  GET    /posts/write       - Write form");
    info!("  POST   /posts/add         - Create post (multipart, optional img1)");
    info!("  GET    /posts/detail/:id  - Post detail");
    info!("  GET    /posts/edit/:id    - Edit form / POST to save");
    info!("  DELETE /posts/delete      - Delete post");
    info!("  GET    /login, /register  - Auth forms / POST to submit");
    info!("  GET    /profile/:userId   - Profile page");

    axum::serve(listener, app).await?;

    Ok(())
}
