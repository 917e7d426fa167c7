use crate::config::ServerConfig;
use crate::error::Result;
use axum::http::StatusCode;
use axum::{response::IntoResponse, routing::get, Router};
use futures::FutureExt;
use fyyur_app::state::{AppConfig, AppState};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

pub async fn run(args: ServerConfig) -> Result<()> {
    let state = build_state(&args).await?;
    run_with_state(args, state).await
}

pub async fn run_with_state(args: ServerConfig, state: AppState) -> Result<()> {
    let shutdown = tokio::signal::ctrl_c().map(|_| ());
    run_graceful_with_state(args, state, shutdown).await
}

pub async fn run_graceful_with_state<S>(
    args: ServerConfig,
    state: AppState,
    shutdown_signal: S,
) -> Result<()>
where
    S: std::future::Future<Output = ()> + Send + 'static,
{
    let mut app = main_router(state).layer(TraceLayer::new_for_http());

    if !args.no_cors {
        app = app.layer(tower_http::cors::CorsLayer::very_permissive());
    }

    let ip: std::net::IpAddr = args.listen_address.parse()?;
    let addr = std::net::SocketAddr::from((ip, args.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    debug!("Server stopped");
    Ok(())
}

#[cfg(feature = "openapi")]
fn api_docs() -> utoipa::openapi::OpenApi {
    #[derive(utoipa::OpenApi)]
    #[openapi(info(title = "Fyyur", description = "Directory of music venues, artists and their shows"))]
    struct OpenApi;

    use utoipa::OpenApi as _;
    OpenApi::openapi()
        .nest("/api/venue", fyyur_app::rest_api::venue::api_docs())
        .nest("/api/artist", fyyur_app::rest_api::artist::api_docs())
        .nest("/api/show", fyyur_app::rest_api::show::api_docs())
        .nest("/api/genre", fyyur_app::rest_api::genre::api_docs())
}

fn main_router(state: AppState) -> Router<()> {
    #[allow(unused_mut)]
    let mut router = Router::new()
        .nest("/api/venue", fyyur_app::rest_api::venue::router())
        .nest("/api/artist", fyyur_app::rest_api::artist::router())
        .nest("/api/show", fyyur_app::rest_api::show::router())
        .nest("/api/genre", fyyur_app::rest_api::genre::router())
        .with_state(state)
        .route("/health", get(health));

    #[cfg(feature = "openapi")]
    {
        let docs = api_docs();
        router = router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs),
        );
    }
    router
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Prepares data directory and database, migrations are applied on every start
pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let data_dir = config.backend.data_dir();
    if !data_dir.is_dir() {
        tokio::fs::create_dir_all(&data_dir).await?;
        info!("Created data directory {}", data_dir.display());
    }

    let pool = fyyur_dal::new_pool(&config.backend.database_url()).await?;
    fyyur_dal::migrate(&pool).await?;
    debug!("Database ready at {}", config.backend.database_url());

    let app_config = AppConfig {
        base_url: config.base_url.clone(),
    };
    Ok(AppState::new(app_config, pool))
}
