use crate::{
    application::schema_detector::SchemaDetector,
    auth::{AuthGate, INIT_DATA_HEADER},
    config::config_model::DotEnvyConfig,
    infrastructure::{
        axum_http::{default_routers, routers},
        postgres::{
            postgres_connection::PgPoolSquad, repositories::schema_catalog::SchemaCatalogPostgres,
        },
    },
};
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    http::{
        HeaderName, HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let app = app(&config, db_pool)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn app(config: &DotEnvyConfig, db_pool: Arc<PgPoolSquad>) -> Result<Router> {
    let schema_catalog = SchemaCatalogPostgres::new(Arc::clone(&db_pool));
    let schema_detector = Arc::new(SchemaDetector::new(Arc::new(schema_catalog)));

    let auth_gate = Arc::new(AuthGate::new(
        config.telegram.bot_token.clone(),
        config.telegram.auth_mode,
    ));
    if auth_gate.mode().is_bypass() {
        warn!(
            auth_mode = %auth_gate.mode(),
            stage = %config.stage,
            "initData verification is DISABLED, every request acts as the test user"
        );
    }

    let app = Router::new()
        .fallback(default_routers::not_found)
        .route("/health", get(default_routers::health_check))
        .nest(
            "/api/subscription",
            routers::subscriptions::routes(Arc::clone(&db_pool), Arc::clone(&schema_detector)),
        )
        .nest(
            "/api/balance",
            routers::balance::routes(Arc::clone(&db_pool), Arc::clone(&schema_detector)),
        )
        .nest(
            "/api/referral",
            routers::referrals::routes(Arc::clone(&db_pool), Arc::clone(&schema_detector)),
        )
        .nest(
            "/api/auth",
            routers::auth::routes(Arc::new(config.telegram.clone())),
        )
        .layer(Extension(auth_gate))
        .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout)))
        .layer(RequestBodyLimitLayer::new(
            (config.server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(cors_layer(&config.server.allowed_origins)?)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(INIT_DATA_HEADER),
        ]);

    if allowed_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("ALLOWED_ORIGINS entry `{origin}` is invalid"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
