use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use content_feed::db::{CommentRepository, CommentStore, LikeRepository, LikeStore, PostRepository, PostStore};
use content_feed::handlers::{self, AppState};
use content_feed::middleware::{JwtAuthMiddleware, JwtKeys, MetricsMiddleware};
use content_feed::services::FeedServiceConfig;
use db_pool::create_pool as create_pg_pool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Content Feed Service
///
/// Serves the wrap-around paginated feed with like counts and comment threads,
/// plus the post, like and comment endpoints behind it.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match content_feed::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting content-feed v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    let db_cfg = config.database.pool_config("content-feed");
    db_cfg.log_config();

    let db_pool = create_pg_pool(db_cfg).await.map_err(|e| {
        tracing::error!("Database pool creation failed: {}", e);
        io::Error::new(io::ErrorKind::Other, format!("Failed to create pool: {}", e))
    })?;

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .map_err(|e| {
            tracing::error!("Database migrations failed: {}", e);
            io::Error::new(io::ErrorKind::Other, format!("Migration error: {}", e))
        })?;
    tracing::info!("Connected to database and applied migrations");

    let posts: Arc<dyn PostStore> = Arc::new(PostRepository::new(db_pool.clone()));
    let likes: Arc<dyn LikeStore> = Arc::new(LikeRepository::new(db_pool.clone()));
    let comments: Arc<dyn CommentStore> = Arc::new(CommentRepository::new(db_pool.clone()));

    let mut feed_config = FeedServiceConfig::from(&config.feed);
    feed_config.enrich_concurrency = config
        .feed
        .capped_concurrency(config.database.max_connections);
    tracing::info!(
        page_size = feed_config.page_size,
        enrich_concurrency = feed_config.enrich_concurrency,
        store_timeout_ms = feed_config.store_timeout.as_millis() as u64,
        "Feed configured"
    );

    let state = web::Data::new(AppState::new(posts, likes, comments, feed_config));
    let pool_data = web::Data::new(db_pool.clone());
    let jwt_keys = JwtKeys::from_secret(&config.auth.jwt_secret);

    let http_bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", http_bind_address);

    let allowed_origins = config.cors.allowed_origins.clone();

    // Create HTTP server
    let server = HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in allowed_origins.split(',') {
            let origin = origin.trim();
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else if !origin.is_empty() {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(pool_data.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route(
                "/metrics",
                web::get().to(content_feed::metrics::serve_metrics),
            )
            // Health check endpoints
            .route("/api/v1/health", web::get().to(handlers::health_check))
            .route("/api/v1/health/ready", web::get().to(handlers::health_ready))
            .route("/api/v1/health/live", web::get().to(handlers::health_live))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtAuthMiddleware::new(jwt_keys.clone()))
                    .wrap(MetricsMiddleware)
                    .configure(handlers::configure),
            )
    })
    .bind(&http_bind_address)?
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let result = tokio::select! {
        joined = &mut server_task => match joined {
            Ok(res) => res,
            Err(e) => {
                tracing::error!("Server task join error: {}", e);
                Err(io::Error::new(io::ErrorKind::Other, e.to_string()))
            }
        },
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received");
            server_handle.stop(true).await;
            match (&mut server_task).await {
                Ok(res) => res,
                Err(e) => Err(io::Error::new(io::ErrorKind::Other, e.to_string())),
            }
        }
    };

    db_pool.close().await;
    tracing::info!("Content-feed shutting down");

    result
}
