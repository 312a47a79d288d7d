use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use vellum_api::auth::{self, AppState, AppStateInner};
use vellum_api::middleware::require_auth;
use vellum_api::summarize::Summarizer;
use vellum_api::{articles, browse, profile, summarize, uploads};
use vellum_engine::Storage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vellum=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("VELLUM_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("VELLUM_DB_PATH").unwrap_or_else(|_| "vellum.db".into());
    let host = std::env::var("VELLUM_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("VELLUM_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;
    let upload_dir: PathBuf = std::env::var("VELLUM_UPLOAD_DIR")
        .unwrap_or_else(|_| "./uploads".into())
        .into();
    let summary_api_url = std::env::var("VELLUM_SUMMARY_API_URL")
        .unwrap_or_else(|_| "https://api.deepseek.com/chat/completions".into());
    let summary_api_key = std::env::var("VELLUM_SUMMARY_API_KEY").unwrap_or_default();
    let summary_model =
        std::env::var("VELLUM_SUMMARY_MODEL").unwrap_or_else(|_| "deepseek-chat".into());

    // Init database and upload storage
    let db = vellum_db::Database::open(&PathBuf::from(&db_path))?;
    let covers = Storage::new(upload_dir.clone())?;
    let summarizer = Summarizer::new(summary_api_url, summary_api_key, summary_model)?;
    if !summarizer.is_configured() {
        info!("VELLUM_SUMMARY_API_KEY unset; article summarization disabled");
    }

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        covers,
        jwt_secret,
        summarizer,
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/articles", get(articles::list_articles))
        .route("/articles/{article_id}", get(articles::get_article))
        .route(
            "/articles/{article_id}/summary",
            get(summarize::summarize_article),
        )
        .route("/users/{user_id}", get(browse::public_profile))
        .route("/users/{user_id}/archive", get(browse::archive))
        .route(
            "/users/{user_id}/categories/{category_id}/articles",
            get(browse::articles_by_category),
        )
        .route(
            "/users/{user_id}/tags/{tag_id}/articles",
            get(browse::articles_by_tag),
        )
        .route("/search", get(browse::search))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/dashboard", get(browse::dashboard))
        .route("/articles", post(articles::create_article))
        .route("/articles/{article_id}", put(articles::update_article))
        .route("/articles/{article_id}", delete(articles::delete_article))
        .route(
            "/articles/{article_id}/comments",
            post(articles::post_comment),
        )
        .route("/categories", get(browse::my_categories))
        .route("/tags", get(browse::my_tags))
        .route("/profile", put(profile::update_profile))
        .route("/upload/avatar", post(uploads::upload_avatar))
        .route("/upload/editor-image", post(uploads::upload_editor_image))
        .layer(middleware::from_fn(require_auth))
        .with_state(state.clone());

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .nest_service("/uploads", ServeDir::new(state.covers.root()))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024)) // form + 5 MB image
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Vellum server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
