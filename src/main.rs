mod db;
mod i18n;
mod routes;
mod services;
mod state;
mod storage;

use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");
    let uploads_dir = std::env::var("UPLOADS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads"));

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // Mailer is optional: without it, reset codes are logged instead of sent.
    let mailer = match (std::env::var("RESEND_API_KEY"), std::env::var("RESEND_FROM")) {
        (Ok(api_key), Ok(from)) => {
            tracing::info!(%from, "mailer configured");
            Some(state::MailerConfig { api_key, from })
        }
        _ => {
            tracing::warn!("RESEND_API_KEY/RESEND_FROM not set, reset codes will be logged");
            None
        }
    };

    let store = Arc::new(storage::LocalStore::new(uploads_dir.clone(), "/uploads"));
    let app_state = state::AppState::new(pool, store, mailer);

    let app = routes::app(app_state, uploads_dir);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "maskir listening");
    axum::serve(listener, app).await.expect("server failed");
}
