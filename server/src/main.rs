mod config;
mod routes;
mod services;
mod state;

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let forwarder = services::forward::Forwarder::new(&config.api_url).expect("HTTP client init failed");
    tracing::info!(api_url = %config.api_url, "forwarding API requests");

    let state = state::AppState::new(forwarder);
    let app = routes::leptos_app(state).expect("leptos app init failed");

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "jobdesk listening");
    axum::serve(listener, app).await.expect("server failed");
}
