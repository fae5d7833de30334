use log::info;
use std::env;

mod calendar;
mod error;
mod handlers;
mod models;
mod routes;
mod session;


const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting RSVP details service");

    let app = routes::create_router();

    if env::var("AWS_LAMBDA_RUNTIME_API").is_ok() {
        info!("Running under AWS Lambda");
        return lambda_http::run(app).await;
    }

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
