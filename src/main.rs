use financebook::config::Config;
use financebook::server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "financebook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        version = financebook::VERSION,
        "Starting FinanceBook on {}",
        config.address()
    );

    let (state, app) = server::build_app(config).expect("Failed to build application");

    let (port, handle) = server::serve(app, &state.config.host, state.config.port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", state.config.host, port);

    handle.await.expect("Server task panicked");
}
