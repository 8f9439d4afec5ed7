use crate::cli::ServeArgs;
use crate::demo::seed_demo_portfolio;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Local;
use lease_keeper::config::AppConfig;
use lease_keeper::error::AppError;
use lease_keeper::store::InMemoryStore;
use lease_keeper::telemetry;
use lease_keeper::LeaseKeeper;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.seed_demo |= args.seed_demo;

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryStore::new());
    let keeper = Arc::new(LeaseKeeper::new(store));
    if config.seed_demo {
        let portfolio = seed_demo_portfolio(&*keeper, Local::now().date_naive()).await?;
        info!(
            housings = portfolio.housings.len(),
            leases = portfolio.leases.len(),
            "demo portfolio seeded"
        );
    }

    let app = with_service_routes(keeper)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lease keeper ready");

    axum::serve(listener, app).await?;
    Ok(())
}
