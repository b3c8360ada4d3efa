use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCustomerRepository, InMemoryLoanRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use credit_engine::config::AppConfig;
use credit_engine::error::AppError;
use credit_engine::lending::{import_customers_from_path, import_loans_from_path, LoanService};
use credit_engine::telemetry;
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let customers = Arc::new(InMemoryCustomerRepository::default());
    let loans = Arc::new(InMemoryLoanRepository::default());

    if let Some((customer_path, loan_path)) = config.seed.paths() {
        let customer_summary = import_customers_from_path(customer_path, customers.as_ref())?;
        let loan_summary = import_loans_from_path(loan_path, customers.as_ref(), loans.as_ref())?;
        info!(
            customers = customer_summary.created + customer_summary.updated,
            loans = loan_summary.created + loan_summary.updated,
            "seeded repositories from workbook exports"
        );
    }

    let service = Arc::new(LoanService::new(customers, loans));
    let app = with_service_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "credit approval service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
