use ccw_order_tracker::{api, service::tracker, AppConfig};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // local time log timestamps
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    let config = AppConfig::load()?;
    info!("Loaded config: {:?}", config);

    match std::env::args().nth(1).as_deref() {
        Some("serve") => serve(config).await,
        _ => {
            let stats = tracker::run(&config).await?;
            if stats.failed > 0 {
                info!("{} rows failed and were left unchanged", stats.failed);
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(api::ApiState {
        default_fields: config.workbook.field_set(),
    });
    let app = api::router(state).layer(ServiceBuilder::new());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/orders/parse - parse a checkOrderStatus document");
    info!("  POST /api/match        - resolve fields for one order line");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
