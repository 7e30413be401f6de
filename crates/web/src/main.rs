use std::{sync::Arc, time::Duration};

use anyhow::Context;
use api::{ApiClient, ApiConfig};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod state;

use config::Config;
use features::{dashboard, participants, scan};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        dashboard::handlers::show_dashboard,
        participants::handlers::list_participants,
        participants::handlers::export_participants,
        participants::handlers::show_create_form,
        participants::handlers::create_participant,
        scan::handlers::show_scan,
        scan::handlers::submit_scan,
    ),
    components(
        schemas(
            api::Participant,
            api::stats::AttendanceStats,
            api::listing::StatusFilter,
            api::listing::SortField,
            api::listing::SortDirection,
            api::listing::SortState,
            api::form::ParticipantForm,
            api::dto::checkin::CheckInRequest,
            api::dto::checkin::CheckInResponse,
            dashboard::services::DashboardView,
            participants::services::ParticipantRow,
            participants::services::ColumnSorts,
            participants::services::ParticipantListView,
            participants::services::CreateFormView,
            participants::services::CreatedView,
            scan::services::ScanView,
        )
    ),
    tags(
        (name = "dashboard", description = "Attendance overview"),
        (name = "participants", description = "Participant list, export and registration"),
        (name = "scan", description = "Manual check-in entry"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting check-in admin server");

    let config = Config::from_env().context("Failed to load web configuration")?;
    tracing::info!("Configuration loaded successfully");

    let client = ApiClient::new(
        ApiConfig::new(config.api_base_url.clone())
            .with_already_checked_in(config.already_checked_in)
            .with_timeout(config.request_timeout),
    )
    .context("Failed to build API client")?;
    tracing::info!(
        "Using participant API at {} (already-checked-in signal: {})",
        client.base_url(),
        client.already_checked_in_signal()
    );

    let state = AppState::new(Arc::new(client), config.settle_delay, config.display_offset);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600));

    let app = features::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!(
        "Swagger UI available at http://{}/swagger-ui/",
        bind_address
    );

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    axum::serve(listener, app).await?;

    Ok(())
}
