//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::application::SharedBookingService;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::modules::booking::{self, BookingAppState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;

/// Everything the router needs from the running server.
#[derive(Clone)]
pub struct ApiState {
    pub service: SharedBookingService,
    /// `None` when running on the in-memory store
    pub db: Option<DatabaseConnection>,
    /// `None` disables `/metrics`
    pub prometheus: Option<PrometheusHandle>,
    pub capacity: u32,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        booking::get_status,
        booking::reserve,
        booking::get_reservation,
        booking::change,
        booking::cancel,
    ),
    components(
        schemas(
            ApiResponse<String>,
            booking::ReservationRequest,
            booking::ReservationDto,
            booking::CreatedReservationDto,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Booking", description = "Availability and reservation management"),
    ),
    info(
        title = "Booking Service API",
        version = "1.0.0",
        description = "Date-range reservations against a fixed daily capacity",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: ApiState) -> Router {
    let booking_routes = Router::new()
        .route("/status", get(booking::get_status))
        .route("/reserve", post(booking::reserve))
        .route("/change", put(booking::change))
        .route("/cancel", put(booking::cancel))
        .route("/{id}", get(booking::get_reservation))
        .with_state(BookingAppState {
            service: state.service.clone(),
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: state.db.clone(),
            started_at: Arc::new(Instant::now()),
            capacity: state.capacity,
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .merge(health_routes)
        // Booking
        .nest("/api/booking", booking_routes);

    if let Some(handle) = state.prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
}

// ── Tests ──────────────────────────────────────────────────────
