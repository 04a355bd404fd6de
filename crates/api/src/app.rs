use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use shared::jwt::{JwtConfig, JwtError};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{courses, health, me, monthly_plans, places, tasks, visitors};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Keys used to verify session tokens
    pub jwt: Arc<JwtConfig>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.security.cors_origins.is_empty() {
        // Development: any origin
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Builds the router. Fails only when the session keys cannot be loaded.
pub fn create_app(config: Config, pool: PgPool) -> Result<Router, JwtError> {
    let jwt = Arc::new(config.session.jwt_config()?);
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
    };

    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Portal routes authenticate through the `CurrentUser` extractor
    let portal_routes = Router::new()
        .route("/api/v1/me", get(me::get_me))
        .route("/api/v1/me/team", get(me::get_my_team))
        // Plans and tasks
        .route(
            "/api/v1/tasks",
            post(tasks::create_task).get(tasks::list_tasks),
        )
        .route(
            "/api/v1/tasks/:task_id",
            get(tasks::get_task).patch(tasks::update_task),
        )
        .route(
            "/api/v1/tasks/:task_id/status",
            post(tasks::update_task_status),
        )
        .route(
            "/api/v1/tasks/:task_id/complete",
            post(tasks::complete_task),
        )
        // Monthly team plans
        .route(
            "/api/v1/monthly-plans",
            post(monthly_plans::create_plan).get(monthly_plans::list_plans),
        )
        .route(
            "/api/v1/monthly-plans/:plan_id",
            get(monthly_plans::get_plan)
                .put(monthly_plans::update_plan)
                .delete(monthly_plans::delete_plan),
        )
        .route(
            "/api/v1/monthly-plans/:plan_id/history",
            get(monthly_plans::get_plan_history),
        )
        .route(
            "/api/v1/monthly-plans/:plan_id/participation",
            get(monthly_plans::get_participation).put(monthly_plans::save_participation),
        )
        // Places and bookings
        .route(
            "/api/v1/places",
            post(places::create_place).get(places::list_places),
        )
        .route(
            "/api/v1/places/:place_id",
            get(places::get_place).patch(places::update_place),
        )
        .route(
            "/api/v1/places/:place_id/deactivate",
            post(places::deactivate_place),
        )
        .route(
            "/api/v1/places/:place_id/free-slots",
            get(places::get_free_slots),
        )
        .route(
            "/api/v1/places/:place_id/bookings",
            get(places::list_bookings).post(places::create_booking),
        )
        // Visitors
        .route(
            "/api/v1/visitors",
            post(visitors::create_visitor).get(visitors::list_visitors),
        )
        .route("/api/v1/visitors/:visitor_id", get(visitors::get_visitor))
        .route(
            "/api/v1/visitors/:visitor_id/admit",
            post(visitors::admit_visitor),
        )
        .route(
            "/api/v1/visitors/:visitor_id/discharge",
            post(visitors::discharge_visitor),
        )
        // Courses
        .route(
            "/api/v1/courses",
            post(courses::create_course).get(courses::list_courses),
        )
        .route(
            "/api/v1/courses/:course_id",
            get(courses::get_course).delete(courses::delete_course),
        )
        .route(
            "/api/v1/courses/:course_id/contents",
            post(courses::add_content),
        )
        .route(
            "/api/v1/courses/:course_id/contents/:content_id",
            delete(courses::delete_content),
        );

    Ok(Router::new()
        .merge(public_routes)
        .merge(portal_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors_layer(&config))
        .with_state(state))
}
