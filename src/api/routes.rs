//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::require_bearer_token;
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_employees,
        handlers::create_employee,
        handlers::get_employee,
        handlers::update_employee,
        handlers::delete_employee,
        handlers::delete_many_employees,
        handlers::list_teams,
        handlers::create_team,
        handlers::get_team,
        handlers::update_team,
        handlers::delete_team,
        handlers::get_team_tree,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::CreateEmployeeRequest,
        crate::api::types::UpdateEmployeeRequest,
        crate::api::types::DeleteEmployeesRequest,
        crate::api::types::CreateTeamRequest,
        crate::api::types::UpdateTeamRequest,
        crate::api::types::HealthResponse,
        crate::domain::Employee,
        crate::domain::Team,
        crate::domain::TeamNode,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "employees", description = "Employee management"),
        (name = "teams", description = "Team management and hierarchy"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Roster Core API",
        version = "0.1.0",
        description = "Employee and team directory with a hierarchical team view",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Everything except the health check and the API docs sits behind
/// [`require_bearer_token`]. Unmatched paths get the same 404 as a rejected
/// token.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected_routes = Router::new()
        .route(
            "/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/employees/delete-many",
            post(handlers::delete_many_employees),
        )
        .route(
            "/employees/:id",
            get(handlers::get_employee)
                .put(handlers::update_employee)
                .delete(handlers::delete_employee),
        )
        .route(
            "/teams",
            get(handlers::list_teams).post(handlers::create_team),
        )
        .route("/teams/tree", get(handlers::get_team_tree))
        .route(
            "/teams/:id",
            get(handlers::get_team)
                .put(handlers::update_team)
                .delete(handlers::delete_team),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token,
        ))
        .with_state(state);

    let public_routes = Router::new().route("/", get(handlers::health_check));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(handlers::route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
