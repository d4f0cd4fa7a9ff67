use axum::Router;
use axum::http::{Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use trailhub_kernel::server::AppState;
use trailhub_registrations::RegistrationsApiDoc;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

#[derive(OpenApi)]
struct ApiDoc;

/// Assembles the full application router: system endpoints, the
/// registrations slice, the Scalar API docs, and the tracing/CORS layers.
pub fn init(state: AppState) -> Router {
    let mut api = ApiDoc::openapi();
    api.merge(RegistrationsApiDoc::openapi());

    // Separate the OpenAPI routes and the API documentation object
    let (system_routes, api_doc) = OpenApiRouter::with_openapi(api)
        .merge(trailhub_kernel::server::router::system_router())
        .with_state(state.clone())
        .split_for_parts();

    // Permissive CORS across the whole surface; the registration form is
    // served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(system_routes)
        .merge(trailhub_registrations::router().with_state(state))
        .merge(Scalar::with_url("/api", api_doc))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
