use crate::handlers;
use skc_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn verification_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::generate_handler))
        .routes(routes!(handlers::verify_handler))
        .routes(routes!(handlers::status_handler))
        .routes(routes!(handlers::revoke_handler))
}
