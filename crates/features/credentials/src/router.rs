use crate::handlers;
use skc_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn credentials_router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::issue_handler))
        .routes(routes!(handlers::fetch_handler))
        .routes(routes!(handlers::list_handler))
}
