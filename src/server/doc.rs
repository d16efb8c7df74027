use crate::models::{ErrorResponse, FableRequest, FableResponse, HealthResponse, Illustration};
use crate::server::{fables, health};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "fable-generator",
        description = "Illustrated children's fables from a story premise"
    ),
    paths(health::get_health, fables::generate_fable),
    components(schemas(
        FableRequest,
        FableResponse,
        Illustration,
        HealthResponse,
        ErrorResponse
    ))
)]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
