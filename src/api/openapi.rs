use super::handlers::{active, health, login};
use crate::login360::session::{LoginData, LoginResult};
use utoipa::OpenApi;

// Paths are documented under the default `360` namespace.
#[derive(OpenApi)]
#[openapi(
    paths(login::login, active::active, health::health),
    components(schemas(LoginResult, LoginData, health::Health)),
    tags(
        (name = "login", description = "Signed login and session token issuance"),
        (name = "active", description = "Activation record check"),
        (name = "health", description = "Service and store health"),
    )
)]
struct ApiDoc;

/// `OpenAPI` document for the HTTP surface; info is taken from Cargo metadata.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
