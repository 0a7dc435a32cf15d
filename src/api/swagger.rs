use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Planetary API",
        version = "1.0.0",
        description = "Planets catalog and user accounts.\n\n**Authentication:** adding, updating and removing planets requires a JWT Bearer token obtained from `/login`."
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::retrieve_password,

        // Planets
        crate::api::planets::list_planets,
        crate::api::planets::planet_details,
        crate::api::planets::add_planet,
        crate::api::planets::update_planet,
        crate::api::planets::remove_planet,

        // Greetings
        crate::api::greetings::parameters,
        crate::api::greetings::url_variables,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::Planet,
            crate::models::PlanetForm,
            crate::models::UpdatePlanetForm,
            crate::models::RegisterForm,
            crate::models::LoginRequest,
            crate::models::LoginResponse,
            crate::models::UserInfo,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and password recovery."),
        (name = "Planets", description = "Planet catalog. Mutations require a bearer token."),
        (name = "Greetings", description = "Age-gated welcome endpoints."),
        (name = "Health", description = "Service health."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by /login"))
                        .build(),
                ),
            );
        }
    }
}
