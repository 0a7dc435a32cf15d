use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::AuthenticatedUser;
use crate::models::{Planet, PlanetForm, UpdatePlanetForm};
use crate::services::planet_service;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/planets",
    tag = "Planets",
    responses(
        (status = 200, description = "Every planet, ordered by id", body = Vec<Planet>)
    )
)]
pub async fn list_planets(state: web::Data<AppState>) -> HttpResponse {
    log::info!("🪐 GET /planets");

    match planet_service::list_planets(&state).await {
        Ok(planets) => HttpResponse::Ok().json(planets),
        Err(e) => e.error_response(),
    }
}

#[utoipa::path(
    get,
    path = "/planet_details/{id}",
    tag = "Planets",
    params(("id" = i64, Path, description = "Planet id")),
    responses(
        (status = 200, description = "Planet found", body = Planet),
        (status = 400, description = "Id is not an integer"),
        (status = 404, description = "No planet with that id")
    )
)]
pub async fn planet_details(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let planet_id = path.into_inner();
    log::info!("🪐 GET /planet_details/{}", planet_id);

    match planet_service::get_planet(&state, planet_id).await {
        Ok(planet) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Planet {} found", planet.planet_name),
            "data": planet
        })),
        Err(e) => {
            log::warn!("⚠️ Planet {} lookup failed: {}", planet_id, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/add_planet",
    tag = "Planets",
    request_body(content = PlanetForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Planet created", body = Planet),
        (status = 400, description = "Missing or non-numeric field"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Planet name already taken")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_planet(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    form: web::Form<PlanetForm>,
) -> HttpResponse {
    log::info!("➕ POST /add_planet by {}", user.email);

    match planet_service::add_planet(&state, form.into_inner()).await {
        Ok(planet) => {
            log::info!("✅ Planet added: {} (id {})", planet.planet_name, planet.planet_id);
            HttpResponse::Ok().json(serde_json::json!({
                "message": "You added a planet",
                "data": planet
            }))
        }
        Err(e) => {
            log::warn!("❌ Add planet failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/update_planet",
    tag = "Planets",
    request_body(content = UpdatePlanetForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 202, description = "Planet replaced", body = Planet),
        (status = 400, description = "Missing or non-numeric field"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No planet with that id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_planet(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    form: web::Form<UpdatePlanetForm>,
) -> HttpResponse {
    log::info!("🔧 PUT /update_planet by {}", user.email);

    match planet_service::update_planet(&state, form.into_inner()).await {
        Ok(planet) => {
            log::info!("✅ Planet {} updated", planet.planet_id);
            HttpResponse::Accepted().json(serde_json::json!({
                "message": "You updated a planet",
                "data": planet
            }))
        }
        Err(e) => {
            log::warn!("❌ Update planet failed: {}", e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    delete,
    path = "/remove_planet/{planet_id}",
    tag = "Planets",
    params(("planet_id" = i64, Path, description = "Planet id")),
    responses(
        (status = 202, description = "Planet deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No planet with that id")
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_planet(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> HttpResponse {
    let planet_id = path.into_inner();
    log::info!("🗑️ DELETE /remove_planet/{} by {}", planet_id, user.email);

    match planet_service::remove_planet(&state, planet_id).await {
        Ok(()) => HttpResponse::Accepted().json(serde_json::json!({
            "message": "You deleted a planet"
        })),
        Err(e) => {
            log::warn!("❌ Remove planet {} failed: {}", planet_id, e);
            e.error_response()
        }
    }
}
