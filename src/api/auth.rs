use actix_web::{web, Either, HttpResponse, ResponseError};

use crate::models::{LoginRequest, LoginResponse, RegisterForm, UserInfo};
use crate::services::auth_service;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body(content = RegisterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 201, description = "User created", body = UserInfo),
        (status = 400, description = "Missing field"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(state: web::Data<AppState>, form: web::Form<RegisterForm>) -> HttpResponse {
    let email = form.email.clone().unwrap_or_else(|| "N/A".to_string());
    log::info!("📝 POST /register - email: {}", email);

    match auth_service::register(&state, form.into_inner()).await {
        Ok(user) => HttpResponse::Created().json(serde_json::json!({
            "message": "User created successfully.",
            "data": UserInfo::from(user)
        })),
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", email, e);
            e.error_response()
        }
    }
}

/// Accepts credentials either as a JSON body or as a urlencoded form.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Bad email or password")
    )
)]
pub async fn login(
    state: web::Data<AppState>,
    body: Either<web::Json<LoginRequest>, web::Form<LoginRequest>>,
) -> HttpResponse {
    let request = match body {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    };
    log::info!("🔐 POST /login - email: {}", request.email);

    match auth_service::login(&state, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.error_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/retrieve_password/{email}",
    tag = "Auth",
    params(("email" = String, Path, description = "Registered email address")),
    responses(
        (status = 200, description = "Temporary password mailed"),
        (status = 401, description = "Email not registered"),
        (status = 502, description = "Mail delivery failed")
    )
)]
pub async fn retrieve_password(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let email = path.into_inner();
    log::info!("✉️ GET /retrieve_password/{}", email);

    match auth_service::retrieve_password(&state, &email).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": format!("Password sent to {}", email)
        })),
        Err(e) => {
            log::warn!("❌ Password retrieval failed: {} - {}", email, e);
            e.error_response()
        }
    }
}
