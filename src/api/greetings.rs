use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::services::validation::{parse_i64, required};
use crate::utils::AppError;

const MINIMUM_AGE: i64 = 18;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GreetingQuery {
    pub name: Option<String>,
    pub age: Option<String>,
}

fn greet(name: &str, age: i64) -> Result<HttpResponse, AppError> {
    if age < MINIMUM_AGE {
        return Err(AppError::Unauthorized(format!(
            "Sorry {}, you are not qualified. You must be at least {}.",
            name, MINIMUM_AGE
        )));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome {}, you are old enough!", name)
    })))
}

pub async fn hello_world() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("Hello World!")
}

pub async fn super_simple() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("Hello from planetary Api.")
}

#[utoipa::path(
    get,
    path = "/parameters",
    tag = "Greetings",
    params(GreetingQuery),
    responses(
        (status = 200, description = "Welcome message"),
        (status = 400, description = "Missing name or non-integer age"),
        (status = 401, description = "Under age")
    )
)]
pub async fn parameters(query: web::Query<GreetingQuery>) -> HttpResponse {
    let query = query.into_inner();

    let result = required("name", query.name).and_then(|name| {
        let age = parse_i64("age", &required("age", query.age)?)?;
        greet(&name, age)
    });

    result.unwrap_or_else(|e| e.error_response())
}

#[utoipa::path(
    get,
    path = "/url_variables/{name}/{age}",
    tag = "Greetings",
    params(
        ("name" = String, Path, description = "Visitor name"),
        ("age" = i64, Path, description = "Visitor age")
    ),
    responses(
        (status = 200, description = "Welcome message"),
        (status = 400, description = "Age is not an integer"),
        (status = 401, description = "Under age")
    )
)]
pub async fn url_variables(path: web::Path<(String, String)>) -> HttpResponse {
    let (name, age) = path.into_inner();

    parse_i64("age", &age)
        .and_then(|age| greet(&name, age))
        .unwrap_or_else(|e| e.error_response())
}
