pub mod auth;
pub mod greetings;
pub mod health;
pub mod planets;
pub mod swagger;

use actix_web::web;

use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Registers every route plus extractor configs that turn malformed
/// form/JSON/path/query input into JSON 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()))
        .app_data(web::PathConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()))
        .route("/", web::get().to(greetings::hello_world))
        .route("/super_simple", web::get().to(greetings::super_simple))
        .route("/health", web::get().to(health::health_check))
        .route("/parameters", web::get().to(greetings::parameters))
        .route("/url_variables/{name}/{age}", web::get().to(greetings::url_variables))
        // Auth endpoints
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/retrieve_password/{email}", web::get().to(auth::retrieve_password))
        // Planets: reads are public
        .route("/planets", web::get().to(planets::list_planets))
        .route("/planet_details/{id}", web::get().to(planets::planet_details))
        // Planets: mutations require a bearer token
        .service(
            web::resource("/add_planet")
                .wrap(AuthMiddleware)
                .route(web::post().to(planets::add_planet)),
        )
        .service(
            web::resource("/update_planet")
                .wrap(AuthMiddleware)
                .route(web::put().to(planets::update_planet)),
        )
        .service(
            web::resource("/remove_planet/{planet_id}")
                .wrap(AuthMiddleware)
                .route(web::delete().to(planets::remove_planet)),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_service::testing::RecordingGateway;
    use crate::services::token_service::TokenService;
    use crate::state::AppState;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;
    use std::sync::Arc;

    const MERCURY: [(&str, &str); 6] = [
        ("planet_name", "Mercury"),
        ("planet_type", "Class D"),
        ("home_star", "Sol"),
        ("mass", "3.258e23"),
        ("radius", "1516"),
        ("distance", "35.98e6"),
    ];

    fn test_state() -> (web::Data<AppState>, Arc<RecordingGateway>) {
        let gateway = Arc::new(RecordingGateway::default());
        let tokens = TokenService::new("test-secret", "planetary-api", Some(chrono::Duration::hours(1)));
        let state = web::Data::new(AppState::in_memory(tokens, gateway.clone(), 4));
        (state, gateway)
    }

    fn bearer(state: &AppState) -> (&'static str, String) {
        let token = state.tokens.issue("test@test.com").unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_register_then_duplicate_conflicts() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let form = [
            ("first_name", "A"),
            ("last_name", "B"),
            ("email", "a@b.com"),
            ("password", "x"),
        ];

        let req = test::TestRequest::post().uri("/register").set_form(form).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["email"], "a@b.com");
        assert!(body["data"].get("password").is_none());

        let req = test::TestRequest::post().uri("/register").set_form(form).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn test_register_missing_field_is_bad_request() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([("first_name", "A"), ("email", "a@b.com"), ("password", "x")])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Missing required field: last_name");
    }

    #[actix_web::test]
    async fn test_login_with_json_and_form_returns_verifiable_token() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([
                ("first_name", "A"),
                ("last_name", "B"),
                ("email", "a@b.com"),
                ("password", "x"),
            ])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({ "email": "a@b.com", "password": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Login succeeded!");
        let token = body["token"].as_str().unwrap();
        assert_eq!(state.tokens.verify(token).unwrap(), "a@b.com");

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "a@b.com"), ("password", "x")])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("email", "a@b.com"), ("password", "wrong")])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Bad email or password");
    }

    #[actix_web::test]
    async fn test_add_planet_then_get_by_id() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(MERCURY)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let id = body["data"]["planet_id"].as_i64().unwrap();

        let req = test::TestRequest::get().uri(&format!("/planet_details/{}", id)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["planet_name"], "Mercury");
        assert_eq!(body["data"]["planet_type"], "Class D");
        assert_eq!(body["data"]["home_star"], "Sol");
        assert_eq!(body["data"]["mass"], 3.258e23);
        assert_eq!(body["data"]["radius"], 1516.0);
        assert_eq!(body["data"]["distance"], 35.98e6);

        let req = test::TestRequest::get().uri("/planets").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn test_planet_details_errors() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/planet_details/9").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/planet_details/nine").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_add_planet_validation() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let mut bad_mass = MERCURY;
        bad_mass[3] = ("mass", "very heavy");
        let req = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(bad_mass)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("mass"));

        let req = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(&MERCURY[..5])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        assert!(state.planets.list_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_concurrent_duplicate_planet_single_success() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let first = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(MERCURY)
            .to_request();
        let second = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(MERCURY)
            .to_request();

        let (a, b) = futures::join!(test::call_service(&app, first), test::call_service(&app, second));
        let mut statuses = vec![a.status(), b.status()];
        statuses.sort();

        assert_eq!(statuses, vec![StatusCode::OK, StatusCode::CONFLICT]);
        assert_eq!(state.planets.list_all().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_mutations_without_valid_token_leave_store_unchanged() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(MERCURY)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        let before = state.planets.list_all().await.unwrap();

        let forged = TokenService::new("other-secret", "planetary-api", None)
            .issue("test@test.com")
            .unwrap();

        let requests = vec![
            test::TestRequest::post().uri("/add_planet").set_form(MERCURY).to_request(),
            test::TestRequest::post()
                .uri("/add_planet")
                .insert_header(("Authorization", format!("Bearer {}", forged)))
                .set_form([
                    ("planet_name", "Venus"),
                    ("planet_type", "Class K"),
                    ("home_star", "Sol"),
                    ("mass", "4.867e24"),
                    ("radius", "3760"),
                    ("distance", "67.24e6"),
                ])
                .to_request(),
            test::TestRequest::put()
                .uri("/update_planet")
                .insert_header(("Authorization", "Token abc"))
                .set_form([("planet_id", "1"), ("planet_name", "Renamed")])
                .to_request(),
            test::TestRequest::delete().uri("/remove_planet/1").to_request(),
        ];

        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["message"].is_string());
        }

        assert_eq!(state.planets.list_all().await.unwrap(), before);
    }

    #[actix_web::test]
    async fn test_update_and_remove_planet() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/add_planet")
            .insert_header(bearer(&state))
            .set_form(MERCURY)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let mut update = [("planet_id", "1"); 7];
        update[1..].copy_from_slice(&MERCURY);
        update[4] = ("mass", "1.0e23");

        let req = test::TestRequest::put()
            .uri("/update_planet")
            .insert_header(bearer(&state))
            .set_form(update)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::ACCEPTED);
        assert_eq!(state.planets.get(1).await.unwrap().mass, 1.0e23);

        let req = test::TestRequest::delete()
            .uri("/remove_planet/1")
            .insert_header(bearer(&state))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::ACCEPTED);

        let req = test::TestRequest::delete()
            .uri("/remove_planet/1")
            .insert_header(bearer(&state))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_update_unknown_planet_not_found() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let mut update = [("planet_id", "404"); 7];
        update[1..].copy_from_slice(&MERCURY);

        let req = test::TestRequest::put()
            .uri("/update_planet")
            .insert_header(bearer(&state))
            .set_form(update)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "That planet does not exist");
        assert!(state.planets.list_all().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_retrieve_password() {
        let (state, gateway) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/retrieve_password/ghost@test.com").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
        assert!(gateway.messages().is_empty());

        let req = test::TestRequest::post()
            .uri("/register")
            .set_form([
                ("first_name", "William"),
                ("last_name", "Herschel"),
                ("email", "test@test.com"),
                ("password", "P@ssw0rd"),
            ])
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/retrieve_password/test@test.com").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Password sent to test@test.com");

        let sent = gateway.messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "test@test.com");

        // An anonymous retrieve must not lock the owner out
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({ "email": "test@test.com", "password": "P@ssw0rd" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_age_gated_greetings() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/url_variables/Zed/17").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("not qualified"));

        let req = test::TestRequest::get().uri("/url_variables/Zed/21").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["message"].as_str().unwrap().contains("Zed"));

        let req = test::TestRequest::get().uri("/url_variables/Zed/old").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/parameters?name=Ada&age=36").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/parameters?name=Ada&age=12").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get().uri("/parameters?name=Ada&age=twelve").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/parameters?age=30").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_plain_greetings_and_health() {
        let (state, _) = test_state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::get().uri("/super_simple").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "Hello from planetary Api.");

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["store"], "memory");
    }
}
