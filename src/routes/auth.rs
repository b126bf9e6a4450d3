use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    services::CredentialService,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// ## Request Body:
/// - `username`: 3 to 32 characters, alphanumeric plus `_` / `-`.
/// - `password`: 6 to 100 characters.
///
/// ## Responses:
/// - `200 OK`: the registered username, as a plain string.
/// - `400 Bad Request`: validation failed; body maps fields to messages.
/// - `409 Conflict`: the username is already taken.
#[post("/register")]
pub async fn register(
    credentials: web::Data<CredentialService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let username = credentials
        .register(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Ok().body(username))
}

/// Log an existing user in
///
/// ## Request Body:
/// - `username` and `password`, same constraints as registration.
///
/// ## Responses:
/// - `200 OK`: a bearer token, as a plain string. Send it back as
///   `Authorization: Bearer <token>` on protected endpoints.
/// - `400 Bad Request`: validation failed.
/// - `401 Unauthorized`: unknown username or wrong password; the
///   response does not say which.
#[post("/login")]
pub async fn login(
    credentials: web::Data<CredentialService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let token = credentials
        .login(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().body(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenCodec;
    use crate::storage::MemoryUserStore;
    use actix_web::{test, App};
    use serde_json::json;
    use std::sync::Arc;

    fn credential_service() -> CredentialService {
        CredentialService::new(
            Arc::new(MemoryUserStore::default()),
            TokenCodec::new("test-secret-for-auth-routes", 3600),
        )
    }

    #[actix_rt::test]
    async fn register_rejects_invalid_input_with_field_messages() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(credential_service()))
                .service(register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "username": "bad name!",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body.get("username").is_some());

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "username": "test_user",
                "password": "short"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(
            body["password"],
            "Password must be between 6 and 100 characters"
        );
    }

    #[actix_rt::test]
    async fn login_rejects_invalid_input() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(credential_service()))
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({
                "username": "test_user",
                "password": "short"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }
}
