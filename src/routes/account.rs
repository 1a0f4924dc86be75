use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::models::{AuthResponse, ErrorResponse, LoginRequest, RegisterRequest};
use crate::routes::listings::AppState;
use crate::services::auth::{hash_password, verify_password};
use crate::services::users::NewUser;

/// Configure the account routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/account/register", web::post().to(register))
        .route("/account/login", web::post().to(login))
        .route("/account/logout", web::post().to(logout));
}

/// Register endpoint
///
/// POST /api/v1/account/register
async fn register(state: web::Data<AppState>, req: web::Json<RegisterRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for register request: {}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.users.find_by_email(&req.email_address).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: "This email address is already in use".to_string(),
                status_code: 400,
            });
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to check email {}: {}", req.email_address, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let new_user = NewUser {
        id: Uuid::new_v4().to_string(),
        email: req.email_address.clone(),
        password_hash,
    };

    let user = match state.users.insert(new_user).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Failed to insert user: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let token = match state.tokens.issue(&user.id) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to issue token for new user {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Registration failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::info!("Registered user {}", user.id);

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email_address: user.email,
    })
}

/// Login endpoint
///
/// POST /api/v1/account/login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let invalid_credentials = || {
        HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Login failed".to_string(),
            message: "Email address or password is incorrect".to_string(),
            status_code: 401,
        })
    };

    let user = match state.users.find_by_email(&req.email_address).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => {
            tracing::error!("Failed to look up {}: {}", req.email_address, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Login failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    match verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => return invalid_credentials(),
        Err(e) => {
            tracing::error!("Password verification failed for {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Login failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    }

    let token = match state.tokens.issue(&user.id) {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to issue token for user {}: {}", user.id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Login failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    tracing::info!("User {} logged in", user.id);

    HttpResponse::Ok().json(AuthResponse {
        token,
        user_id: user.id,
        email_address: user.email,
    })
}

/// Logout endpoint
///
/// POST /api/v1/account/logout
///
/// Bearer tokens are discarded client-side; the endpoint exists for parity
/// with the account surface.
async fn logout() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}
