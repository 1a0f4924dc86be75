use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{DashboardResponse, ErrorResponse, UpdateProfileRequest};
use crate::routes::listings::AppState;
use crate::services::auth::CurrentUser;

/// Configure the dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard))
        .route("/dashboard/profile", web::post().to(update_profile));
}

/// Dashboard endpoint: the current user's clubs and races
///
/// GET /api/v1/dashboard
async fn dashboard(state: web::Data<AppState>, user: CurrentUser) -> impl Responder {
    let clubs = match state.dashboard.get_all_user_clubs(&user.user_id).await {
        Ok(clubs) => clubs,
        Err(e) => {
            tracing::error!("Failed to fetch clubs for user {}: {}", user.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load dashboard".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let races = match state.dashboard.get_all_user_races(&user.user_id).await {
        Ok(races) => races,
        Err(e) => {
            tracing::error!("Failed to fetch races for user {}: {}", user.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to load dashboard".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    HttpResponse::Ok().json(DashboardResponse { clubs, races })
}

/// Profile update endpoint
///
/// POST /api/v1/dashboard/profile
async fn update_profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    req: web::Json<UpdateProfileRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let mut account = match state.dashboard.get_user_by_id(&user.user_id).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "User not found".to_string(),
                message: format!("No user with id {}", user.user_id),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to fetch user {}: {}", user.user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    account.pace = req.pace;
    account.mileage = req.mileage;
    account.city = req.city.clone();
    account.state = req.state.clone();

    match state.dashboard.update_user(&account).await {
        Ok(true) => {
            tracing::info!("Updated profile for user {}", account.id);
            HttpResponse::Ok().json(account)
        }
        Ok(false) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "Failed to update profile".to_string(),
            message: "The profile update affected no rows".to_string(),
            status_code: 500,
        }),
        Err(e) => {
            tracing::error!("Failed to update profile for user {}: {}", account.id, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to update profile".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}
