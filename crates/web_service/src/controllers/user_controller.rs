use actix_web::{get, put, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    identity::{ExecutionContext, RequestCookies, UserId},
    middleware::extract_user_id,
    server::AppState,
};

#[derive(Serialize)]
struct UserResponse {
    user_id: Option<UserId>,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub user_id: String,
}

#[get("/user")]
pub async fn get_user(app_state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    // Without the identity middleware, fall back to a read-only lookup.
    let user_id = extract_user_id(&req).or_else(|| {
        let mut cookies = RequestCookies::from_request(&req);
        app_state
            .identity
            .current(&ExecutionContext::Interactive(&mut cookies))
    });
    HttpResponse::Ok().json(UserResponse { user_id })
}

#[put("/user")]
pub async fn update_user(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let mut cookies = RequestCookies::from_request(&req);
    let user_id = app_state
        .identity
        .update(&mut ExecutionContext::Interactive(&mut cookies), &body.user_id)?;

    tracing::info!("User id replaced by client request");

    let mut response = HttpResponse::Ok();
    for cookie in cookies.into_pending() {
        response.cookie(cookie);
    }
    Ok(response.json(UserResponse {
        user_id: Some(user_id),
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(get_user).service(update_user);
}
