use actix_web::{get, web, HttpResponse};
use chat_llm::ModelDescriptor;
use serde::Serialize;

use crate::{error::AppError, server::AppState};

#[derive(Serialize)]
struct ModelListResponse<'a> {
    default: &'a str,
    models: Vec<&'a ModelDescriptor>,
}

/// All models in selector order, plus the default selection.
#[get("/models")]
pub async fn list_models(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = app_state.catalog().await;
    Ok(HttpResponse::Ok().json(ModelListResponse {
        default: catalog.default_id(),
        models: catalog.descriptors().collect(),
    }))
}

#[get("/models/{id}")]
pub async fn get_model(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = app_state.catalog().await;
    let descriptor = catalog
        .describe(&id)
        .map_err(|_| AppError::ModelNotFound(id.clone()))?;
    Ok(HttpResponse::Ok().json(descriptor))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_models).service(get_model);
}
