use std::collections::BTreeMap;

use actix_web::{put, web, HttpResponse};
use chat_llm::ProviderHost;
use serde::Serialize;

use crate::{error::AppError, server::AppState};

#[derive(Serialize)]
struct ApiKeysResponse {
    models: Vec<String>,
    overrides: Vec<String>,
}

/// Store API key overrides and rebuild the model catalog with them.
///
/// Body maps key names (e.g. `GROQ_API_KEY`) to values; an empty value
/// removes the override. Environment keys still take precedence.
#[put("/settings/api-keys")]
pub async fn update_api_keys(
    app_state: web::Data<AppState>,
    body: web::Json<BTreeMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let updates = body.into_inner();
    let known = ProviderHost::all_credential_keys();
    if let Some(unknown) = updates
        .keys()
        .find(|k| !known.iter().any(|name| *name == k.as_str()))
    {
        return Err(AppError::InvalidRequest(format!(
            "unknown API key name '{}'",
            unknown
        )));
    }

    let (catalog, overrides) = app_state.update_api_keys(updates).await?;

    Ok(HttpResponse::Ok().json(ApiKeysResponse {
        models: catalog.list_ids().into_iter().map(str::to_string).collect(),
        overrides,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(update_api_keys);
}
