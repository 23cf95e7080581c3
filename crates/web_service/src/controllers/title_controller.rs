use actix_web::{post, web, HttpRequest, HttpResponse};
use tokio_util::sync::CancellationToken;

use crate::{
    error::AppError,
    middleware::extract_trace_id,
    server::AppState,
    services::title_generation::{GenerateTitleRequest, GenerateTitleResponse},
};

/// Title for a conversation. Generation problems still answer 200 with the
/// fallback title; only an unknown `selectedModel` is rejected.
#[post("/chat/title")]
pub async fn generate_title(
    app_state: web::Data<AppState>,
    req: web::Json<GenerateTitleRequest>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let request = req.into_inner();
    let catalog = app_state.catalog().await;

    if let Some(selected) = request.selected_model.as_deref() {
        if !catalog.contains(selected) {
            return Err(AppError::UnknownModel(selected.to_string()));
        }
    }

    // Dropping the handler (client went away) cancels generation.
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let title = app_state
        .titles
        .generate_title(&catalog, &request.messages, &cancel)
        .await;

    tracing::debug!(
        trace_id = extract_trace_id(&http_req).unwrap_or_default(),
        messages = request.messages.len(),
        "Generated title {:?}",
        title
    );

    Ok(HttpResponse::Ok().json(GenerateTitleResponse { title }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_title);
}
