use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use chat_core::Config;
use chat_llm::{CredentialResolver, ModelCatalog, OverrideCredentials};
use log::{error, info};
use tokio::sync::{Mutex, RwLock};

use crate::controllers::{
    model_controller, settings_controller, system_controller, title_controller, user_controller,
};
use crate::error::AppError;
use crate::identity::{CookiePolicy, IdentityResolver};
use crate::middleware::{IdentityMiddleware, TracingMiddleware};
use crate::services::TitleGenerator;

pub struct AppState {
    catalog: RwLock<Arc<ModelCatalog>>,
    /// Held across override file writes and catalog rebuilds so swaps land
    /// in the order the file changed.
    credentials_lock: Mutex<()>,
    pub config: Config,
    pub data_dir: PathBuf,
    pub identity: IdentityResolver,
    pub titles: TitleGenerator,
}

const DEFAULT_WORKER_COUNT: usize = 10;

impl AppState {
    /// Fails if the configured title model is not in `catalog`.
    pub fn new(config: Config, data_dir: PathBuf, catalog: ModelCatalog) -> Result<Self, AppError> {
        let titles = TitleGenerator::from_config(&config);
        if !catalog.contains(titles.model_id()) {
            return Err(AppError::UnknownModel(titles.model_id().to_string()));
        }

        Ok(Self {
            catalog: RwLock::new(Arc::new(catalog)),
            credentials_lock: Mutex::new(()),
            identity: IdentityResolver::new(CookiePolicy::from_config(&config)),
            titles,
            config,
            data_dir,
        })
    }

    /// Built-in catalog with credentials from the environment and
    /// `<data_dir>/api_keys.json`.
    pub fn from_config(config: Config, data_dir: PathBuf) -> Result<Self, AppError> {
        let catalog = build_catalog(&config, &data_dir)?;
        Self::new(config, data_dir, catalog)
    }

    /// Snapshot of the current catalog. Callers keep using it even if the
    /// catalog is replaced meanwhile.
    pub async fn catalog(&self) -> Arc<ModelCatalog> {
        Arc::clone(&*self.catalog.read().await)
    }

    /// Rebuild the catalog from current credentials and swap it in.
    pub async fn reload_catalog(&self) -> Result<Arc<ModelCatalog>, AppError> {
        let _guard = self.credentials_lock.lock().await;
        let config = self.config.clone();
        let data_dir = self.data_dir.clone();
        let catalog = tokio::task::spawn_blocking(move || build_catalog(&config, &data_dir))
            .await
            .map_err(anyhow::Error::from)??;
        Ok(self.swap_catalog(catalog).await)
    }

    /// Merge `updates` into the override file, then rebuild the catalog.
    /// Returns the new catalog and the override key names now stored.
    pub async fn update_api_keys(
        &self,
        updates: BTreeMap<String, String>,
    ) -> Result<(Arc<ModelCatalog>, Vec<String>), AppError> {
        let _guard = self.credentials_lock.lock().await;
        let config = self.config.clone();
        let data_dir = self.data_dir.clone();
        let (catalog, keys) = tokio::task::spawn_blocking(move || {
            let path = CredentialResolver::override_path(&data_dir);
            let mut overrides = OverrideCredentials::load(&path);
            overrides.apply(updates);
            overrides
                .save(&path)
                .map_err(|e| AppError::InternalError(anyhow::anyhow!(e)))?;
            let keys: Vec<String> = overrides.keys().map(str::to_string).collect();
            Ok::<_, AppError>((build_catalog(&config, &data_dir)?, keys))
        })
        .await
        .map_err(anyhow::Error::from)??;
        Ok((self.swap_catalog(catalog).await, keys))
    }

    async fn swap_catalog(&self, catalog: ModelCatalog) -> Arc<ModelCatalog> {
        let catalog = Arc::new(catalog);
        *self.catalog.write().await = Arc::clone(&catalog);
        info!("Model catalog reloaded");
        catalog
    }
}

fn build_catalog(config: &Config, data_dir: &Path) -> Result<ModelCatalog, AppError> {
    let credentials = CredentialResolver::standard(data_dir);
    Ok(ModelCatalog::builtin(&credentials, &config.default_model)?)
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1")
            .configure(system_controller::config)
            .configure(model_controller::config)
            .configure(title_controller::config)
            .configure(user_controller::config)
            .configure(settings_controller::config),
    );
}

pub async fn run(app_state: AppState, host: &str, port: u16) -> Result<(), String> {
    info!("Starting web service...");

    let identity = app_state.identity.clone();
    let app_state = web::Data::new(app_state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(IdentityMiddleware::new(identity.clone()))
            .wrap(TracingMiddleware)
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .workers(DEFAULT_WORKER_COUNT)
    .bind((host, port))
    .map_err(|e| format!("Failed to bind server: {e}"))?
    .run();

    info!("Starting web service on http://{host}:{port}");

    if let Err(e) = server.await {
        error!("Web server error: {}", e);
        return Err(format!("Web server error: {e}"));
    }

    Ok(())
}
