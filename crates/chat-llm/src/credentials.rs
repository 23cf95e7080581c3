//! Provider credential lookup
//!
//! Keys come from an ordered list of [`CredentialSource`]s; the first source
//! holding a non-empty value wins. The standard order is the process
//! environment, then the persisted override file in the data directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chat_core::paths::{api_keys_json_path, load_config_json, save_config_json};

pub trait CredentialSource: Send + Sync {
    /// Label used in logs.
    fn name(&self) -> &str;

    fn lookup(&self, key: &str) -> Option<String>;
}

/// Reads keys from the process environment, or from a fixed map in tests.
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    snapshot: Option<BTreeMap<String, String>>,
}

impl EnvCredentials {
    pub fn from_process() -> Self {
        Self { snapshot: None }
    }

    pub fn from_map<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            snapshot: Some(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl CredentialSource for EnvCredentials {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        match &self.snapshot {
            Some(map) => map.get(key).cloned(),
            None => std::env::var(key).ok(),
        }
    }
}

/// Keys persisted in `<data-dir>/api_keys.json`, set from the settings UI.
#[derive(Debug, Clone, Default)]
pub struct OverrideCredentials {
    keys: BTreeMap<String, String>,
}

impl OverrideCredentials {
    /// Load the override file. A missing or unreadable file yields no keys.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match load_config_json::<BTreeMap<String, String>>(path) {
            Ok(keys) => {
                log::debug!("Loaded {} API key override(s) from {}", keys.len(), path.display());
                Self { keys }
            }
            Err(e) => {
                log::warn!("Ignoring API key overrides: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_map<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            keys: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Merge `updates` into the stored keys. An empty value removes the key.
    pub fn apply(&mut self, updates: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in updates {
            if value.trim().is_empty() {
                self.keys.remove(&key);
            } else {
                self.keys.insert(key, value.trim().to_string());
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    pub fn save(&self, path: &Path) -> Result<(), String> {
        save_config_json(path, &self.keys)
    }
}

impl CredentialSource for OverrideCredentials {
    fn name(&self) -> &str {
        "local override"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.keys.get(key).cloned()
    }
}

/// Ordered credential lookup.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// Environment first, then `<data_dir>/api_keys.json`.
    pub fn standard(data_dir: &Path) -> Self {
        Self::new(vec![
            Box::new(EnvCredentials::from_process()),
            Box::new(OverrideCredentials::load(&Self::override_path(data_dir))),
        ])
    }

    pub fn override_path(data_dir: &Path) -> PathBuf {
        api_keys_json_path(data_dir)
    }

    pub fn resolve(&self, key: &str) -> Option<String> {
        self.resolve_with_source(&[key]).map(|(value, _)| value)
    }

    /// First non-empty value for any of `keys`. Sources take precedence
    /// over key order.
    pub fn resolve_any(&self, keys: &[&str]) -> Option<String> {
        self.resolve_with_source(keys).map(|(value, _)| value)
    }

    /// Like [`resolve_any`](Self::resolve_any), also naming the source.
    pub fn resolve_with_source(&self, keys: &[&str]) -> Option<(String, &str)> {
        for source in &self.sources {
            for key in keys {
                if let Some(value) = source.lookup(key).filter(|v| !v.trim().is_empty()) {
                    log::debug!("Credential {} resolved from {}", key, source.name());
                    return Some((value, source.name()));
                }
            }
        }
        log::debug!("No credential found for {:?}", keys);
        None
    }
}
