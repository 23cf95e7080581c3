use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::paths::config_json_path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Catalog id preselected for new chats.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Catalog id used for title generation, independent of the chat model.
    #[serde(default = "default_title_model")]
    pub title_model: String,
    #[serde(default = "default_title_timeout_secs")]
    pub title_timeout_secs: u64,
    #[serde(default = "default_cookie_max_age_hours")]
    pub cookie_max_age_hours: u64,
    #[serde(default)]
    pub cookie_secure: bool,
}

const CONFIG_FILE_PATH: &str = "config.toml";

fn default_model() -> String {
    "glm-4.5-air".to_string()
}

fn default_title_model() -> String {
    "gpt-oss-20b".to_string()
}

const fn default_title_timeout_secs() -> u64 {
    15
}

const fn default_cookie_max_age_hours() -> u64 {
    24
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            title_model: default_title_model(),
            title_timeout_secs: default_title_timeout_secs(),
            cookie_max_age_hours: default_cookie_max_age_hours(),
            cookie_secure: false,
        }
    }
}

impl Config {
    /// Load from `<data_dir>/config.json`, then `./config.toml`, then apply
    /// environment overrides.
    pub fn from_data_dir(data_dir: &Path) -> Self {
        Self::load_from(
            &config_json_path(data_dir),
            Path::new(CONFIG_FILE_PATH),
            |key| std::env::var(key).ok(),
        )
    }

    pub fn load_from(
        json_path: &Path,
        toml_path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut config = Config::default();

        let mut loaded = false;
        if json_path.exists() {
            match std::fs::read_to_string(json_path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<Config>(&content).map_err(|e| e.to_string())
                }) {
                Ok(file_config) => {
                    log::info!("Loaded config from {}", json_path.display());
                    config = file_config;
                    loaded = true;
                }
                Err(e) => log::warn!("Ignoring {}: {}", json_path.display(), e),
            }
        }

        if !loaded && toml_path.exists() {
            if let Ok(content) = std::fs::read_to_string(toml_path) {
                match toml::from_str::<Config>(&content) {
                    Ok(file_config) => {
                        log::info!("Loaded config from {}", toml_path.display());
                        config = file_config;
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", toml_path.display(), e),
                }
            }
        }

        config.apply_env(env);
        config
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(model) = env("AI_CHAT_DEFAULT_MODEL").filter(|v| !v.is_empty()) {
            self.default_model = model;
        }
        if let Some(model) = env("AI_CHAT_TITLE_MODEL").filter(|v| !v.is_empty()) {
            self.title_model = model;
        }
        if let Some(secs) = env("AI_CHAT_TITLE_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.title_timeout_secs = secs;
        }
        if let Some(hours) = env("AI_CHAT_COOKIE_MAX_AGE_HOURS").and_then(|v| v.parse().ok()) {
            self.cookie_max_age_hours = hours;
        }
        if let Some(secure) = env("AI_CHAT_COOKIE_SECURE") {
            self.cookie_secure = parse_bool_env(&secure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parse_bool_env_true_values() {
        for value in ["1", "true", "TRUE", " yes ", "Y", "on"] {
            assert!(parse_bool_env(value), "value {value:?} should be true");
        }
    }

    #[test]
    fn parse_bool_env_false_values() {
        for value in ["0", "false", "no", "off", "", "  "] {
            assert!(!parse_bool_env(value), "value {value:?} should be false");
        }
    }

    #[test]
    fn defaults_without_files_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(
            &dir.path().join("config.json"),
            &dir.path().join("config.toml"),
            no_env,
        );
        assert_eq!(config, Config::default());
        assert_eq!(config.default_model, "glm-4.5-air");
        assert_eq!(config.title_model, "gpt-oss-20b");
        assert_eq!(config.cookie_max_age_hours, 24);
    }

    #[test]
    fn json_file_takes_precedence_over_toml() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&json_path, r#"{"default_model": "kimi-k2"}"#).unwrap();
        std::fs::write(&toml_path, "default_model = \"llama4\"\n").unwrap();

        let config = Config::load_from(&json_path, &toml_path, no_env);
        assert_eq!(config.default_model, "kimi-k2");
        assert_eq!(config.title_model, "gpt-oss-20b");
    }

    #[test]
    fn reads_config_json_from_given_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{"default_model": "qwen3-32b", "cookie_max_age_hours": 72}"#,
        )
        .unwrap();

        let config = Config::from_data_dir(dir.path());
        assert_eq!(config.cookie_max_age_hours, 72);
        assert_eq!(config.title_model, Config::default().title_model);
    }

    #[test]
    fn toml_used_when_json_missing() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("config.toml");
        std::fs::write(&toml_path, "title_timeout_secs = 3\ncookie_secure = true\n").unwrap();

        let config = Config::load_from(&dir.path().join("config.json"), &toml_path, no_env);
        assert_eq!(config.title_timeout_secs, 3);
        assert!(config.cookie_secure);
    }

    #[test]
    fn env_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, r#"{"title_model": "llama4"}"#).unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            ("AI_CHAT_TITLE_MODEL", "qwen3-32b"),
            ("AI_CHAT_COOKIE_MAX_AGE_HOURS", "48"),
            ("AI_CHAT_TITLE_TIMEOUT_SECS", "not-a-number"),
        ]);
        let config = Config::load_from(&json_path, &dir.path().join("config.toml"), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.title_model, "qwen3-32b");
        assert_eq!(config.cookie_max_age_hours, 48);
        assert_eq!(config.title_timeout_secs, 15);
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("config.json");
        std::fs::write(&json_path, "{ not json").unwrap();

        let config = Config::load_from(&json_path, &dir.path().join("config.toml"), no_env);
        assert_eq!(config, Config::default());
    }
}
