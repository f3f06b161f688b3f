use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables read on top of the file, with the key each overrides
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("AGORHOUR_STORE", "store.backend"),
    ("AGORHOUR_DB_PATH", "store.path"),
    ("SUPABASE_URL", "store.url"),
    ("SUPABASE_SERVICE_ROLE", "store.service_key"),
    ("OPENAI_API_KEY", "moderation.api_key"),
    ("OPENAI_MODERATION_MODEL", "moderation.model"),
    ("AGORHOUR_TIMEOUT_SECS", "http.timeout_secs"),
];

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub moderation: ModerationConfig,
    pub http: HttpConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgrest,
    Sqlite,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// SQLite file, used by the sqlite backend
    pub path: PathBuf,
    /// Project URL, used by the postgrest backend
    pub url: Option<String>,
    pub service_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl ApiConfig {
    /// Load defaults, then the config file, then the process environment
    ///
    /// `config_file` comes from `--config`; without it the per-user file is
    /// read when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::Message(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => get_config_path(),
        };

        Self::build(Some(&path), |name| std::env::var(name).ok())
    }

    /// Layer the sources with an explicit environment lookup
    pub fn build<F>(config_file: Option<&Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("store.backend", "postgrest")?
            .set_default("store.path", get_default_db_path().to_string_lossy().to_string())?
            .set_default("moderation.base_url", "https://api.openai.com")?
            .set_default(
                "moderation.model",
                moderation_sdk::openai::DEFAULT_MODERATION_MODEL,
            )?
            .set_default("http.timeout_secs", 10)?
            .set_default("cors.allowed_origins", vec!["*"])?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        for (var, key) in ENV_OVERRIDES {
            let value = env(var).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(*key, value)?;
        }

        let mut config: ApiConfig = builder.build()?.try_deserialize()?;

        // Expand tilde in database path
        if config.store.path.starts_with("~") {
            if let Some(home) = home::home_dir() {
                let path_str = config.store.path.to_string_lossy();
                let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
                config.store.path = PathBuf::from(expanded);
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.backend == StoreBackend::Postgrest {
            if is_blank(&self.store.url) {
                return Err(ConfigError::Message(
                    "SUPABASE_URL (store.url) is required for the postgrest store".to_string(),
                ));
            }
            if is_blank(&self.store.service_key) {
                return Err(ConfigError::Message(
                    "SUPABASE_SERVICE_ROLE (store.service_key) is required for the postgrest store"
                        .to_string(),
                ));
            }
        }

        if is_blank(&self.moderation.api_key) {
            return Err(ConfigError::Message(
                "OPENAI_API_KEY (moderation.api_key) is required".to_string(),
            ));
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("agorhour/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("agorhour/agorhour.db")
    } else {
        PathBuf::from("agorhour.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const POSTGREST_ENV: &[(&str, &str)] = &[
        ("SUPABASE_URL", "https://project.supabase.co"),
        ("SUPABASE_SERVICE_ROLE", "service-role-key"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn test_defaults() {
        let config = ApiConfig::build(None, env_from(POSTGREST_ENV)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.store.backend, StoreBackend::Postgrest);
        assert_eq!(config.moderation.base_url, "https://api.openai.com");
        assert_eq!(config.moderation.model, "omni-moderation-latest");
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.cors.allowed_origins, vec!["*".to_string()]);
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_env_overrides() {
        let mut pairs = POSTGREST_ENV.to_vec();
        pairs.extend([
            ("PORT", "8088"),
            ("HOST", "127.0.0.1"),
            ("OPENAI_MODERATION_MODEL", "text-moderation-latest"),
            ("AGORHOUR_TIMEOUT_SECS", "3"),
        ]);
        let config = ApiConfig::build(None, env_from(&pairs)).unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8088");
        assert_eq!(config.moderation.model, "text-moderation-latest");
        assert_eq!(config.http.timeout_secs, 3);
        assert_eq!(config.store.url.as_deref(), Some("https://project.supabase.co"));
        assert_eq!(config.store.service_key.as_deref(), Some("service-role-key"));
    }

    #[test]
    fn test_file_then_env_precedence() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
port = 4000

[store]
backend = "sqlite"
path = "/tmp/agorhour-test.db"

[cors]
allowed_origins = ["https://widget.example.com"]
"#
        )
        .unwrap();

        let config = ApiConfig::build(
            Some(file.path()),
            env_from(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "5000")]),
        )
        .unwrap();

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.path, PathBuf::from("/tmp/agorhour-test.db"));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://widget.example.com".to_string()]
        );
    }

    #[test]
    fn test_sqlite_backend_needs_no_store_credentials() {
        let config = ApiConfig::build(
            None,
            env_from(&[
                ("AGORHOUR_STORE", "sqlite"),
                ("AGORHOUR_DB_PATH", "/tmp/a.db"),
                ("OPENAI_API_KEY", "sk-test"),
            ]),
        )
        .unwrap();

        assert_eq!(config.store.backend, StoreBackend::Sqlite);
        assert_eq!(config.store.path, PathBuf::from("/tmp/a.db"));
    }

    #[test]
    fn test_postgrest_requires_url_and_key() {
        let err = ApiConfig::build(None, env_from(&[("OPENAI_API_KEY", "sk-test")])).unwrap_err();
        assert!(err.to_string().contains("SUPABASE_URL"));

        let err = ApiConfig::build(
            None,
            env_from(&[
                ("OPENAI_API_KEY", "sk-test"),
                ("SUPABASE_URL", "https://project.supabase.co"),
            ]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("SUPABASE_SERVICE_ROLE"));
    }

    #[test]
    fn test_moderation_key_required() {
        let err = ApiConfig::build(
            None,
            env_from(&[("AGORHOUR_STORE", "sqlite"), ("OPENAI_API_KEY", "  ")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_tilde_in_db_path_is_expanded() {
        let config = ApiConfig::build(
            None,
            env_from(&[
                ("AGORHOUR_STORE", "sqlite"),
                ("AGORHOUR_DB_PATH", "~/agorhour/test.db"),
                ("OPENAI_API_KEY", "sk-test"),
            ]),
        )
        .unwrap();

        if home::home_dir().is_some() {
            assert!(!config.store.path.starts_with("~"));
            assert!(config.store.path.ends_with("agorhour/test.db"));
        }
    }
}
