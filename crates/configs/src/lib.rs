use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_PORT: u16 = 8082;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            environment: default_environment(),
            worker_threads: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_environment() -> String { "development".into() }

/// Which `ComicRepository` implementation backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "in-memory" | "mem" => Ok(Self::Memory),
            other => Err(anyhow!("unknown store backend `{other}` (expected postgres or memory)")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Unset means: postgres when a database URL is available, memory otherwise.
    #[serde(default)]
    pub backend: Option<StoreBackend>,
    #[serde(default = "default_seed")]
    pub seed: bool,
    /// Unrecognised `STORE_BACKEND` value, reported by validation.
    #[serde(skip)]
    invalid_backend: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self { Self { backend: None, seed: true, invalid_backend: None } }
}

fn default_seed() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_optional(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)
        .map_err(|e| anyhow!("failed to parse config file {path}: {e}"))?;
    Ok(cfg)
}

/// Like `load_from_file`, but a missing file yields the defaults.
/// Unreadable or malformed files are still errors.
pub fn load_optional(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(_) => load_from_file(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("failed to read config file {path}: {e}")),
    }
}

impl AppConfig {
    /// File (if present) -> environment overrides -> validation.
    pub fn load_and_validate() -> Result<Self> {
        // a missing config.toml is fine; a broken one is not
        let mut cfg = load_default()?;
        // environment wins over the file
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay environment variables, read through `lookup` so tests can feed a map.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") { self.server.host = host; }
        if let Some(port) = lookup("PORT") {
            // unparsable values are caught by validation
            self.server.port = port.trim().parse().unwrap_or(0);
        }
        if let Some(env) = lookup("APP_ENV").or_else(|| lookup("NODE_ENV")) {
            self.server.environment = env;
        }
        if let Some(w) = lookup("TOKIO_WORKER_THREADS").and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Some(url) = lookup("DATABASE_URL") { self.database.url = url; }
        if let Some(seed) = lookup("SEED_DATA") {
            self.store.seed = !matches!(seed.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no" | "off");
        }
        if let Some(backend) = lookup("STORE_BACKEND") {
            match StoreBackend::parse(&backend) {
                Ok(b) => self.store.backend = Some(b),
                Err(_) => self.store.invalid_backend = Some(backend),
            }
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // server: blank host/environment fall back to defaults, port must be set
        self.server.normalize()?;
        // store: reject unknown backends, then pick one from the database URL
        self.store.resolve(&self.database)?;
        // database settings only matter for the postgres backend
        if self.store.backend() == StoreBackend::Postgres {
            self.database.validate()?;
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.environment.trim().is_empty() {
            self.environment = default_environment();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}

impl StoreConfig {
    fn resolve(&mut self, db: &DatabaseConfig) -> Result<()> {
        if let Some(raw) = self.invalid_backend.take() {
            StoreBackend::parse(&raw)?;
        }
        if self.backend.is_none() {
            self.backend = Some(if db.url.trim().is_empty() {
                StoreBackend::Memory
            } else {
                StoreBackend::Postgres
            });
        }
        Ok(())
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend.unwrap_or(StoreBackend::Memory)
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}
