// Configuración explícita del backend Diesel.
//
// `StoreConfig` se construye a mano o desde el entorno (`from_env`). La
// carga desde variables es opcional: el store nunca lee el entorno por su
// cuenta.
use std::time::Duration;
use stream::{Result, StreamError};

/// URL usada cuando no hay variables definidas (sólo SQLite).
pub const DEFAULT_SQLITE_URL: &str = "file:streamdb?mode=memory&cache=shared";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Ubicación y parámetros del pool de conexiones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
  pub database_url: String,
  pub max_pool_size: u32,
  pub connection_timeout: Duration,
}

impl StoreConfig {
  pub fn new(database_url: impl Into<String>) -> Self {
    Self { database_url: database_url.into(),
           max_pool_size: DEFAULT_POOL_SIZE,
           connection_timeout: Duration::from_secs(DEFAULT_CONNECTION_TIMEOUT_SECS) }
  }

  pub fn with_pool_size(mut self, size: u32) -> Self {
    self.max_pool_size = size;
    self
  }

  pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
    self.connection_timeout = timeout;
    self
  }

  /// Lee `.env` (si existe) y construye la configuración desde
  /// `STREAM_DB_URL` / `DATABASE_URL`, `STREAM_DB_POOL_SIZE` y
  /// `STREAM_DB_TIMEOUT_SECS`.
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  /// Igual que `from_env` pero con una función de búsqueda inyectada.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where F: Fn(&str) -> Option<String>
  {
    let url = lookup("STREAM_DB_URL").or_else(|| lookup("DATABASE_URL"));
    let url = match url {
      Some(u) => u,
      None if cfg!(feature = "pg") => {
        return Err(StreamError::Config("STREAM_DB_URL / DATABASE_URL not set".into()));
      }
      None => DEFAULT_SQLITE_URL.to_string(),
    };
    check_url(&url)?;

    let mut config = StoreConfig::new(url);
    if let Some(size) = lookup("STREAM_DB_POOL_SIZE") {
      let size: u32 = size.trim()
                          .parse()
                          .map_err(|_| StreamError::Config(format!("STREAM_DB_POOL_SIZE inválido: {}", size)))?;
      if size == 0 {
        return Err(StreamError::Config("STREAM_DB_POOL_SIZE debe ser > 0".into()));
      }
      config.max_pool_size = size;
    }
    if let Some(secs) = lookup("STREAM_DB_TIMEOUT_SECS") {
      let secs: u64 =
        secs.trim()
            .parse()
            .map_err(|_| StreamError::Config(format!("STREAM_DB_TIMEOUT_SECS inválido: {}", secs)))?;
      config.connection_timeout = Duration::from_secs(secs);
    }
    Ok(config)
  }
}

fn looks_like_postgres(url: &str) -> bool {
  let l = url.to_lowercase();
  l.starts_with("postgres://") || l.starts_with("postgresql://")
}

/// Verifica que la URL corresponda al backend compilado.
pub(crate) fn check_url(url: &str) -> Result<()> {
  if url.trim().is_empty() {
    return Err(StreamError::Config("database url vacía".into()));
  }
  if cfg!(feature = "pg") && !looks_like_postgres(url) {
    return Err(StreamError::Config("STREAM_DB_URL does not look like a Postgres URL".into()));
  }
  if !cfg!(feature = "pg") && looks_like_postgres(url) {
    return Err(StreamError::Config("stream-persistence was compiled without 'pg' feature; enable the 'pg' feature \
                                    to use Postgres"
                                                    .into()));
  }
  Ok(())
}
