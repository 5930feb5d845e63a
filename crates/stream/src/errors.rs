// Archivo: errors.rs
// Propósito: definir los errores del runtime de reducers y el alias Result<T>
// usado por las APIs del crate.
use thiserror::Error;

/// Errores comunes del store versionado y del procesador.
///
/// - `StateNotFound`: no existe registro para el par id/tipo de estado.
/// - `OptimisticConcurrency`: la versión esperada no coincide con la
///   almacenada.
/// - `Serialization`: el payload no pudo codificarse/decodificarse.
/// - `Storage`: error del backend (BD, red, permisos).
/// - `Config`: configuración inválida del store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
  /// No hay estado persistido para `(id, state_type)`.
  #[error("Estado no encontrado: {state_type}/{id}")]
  StateNotFound { id: String, state_type: String },
  /// Conflicto optimista: otro escritor avanzó la versión.
  #[error("Conflicto de concurrencia optimista: {state_type}/{id} (versión esperada {expected})")]
  OptimisticConcurrency {
    id: String,
    state_type: String,
    expected: i64,
  },
  /// Error de serialización/deserialización del estado.
  #[error("Error de serialización: {0}")]
  Serialization(String),
  /// Error genérico de almacenamiento (BD, pool, etc.).
  #[error("Error de almacenamiento: {0}")]
  Storage(String),
  /// Configuración inválida o ausente.
  #[error("Error de configuración: {0}")]
  Config(String),
}

impl StreamError {
  /// `true` si el error indica que no existe registro previo.
  pub fn is_not_found(&self) -> bool {
    matches!(self, StreamError::StateNotFound { .. })
  }

  /// `true` si el error es un conflicto de versión.
  pub fn is_conflict(&self) -> bool {
    matches!(self, StreamError::OptimisticConcurrency { .. })
  }
}

impl From<serde_json::Error> for StreamError {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}

/// Alias de resultado usado por las APIs del crate.
pub type Result<T> = std::result::Result<T, StreamError>;
