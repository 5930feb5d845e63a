// Archivo: domain.rs
// Propósito: tipos persistidos por los backends (`StateRecord`) y el
// resultado de una escritura condicional (`PersistResult`).
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Clave lógica de un registro de estado.
///
/// `table_name` es la tabla lógica a la que está ligado el store y
/// `state_type` distingue tipos de reducer que comparten esa tabla.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordKey {
    pub table_name: String,
    pub id: String,
    pub state_type: String,
}

impl RecordKey {
    pub fn new(table_name: impl Into<String>, id: impl Into<String>, state_type: impl Into<String>) -> Self {
        Self { table_name: table_name.into(),
               id: id.into(),
               state_type: state_type.into() }
    }
}

/// Snapshot persistido del último estado de una entidad.
///
/// `version` es 0 cuando no existe registro; la primera escritura crea la
/// versión 1 y cada escritura posterior incrementa exactamente en 1.
/// `metadata` guarda los nombres de eventos de la escritura que produjo el
/// snapshot (`{"inbound": [...], "outbound": [...]}`); no es un log de
/// eventos y no se reproduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub key: RecordKey,
    pub version: i64,
    pub payload: JsonValue,
    pub metadata: JsonValue,
    pub updated_at: DateTime<Utc>,
}

/// Resultado de una escritura condicionada por versión.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistResult {
    /// Escritura aplicada; `new_version` es la versión almacenada ahora.
    Ok { new_version: i64 },
    /// La versión esperada no coincide; no se modificó nada.
    Conflict,
}

/// Versión que tendrá un registro tras una escritura aceptada con
/// `expected_version`.
pub fn next_version(expected_version: i64) -> i64 {
    expected_version.saturating_add(1)
}
