// Archivo: repository.rs
// Propósito: definir el trait `StateRepository`, el contrato que deben
// implementar los backends (Diesel, in-memory, etc.) sobre registros crudos.
use crate::domain::{PersistResult, RecordKey, StateRecord};
use crate::errors::Result;

/// Contrato mínimo de un backend clave-valor versionado.
///
/// Las implementaciones trabajan con `StateRecord` ya serializados; la
/// codificación de estados tipados vive en `Store`.
pub trait StateRepository: Send + Sync {
    /// Carga el registro de `key`, o `None` si no existe.
    fn load_record(&self, key: &RecordKey) -> Result<Option<StateRecord>>;

    /// Escritura condicional atómica.
    ///
    /// - Sin registro: se acepta sólo si `expected_version == 0` y crea la
    ///   versión 1.
    /// - Con registro: se acepta sólo si `expected_version` coincide con la
    ///   versión almacenada y la incrementa en 1.
    ///
    /// Cualquier discrepancia devuelve `PersistResult::Conflict` sin mutar
    /// nada. El campo `record.version` se ignora: la versión resultante la
    /// calcula el backend.
    fn write_record(&self, record: &StateRecord, expected_version: i64) -> Result<PersistResult>;

    /// Versión almacenada actualmente para `key` (0 si no existe).
    fn record_version(&self, key: &RecordKey) -> Result<i64> {
        Ok(self.load_record(key)?.map(|r| r.version).unwrap_or(0))
    }
}
