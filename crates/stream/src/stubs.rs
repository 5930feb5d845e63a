// Archivo: stubs.rs
// Propósito: implementación en memoria del backend para pruebas y wiring
// rápido.
//
// `InMemoryStateRepository` respeta la misma semántica de escritura
// condicional que el backend Diesel, pero no es durable ni compartido entre
// procesos.
use crate::domain::{next_version, PersistResult, RecordKey, StateRecord};
use crate::errors::{Result, StreamError};
use crate::repository::StateRepository;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Repositorio en memoria indexado por `RecordKey`.
#[derive(Debug, Default)]
pub struct InMemoryStateRepository {
    records: Mutex<HashMap<RecordKey, StateRecord>>,
}

impl InMemoryStateRepository {
    /// Crea una nueva instancia vacía.
    pub fn new() -> Self {
        Self { records: Mutex::new(HashMap::new()) }
    }

    /// Helper para mapear `Mutex::lock()` en un `Result` con
    /// `StreamError::Storage`.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<RecordKey, StateRecord>>> {
        self.records
            .lock()
            .map_err(|e| StreamError::Storage(format!("mutex poisoned: {:?}", e)))
    }

    /// Número de registros almacenados (útil en aserciones de pruebas).
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl StateRepository for InMemoryStateRepository {
    fn load_record(&self, key: &RecordKey) -> Result<Option<StateRecord>> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Compare-and-swap sobre la versión bajo el mutex del mapa.
    fn write_record(&self, record: &StateRecord, expected_version: i64) -> Result<PersistResult> {
        let mut records = self.lock()?;
        let current = records.get(&record.key).map(|r| r.version).unwrap_or(0);
        // Optimistic concurrency: check expected_version
        if current != expected_version {
            return Ok(PersistResult::Conflict);
        }

        let new_version = next_version(expected_version);
        let mut stored = record.clone();
        stored.version = new_version;
        records.insert(record.key.clone(), stored);
        Ok(PersistResult::Ok { new_version })
    }
}
