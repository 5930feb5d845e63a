// Archivo: store.rs
// Propósito: `Store`, la vista tipada y versionada sobre un
// `StateRepository`. Codifica estados con serde_json y traduce
// `PersistResult::Conflict` al error centinela `OptimisticConcurrency`.
use crate::domain::{PersistResult, RecordKey, StateRecord};
use crate::errors::{Result, StreamError};
use crate::events::{event_names, InboundEvent, NoEvent, OutboundEvent};
use crate::repository::StateRepository;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Store versionado ligado a una tabla lógica y a un tipo de estado.
///
/// Es el único mecanismo de consistencia: dos escritores concurrentes con la
/// misma versión esperada compiten y sólo uno gana; el resto recibe
/// `StreamError::OptimisticConcurrency`. No hay reintentos automáticos.
pub struct Store<R>
    where R: StateRepository
{
    repo: Arc<R>,
    table_name: String,
    state_type: String,
}

impl<R> Clone for Store<R> where R: StateRepository
{
    fn clone(&self) -> Self {
        Self { repo: self.repo.clone(),
               table_name: self.table_name.clone(),
               state_type: self.state_type.clone() }
    }
}

impl<R> Store<R> where R: StateRepository
{
    /// Liga el backend inyectado a `table_name` / `state_type`.
    ///
    /// Devuelve `StreamError::Config` si algún nombre está vacío.
    pub fn new(repo: Arc<R>, table_name: &str, state_type: &str) -> Result<Self> {
        if table_name.trim().is_empty() {
            return Err(StreamError::Config("table_name vacío".into()));
        }
        if state_type.trim().is_empty() {
            return Err(StreamError::Config("state_type vacío".into()));
        }
        Ok(Self { repo,
                  table_name: table_name.to_string(),
                  state_type: state_type.to_string() })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn state_type(&self) -> &str {
        &self.state_type
    }

    /// Backend subyacente.
    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    fn key(&self, id: &str) -> RecordKey {
        RecordKey::new(self.table_name.as_str(), id, self.state_type.as_str())
    }

    /// Carga el último snapshot de `id` en `destination` y devuelve su
    /// versión (>= 1).
    ///
    /// Si no existe registro devuelve `StateNotFound`; si el payload no se
    /// puede decodificar devuelve `Serialization`. En ambos casos
    /// `destination` queda intacto.
    pub fn get<S>(&self, id: &str, destination: &mut S) -> Result<i64>
        where S: DeserializeOwned
    {
        let key = self.key(id);
        let record = self.repo
                         .load_record(&key)?
                         .ok_or_else(|| StreamError::StateNotFound { id: id.to_string(),
                                                                     state_type: self.state_type.clone() })?;
        let decoded: S = serde_json::from_value(record.payload)?;
        *destination = decoded;
        log::debug!("store get {}/{}/{} -> version {}", self.table_name, self.state_type, id, record.version);
        Ok(record.version)
    }

    /// Serializa `state` y lo escribe condicionado a `expected_version`.
    ///
    /// Los eventos sólo alimentan la metadata del registro. Devuelve la nueva
    /// versión almacenada.
    pub fn put<S, I, O>(&self, id: &str, expected_version: i64, state: &S, inbound: &[I], outbound: &[O]) -> Result<i64>
        where S: Serialize,
              I: InboundEvent,
              O: OutboundEvent
    {
        let payload = serde_json::to_value(state)?;
        let record = StateRecord { key: self.key(id),
                                   version: expected_version,
                                   payload,
                                   metadata: json!({
                                       "inbound": event_names(inbound),
                                       "outbound": event_names(outbound),
                                   }),
                                   updated_at: Utc::now() };
        match self.repo.write_record(&record, expected_version)? {
            PersistResult::Ok { new_version } => {
                log::debug!("store put {}/{}/{} -> version {}", self.table_name, self.state_type, id, new_version);
                Ok(new_version)
            }
            PersistResult::Conflict => {
                log::warn!("store put {}/{}/{}: conflicto con versión esperada {}",
                           self.table_name,
                           self.state_type,
                           id,
                           expected_version);
                Err(StreamError::OptimisticConcurrency { id: id.to_string(),
                                                         state_type: self.state_type.clone(),
                                                         expected: expected_version })
            }
        }
    }

    /// `put` sin eventos asociados.
    pub fn put_state<S>(&self, id: &str, expected_version: i64, state: &S) -> Result<i64>
        where S: Serialize
    {
        self.put::<S, NoEvent, NoEvent>(id, expected_version, state, &[], &[])
    }

    /// Versión almacenada para `id` (0 si no existe).
    pub fn version(&self, id: &str) -> Result<i64> {
        self.repo.record_version(&self.key(id))
    }

    /// Registro crudo de `id`, incluida la metadata de la última escritura.
    pub fn record(&self, id: &str) -> Result<Option<StateRecord>> {
        self.repo.load_record(&self.key(id))
    }
}
