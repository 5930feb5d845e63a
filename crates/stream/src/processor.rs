// Archivo: processor.rs
// Propósito: implementar `Processor`, que orquesta un reducer contra un
// `Store` para una sola entidad.
//
// Nota: el procesador no reintenta ni revierte. Ante un conflicto el estado
// en memoria ya refleja los eventos aplicados y el error sube al caller, que
// decide si recargar (`reload`) y reintentar.
use crate::errors::{Result, StreamError};
use crate::reducer::{apply_all, Reducer};
use crate::repository::StateRepository;
use crate::store::Store;

/// Procesador de eventos para una entidad `id`.
///
/// Ciclo por invocación de `process`:
/// 1. aplicar los eventos en orden sobre el estado en memoria
/// 2. concatenar los eventos de salida en orden de emisión
/// 3. persistir el estado final una sola vez con la versión actual
/// 4. avanzar la versión en éxito y devolver los eventos de salida
pub struct Processor<R, S>
    where R: StateRepository,
          S: Reducer
{
    store: Store<R>,
    id: String,
    state: S,
    version: i64,
}

impl<R, S> Processor<R, S>
    where R: StateRepository,
          S: Reducer
{
    /// Carga el estado de `id` sobre `initial_state`.
    ///
    /// Si no existe registro la entidad empieza en versión 0 con
    /// `initial_state` tal cual. Cualquier otro error de `get` es fatal.
    ///
    /// El store debe estar ligado a `S::STATE_TYPE`; si no, `Config`.
    pub fn new(store: Store<R>, id: &str, initial_state: S) -> Result<Self> {
        if store.state_type() != S::STATE_TYPE {
            return Err(StreamError::Config(format!("store ligado a '{}' pero el reducer es '{}'",
                                                   store.state_type(),
                                                   S::STATE_TYPE)));
        }
        let mut state = initial_state;
        let version = match store.get(id, &mut state) {
            Ok(v) => v,
            Err(e) if e.is_not_found() => {
                log::debug!("processor {}/{}: entidad nueva", store.state_type(), id);
                0
            }
            Err(e) => return Err(e),
        };
        Ok(Self { store,
                  id: id.to_string(),
                  state,
                  version })
    }

    /// Aplica `events` y persiste el estado resultante una vez.
    ///
    /// Output:
    /// - `Ok(outbound)` con los eventos emitidos cuando la escritura se
    ///   acepta.
    /// - `Err(OptimisticConcurrency)` si otro escritor avanzó la versión. El
    ///   estado en memoria no se revierte y los eventos de salida de esta
    ///   llamada se descartan: describen una transición no persistida.
    ///
    /// Un lote vacío también escribe: crea el snapshot inicial de una entidad
    /// nueva y detecta versiones obsoletas.
    pub fn process(&mut self, events: &[S::Inbound]) -> Result<Vec<S::Outbound>> {
        let outbound = apply_all(&mut self.state, events);
        log::debug!("processor {}/{}: {} eventos aplicados, {} emitidos",
                    self.store.state_type(),
                    self.id,
                    events.len(),
                    outbound.len());
        self.version = self.store.put(&self.id, self.version, &self.state, events, &outbound)?;
        Ok(outbound)
    }

    /// Recarga estado y versión desde el store, descartando la divergencia en
    /// memoria. Es el camino de recuperación tras un conflicto; nunca se
    /// llama automáticamente.
    ///
    /// Si el registro ya no existe se conserva el estado en memoria y la
    /// versión vuelve a 0.
    pub fn reload(&mut self) -> Result<i64> {
        match self.store.get(&self.id, &mut self.state) {
            Ok(v) => self.version = v,
            Err(e) if e.is_not_found() => self.version = 0,
            Err(e) => return Err(e),
        }
        Ok(self.version)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Versión de la última escritura observada (0 = entidad nueva).
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn store(&self) -> &Store<R> {
        &self.store
    }

    /// Consume el procesador y devuelve el estado en memoria.
    pub fn into_state(self) -> S {
        self.state
    }
}
