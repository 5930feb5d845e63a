// Archivo: reducer.rs
// Propósito: contrato que deben cumplir los estados de aplicación
// ("reducers") que procesa el `Processor`.
use crate::events::{InboundEvent, OutboundEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Estado de aplicación mutado por eventos de entrada.
///
/// `process` debe ser una función pura y determinista de (estado actual,
/// evento), salvo la mutación explícita de `self`: nada de I/O, aleatoriedad
/// ni lectura de reloj. Aplicar la misma secuencia de eventos desde el mismo
/// estado produce siempre el mismo estado final y las mismas emisiones.
///
/// El estado debe poder serializarse y deserializarse a un valor
/// equivalente; el store lo persiste como payload opaco.
pub trait Reducer: Serialize + DeserializeOwned {
    /// Eventos que consume este reducer (normalmente el enum del pipeline).
    type Inbound: InboundEvent;
    /// Eventos que emite.
    type Outbound: OutboundEvent;

    /// Nombre del tipo de estado; separa reducers distintos que comparten
    /// tabla.
    const STATE_TYPE: &'static str;

    /// Aplica un evento. Variantes no reconocidas: sin cambios, sin
    /// emisiones.
    fn process(&mut self, event: &Self::Inbound) -> Vec<Self::Outbound>;
}

/// Aplica `events` en orden y concatena las emisiones en orden de emisión.
pub fn apply_all<R: Reducer>(state: &mut R, events: &[R::Inbound]) -> Vec<R::Outbound> {
    let mut outbound = Vec::new();
    for event in events {
        outbound.extend(state.process(event));
    }
    outbound
}
