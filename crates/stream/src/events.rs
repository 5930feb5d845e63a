//! Modelo de eventos: capacidades de entrada (`InboundEvent`) y salida
//! (`OutboundEvent`).
//!
//! El core nunca conoce la forma concreta de los eventos. Cada aplicación
//! define un enum por pipeline y los reducers hacen `match` sobre sus
//! variantes; las variantes que un reducer no maneja se ignoran (sin cambio
//! de estado y sin emisiones) para que reducers distintos puedan compartir el
//! mismo pipeline.

/// Evento con nombre estable y legible.
pub trait Event {
    /// Nombre del evento (por ejemplo `"BatchInput"`).
    fn event_name(&self) -> &str;
}

/// Marca de capacidad: el evento es consumido por un reducer.
pub trait InboundEvent: Event {}

/// Marca de capacidad: el evento es producido por un reducer.
pub trait OutboundEvent: Event {}

/// Nombres de una secuencia de eventos, en orden.
pub fn event_names<E: Event>(events: &[E]) -> Vec<String> {
    events.iter().map(|e| e.event_name().to_string()).collect()
}

/// Tipo vacío para reducers que nunca emiten (o stores que escriben sin
/// eventos asociados).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoEvent {}

impl Event for NoEvent {
    fn event_name(&self) -> &str {
        match *self {}
    }
}

impl InboundEvent for NoEvent {}
impl OutboundEvent for NoEvent {}
