// Archivo: pipeline.rs
// Propósito: eventos del pipeline de ejemplo compartido por `BatchState` y
// `AverageState`. Cada reducer hace `match` sobre `PipelineEvent` e ignora
// las variantes que no le corresponden.
use serde::{Deserialize, Serialize};
use stream::events::{Event, InboundEvent, OutboundEvent};

/// Valor a acumular por `BatchState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchInput {
    pub number: i64,
}

/// Valor a promediar por `AverageState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageInput {
    pub number: i64,
}

/// Eventos de entrada del pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineEvent {
    Batch(BatchInput),
    Average(AverageInput),
}

impl Event for PipelineEvent {
    fn event_name(&self) -> &str {
        match self {
            PipelineEvent::Batch(_) => "BatchInput",
            PipelineEvent::Average(_) => "AverageInput",
        }
    }
}

impl InboundEvent for PipelineEvent {}

impl From<BatchInput> for PipelineEvent {
    fn from(e: BatchInput) -> Self {
        PipelineEvent::Batch(e)
    }
}

impl From<AverageInput> for PipelineEvent {
    fn from(e: AverageInput) -> Self {
        PipelineEvent::Average(e)
    }
}

/// Lote completo emitido por `BatchState`, en orden de llegada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutput {
    pub numbers: Vec<i64>,
}

impl Event for BatchOutput {
    fn event_name(&self) -> &str {
        "BatchOutput"
    }
}

impl OutboundEvent for BatchOutput {}

/// Atajo para construir lotes de `BatchInput`.
pub fn batch_inputs<I>(numbers: I) -> Vec<PipelineEvent>
    where I: IntoIterator<Item = i64>
{
    numbers.into_iter().map(|number| BatchInput { number }.into()).collect()
}
