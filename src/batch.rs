use crate::pipeline::{BatchOutput, PipelineEvent};
use serde::{Deserialize, Serialize};
use stream::Reducer;

/// Acumula `BatchInput` y emite un `BatchOutput` cada `batch_size` valores.
///
/// Tras K·N entradas con `batch_size = N` se han emitido exactamente K lotes
/// y `values` conserva las `entradas mod N` restantes. Con `batch_size = 0`
/// cada entrada forma su propio lote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchState {
    pub batch_size: usize,
    pub batches_emitted: u64,
    pub values: Vec<i64>,
}

impl BatchState {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size,
               ..Default::default() }
    }
}

impl Reducer for BatchState {
    type Inbound = PipelineEvent;
    type Outbound = BatchOutput;
    const STATE_TYPE: &'static str = "Batch";

    fn process(&mut self, event: &PipelineEvent) -> Vec<BatchOutput> {
        match event {
            PipelineEvent::Batch(input) => {
                self.values.push(input.number);
                if self.values.len() >= self.batch_size {
                    self.batches_emitted += 1;
                    vec![BatchOutput { numbers: std::mem::take(&mut self.values) }]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }
}
