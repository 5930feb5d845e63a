use crate::pipeline::PipelineEvent;
use serde::{Deserialize, Serialize};
use stream::events::NoEvent;
use stream::Reducer;

/// Media móvil de los `AverageInput` recibidos. No emite eventos.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AverageState {
    pub sum: i64,
    pub count: i64,
    pub value: f64,
}

impl Reducer for AverageState {
    type Inbound = PipelineEvent;
    type Outbound = NoEvent;
    const STATE_TYPE: &'static str = "Average";

    fn process(&mut self, event: &PipelineEvent) -> Vec<NoEvent> {
        if let PipelineEvent::Average(input) = event {
            // wrap-around en overflow
            self.count = self.count.wrapping_add(1);
            self.sum = self.sum.wrapping_add(input.number);
            self.value = self.sum as f64 / self.count as f64;
        }
        Vec::new()
    }
}
