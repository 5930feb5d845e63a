use serde::{Deserialize, Serialize};
use stream::events::{Event, InboundEvent, OutboundEvent};
use stream::{Processor, Reducer};
use stream_persistence::new_store_from_env;

#[derive(Debug, Clone)]
struct Reading(i64);

impl Event for Reading {
  fn event_name(&self) -> &str {
    "Reading"
  }
}
impl InboundEvent for Reading {}

#[derive(Debug, Clone)]
struct Peak(i64);

impl Event for Peak {
  fn event_name(&self) -> &str {
    "Peak"
  }
}
impl OutboundEvent for Peak {}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MaxState {
  max: Option<i64>,
}

impl Reducer for MaxState {
  type Inbound = Reading;
  type Outbound = Peak;
  const STATE_TYPE: &'static str = "Max";

  fn process(&mut self, event: &Reading) -> Vec<Peak> {
    if self.max.map_or(true, |m| event.0 > m) {
      self.max = Some(event.0);
      vec![Peak(event.0)]
    } else {
      Vec::new()
    }
  }
}

fn main() {
  // El ejemplo usa STREAM_DB_URL / DATABASE_URL. Para demos locales rápidos:
  //   export STREAM_DB_URL="/tmp/stream_demo.db"
  // Sin variables se usa SQLite compartido en memoria.
  let store = new_store_from_env("sensors", MaxState::STATE_TYPE).expect("no se pudo inicializar el store");

  let mut processor = Processor::new(store, "sensor-1", MaxState::default()).expect("processor");
  println!("sensor-1 cargado en versión {}", processor.version());

  let peaks = processor.process(&[Reading(3), Reading(9), Reading(4), Reading(12)]).expect("process");
  println!("picos emitidos: {:?}", peaks);
  println!("estado {:?} persistido en versión {}", processor.state(), processor.version());
}
