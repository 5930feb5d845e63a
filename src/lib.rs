//! reducer-stream: reducers persistidos con control de concurrencia optimista
//!
//! Crate fachada que reexporta el runtime (`stream`) y el backend Diesel
//! (`stream_persistence`), y define el pipeline de ejemplo con los reducers
//! `BatchState` y `AverageState`.

pub mod average;
pub mod batch;
pub mod pipeline;

pub use average::AverageState;
pub use batch::BatchState;
pub use pipeline::{batch_inputs, AverageInput, BatchInput, BatchOutput, PipelineEvent};
pub use stream::{InMemoryStateRepository, Processor, Reducer, StateRepository, Store, StreamError};
pub use stream_persistence::{new_store, new_store_from_env, DieselStateRepository, StoreConfig};
