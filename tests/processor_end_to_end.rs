use reducer_stream::{batch_inputs, new_store, AverageInput, AverageState, BatchOutput, BatchState, InMemoryStateRepository,
                     PipelineEvent, Processor, Reducer, Store, StoreConfig};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[test]
fn processor_batches_in_memory() {
  let repo = Arc::new(InMemoryStateRepository::new());
  let store = Store::new(repo, "states", BatchState::STATE_TYPE).expect("store");
  let mut processor = Processor::new(store, "id", BatchState::new(2)).expect("processor");

  let outbound = processor.process(&batch_inputs([1, 2, 3, 4])).expect("process");

  assert_eq!(outbound,
             vec![BatchOutput { numbers: vec![1, 2] }, BatchOutput { numbers: vec![3, 4] }]);
  assert_eq!(processor.state(),
             &BatchState { batch_size: 2,
                           batches_emitted: 2,
                           values: vec![] });
  // two reducer emissions, one persisted write
  assert_eq!(processor.version(), 1);
  let record = processor.store().record("id").unwrap().expect("record");
  assert_eq!(record.metadata["inbound"], json!(["BatchInput", "BatchInput", "BatchInput", "BatchInput"]));
  assert_eq!(record.metadata["outbound"], json!(["BatchOutput", "BatchOutput"]));
}

#[test]
fn processor_integration_sqlite() {
  if cfg!(feature = "pg") {
    eprintln!("skipping sqlite-only integration test because 'pg' feature is enabled");
    return;
  }
  let tmp_path = std::env::temp_dir().join(format!("reducer_stream_{}.db", Uuid::new_v4()));
  let config = StoreConfig::new(tmp_path.to_str().unwrap().to_string());
  let store = new_store(&config, "pipeline", BatchState::STATE_TYPE).expect("failed to create store");

  let mut processor = Processor::new(store.clone(), "id", BatchState::new(2)).expect("failed to create new state");
  processor.process(&batch_inputs([1, 2, 3, 4])).expect("process");

  let expected = BatchState { batch_size: 2,
                              batches_emitted: 2,
                              values: vec![] };
  assert_eq!(processor.state(), &expected);

  let mut stored = BatchState::default();
  assert_eq!(store.get("id", &mut stored).unwrap(), 1);
  assert_eq!(stored, expected);

  // a leftover value is carried across processors through the store
  let mut next = Processor::new(store, "id", BatchState::new(2)).expect("reopen");
  assert!(next.process(&batch_inputs([5])).unwrap().is_empty());
  assert_eq!(next.version(), 2);
  assert_eq!(next.state().values, vec![5]);

  drop((processor, next));
  for suffix in ["", "-wal", "-shm"] {
    let _ = std::fs::remove_file(format!("{}{}", tmp_path.display(), suffix));
  }
  assert!(!tmp_path.exists());
}

#[test]
fn reducers_sharing_a_table_and_id_stay_separate() {
  let repo = Arc::new(InMemoryStateRepository::new());
  let batch_store = Store::new(repo.clone(), "pipeline", BatchState::STATE_TYPE).unwrap();
  let average_store = Store::new(repo, "pipeline", AverageState::STATE_TYPE).unwrap();
  let events: Vec<PipelineEvent> = vec![AverageInput { number: 4 }.into(),
                                        reducer_stream::BatchInput { number: 1 }.into(),
                                        AverageInput { number: 6 }.into()];

  let mut batch = Processor::new(batch_store, "shared", BatchState::new(5)).unwrap();
  let mut average = Processor::new(average_store, "shared", AverageState::default()).unwrap();
  batch.process(&events).unwrap();
  average.process(&events).unwrap();

  assert_eq!(batch.version(), 1);
  assert_eq!(average.version(), 1);
  assert_eq!(batch.state().values, vec![1]);
  assert_eq!(average.state().value, 5.0);
}
