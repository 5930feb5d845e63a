//! Crate `stream`: runtime mínimo de reducers con persistencia versionada.
//!
//! Este crate define el modelo de eventos (`InboundEvent`, `OutboundEvent`),
//! el contrato `Reducer`, el backend `StateRepository` con una implementación
//! en memoria (`InMemoryStateRepository`), el `Store` tipado y el
//! `Processor` que los orquesta.
//!
//! Diseño resumido:
//! - Sólo se persiste el último snapshot por entidad (`StateRecord`).
//! - Locking optimista: cada escritura lleva un `expected_version`; si no
//!   coincide con la versión almacenada falla con
//!   `StreamError::OptimisticConcurrency` sin modificar nada.
//! - Sin reintentos automáticos: el caller decide recargar o abortar.
//!
//! Ejemplo rápido:
//! ```rust
//! use std::sync::Arc;
//! use stream::{InMemoryStateRepository, Store};
//! let repo = Arc::new(InMemoryStateRepository::new());
//! let store = Store::new(repo, "states", "Counter").unwrap();
//! assert_eq!(store.put_state("id", 0, &41u32).unwrap(), 1);
//! let mut v = 0u32;
//! assert_eq!(store.get("id", &mut v).unwrap(), 1);
//! assert_eq!(v, 41);
//! ```
pub mod domain;
pub mod errors;
pub mod events;
pub mod processor;
pub mod reducer;
pub mod repository;
pub mod store;
pub mod stubs;

pub use domain::*;
pub use errors::*;
pub use events::*;
pub use processor::*;
pub use reducer::*;
pub use repository::*;
pub use store::*;
pub use stubs::*;
