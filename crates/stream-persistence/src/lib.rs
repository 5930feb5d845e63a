//! Backend Diesel para el trait `StateRepository` del crate `stream`.
//! Este crate expone el módulo `schema`, la configuración del pool
//! (`StoreConfig`) y el repositorio `DieselStateRepository`. SQLite es el
//! backend por defecto; la feature `pg` cambia la conexión a Postgres.
//! La implementación detallada está en `state_persistence.rs`.

mod config;
pub mod schema;
mod state_persistence;

pub use config::{StoreConfig, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_POOL_SIZE, DEFAULT_SQLITE_URL};
pub use state_persistence::{new_store, new_store_from_env, DieselStateRepository, MIGRATIONS};
