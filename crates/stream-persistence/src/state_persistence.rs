use crate::config::{check_url, StoreConfig};
use crate::schema;
use crate::schema::state_records::dsl as sr;
use chrono::{DateTime, Utc};
#[cfg(not(feature = "pg"))]
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
use stream::{next_version, PersistResult, RecordKey, Result, StateRecord, StateRepository, Store, StreamError};
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
#[cfg(feature = "pg")]
type DbConn = PgConnection;
#[cfg(not(feature = "pg"))]
type DbConn = SqliteConnection;
type DbPool = Pool<ConnectionManager<DbConn>>;
/// Pragmas aplicados a cada conexión SQLite al salir del pool.
#[derive(Debug)]
struct ConnectionPragmas;
impl CustomizeConnection<DbConn, diesel::r2d2::Error> for ConnectionPragmas {
  #[cfg(not(feature = "pg"))]
  fn on_acquire(&self, conn: &mut DbConn) -> std::result::Result<(), diesel::r2d2::Error> {
    conn.batch_execute("PRAGMA busy_timeout = 5000;")
        .map_err(diesel::r2d2::Error::QueryError)?;
    // WAL opcional: las bases en memoria mantienen su propio journal.
    let _ = conn.batch_execute("PRAGMA journal_mode = WAL;");
    Ok(())
  }
}
/// Repo Diesel que implementa `StateRepository` sobre la tabla
/// `state_records`.
pub struct DieselStateRepository {
  pool: Arc<DbPool>,
}
impl DieselStateRepository {
  /// Construye el pool y aplica las migraciones embebidas.
  pub fn new(config: &StoreConfig) -> Result<Self> {
    check_url(&config.database_url)?;
    if config.max_pool_size == 0 || config.connection_timeout.is_zero() {
      return Err(StreamError::Config("pool size y connection timeout deben ser > 0".into()));
    }
    let manager = ConnectionManager::<DbConn>::new(config.database_url.as_str());
    let pool = Pool::builder().max_size(config.max_pool_size)
                              .connection_timeout(config.connection_timeout)
                              .connection_customizer(Box::new(ConnectionPragmas))
                              .build(manager)
                              .map_err(|e| StreamError::Storage(format!("pool: {}", e)))?;
    let repo = DieselStateRepository { pool: Arc::new(pool) };
    let mut pooled = repo.conn()?;
    let conn: &mut DbConn = &mut pooled;
    let applied = conn.run_pending_migrations(MIGRATIONS)
                      .map_err(|e| StreamError::Storage(format!("migrations: {}", e)))?;
    log::info!("stream-persistence: pool listo (max {}), {} migraciones aplicadas",
               config.max_pool_size,
               applied.len());
    Ok(repo)
  }
  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>> {
    self.pool.get().map_err(|e| StreamError::Storage(format!("pool: {}", e)))
  }
}
#[derive(Debug, Queryable, Insertable)]
#[diesel(table_name = schema::state_records)]
struct StateRow {
  pub namespace: String,
  pub id: String,
  pub state_type: String,
  pub version: i64,
  pub payload: String,
  pub metadata: String,
  pub updated_at_ts: i64,
}
impl StateRow {
  fn into_record(self) -> Result<StateRecord> {
    let updated_at = DateTime::<Utc>::from_timestamp_millis(self.updated_at_ts).ok_or_else(|| {
                       StreamError::Storage(format!("updated_at_ts fuera de rango: {}", self.updated_at_ts))
                     })?;
    Ok(StateRecord { key: RecordKey::new(self.namespace, self.id, self.state_type),
                     version: self.version,
                     payload: serde_json::from_str(&self.payload)?,
                     metadata: serde_json::from_str(&self.metadata)?,
                     updated_at })
  }
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T> {
  res.map_err(|e| StreamError::Storage(format!("db: {}", e)))
}
impl StateRepository for DieselStateRepository {
  fn load_record(&self, key: &RecordKey) -> Result<Option<StateRecord>> {
    let mut conn = self.conn()?;
    let row = map_db_err(sr::state_records.filter(sr::namespace.eq(&key.table_name))
                                          .filter(sr::id.eq(&key.id))
                                          .filter(sr::state_type.eq(&key.state_type))
                                          .first::<StateRow>(&mut conn)
                                          .optional())?;
    row.map(StateRow::into_record).transpose()
  }
  fn write_record(&self, record: &StateRecord, expected_version: i64) -> Result<PersistResult> {
    if expected_version < 0 {
      return Ok(PersistResult::Conflict);
    }
    let key = &record.key;
    let new_version = next_version(expected_version);
    let payload = serde_json::to_string(&record.payload)?;
    let metadata = serde_json::to_string(&record.metadata)?;
    let ts = record.updated_at.timestamp_millis();
    let mut conn = self.conn()?;
    if expected_version == 0 {
      // Primera escritura: la clave primaria garantiza que sólo un INSERT gana.
      let row = StateRow { namespace: key.table_name.clone(),
                           id: key.id.clone(),
                           state_type: key.state_type.clone(),
                           version: new_version,
                           payload,
                           metadata,
                           updated_at_ts: ts };
      return match diesel::insert_into(sr::state_records).values(&row).execute(&mut conn) {
        Ok(_) => Ok(PersistResult::Ok { new_version }),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(PersistResult::Conflict),
        Err(e) => Err(StreamError::Storage(format!("db: {}", e))),
      };
    }
    // Compare-and-swap: el UPDATE sólo toca la fila si la versión coincide.
    let updated = map_db_err(diesel::update(sr::state_records.filter(sr::namespace.eq(&key.table_name))
                                                             .filter(sr::id.eq(&key.id))
                                                             .filter(sr::state_type.eq(&key.state_type))
                                                             .filter(sr::version.eq(expected_version)))
                             .set((sr::version.eq(new_version),
                                   sr::payload.eq(&payload),
                                   sr::metadata.eq(&metadata),
                                   sr::updated_at_ts.eq(ts)))
                             .execute(&mut conn))?;
    if updated == 1 {
      Ok(PersistResult::Ok { new_version })
    } else {
      Ok(PersistResult::Conflict)
    }
  }
  fn record_version(&self, key: &RecordKey) -> Result<i64> {
    let mut conn = self.conn()?;
    let v = map_db_err(sr::state_records.filter(sr::namespace.eq(&key.table_name))
                                        .filter(sr::id.eq(&key.id))
                                        .filter(sr::state_type.eq(&key.state_type))
                                        .select(sr::version)
                                        .first::<i64>(&mut conn)
                                        .optional())?;
    Ok(v.unwrap_or(0))
  }
}
/// Liga un backend Diesel nuevo a `table_name` / `state_type`.
pub fn new_store(config: &StoreConfig, table_name: &str, state_type: &str) -> Result<Store<DieselStateRepository>> {
  let repo = DieselStateRepository::new(config)?;
  Store::new(Arc::new(repo), table_name, state_type)
}
/// Crear store desde las variables de entorno (ver `StoreConfig::from_env`).
pub fn new_store_from_env(table_name: &str, state_type: &str) -> Result<Store<DieselStateRepository>> {
  let config = StoreConfig::from_env()?;
  new_store(&config, table_name, state_type)
}
